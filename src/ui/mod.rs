pub mod session;
pub mod theme;
pub mod views;

use crate::api::AppState;
use crate::models::GenerationResult;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use maud::Markup;
use serde::Deserialize;
use std::sync::Arc;

use self::session::Session;
use self::theme::Theme;

pub fn ui_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index).post(submit_mood))
        .route("/theme", post(toggle_theme))
}

#[derive(Debug, Deserialize)]
pub struct MoodForm {
    #[serde(default)]
    mood: String,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

fn render(headers: &HeaderMap, session: &Session) -> Markup {
    if is_htmx(headers) {
        views::app(session)
    } else {
        views::page(Theme::from_headers(headers), session)
    }
}

async fn index(headers: HeaderMap) -> Markup {
    render(&headers, &Session::new())
}

async fn submit_mood(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<MoodForm>,
) -> Markup {
    let mut session = Session::new();

    if let Some(request) = session.submit(&form.mood) {
        let result = state.gateway.generate(request).await;
        session.resolve(GenerationResult::from(result));
    }

    render(&headers, &session)
}

async fn toggle_theme(headers: HeaderMap) -> Response {
    let theme = Theme::from_headers(&headers).toggled();
    let cookie = [(header::SET_COOKIE, theme.set_cookie())];

    if is_htmx(&headers) {
        (StatusCode::NO_CONTENT, cookie).into_response()
    } else {
        (cookie, Redirect::to("/")).into_response()
    }
}

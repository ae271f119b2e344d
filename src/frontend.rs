use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

// Stylesheet and browser script for the server-rendered views
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

pub async fn serve_asset(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => asset_response(path, content.data.into_owned()),
        None => not_found().await,
    }
}

fn asset_response(path: &str, data: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    (
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, cache_control_value(path).to_string()),
        ],
        data,
    )
        .into_response()
}

fn cache_control_value(path: &str) -> &'static str {
    // Icons never change; css and js follow the binary version
    if path.ends_with(".svg") {
        "public, max-age=31536000, immutable"
    } else {
        "public, max-age=0, must-revalidate"
    }
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{GenerateRequest, GenerationOutput, MoodRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

pub fn generate_routes() -> Router<Arc<AppState>> {
    Router::new().route("/generate", post(generate))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationOutput>> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected generate payload: {}", rejection);
        AppError::BadInput
    })?;

    let request = MoodRequest::try_from(req)?;
    let output = state.gateway.generate(request).await?;

    Ok(Json(output))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;

pub const GENERIC_FAILURE: &str = "Playlist generation failed";
pub const MALFORMED_OUTPUT: &str = "Playlist generator returned malformed output";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Valid text input is required")]
    BadInput,

    /// The generator exited non-zero or wrote diagnostics.
    #[error("{0}")]
    ExternalFailure(String),

    #[error("Malformed generator output: {0}")]
    MalformedOutput(String),

    /// The generator ran fine but reported its own `error`.
    #[error("{0}")]
    Application(String),

    #[error("Playlist generation timed out after {}", limit_text(.0))]
    Timeout(Duration),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

fn limit_text(limit: &Duration) -> String {
    if limit.subsec_nanos() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{}ms", limit.as_millis())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The single human-readable string shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ExternalFailure(msg) | AppError::Application(msg) => msg.clone(),
            AppError::MalformedOutput(_) => MALFORMED_OUTPUT.to_string(),
            AppError::BadInput | AppError::Timeout(_) | AppError::Internal(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedOutput(ref detail) => {
                tracing::error!("Malformed generator output: {}", detail);
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.user_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

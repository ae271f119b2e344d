use crate::error::{AppError, Result};
use crate::models::Track;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validated mood text, ready to hand to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodRequest {
    text: String,
}

impl MoodRequest {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(AppError::BadInput);
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Body of `POST /api/generate`. `text` is left untyped so a wrong type is
/// reported as bad input rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: Value,
}

impl TryFrom<GenerateRequest> for MoodRequest {
    type Error = AppError;

    fn try_from(req: GenerateRequest) -> Result<Self> {
        match req.text {
            Value::String(text) => MoodRequest::new(text),
            _ => Err(AppError::BadInput),
        }
    }
}

/// A successful generator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub spotify_url: Option<String>,
    /// Passthrough fields such as `dominant_mood`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationOutput {
    pub fn dominant_mood(&self) -> Option<&str> {
        self.extra
            .get("dominant_mood")
            .and_then(Value::as_str)
            .filter(|mood| !mood.is_empty())
    }

    pub fn playlist_url(&self) -> Option<&str> {
        self.spotify_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// What the UI receives from the gateway: a track list or a message, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Failure { error: String },
    Success(GenerationOutput),
}

impl From<Result<GenerationOutput>> for GenerationResult {
    fn from(result: Result<GenerationOutput>) -> Self {
        match result {
            Ok(output) => GenerationResult::Success(output),
            Err(e) => GenerationResult::Failure {
                error: e.user_message(),
            },
        }
    }
}

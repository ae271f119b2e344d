pub mod generation;
pub mod track;

pub use generation::{GenerateRequest, GenerationOutput, GenerationResult, MoodRequest};
pub use track::Track;

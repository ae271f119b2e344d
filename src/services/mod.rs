pub mod gateway;
pub mod generator;

pub use gateway::GenerationGateway;
pub use generator::{PlaylistGenerator, ProcessGenerator};

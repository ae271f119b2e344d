use crate::error::Result;
use crate::models::{GenerationOutput, MoodRequest};
use crate::services::PlaylistGenerator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Hands validated mood text to the generator, one independent run per call.
///
/// Nothing is cached or shared between calls: the same mood submitted twice
/// runs the generator twice, and concurrent calls never wait on each other.
#[derive(Clone)]
pub struct GenerationGateway {
    generator: Arc<dyn PlaylistGenerator>,
}

impl GenerationGateway {
    pub fn new(generator: Arc<dyn PlaylistGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, request: MoodRequest) -> Result<GenerationOutput> {
        let request_id = Uuid::new_v4();
        let span = info_span!("generate", %request_id);

        async move {
            info!("Generating playlist for {} chars of mood text", request.text().chars().count());
            let started = Instant::now();

            let result = self.generator.generate(request.text()).await;

            match &result {
                Ok(output) => info!(
                    "Generated {} tracks in {}ms",
                    output.tracks.len(),
                    started.elapsed().as_millis()
                ),
                Err(e) => warn!(
                    "Playlist generation failed after {}ms: {}",
                    started.elapsed().as_millis(),
                    e
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

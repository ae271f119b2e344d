pub mod generate;

pub use generate::generate_routes;

use crate::services::GenerationGateway;

pub struct AppState {
    pub gateway: GenerationGateway,
}

#[cfg(test)]
pub(crate) fn test_state(
    generator: std::sync::Arc<crate::services::generator::testing::StubGenerator>,
) -> std::sync::Arc<AppState> {
    std::sync::Arc::new(AppState {
        gateway: GenerationGateway::new(generator),
    })
}

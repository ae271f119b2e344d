mod api;
mod config;
mod error;
mod frontend;
mod models;
mod services;
mod ui;

use crate::api::AppState;
use crate::config::{Config, LogFormat};
use crate::services::{GenerationGateway, ProcessGenerator};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!("Configuration loaded");
    tracing::info!(
        "Playlist generator: {} {:?} (timeout: {:?}, diagnostics: {:?})",
        config.generator.program,
        config.generator.args,
        config.generator.timeout,
        config.generator.diagnostics
    );

    // Initialize services
    let generator = Arc::new(ProcessGenerator::new(&config.generator));
    let app_state = Arc::new(AppState {
        gateway: GenerationGateway::new(generator),
    });

    let app = router(app_state)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config));

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api::generate_routes())
        .merge(ui::ui_routes())
        .route("/assets/*path", get(frontend::serve_asset))
        .fallback(frontend::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,moodify=debug,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

//! Mediator - two-party mediation chat service
//!
//! Each side explains their view to an assistant until it confirms it has
//! understood. Once both sides are understood, each receives a resolution.

mod api;
mod llm;
mod mediation;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use llm::LlmConfig;
use runtime::{MediationHandle, ServiceCompletionClient};
use state_machine::MediationContext;
use std::net::{IpAddr, SocketAddr};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediator=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("MEDIATOR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let bind: IpAddr = std::env::var("MEDIATOR_BIND")
        .ok()
        .and_then(|b| b.parse().ok())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]));

    let llm_config = LlmConfig::from_env();
    if llm_config.api_key.is_none() {
        tracing::warn!("No LLM API key configured. Set OPENAI_API_KEY; every reply will fail.");
    } else {
        tracing::info!(
            model = %llm_config.model,
            base_url = %llm_config.base_url,
            "LLM service configured"
        );
    }
    let llm = llm_config.build_service()?;

    // Start the mediation runtime
    let context = MediationContext::from_env();
    tracing::info!(transformers = ?context.transformers, "Mediation context ready");
    let mediation = MediationHandle::spawn(
        context,
        ServiceCompletionClient::new(llm.clone()),
    );
    let state = AppState::new(mediation, llm);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::new(bind, port);
    tracing::info!("Mediator listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// API Server Binary Entry Point
//
// Purpose: Start the Axum server for document upload and risk analysis
// Usage: GEMINI_API_KEY=... cargo run --bin api_server

use legal_risk_analyzer::{create_router, AppState, Config};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "legal_risk_analyzer=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = Config::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  GEMINI_MODEL: {}", config.gemini_model);
    tracing::info!("  GEMINI_API_KEY: {}", if config.gemini_api_key.is_some() { "set" } else { "not set" });
    tracing::info!("  UPLOAD_DIR: {}", config.upload_dir.display());
    tracing::info!("  STATIC_DIR: {}", config.static_dir.display());
    tracing::info!("  ALLOWED_ORIGIN: {}", config.allowed_origin.as_deref().unwrap_or("* (permissive)"));
    tracing::info!("  EXTRACTION_MODE: {}", config.extraction_mode);
    tracing::info!("  STRIP_HEADER_COLON: {}", config.strip_header_colon);

    let port = config.port;
    let state = AppState::new(config)?;

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

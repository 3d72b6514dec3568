//! # cms-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for Esquema CMS.
//! Binds to the configured port (default 3000).

use cms_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    tracing::info!(
        content_root = %config.content_root.display(),
        max_upload_bytes = config.max_upload_bytes,
        "configuration loaded"
    );
    if !config.content_root.exists() {
        tracing::warn!(
            content_root = %config.content_root.display(),
            "content root does not exist; schema listing will be empty"
        );
    }

    let app = cms_api::app(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Esquema CMS API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

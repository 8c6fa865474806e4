use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use universal_translator::config::Config;
use universal_translator::detect::WhatlangDetector;
use universal_translator::server::{self, AppState};
use universal_translator::translation::TranslationService;
use universal_translator::translator::HttpTranslator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("universal_translator=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    info!("Using translation model at {}", config.translator_api_url);
    let translator = HttpTranslator::new(&config)?;
    let detector = WhatlangDetector::new();
    let service = TranslationService::new(Arc::new(translator), Arc::new(detector));

    let app = server::router(AppState {
        service: Arc::new(service),
        api_key: config.api_key.clone(),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Universal Translator listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

use std::sync::Arc;

use anyhow::Context;
use eagle_core::config::AppConfig;
use eagle_pipeline::QueryOrchestrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eagle_api::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eagle_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing::info!(
        port = config.port.value,
        geocoding_service = config.effective_geocoding_service().as_str(),
        openai = config.has_openai_credential(),
        model_path = %config.model_path().display(),
        "Starting EAGLE Lens server"
    );

    let state = Arc::new(AppState::new(QueryOrchestrator::from_config(&config)));
    let app = create_app(state, &config).context("Invalid CORS origin")?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("EAGLE Lens server running on http://localhost:{}", config.port.value);
    tracing::info!(static_dir = %config.static_dir.value.display(), "Serving static files");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

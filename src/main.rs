use anyhow::{Context, Result};
use hubspot_link::api::{create_app, IntegrationAppState};
use hubspot_link::config;
use hubspot_link::integrations::HubSpotIntegration;
use hubspot_link::store::{run_store_cleanup, MemoryStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hubspot_link=info".into()),
        )
        .init();

    info!("hubspot-link starting...");

    let config_path =
        std::env::var("HUBSPOT_LINK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = config::load_from_env_and_file(&config_path)?;

    let store = MemoryStore::new();
    tokio::spawn(run_store_cleanup(
        store.clone(),
        config.store.cleanup_interval_seconds,
    ));

    let hubspot = HubSpotIntegration::new(
        config.hubspot.clone(),
        &config.store,
        Arc::new(store),
    );
    let app = create_app(
        IntegrationAppState {
            hubspot: Arc::new(hubspot),
        },
        &config.server.cors_origins,
    )?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

//! Customer Provisioning Service - HTTP API for customer identity linkage
//!
//! This is the main entry point for the provisioning service.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provision_service::{create_router, AppState, ServiceConfig, StripeProvider};
use provision_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,provision=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Customer Provisioning Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        stripe_api_base = %config.stripe_api_base,
        reconcile_enabled = %config.service_api_key.is_some(),
        "Service configuration loaded"
    );

    // The provider is not optional: a provisioning service without one can
    // serve nothing.
    let api_key = config
        .stripe_api_key
        .clone()
        .ok_or("STRIPE_API_KEY is not configured")?;

    let provider = Arc::new(StripeProvider::new(
        api_key,
        config.stripe_api_base.clone(),
        Duration::from_secs(config.provider_timeout_seconds),
    )?);

    // Initialize RocksDB store
    tracing::info!(path = %config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    // Build app state
    let state = AppState::new(store, provider, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

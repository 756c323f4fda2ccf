//! Application state.

use std::sync::Arc;

use provision_store::IdentityStore;

use crate::config::ServiceConfig;
use crate::coordinator::Coordinator;
use crate::provider::CustomerProvider;

/// Application state shared across handlers.
///
/// The store and provider arrive as trait objects so tests can substitute
/// in-memory and scripted implementations without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    /// The provisioning coordinator.
    pub coordinator: Arc<Coordinator>,

    /// The identity store (for read-only link lookups).
    pub store: Arc<dyn IdentityStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state over the given store and provider.
    #[must_use]
    pub fn new(
        store: Arc<dyn IdentityStore>,
        provider: Arc<dyn CustomerProvider>,
        config: ServiceConfig,
    ) -> Self {
        let coordinator = Arc::new(Coordinator::new(Arc::clone(&store), provider));

        if config.service_api_key.is_none() {
            tracing::warn!("No service API key configured - reconciliation endpoint disabled");
        }

        Self {
            coordinator,
            store,
            config,
        }
    }
}

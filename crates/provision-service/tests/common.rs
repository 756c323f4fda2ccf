//! Common test utilities for provisioning integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use provision_core::{AccountKey, ProvisionRequest};
use provision_service::{create_router, AppState, CustomerProvider, ProviderError, ServiceConfig};
use provision_store::{IdentityStore, RocksStore};

/// What the scripted provider should do on `create_customer`.
#[derive(Debug, Clone)]
pub enum ProviderBehavior {
    /// Return a fresh customer id.
    Succeed,
    /// Reject with the given reason.
    Reject(String),
    /// Fail transiently with the given message.
    Unavailable(String),
}

/// Scripted provider double for integration tests.
pub struct TestProvider {
    create_calls: AtomicUsize,
    behavior: Mutex<ProviderBehavior>,
    existing: Mutex<Option<String>>,
}

impl TestProvider {
    pub fn new() -> Self {
        Self {
            create_calls: AtomicUsize::new(0),
            behavior: Mutex::new(ProviderBehavior::Succeed),
            existing: Mutex::new(None),
        }
    }

    /// Number of `create_customer` calls made so far.
    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Change what the next `create_customer` calls do.
    pub fn set_behavior(&self, behavior: ProviderBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Set the customer that `find_customer` reports.
    pub fn set_existing(&self, customer_id: Option<String>) {
        *self.existing.lock().unwrap() = customer_id;
    }
}

#[async_trait]
impl CustomerProvider for TestProvider {
    async fn create_customer(&self, _request: &ProvisionRequest) -> Result<String, ProviderError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.behavior.lock().unwrap().clone() {
            ProviderBehavior::Succeed => Ok(format!("cus_itest_{n}")),
            ProviderBehavior::Reject(reason) => Err(ProviderError::Rejected { reason }),
            ProviderBehavior::Unavailable(message) => Err(ProviderError::Unavailable { message }),
        }
    }

    async fn find_customer(
        &self,
        _account_key: &AccountKey,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.existing.lock().unwrap().clone())
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The identity store backing the service.
    pub store: Arc<RocksStore>,
    /// The scripted provider backing the service.
    pub provider: Arc<TestProvider>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The service API key for the reconcile endpoint.
    pub service_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));
        let provider = Arc::new(TestProvider::new());

        let service_api_key = "test-service-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            service_api_key: Some(service_api_key.clone()),
            stripe_api_key: None,
            stripe_api_base: "http://localhost".into(),
            provider_timeout_seconds: 5,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(
            Arc::clone(&store) as Arc<dyn IdentityStore>,
            Arc::clone(&provider) as Arc<dyn CustomerProvider>,
            config,
        );
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            provider,
            _temp_dir: temp_dir,
            service_api_key,
        }
    }

    /// Seed a pending link, simulating a crashed provisioning attempt.
    pub fn seed_pending(&self, account_key: &str) {
        let key = AccountKey::new(account_key).expect("valid account key");
        self.store
            .insert_pending(&key)
            .expect("failed to seed pending link");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

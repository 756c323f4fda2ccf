//! Stripe provider client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use provision_core::{AccountKey, ProvisionRequest};

use super::types::{Customer, StripeErrorResponse, StripeList};
use super::{CustomerProvider, ProviderError};

/// Metadata key under which the internal account key is stored on the
/// provider customer. The reconciliation sweep searches on it.
const ACCOUNT_KEY_METADATA: &str = "account_key";

/// Stripe API client.
///
/// Stateless: holds only the HTTP client and configuration. Every request
/// carries a fresh `Idempotency-Key`, so a retried HTTP call (after a
/// transport failure) cannot create a second customer at Stripe for the same
/// logical request; cross-request dedup is the coordinator's job.
#[derive(Debug, Clone)]
pub struct StripeProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StripeProvider {
    /// Default Stripe API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

    /// Create a new Stripe provider client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    /// * `base_url` - API base URL; override to point tests at a mock server
    /// * `timeout` - per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client against the production Stripe API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::new(
            api_key,
            Self::DEFAULT_BASE_URL,
            Duration::from_secs(Self::DEFAULT_TIMEOUT_SECONDS),
        )
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| ProviderError::Unavailable {
                message: format!("invalid provider response: {e}"),
            });
        }

        // 5xx and 429 are transient; everything else in error range means the
        // provider understood and refused the input.
        let retryable = status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;

        let message = match response.json::<StripeErrorResponse>().await {
            Ok(body) => {
                if body.error.message.is_empty() {
                    format!("{} (HTTP {status})", body.error.error_type)
                } else {
                    body.error.message
                }
            }
            Err(_) => format!("HTTP {status}"),
        };

        if retryable {
            Err(ProviderError::Unavailable { message })
        } else {
            Err(ProviderError::Rejected { reason: message })
        }
    }

    /// Map a transport error to the provider taxonomy.
    fn transport_error(e: &reqwest::Error) -> ProviderError {
        ProviderError::Unavailable {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl CustomerProvider for StripeProvider {
    async fn create_customer(&self, request: &ProvisionRequest) -> Result<String, ProviderError> {
        let mut params: Vec<(String, String)> = vec![
            ("name".into(), request.display_name.clone()),
            ("email".into(), request.contact_email.clone()),
            (
                format!("metadata[{ACCOUNT_KEY_METADATA}]"),
                request.account_key.to_string(),
            ),
        ];

        for (k, v) in &request.metadata {
            // The account-key slot is reserved for reconciliation lookups.
            if k != ACCOUNT_KEY_METADATA {
                params.push((format!("metadata[{k}]"), v.clone()));
            }
        }

        tracing::debug!(
            account_key = %request.account_key,
            "creating provider customer"
        );

        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header("Idempotency-Key", uuid::Uuid::new_v4().to_string())
            .form(&params)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        let customer: Customer = Self::handle_response(response).await?;
        Ok(customer.id)
    }

    async fn find_customer(
        &self,
        account_key: &AccountKey,
    ) -> Result<Option<String>, ProviderError> {
        let query = format!("metadata['{ACCOUNT_KEY_METADATA}']:'{account_key}'");

        let response = self
            .client
            .get(format!("{}/customers/search", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .query(&[("query", query.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        let list: StripeList<Customer> = Self::handle_response(response).await?;
        Ok(list.data.into_iter().next().map(|c| c.id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider(base_url: &str) -> StripeProvider {
        StripeProvider::new("sk_test_xxx", base_url, Duration::from_secs(5)).unwrap()
    }

    fn request() -> ProvisionRequest {
        let mut metadata = BTreeMap::new();
        metadata.insert("plan".to_string(), "standard".to_string());

        ProvisionRequest {
            account_key: AccountKey::new("acct-1").unwrap(),
            display_name: "Ada Lovelace".into(),
            contact_email: "ada@example.com".into(),
            metadata,
        }
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let p = provider("http://localhost:1234/");
        assert_eq!(p.base_url, "http://localhost:1234");
    }

    #[tokio::test]
    async fn create_customer_returns_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customers"))
            .and(header_exists("Idempotency-Key"))
            .and(body_string_contains("metadata%5Baccount_key%5D=acct-1"))
            .and(body_string_contains("metadata%5Bplan%5D=standard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cus_test_1",
                "email": "ada@example.com",
                "name": "Ada Lovelace"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = provider(&server.uri())
            .create_customer(&request())
            .await
            .unwrap();

        assert_eq!(id, "cus_test_1");
    }

    #[tokio::test]
    async fn client_error_maps_to_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Invalid email address",
                    "code": "email_invalid"
                }
            })))
            .mount(&server)
            .await;

        let result = provider(&server.uri()).create_customer(&request()).await;

        match result {
            Err(ProviderError::Rejected { reason }) => {
                assert_eq!(reason, "Invalid email address");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = provider(&server.uri()).create_customer(&request()).await;
        assert!(matches!(result, Err(ProviderError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "type": "rate_limit_error", "message": "Too many requests" }
            })))
            .mount(&server)
            .await;

        let result = provider(&server.uri()).create_customer(&request()).await;

        match result {
            Err(ProviderError::Unavailable { message }) => {
                assert_eq!(message, "Too many requests");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_customer_returns_first_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customers/search"))
            .and(query_param(
                "query",
                "metadata['account_key']:'acct-1'",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "id": "cus_found" }],
                "has_more": false
            })))
            .mount(&server)
            .await;

        let found = provider(&server.uri())
            .find_customer(&AccountKey::new("acct-1").unwrap())
            .await
            .unwrap();

        assert_eq!(found.as_deref(), Some("cus_found"));
    }

    #[tokio::test]
    async fn find_customer_empty_result_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customers/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [],
                "has_more": false
            })))
            .mount(&server)
            .await;

        let found = provider(&server.uri())
            .find_customer(&AccountKey::new("acct-1").unwrap())
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn connection_refused_maps_to_unavailable() {
        // Nothing listens on this port.
        let p = provider("http://127.0.0.1:1");

        let result = p.create_customer(&request()).await;
        assert!(matches!(result, Err(ProviderError::Unavailable { .. })));
    }
}

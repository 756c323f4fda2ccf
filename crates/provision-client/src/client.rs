//! Provisioning HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CustomerLinkView, EnsureCustomerRequest, EnsureCustomerResponse,
};

/// Provisioning API client.
///
/// Provides methods for ensuring customer identities and inspecting links.
#[derive(Debug, Clone)]
pub struct ProvisioningClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ProvisioningClient {
    /// Create a new provisioning client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the provisioning service (e.g., `"http://provision:8080"`)
    /// * `api_key` - Service API key; only required for the reconcile endpoint
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_options(base_url, api_key, ClientOptions::default())
    }

    /// Create a new provisioning client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: Option<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Ensure a provider customer exists for the account.
    ///
    /// Safe to call repeatedly: an already-provisioned account returns the
    /// same customer id again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error;
    /// `ClientError::is_retryable` distinguishes transient outcomes.
    pub async fn ensure_customer(
        &self,
        request: EnsureCustomerRequest,
    ) -> Result<EnsureCustomerResponse, ClientError> {
        let url = format!("{}/v1/customers", self.base_url);

        tracing::debug!(account_key = %request.account_key, "ensuring provider customer");

        let response = self.client.post(&url).json(&request).send().await?;

        Self::handle_response(response).await
    }

    /// Look up the stored link for an account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if no link exists.
    pub async fn get_customer(
        &self,
        account_key: impl AsRef<str>,
    ) -> Result<CustomerLinkView, ClientError> {
        let url = format!("{}/v1/customers/{}", self.base_url, account_key.as_ref());

        let response = self.client.get(&url).send().await?;

        Self::handle_response(response).await
    }

    /// Reconcile a stuck provisioning attempt (requires the service API key).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn reconcile(
        &self,
        request: EnsureCustomerRequest,
    ) -> Result<EnsureCustomerResponse, ClientError> {
        let url = format!(
            "{}/v1/customers/{}/reconcile",
            self.base_url, request.account_key
        );

        let mut builder = self.client.post(&url).json(&serde_json::json!({
            "display_name": request.display_name,
            "contact_email": request.contact_email,
            "metadata": request.metadata.unwrap_or_default(),
        }));

        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let reason = api_error.reason.unwrap_or_default();

                // Map the boundary's stable codes to typed errors
                match api_error.error.as_str() {
                    "in_progress" => Err(ClientError::InProgress),
                    "failed" => Err(ClientError::ProvisioningFailed { reason }),
                    "rejected" => Err(ClientError::Rejected { reason }),
                    "unavailable" => Err(ClientError::Unavailable),
                    "not_found" => Err(ClientError::NotFound { message: reason }),
                    code => Err(ClientError::Api {
                        code: code.to_string(),
                        message: reason,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request(account_key: &str) -> EnsureCustomerRequest {
        EnsureCustomerRequest {
            account_key: account_key.to_string(),
            display_name: "Ada Lovelace".into(),
            contact_email: "ada@example.com".into(),
            metadata: None,
        }
    }

    #[test]
    fn client_creation() {
        let client = ProvisioningClient::new("http://localhost:8080", None);
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = ProvisioningClient::new("http://localhost:8080/", None);
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn ensure_customer_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .and(body_partial_json(serde_json::json!({
                "account_key": "acct-1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "provider_customer_id": "cus_123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), None);
        let response = client.ensure_customer(request("acct-1")).await.unwrap();

        assert_eq!(response.provider_customer_id, "cus_123");
    }

    #[tokio::test]
    async fn in_progress_maps_to_typed_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": "in_progress"
            })))
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), None);
        let err = client
            .ensure_customer(request("acct-1"))
            .await
            .unwrap_err();

        assert!(matches!(&err, ClientError::InProgress));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn rejected_carries_reason() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "error": "rejected",
                "reason": "email looks fake"
            })))
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), None);
        let result = client.ensure_customer(request("acct-1")).await;

        match result {
            Err(ClientError::Rejected { reason }) => assert_eq!(reason, "email looks fake"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unavailable_is_retryable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "error": "unavailable"
            })))
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), None);
        let result = client.ensure_customer(request("acct-1")).await;

        match result {
            Err(e @ ClientError::Unavailable) => assert!(e.is_retryable()),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_customer_parses_link() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/customers/acct-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "account_key": "acct-1",
                "provider_customer_id": "cus_123",
                "status": "confirmed",
                "failure_reason": null,
                "created_at": "2026-01-01T00:00:00+00:00",
                "updated_at": "2026-01-01T00:00:05+00:00"
            })))
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), None);
        let link = client.get_customer("acct-1").await.unwrap();

        assert_eq!(link.status, "confirmed");
        assert_eq!(link.provider_customer_id.as_deref(), Some("cus_123"));
    }

    #[tokio::test]
    async fn get_missing_customer_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/customers/acct-1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "not_found",
                "reason": "no customer link for account acct-1"
            })))
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), None);
        let result = client.get_customer("acct-1").await;

        assert!(matches!(result, Err(ClientError::NotFound { .. })));
    }

    #[tokio::test]
    async fn reconcile_sends_service_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/customers/acct-1/reconcile"))
            .and(header("x-api-key", "svc-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "provider_customer_id": "cus_123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProvisioningClient::new(server.uri(), Some("svc-key".to_string()));
        let response = client.reconcile(request("acct-1")).await.unwrap();

        assert_eq!(response.provider_customer_id, "cus_123");
    }
}

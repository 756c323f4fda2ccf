//! Request and response types for the provisioning API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request to ensure a provider customer exists for an account.
#[derive(Debug, Clone, Serialize)]
pub struct EnsureCustomerRequest {
    /// The account to provision for.
    pub account_key: String,
    /// Human-readable name forwarded to the provider.
    pub display_name: String,
    /// Contact email forwarded to the provider.
    pub contact_email: String,
    /// Free-form metadata forwarded to the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Successful provisioning response.
#[derive(Debug, Clone, Deserialize)]
pub struct EnsureCustomerResponse {
    /// The provider customer id now linked to the account.
    pub provider_customer_id: String,
}

/// Stored customer link, as returned by the lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerLinkView {
    /// The account key.
    pub account_key: String,
    /// The linked provider customer id, if confirmed.
    pub provider_customer_id: Option<String>,
    /// Link status: `pending`, `confirmed`, or `failed`.
    pub status: String,
    /// Failure reason, if the link failed.
    pub failure_reason: Option<String>,
    /// Created timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

/// Error body returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Stable error code.
    pub error: String,
    /// Optional human-readable detail.
    #[serde(default)]
    pub reason: Option<String>,
}

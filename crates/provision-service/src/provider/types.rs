//! Stripe API types.

use serde::Deserialize;

/// Stripe customer object (the fields this service reads).
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Metadata attached to the customer.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Stripe search/list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// The objects in this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Whether more results exist beyond this page.
    #[serde(default)]
    pub has_more: bool,
}

/// Stripe error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// The error payload.
    pub error: StripeErrorBody,
}

/// Stripe error body.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    /// Error type (e.g. `invalid_request_error`).
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Machine-readable code.
    #[serde(default)]
    pub code: Option<String>,
}

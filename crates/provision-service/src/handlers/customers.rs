//! Customer provisioning handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use provision_core::{AccountKey, CustomerLink, LinkStatus, ProvisionRequest};

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Create customer request body.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// The account to provision for.
    pub account_key: String,
    /// Human-readable name forwarded to the provider.
    pub display_name: String,
    /// Contact email forwarded to the provider.
    pub contact_email: String,
    /// Free-form metadata forwarded to the provider.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Reconcile request body. Same provider-facing fields as creation; the
/// account key comes from the path.
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    /// Human-readable name forwarded to the provider.
    pub display_name: String,
    /// Contact email forwarded to the provider.
    pub contact_email: String,
    /// Free-form metadata forwarded to the provider.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Successful provisioning response.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// The provider customer id now linked to the account.
    pub provider_customer_id: String,
}

/// Stored link response.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    /// The account key.
    pub account_key: String,
    /// The linked provider customer id, if confirmed.
    pub provider_customer_id: Option<String>,
    /// Link status.
    pub status: LinkStatus,
    /// Failure reason, if the link failed.
    pub failure_reason: Option<String>,
    /// Created timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&CustomerLink> for LinkResponse {
    fn from(link: &CustomerLink) -> Self {
        Self {
            account_key: link.account_key.to_string(),
            provider_customer_id: link.provider_customer_id.clone(),
            status: link.status,
            failure_reason: link.failure_reason.clone(),
            created_at: link.created_at.to_rfc3339(),
            updated_at: link.updated_at.to_rfc3339(),
        }
    }
}

/// Ensure a provider customer exists for the account.
///
/// Idempotent: repeating the call for an already-provisioned account returns
/// the same customer id with the same status code.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let request = validate_request(
        &body.account_key,
        body.display_name,
        body.contact_email,
        body.metadata,
    )?;

    let provider_customer_id = state.coordinator.ensure_customer(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            provider_customer_id,
        }),
    ))
}

/// Look up the stored link for an account.
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(account_key): Path<String>,
) -> Result<Json<LinkResponse>, ApiError> {
    let account_key = parse_account_key(&account_key)?;

    let link = state
        .store
        .find_by_account(&account_key)?
        .ok_or_else(|| ApiError::NotFound(format!("no customer link for account {account_key}")))?;

    Ok(Json(LinkResponse::from(&link)))
}

/// Reconcile a stuck provisioning attempt for an account.
///
/// Service-key authenticated: this is an operational sweep, not a signup
/// path.
pub async fn reconcile_customer(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Path(account_key): Path<String>,
    Json(body): Json<ReconcileRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let request = validate_request(
        &account_key,
        body.display_name,
        body.contact_email,
        body.metadata,
    )?;

    let provider_customer_id = state.coordinator.reconcile(&request).await?;

    Ok(Json(CustomerResponse {
        provider_customer_id,
    }))
}

fn parse_account_key(raw: &str) -> Result<AccountKey, ApiError> {
    AccountKey::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn validate_request(
    account_key: &str,
    display_name: String,
    contact_email: String,
    metadata: BTreeMap<String, String>,
) -> Result<ProvisionRequest, ApiError> {
    let request = ProvisionRequest {
        account_key: parse_account_key(account_key)?,
        display_name,
        contact_email,
        metadata,
    };

    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(request)
}

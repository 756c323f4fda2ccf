//! Customer link types.
//!
//! A `CustomerLink` binds an internal account to an external payment-provider
//! customer. At most one link exists per account key; the storage layer
//! enforces this with insert-if-absent semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountKey;

/// A persistent record binding an account to a provider customer.
///
/// The link is created in `Pending` state when provisioning starts, then
/// moves to `Confirmed` on provider success or `Failed` on a terminal
/// provider error. Links are never deleted except by explicit administrative
/// action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLink {
    /// The account this link belongs to. Unique across all links.
    pub account_key: AccountKey,

    /// The external provider customer id. `Some` once confirmed.
    pub provider_customer_id: Option<String>,

    /// Current status of the link.
    pub status: LinkStatus,

    /// Terminal failure reason. `Some` only when the status is `Failed`.
    pub failure_reason: Option<String>,

    /// When provisioning for this account first started.
    pub created_at: DateTime<Utc>,

    /// When the link was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CustomerLink {
    /// Create a new pending link for an account.
    #[must_use]
    pub fn pending(account_key: AccountKey) -> Self {
        let now = Utc::now();
        Self {
            account_key,
            provider_customer_id: None,
            status: LinkStatus::Pending,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition this link to `Confirmed` with the given provider id.
    pub fn confirm(&mut self, provider_customer_id: impl Into<String>) {
        self.provider_customer_id = Some(provider_customer_id.into());
        self.failure_reason = None;
        self.status = LinkStatus::Confirmed;
        self.updated_at = Utc::now();
    }

    /// Transition this link to `Failed` with a terminal reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.failure_reason = Some(reason.into());
        self.status = LinkStatus::Failed;
        self.updated_at = Utc::now();
    }

    /// Check whether the link is confirmed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == LinkStatus::Confirmed
    }

    /// Check whether the link is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == LinkStatus::Pending
    }
}

/// Status of a customer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Provisioning started; the provider call has not resolved yet.
    Pending,

    /// The provider customer exists and is durably linked.
    Confirmed,

    /// The provider rejected the input; terminal until reset.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> AccountKey {
        AccountKey::new(s).unwrap()
    }

    #[test]
    fn pending_link_has_no_customer_id() {
        let link = CustomerLink::pending(key("acct-1"));
        assert!(link.is_pending());
        assert!(link.provider_customer_id.is_none());
        assert!(link.failure_reason.is_none());
    }

    #[test]
    fn confirm_sets_customer_id() {
        let mut link = CustomerLink::pending(key("acct-1"));
        link.confirm("cus_123");

        assert!(link.is_confirmed());
        assert_eq!(link.provider_customer_id.as_deref(), Some("cus_123"));
        assert!(link.failure_reason.is_none());
    }

    #[test]
    fn fail_records_reason() {
        let mut link = CustomerLink::pending(key("acct-1"));
        link.fail("invalid email");

        assert_eq!(link.status, LinkStatus::Failed);
        assert_eq!(link.failure_reason.as_deref(), Some("invalid email"));
        assert!(link.provider_customer_id.is_none());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&LinkStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let json = serde_json::to_string(&LinkStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }
}

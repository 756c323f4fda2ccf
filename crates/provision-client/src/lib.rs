//! Provisioning Client SDK.
//!
//! This crate provides a client library for services that consume the
//! customer provisioning API.
//!
//! # Example
//!
//! ```no_run
//! use provision_client::{EnsureCustomerRequest, ProvisioningClient};
//!
//! # async fn example() -> Result<(), provision_client::ClientError> {
//! let client = ProvisioningClient::new(
//!     "http://provision.billing-system.svc:8080",
//!     Some("your-service-api-key".to_string()),
//! );
//!
//! let response = client.ensure_customer(EnsureCustomerRequest {
//!     account_key: "acct-1".to_string(),
//!     display_name: "Ada Lovelace".to_string(),
//!     contact_email: "ada@example.com".to_string(),
//!     metadata: None,
//! }).await?;
//!
//! println!("Provider customer: {}", response.provider_customer_id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, ProvisioningClient};
pub use error::ClientError;
pub use types::*;

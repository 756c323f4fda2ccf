//! Customer Provisioning HTTP API Service.
//!
//! This crate provides the HTTP API for customer identity provisioning,
//! including:
//!
//! - The provisioning coordinator (insert-if-absent gate around the provider)
//! - The payment-provider client (Stripe)
//! - Link lookup and reconciliation of stuck provisioning attempts
//!
//! # Authentication
//!
//! `account_key` is trusted input: the upstream authentication subsystem has
//! already confirmed the caller is authorized to provision for it. The
//! reconciliation endpoint additionally requires a service API key
//! (`x-api-key`) since it is an operational surface, not a signup path.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for routing consistency

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod handlers;
pub mod provider;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use coordinator::Coordinator;
pub use error::ApiError;
pub use provider::{CustomerProvider, ProviderError, StripeProvider};
pub use routes::create_router;
pub use state::AppState;

//! Core types and utilities for the customer provisioning service.
//!
//! This crate provides the foundational types used throughout the platform:
//!
//! - **Identifiers**: `AccountKey`
//! - **Links**: `CustomerLink`, `LinkStatus`
//! - **Requests**: `ProvisionRequest`
//! - **Errors**: `ProvisionError`
//!
//! # Provisioning model
//!
//! Exactly one external payment-provider customer may exist per account. The
//! `CustomerLink` record is the durable binding between an `AccountKey` and
//! the provider customer id, and its status (`Pending`, `Confirmed`,
//! `Failed`) drives the idempotency gate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod link;
pub mod request;

pub use error::{ProvisionError, Result};
pub use ids::{AccountKey, IdError};
pub use link::{CustomerLink, LinkStatus};
pub use request::{ProvisionRequest, RequestError};

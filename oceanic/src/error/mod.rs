//! Layered error types for the engine.
//!
//! The error hierarchy maps onto the failure modes of a generated call:
//! - [`ApiError`] - Top-level error type for all operations
//! - [`ValidationError`] - Missing arguments, unparseable bodies (recoverable)
//! - [`ClientError`] - Transport failures, forwarded verbatim (recoverable)
//! - [`AuthError`] - No bearer token set (fatal) or a malformed one
//! - [`ConfigError`] - Client construction and lookup errors

mod api_error;
mod auth_error;
mod client_error;
mod config_error;
mod validation_error;

pub use api_error::ApiError;
pub use auth_error::AuthError;
pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use validation_error::{ErrorObject, ValidationError};

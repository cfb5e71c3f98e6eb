//! Authentication errors.

use thiserror::Error;

/// Errors related to the bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was set on the client root before a request was attempted.
    #[error("Token not found, set one on the client before issuing requests")]
    MissingToken,

    /// The token cannot be carried in an HTTP header.
    #[error("Invalid token format")]
    InvalidTokenFormat,
}

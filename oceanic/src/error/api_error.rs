//! Top-level API error type.

use super::{AuthError, ClientError, ConfigError, ValidationError};
use thiserror::Error;

/// Top-level error type for all engine operations.
///
/// ## Examples
///
/// ```rust
/// use oceanic::error::{ApiError, ValidationError};
///
/// fn describe(err: &ApiError) -> &'static str {
///     match err {
///         ApiError::Validation(_) => "rejected before dispatch",
///         ApiError::Client(_) => "transport reported a failure",
///         ApiError::Auth(_) => "no token",
///         ApiError::Config(_) => "misconfigured",
///     }
/// }
///
/// let err: ApiError = ValidationError::missing_arguments("id", &["id".to_string()]).into();
/// assert_eq!(describe(&err), "rejected before dispatch");
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failures (HTTP status, network, timeout).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Argument validation or response parsing errors.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication errors.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Client configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Returns `true` for errors no caller can recover from at runtime.
    ///
    /// Only a missing token qualifies: every request will fail until the
    /// program sets one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(AuthError::MissingToken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_client_error() {
        let api_err: ApiError = ClientError::Timeout { duration_ms: 5000 }.into();
        assert!(matches!(api_err, ApiError::Client(_)));
        assert!(!api_err.is_fatal());
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let api_err: ApiError = AuthError::MissingToken.into();
        assert!(api_err.is_fatal());
    }

    #[test]
    fn test_display_is_transparent() {
        let err = ApiError::Auth(AuthError::MissingToken);
        assert!(err.to_string().contains("Token not found"));
    }
}

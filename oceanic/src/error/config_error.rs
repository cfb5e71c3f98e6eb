//! Client configuration errors.

use oceanic_define::SpecError;
use thiserror::Error;

/// Errors in client configuration or name lookup.
///
/// These typically indicate programmer errors: a bad base URL, a header that
/// cannot be encoded, or a call to a method that no definition declares.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value cannot be encoded.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// No endpoint with this name exists on the client root.
    #[error("Unknown endpoint: {name}")]
    UnknownEndpoint {
        /// The requested name.
        name: String,
    },

    /// No method with this name was compiled onto the target.
    #[error("Unknown method {name} on {target}")]
    UnknownMethod {
        /// The endpoint or item noun.
        target: String,
        /// The requested method name.
        name: String,
    },

    /// The definition document could not be read.
    #[error("Invalid definition: {0}")]
    Spec(#[from] SpecError),

    /// The HTTP transport could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Transport(String),
}

impl ConfigError {
    /// Creates an unknown method error.
    pub fn unknown_method(target: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownMethod {
            target: target.into(),
            name: name.into(),
        }
    }
}

//! Errors raised while reading a declarative definition.

use thiserror::Error;

/// Errors produced when a definition document cannot be turned into specs.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The document is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `method` entry names an unknown HTTP verb.
    #[error("Invalid HTTP method \"{value}\" for {name}")]
    InvalidMethod {
        /// The method spec carrying the bad verb.
        name: String,
        /// The verb as written.
        value: String,
    },

    /// A block that must be a mapping was something else.
    #[error("Expected an object for {context}")]
    ExpectedObject {
        /// Where in the document the mapping was expected.
        context: String,
    },

    /// A mandatory document field is absent.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The absent field.
        field: &'static str,
    },
}

impl SpecError {
    pub(crate) fn expected_object(context: impl Into<String>) -> Self {
        Self::ExpectedObject {
            context: context.into(),
        }
    }
}

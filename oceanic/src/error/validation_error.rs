//! Argument validation and response parsing errors.

use serde::Serialize;
use thiserror::Error;

/// Errors detected before dispatch or while reading a success body.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more required parameters were not supplied. No request was sent.
    ///
    /// `id` has the form `error_<p1>_<p2>` and `message` the form
    /// `Missing argument(s): "<p1>", "<p2>" for <method> method`.
    #[error("{message}")]
    MissingArguments {
        /// Machine-readable identifier.
        id: String,
        /// Human-readable message.
        message: String,
    },

    /// A success body was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// The `{id, message}` shape a missing-arguments error serializes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorObject<'a> {
    /// Machine-readable identifier.
    pub id: &'a str,
    /// Human-readable message.
    pub message: &'a str,
}

impl ValidationError {
    /// Builds the missing-arguments error for `method`.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use oceanic::error::ValidationError;
    ///
    /// let err = ValidationError::missing_arguments(
    ///     "create",
    ///     &["name".to_string(), "ip_address".to_string()],
    /// );
    /// let object = err.as_object().unwrap();
    /// assert_eq!(object.id, "error_name_ip_address");
    /// assert_eq!(
    ///     object.message,
    ///     r#"Missing argument(s): "name", "ip_address" for create method"#
    /// );
    /// ```
    pub fn missing_arguments(method: &str, missing: &[String]) -> Self {
        Self::MissingArguments {
            id: format!("error_{}", missing.join("_")),
            message: format!(
                "Missing argument(s): \"{}\" for {method} method",
                missing.join("\", \"")
            ),
        }
    }

    /// Returns the `{id, message}` view of a missing-arguments error.
    pub fn as_object(&self) -> Option<ErrorObject<'_>> {
        match self {
            Self::MissingArguments { id, message } => Some(ErrorObject { id, message }),
            Self::JsonParse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_missing_argument() {
        let err = ValidationError::missing_arguments("id", &["id".to_string()]);
        assert_eq!(err.to_string(), r#"Missing argument(s): "id" for id method"#);
        assert_eq!(err.as_object().unwrap().id, "error_id");
    }

    #[test]
    fn test_object_serializes_as_id_and_message() {
        let err = ValidationError::missing_arguments("resize", &["size".to_string()]);
        let json = serde_json::to_value(err.as_object().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "error_size",
                "message": "Missing argument(s): \"size\" for resize method"
            })
        );
    }

    #[test]
    fn test_json_parse_has_no_object() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert!(ValidationError::JsonParse(json_err).as_object().is_none());
    }
}

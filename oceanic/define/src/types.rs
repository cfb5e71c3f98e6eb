//! Core types for resource definitions.
//!
//! This module provides the fundamental types for defining an API:
//!
//! - [`ApiDefinition`] - The top-level API definition
//! - [`RestMethod`] - HTTP method enumeration

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::error::SpecError;
use crate::resource::ResourceSpec;

/// HTTP methods supported by REST APIs.
///
/// Definition documents write verbs in lower case (`"post"`), so parsing is
/// case-insensitive; display is always upper case.
///
/// ## Examples
///
/// Parse from string:
///
/// ```
/// use std::str::FromStr;
/// use oceanic_define::RestMethod;
///
/// assert_eq!(RestMethod::from_str("delete").unwrap(), RestMethod::Delete);
/// assert_eq!(RestMethod::from_str("GET").unwrap(), RestMethod::Get);
/// ```
///
/// Display as uppercase:
///
/// ```
/// use oceanic_define::RestMethod;
///
/// assert_eq!(RestMethod::Post.to_string(), "POST");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource
    Get,
    /// HTTP POST - Create a resource or trigger an action
    Post,
    /// HTTP PUT - Replace a resource entirely
    Put,
    /// HTTP PATCH - Partially update a resource
    Patch,
    /// HTTP DELETE - Remove a resource
    Delete,
    /// HTTP HEAD - Get headers only (no body)
    Head,
    /// HTTP OPTIONS - Get allowed methods for a resource
    Options,
}

impl RestMethod {
    /// Returns `true` if parameters travel in the request body.
    ///
    /// POST, PUT, and PATCH send a JSON body; every other method sends its
    /// parameters as the query string.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// A complete API definition.
///
/// ## Examples
///
/// ```
/// use oceanic_define::{ApiDefinition, ResourceSpec};
///
/// let api = ApiDefinition {
///     name: "SimpleApi".to_string(),
///     description: "A simple REST API".to_string(),
///     base_url: "https://api.example.com/v1/".to_string(),
///     docs_url: None,
///     env_auth: vec![],
///     resources: vec![ResourceSpec::new("regions")],
/// };
///
/// assert!(api.resource("regions").is_some());
/// assert!(api.resource("sizes").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDefinition {
    /// Name of the API.
    pub name: String,
    /// Human-readable description of the API.
    pub description: String,
    /// Base URL every relative endpoint path is appended to.
    pub base_url: String,
    /// Link to API documentation (optional).
    pub docs_url: Option<String>,
    /// Environment variables that may carry the bearer token.
    ///
    /// This is a fallback chain: the first variable that is set wins.
    pub env_auth: Vec<String>,
    /// All resources of the API.
    pub resources: Vec<ResourceSpec>,
}

impl ApiDefinition {
    /// Finds a resource by accessor name.
    pub fn resource(&self, name: &str) -> Option<&ResourceSpec> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Reads a definition from a JSON document.
    ///
    /// ## Errors
    ///
    /// Returns an error if the document is not JSON or is not a valid definition.
    pub fn from_json_str(input: &str) -> Result<Self, SpecError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Reads a definition from a YAML document.
    ///
    /// ## Examples
    ///
    /// ```
    /// use oceanic_define::{ApiDefinition, RestMethod};
    ///
    /// let api = ApiDefinition::from_yaml_str(r##"
    /// name: Example
    /// base_url: https://api.example.com/v1/
    /// env_auth: [EXAMPLE_TOKEN]
    /// resources:
    ///   - name: keys
    ///     noun: account/keys
    ///     methods:
    ///       destroy: { method: delete, param: { id: "#" } }
    /// "##).unwrap();
    ///
    /// let keys = api.resource("keys").unwrap();
    /// assert_eq!(keys.noun, "account/keys");
    /// assert_eq!(keys.methods[0].1.http_method(), RestMethod::Delete);
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if the document is not YAML or is not a valid definition.
    pub fn from_yaml_str(input: &str) -> Result<Self, SpecError> {
        let value: Value = serde_yaml::from_str(input)?;
        Self::from_value(&value)
    }

    /// Reads a definition from an already parsed document.
    ///
    /// ## Errors
    ///
    /// Returns an error if a mandatory field is absent or a block is malformed.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        let doc = value
            .as_object()
            .ok_or_else(|| SpecError::expected_object("definition"))?;

        let name = string_field(value, "name")?.ok_or(SpecError::MissingField { field: "name" })?;
        let base_url = string_field(value, "base_url")?
            .ok_or(SpecError::MissingField { field: "base_url" })?;

        let env_auth = match doc.get("env_auth") {
            Some(Value::Array(vars)) => vars
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(var)) => vec![var.clone()],
            _ => Vec::new(),
        };

        let resources = match doc.get("resources") {
            Some(Value::Array(entries)) => entries
                .iter()
                .map(resource_entry)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(SpecError::expected_object("resources")),
            None => Vec::new(),
        };

        Ok(Self {
            name,
            description: string_field(value, "description")?.unwrap_or_default(),
            base_url,
            docs_url: string_field(value, "docs_url")?,
            env_auth,
            resources,
        })
    }
}

fn string_field(value: &Value, field: &'static str) -> Result<Option<String>, SpecError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SpecError::MissingField { field }),
    }
}

fn resource_entry(entry: &Value) -> Result<ResourceSpec, SpecError> {
    let name = string_field(entry, "name")?.ok_or(SpecError::MissingField { field: "name" })?;
    let noun = string_field(entry, "noun")?.unwrap_or_else(|| name.clone());
    let methods = entry.get("methods").unwrap_or(&Value::Null);
    ResourceSpec::from_value(name, noun, methods)
}

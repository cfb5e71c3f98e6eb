//! Method specifications.
//!
//! A [`MethodSpec`] is the declarative description of one callable: which
//! HTTP method it uses, which endpoint template it targets and which
//! parameters it takes. Parameters are either required positional arguments
//! (written `"#"` in a definition document) or fixed values merged into every
//! request.

use serde_json::{Map, Value};

use crate::error::SpecError;
use crate::types::RestMethod;

/// The marker that flags a parameter as required and positional.
pub const REQUIRED_MARKER: &str = "#";

/// A parameter marker inside a [`MethodSpec`].
///
/// ## Examples
///
/// ```
/// use oceanic_define::ParamValue;
/// use serde_json::json;
///
/// assert_eq!(ParamValue::from_value(json!("#")), ParamValue::Required);
/// assert_eq!(
///     ParamValue::from_value(json!("power_cycle")),
///     ParamValue::Fixed(json!("power_cycle"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Must be supplied by the caller, in declaration order.
    Required,
    /// Always sent with this value unless the caller overrides it positionally.
    Fixed(Value),
}

impl ParamValue {
    /// Reads a marker from a definition document.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) if s == REQUIRED_MARKER => Self::Required,
            other => Self::Fixed(other),
        }
    }

    /// Returns `true` for the required marker.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Declarative description of one callable.
///
/// Unset fields mean "use the default of the context the spec is compiled
/// in": GET for the method, and a context-specific endpoint template.
///
/// ## Examples
///
/// ```
/// use oceanic_define::{MethodSpec, RestMethod};
///
/// let create = MethodSpec::post()
///     .endpoint("")
///     .required("name")
///     .required("ip_address");
///
/// assert_eq!(create.http_method(), RestMethod::Post);
/// assert_eq!(create.required_params().collect::<Vec<_>>(), vec!["name", "ip_address"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodSpec {
    /// HTTP method; GET when unset.
    pub method: Option<RestMethod>,
    /// Endpoint template with `{placeholder}` tokens.
    pub endpoint: Option<String>,
    /// Parameters in declaration order.
    pub params: Vec<(String, ParamValue)>,
}

impl MethodSpec {
    /// Creates an empty spec (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a spec with an explicit HTTP method.
    pub fn with_method(method: RestMethod) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    /// Creates an explicit GET spec.
    pub fn get() -> Self {
        Self::with_method(RestMethod::Get)
    }

    /// Creates a POST spec.
    pub fn post() -> Self {
        Self::with_method(RestMethod::Post)
    }

    /// Creates a PUT spec.
    pub fn put() -> Self {
        Self::with_method(RestMethod::Put)
    }

    /// Creates a DELETE spec.
    pub fn delete() -> Self {
        Self::with_method(RestMethod::Delete)
    }

    /// Sets the endpoint template.
    ///
    /// An empty template targets the owning collection (or item) itself.
    pub fn endpoint(mut self, template: impl Into<String>) -> Self {
        self.endpoint = Some(template.into());
        self
    }

    /// Declares a required positional parameter.
    pub fn required(self, name: impl Into<String>) -> Self {
        self.param(name, ParamValue::Required)
    }

    /// Declares a fixed parameter value.
    pub fn fixed(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.param(name, ParamValue::Fixed(value.into()))
    }

    /// Sets a parameter, replacing an existing one in place.
    pub fn param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.set_param(name.into(), value);
        self
    }

    fn set_param(&mut self, name: String, value: ParamValue) {
        match self.params.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// Returns the HTTP method, defaulting to GET.
    pub fn http_method(&self) -> RestMethod {
        self.method.unwrap_or(RestMethod::Get)
    }

    /// Returns the endpoint template or the supplied default.
    pub fn endpoint_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.endpoint.as_deref().unwrap_or(default)
    }

    /// Names of required parameters, in declaration order.
    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|(_, value)| value.is_required())
            .map(|(name, _)| name.as_str())
    }

    /// Fixed parameters, in declaration order.
    pub fn fixed_params(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().filter_map(|(name, value)| match value {
            ParamValue::Fixed(v) => Some((name.as_str(), v)),
            ParamValue::Required => None,
        })
    }

    /// Layers this spec on top of `base`.
    ///
    /// The method and endpoint fall back to `base` when unset here. Parameters
    /// start from `base`; a key declared in both takes this spec's value while
    /// keeping its original position, new keys are appended.
    ///
    /// ## Examples
    ///
    /// ```
    /// use oceanic_define::{MethodSpec, ParamValue, RestMethod};
    /// use serde_json::json;
    ///
    /// let base = MethodSpec::post().endpoint("{id}/actions").fixed("type", "resize");
    /// let spec = MethodSpec::new().required("size").overlay(base);
    ///
    /// assert_eq!(spec.http_method(), RestMethod::Post);
    /// assert_eq!(spec.endpoint.as_deref(), Some("{id}/actions"));
    /// assert_eq!(spec.params[0], ("type".to_string(), ParamValue::Fixed(json!("resize"))));
    /// assert_eq!(spec.params[1], ("size".to_string(), ParamValue::Required));
    /// ```
    pub fn overlay(&self, base: MethodSpec) -> MethodSpec {
        let mut merged = base;
        if self.method.is_some() {
            merged.method = self.method;
        }
        if self.endpoint.is_some() {
            merged.endpoint.clone_from(&self.endpoint);
        }
        for (name, value) in &self.params {
            merged.set_param(name.clone(), value.clone());
        }
        merged
    }

    /// Reads a `{method?, endpoint?, param?}` block from a definition document.
    ///
    /// ## Errors
    ///
    /// Returns an error if the block is not a mapping, the verb is unknown,
    /// or `param` is not a mapping.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, SpecError> {
        let block = value
            .as_object()
            .ok_or_else(|| SpecError::expected_object(format!("method \"{name}\"")))?;

        let mut spec = MethodSpec::new();

        if let Some(verb) = block.get("method") {
            let verb = verb.as_str().unwrap_or_default();
            let method = verb.parse::<RestMethod>().map_err(|_| SpecError::InvalidMethod {
                name: name.to_string(),
                value: verb.to_string(),
            })?;
            spec.method = Some(method);
        }

        if let Some(endpoint) = block.get("endpoint") {
            spec.endpoint = Some(match endpoint {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            });
        }

        if let Some(params) = block.get("param") {
            let params: &Map<String, Value> = params
                .as_object()
                .ok_or_else(|| SpecError::expected_object(format!("param of \"{name}\"")))?;
            for (key, marker) in params {
                spec.set_param(key.clone(), ParamValue::from_value(marker.clone()));
            }
        }

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_get_without_endpoint() {
        let spec = MethodSpec::new();
        assert_eq!(spec.http_method(), RestMethod::Get);
        assert_eq!(spec.endpoint, None);
        assert_eq!(spec.endpoint_or("kernels"), "kernels");
    }

    #[test]
    fn required_params_keep_declaration_order() {
        let spec = MethodSpec::put()
            .endpoint("{id}")
            .required("id")
            .fixed("region", "nyc3")
            .required("name");

        let required: Vec<_> = spec.required_params().collect();
        assert_eq!(required, vec!["id", "name"]);

        let fixed: Vec<_> = spec.fixed_params().collect();
        assert_eq!(fixed, vec![("region", &json!("nyc3"))]);
    }

    #[test]
    fn redeclaring_a_param_replaces_in_place() {
        let spec = MethodSpec::new().fixed("a", 1).required("b").required("a");
        assert_eq!(spec.params.len(), 2);
        assert_eq!(spec.params[0], ("a".to_string(), ParamValue::Required));
    }

    #[test]
    fn overlay_keeps_base_values_when_unset() {
        let base = MethodSpec::get().endpoint("{id}/kernels").fixed("id", 7);
        let merged = MethodSpec::new().overlay(base.clone());
        assert_eq!(merged, base);
    }

    #[test]
    fn overlay_overrides_method_and_endpoint() {
        let base = MethodSpec::get().endpoint("{id}/destroy").fixed("id", 7);
        let merged = MethodSpec::delete().endpoint("{id}").overlay(base);

        assert_eq!(merged.http_method(), RestMethod::Delete);
        assert_eq!(merged.endpoint.as_deref(), Some("{id}"));
        assert_eq!(merged.params, vec![("id".to_string(), ParamValue::Fixed(json!(7)))]);
    }

    #[test]
    fn from_value_reads_all_fields() {
        let spec = MethodSpec::from_value(
            "update",
            &json!({"method": "put", "endpoint": "{id}", "param": {"id": "#", "name": "#"}}),
        )
        .unwrap();

        assert_eq!(spec.http_method(), RestMethod::Put);
        assert_eq!(spec.endpoint.as_deref(), Some("{id}"));
        assert_eq!(spec.required_params().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn from_value_treats_other_markers_as_fixed() {
        let spec = MethodSpec::from_value("x", &json!({"param": {"private": true}})).unwrap();
        assert_eq!(
            spec.params,
            vec![("private".to_string(), ParamValue::Fixed(json!(true)))]
        );
    }

    #[test]
    fn from_value_rejects_unknown_verb() {
        let err = MethodSpec::from_value("x", &json!({"method": "fetch"})).unwrap_err();
        assert!(matches!(err, SpecError::InvalidMethod { .. }));
    }

    #[test]
    fn from_value_rejects_non_object() {
        let err = MethodSpec::from_value("x", &json!("nope")).unwrap_err();
        assert!(matches!(err, SpecError::ExpectedObject { .. }));
    }
}

//! Resource and item specifications.
//!
//! A [`ResourceSpec`] describes one REST collection and the methods compiled
//! onto it. Its optional [`ItemSpec`] describes what every item returned by
//! that collection can do: plain per-item methods, `_actions` that post to
//! the item's `actions` sub-resource, and `_records` nested under the item.

use serde_json::Value;

use crate::error::SpecError;
use crate::method::MethodSpec;

/// Reserved key holding the item decoration of a resource.
pub const ITEM_KEY: &str = "_item";
/// Reserved key holding the actions of an item.
pub const ACTIONS_KEY: &str = "_actions";
/// Reserved key holding the nested records of an item.
pub const RECORDS_KEY: &str = "_records";

/// Methods attached to every item a collection yields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSpec {
    /// Per-item methods, defaulting to `{id}/<name>`.
    pub methods: Vec<(String, MethodSpec)>,
    /// Actions, posted to `{id}/actions` with the action type injected.
    pub actions: Vec<(String, MethodSpec)>,
    /// Nested records, targeting `{name}/records[/endpoint]`.
    pub records: Vec<(String, MethodSpec)>,
}

impl ItemSpec {
    /// Creates an empty item spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-item method.
    pub fn method(mut self, name: impl Into<String>, spec: MethodSpec) -> Self {
        self.methods.push((name.into(), spec));
        self
    }

    /// Adds an action.
    pub fn action(mut self, name: impl Into<String>, spec: MethodSpec) -> Self {
        self.actions.push((name.into(), spec));
        self
    }

    /// Adds a nested record method.
    pub fn record(mut self, name: impl Into<String>, spec: MethodSpec) -> Self {
        self.records.push((name.into(), spec));
        self
    }

    /// Returns `true` when nothing would be compiled onto items.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.actions.is_empty() && self.records.is_empty()
    }

    /// Reads an `_item` block.
    ///
    /// `_actions` and `_records` are read as maps of named method specs;
    /// other underscore-prefixed keys are reserved and skipped.
    ///
    /// ## Errors
    ///
    /// Returns an error if the block or any nested method spec is malformed.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        let block = value
            .as_object()
            .ok_or_else(|| SpecError::expected_object(ITEM_KEY))?;

        let mut spec = ItemSpec::new();
        for (key, entry) in block {
            match key.as_str() {
                ACTIONS_KEY => spec.actions = named_specs(ACTIONS_KEY, entry)?,
                RECORDS_KEY => spec.records = named_specs(RECORDS_KEY, entry)?,
                reserved if reserved.starts_with('_') => {}
                name => spec
                    .methods
                    .push((name.to_string(), MethodSpec::from_value(name, entry)?)),
            }
        }
        Ok(spec)
    }
}

/// One REST collection.
///
/// ## Examples
///
/// ```
/// use oceanic_define::{ItemSpec, MethodSpec, ResourceSpec};
///
/// let keys = ResourceSpec::with_noun("keys", "account/keys")
///     .method("id", MethodSpec::get().endpoint("{id}").required("id"));
///
/// assert_eq!(keys.noun, "account/keys");
/// assert!(keys.item.is_none());
///
/// let droplets = ResourceSpec::new("droplets")
///     .item(ItemSpec::new().action("reboot", MethodSpec::new()));
/// assert_eq!(droplets.noun, "droplets");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    /// Accessor name on the client root.
    pub name: String,
    /// REST path segment of the collection.
    pub noun: String,
    /// Collection methods.
    pub methods: Vec<(String, MethodSpec)>,
    /// Decoration applied to every item the collection yields.
    pub item: Option<ItemSpec>,
}

impl ResourceSpec {
    /// Creates a resource whose accessor name is also its noun.
    pub fn new(noun: impl Into<String>) -> Self {
        let noun = noun.into();
        Self::with_noun(noun.clone(), noun)
    }

    /// Creates a resource with distinct accessor name and noun.
    pub fn with_noun(name: impl Into<String>, noun: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            noun: noun.into(),
            methods: Vec::new(),
            item: None,
        }
    }

    /// Adds a collection method.
    pub fn method(mut self, name: impl Into<String>, spec: MethodSpec) -> Self {
        self.methods.push((name.into(), spec));
        self
    }

    /// Sets the item decoration.
    pub fn item(mut self, item: ItemSpec) -> Self {
        self.item = Some(item);
        self
    }

    /// Reads a resource block.
    ///
    /// `_item` becomes the item decoration. `_actions`, `_records` and any
    /// other underscore-prefixed key carry no meaning at this level and are
    /// skipped.
    ///
    /// ## Examples
    ///
    /// ```
    /// use oceanic_define::ResourceSpec;
    /// use serde_json::json;
    ///
    /// let spec = ResourceSpec::from_value("floating_ips", "floating_ips", &json!({
    ///     "id": {"endpoint": "{ip}", "param": {"ip": "#"}},
    ///     "_item": {"_actions": {"assign": {"param": {"droplet_id": "#"}}, "unassign": {}}},
    ///     "_comment": "ignored"
    /// })).unwrap();
    ///
    /// assert_eq!(spec.methods.len(), 1);
    /// assert_eq!(spec.item.unwrap().actions.len(), 2);
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if the block or any nested method spec is malformed.
    pub fn from_value(
        name: impl Into<String>,
        noun: impl Into<String>,
        value: &Value,
    ) -> Result<Self, SpecError> {
        let mut spec = ResourceSpec::with_noun(name, noun);

        // a resource without any block (e.g. `regions`) only gets `list`
        if value.is_null() {
            return Ok(spec);
        }

        let block = value
            .as_object()
            .ok_or_else(|| SpecError::expected_object(format!("resource \"{}\"", spec.name)))?;

        for (key, entry) in block {
            match key.as_str() {
                ITEM_KEY => spec.item = Some(ItemSpec::from_value(entry)?),
                reserved if reserved.starts_with('_') => {}
                method => spec
                    .methods
                    .push((method.to_string(), MethodSpec::from_value(method, entry)?)),
            }
        }
        Ok(spec)
    }
}

fn named_specs(context: &str, value: &Value) -> Result<Vec<(String, MethodSpec)>, SpecError> {
    let block = value
        .as_object()
        .ok_or_else(|| SpecError::expected_object(context))?;
    block
        .iter()
        .map(|(name, entry)| Ok((name.clone(), MethodSpec::from_value(name, entry)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ParamValue;
    use crate::types::RestMethod;
    use serde_json::json;

    #[test]
    fn item_block_splits_reserved_keys() {
        let item = ItemSpec::from_value(&json!({
            "kernels": {},
            "destroy": {"method": "delete", "endpoint": "{id}"},
            "_actions": {"reboot": {}, "resize": {"param": {"size": "#"}}},
            "_records": {"list": {}},
            "_unknown": {"whatever": true}
        }))
        .unwrap();

        let methods: Vec<_> = item.methods.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(methods, vec!["kernels", "destroy"]);
        assert_eq!(item.actions.len(), 2);
        assert_eq!(item.records.len(), 1);
        assert_eq!(item.methods[1].1.http_method(), RestMethod::Delete);
        assert_eq!(
            item.actions[1].1.params,
            vec![("size".to_string(), ParamValue::Required)]
        );
    }

    #[test]
    fn resource_level_actions_are_ignored() {
        let spec = ResourceSpec::from_value(
            "sizes",
            "sizes",
            &json!({"_actions": {"reboot": {}}, "_records": {"list": {}}}),
        )
        .unwrap();

        assert!(spec.methods.is_empty());
        assert!(spec.item.is_none());
    }

    #[test]
    fn null_block_yields_bare_resource() {
        let spec = ResourceSpec::from_value("regions", "regions", &Value::Null).unwrap();
        assert!(spec.methods.is_empty());
        assert!(spec.item.is_none());
    }

    #[test]
    fn method_order_follows_document_order() {
        let spec = ResourceSpec::from_value(
            "keys",
            "account/keys",
            &json!({"id": {}, "create": {}, "update": {}, "destroy": {}}),
        )
        .unwrap();

        let names: Vec<_> = spec.methods.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["id", "create", "update", "destroy"]);
    }

    #[test]
    fn non_object_item_block_is_rejected() {
        let err = ResourceSpec::from_value("x", "x", &json!({"_item": []})).unwrap_err();
        assert!(matches!(err, SpecError::ExpectedObject { .. }));
    }

    #[test]
    fn empty_item_spec() {
        assert!(ItemSpec::new().is_empty());
        assert!(!ItemSpec::new().record("list", MethodSpec::new()).is_empty());
    }
}

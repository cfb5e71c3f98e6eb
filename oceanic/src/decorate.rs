//! Installing normalized properties and compiled methods.
//!
//! Both operations are pure functions over the target: a field map for
//! properties and a [`MethodTable`] for methods. Names are normalized with
//! [`camel_case`] before installation and the first definition of a name
//! wins; a later definition under the same normalized name is ignored.

use oceanic_define::MethodSpec;
use serde_json::{Map, Value};
use tracing::debug;

use crate::method::{CompiledMethod, Resolver};
use crate::naming::{camel_case, camel_case_deep};

/// Compiled methods keyed by normalized name, in installation order.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    entries: Vec<(String, CompiledMethod)>,
}

impl MethodTable {
    /// Looks up a method. `name` is normalized first, so both
    /// `power_cycle` and `powerCycle` find the same method.
    pub fn get(&self, name: &str) -> Option<&CompiledMethod> {
        let key = camel_case(name, false);
        self.entries
            .iter()
            .find(|(installed, _)| *installed == key)
            .map(|(_, method)| method)
    }

    /// Returns `true` if a method is installed under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Normalized names in installation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Installed methods in installation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompiledMethod)> {
        self.entries.iter().map(|(name, method)| (name.as_str(), method))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Installs `value` on `target` under the normalized `key`, with every
/// nested key normalized too.
///
/// Returns `false` and leaves `target` unchanged when the normalized key is
/// already present, the same first-wins rule as
/// [`camel_case_map`](crate::naming::camel_case_map).
///
/// ## Examples
///
/// ```
/// use oceanic::decorate::define_property;
/// use serde_json::{Map, json};
///
/// let mut fields = Map::new();
/// assert!(define_property(&mut fields, "size_slug", json!("s-1vcpu-1gb")));
/// assert!(!define_property(&mut fields, "sizeSlug", json!("other")));
/// assert_eq!(fields["sizeSlug"], "s-1vcpu-1gb");
/// ```
pub fn define_property(target: &mut Map<String, Value>, key: &str, value: Value) -> bool {
    let key = camel_case(key, false);
    if target.contains_key(&key) {
        debug!(property = %key, "property already defined");
        return false;
    }
    target.insert(key, camel_case_deep(value));
    true
}

/// Compiles `spec` with `resolver` and installs it on `target` under the
/// normalized `name`.
///
/// Returns `false` and leaves `target` unchanged when the normalized name is
/// already taken.
pub fn define_method(
    target: &mut MethodTable,
    name: &str,
    spec: MethodSpec,
    resolver: Resolver,
) -> bool {
    let key = camel_case(name, false);
    if target.contains(&key) {
        debug!(method = %key, "method already defined");
        return false;
    }
    target
        .entries
        .push((key, CompiledMethod::new(name, spec, resolver)));
    true
}

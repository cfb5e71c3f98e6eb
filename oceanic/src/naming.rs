//! Underscore to camelCase name normalization.
//!
//! Every name the engine exposes (endpoint accessors, method names, item
//! fields) goes through [`camel_case`], so `floating_ips` is reachable as
//! `floatingIps` and `power_cycle` as `powerCycle`.
//!
//! When two keys of one object normalize to the same name (`size_slug` and
//! `sizeSlug`), the first one wins at every depth and later ones are dropped.

use serde_json::{Map, Value};

/// Converts an underscore-separated name to camelCase.
///
/// Each `_` is dropped and the character after it is upper-cased. With
/// `upper` set the first character is upper-cased too. Names without an
/// underscore are returned unchanged apart from that first character.
///
/// ## Examples
///
/// ```
/// use oceanic::naming::camel_case;
///
/// assert_eq!(camel_case("floating_ips", false), "floatingIps");
/// assert_eq!(camel_case("floating_ips", true), "FloatingIps");
/// assert_eq!(camel_case("enable_IPv6", false), "enableIPv6");
/// assert_eq!(camel_case("id", false), "id");
/// ```
pub fn camel_case(name: &str, upper: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut raise = upper;

    for c in name.chars() {
        if c == '_' {
            raise = true;
            continue;
        }
        if raise {
            out.extend(c.to_uppercase());
            raise = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Normalizes every object key in `value`, recursing into arrays and
/// nested objects. Scalars are returned untouched.
pub fn camel_case_deep(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(camel_case_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(camel_case_deep).collect()),
        other => other,
    }
}

/// Normalizes the keys of a single object, deeply.
pub fn camel_case_map(map: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        let key = camel_case(&key, false);
        if !out.contains_key(&key) {
            out.insert(key, camel_case_deep(value));
        }
    }
    out
}

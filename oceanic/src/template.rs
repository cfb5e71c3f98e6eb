//! `{placeholder}` substitution for endpoint templates.

use serde_json::{Map, Value};

/// Substitutes `{name}` tokens in `template` from `params`.
///
/// A placeholder name is a run of ASCII alphanumerics and underscores.
/// - A present key is replaced by its value (strings verbatim, anything
///   else as JSON text) and removed from `params` unless `preserve` is set.
/// - An absent key is replaced by the empty string.
/// - A `{` that does not open a well-formed placeholder is kept literally.
///
/// ## Examples
///
/// ```
/// use oceanic::template::resolve;
/// use serde_json::{json, Map};
///
/// let mut params = Map::new();
/// params.insert("id".into(), json!(42));
/// params.insert("name".into(), json!("web"));
///
/// assert_eq!(resolve("{id}/actions", &mut params, false), "42/actions");
/// assert!(!params.contains_key("id"));
/// assert!(params.contains_key("name"));
///
/// assert_eq!(resolve("{missing}/x", &mut params, false), "/x");
/// ```
pub fn resolve(template: &str, params: &mut Map<String, Value>, preserve: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some((name, tail)) = placeholder(after) else {
            out.push('{');
            rest = after;
            continue;
        };

        let replacement = if preserve {
            params.get(name).map(render)
        } else {
            params.remove(name).as_ref().map(render)
        };
        out.push_str(&replacement.unwrap_or_default());
        rest = tail;
    }

    out.push_str(rest);
    out
}

/// Splits `input` (the text after a `{`) into a placeholder name and the
/// text after its closing `}`.
fn placeholder(input: &str) -> Option<(&str, &str)> {
    let close = input.find('}')?;
    let name = &input[..close];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| (name, &input[close + 1..]))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

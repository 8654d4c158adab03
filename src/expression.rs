//! Expression resolver.
//!
//! Node settings may reference outputs of previously executed nodes with
//! placeholders of the form `{{ context.outputs.<nodeId>.<key> }}`.
//! Resolution is textual substitution over the run-scoped output map:
//! a placeholder whose node or key has not been produced yet (including
//! because the node failed before writing output) becomes the empty string.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

fn placeholder_regex() -> &'static regex_lite::Regex {
    static PLACEHOLDER_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"\{\{\s*context\.outputs\.([A-Za-z0-9_\-]+)\.([A-Za-z0-9_\-]+)\s*\}\}")
            .expect("valid regex")
    })
}

/// Resolve every placeholder in `input` against the output map.
///
/// String outputs substitute verbatim; any other value is stringified in
/// place (substitution is textual, not structural).
pub fn resolve_str(input: &str, outputs: &HashMap<String, Value>) -> String {
    placeholder_regex()
        .replace_all(input, |caps: &regex_lite::Captures| {
            outputs
                .get(&caps[1])
                .and_then(|output| output.get(&caps[2]))
                .map(stringify_value)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Resolve top-level string fields of a settings object.
///
/// Non-string values (numbers, booleans, nested maps, arrays) pass through
/// unchanged; handlers that dig into nested structures resolve the extracted
/// strings themselves via [`resolve_str`].
pub fn resolve_settings(settings: &Value, outputs: &HashMap<String, Value>) -> Value {
    match settings {
        Value::Object(map) => {
            let mut resolved = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                let value = match value {
                    Value::String(s) => Value::String(resolve_str(s, outputs)),
                    other => other.clone(),
                };
                resolved.insert(key.clone(), value);
            }
            Value::Object(resolved)
        }
        other => other.clone(),
    }
}

fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outputs() -> HashMap<String, Value> {
        let mut outputs = HashMap::new();
        outputs.insert("n1".to_string(), json!({"status": 200, "body": "hello"}));
        outputs
    }

    #[test]
    fn test_substitutes_numeric_output() {
        let result = resolve_str("code={{ context.outputs.n1.status }}", &outputs());
        assert_eq!(result, "code=200");
    }

    #[test]
    fn test_substitutes_string_output_verbatim() {
        let result = resolve_str("said {{ context.outputs.n1.body }}", &outputs());
        assert_eq!(result, "said hello");
    }

    #[test]
    fn test_missing_key_becomes_empty() {
        let result = resolve_str("code={{ context.outputs.n1.missing }}", &outputs());
        assert_eq!(result, "code=");
    }

    #[test]
    fn test_missing_node_becomes_empty() {
        let result = resolve_str("code={{ context.outputs.ghost.status }}", &outputs());
        assert_eq!(result, "code=");
    }

    #[test]
    fn test_whitespace_tolerated() {
        let result = resolve_str("{{context.outputs.n1.status}}", &outputs());
        assert_eq!(result, "200");

        let result = resolve_str("{{   context.outputs.n1.status   }}", &outputs());
        assert_eq!(result, "200");
    }

    #[test]
    fn test_multiple_placeholders() {
        let result = resolve_str(
            "{{ context.outputs.n1.status }}:{{ context.outputs.n1.body }}",
            &outputs(),
        );
        assert_eq!(result, "200:hello");
    }

    #[test]
    fn test_non_scalar_output_stringified() {
        let mut outputs = HashMap::new();
        outputs.insert("n1".to_string(), json!({"headers": {"a": "b"}}));

        let result = resolve_str("{{ context.outputs.n1.headers }}", &outputs);
        assert_eq!(result, r#"{"a":"b"}"#);
    }

    #[test]
    fn test_resolve_settings_only_touches_strings() {
        let settings = json!({
            "url": "https://api.test/{{ context.outputs.n1.status }}",
            "retries": 3,
            "nested": {"inner": "{{ context.outputs.n1.status }}"}
        });

        let resolved = resolve_settings(&settings, &outputs());
        assert_eq!(resolved["url"], "https://api.test/200");
        assert_eq!(resolved["retries"], 3);
        // Nested strings are left for the handler layer to resolve.
        assert_eq!(resolved["nested"]["inner"], "{{ context.outputs.n1.status }}");
    }

    #[test]
    fn test_resolve_settings_non_object_passthrough() {
        let resolved = resolve_settings(&json!(42), &outputs());
        assert_eq!(resolved, json!(42));
    }
}

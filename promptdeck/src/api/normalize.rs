//! Coercion of the loosely-typed `variables` field
//!
//! Older backend records store the variable schema as a JSON-encoded
//! string, newer ones as an array. Everything downstream of the API adapter
//! only ever sees the array form.

use serde_json::Value;

use super::types::TemplateVariable;

/// Coerce a raw `variables` value into an ordered variable list
///
/// - array: its entries, in order
/// - string holding a JSON array: the decoded entries
/// - anything else (malformed string, object, number, `null`, absent): empty
///
/// Array entries that are not variable objects are skipped. Malformed
/// input is never an error.
#[must_use]
pub fn normalize_variables(raw: Option<Value>) -> Vec<TemplateVariable> {
    match raw {
        Some(Value::Array(items)) => from_items(items),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Array(items)) => from_items(items),
            Ok(_) => Vec::new(),
            Err(error) => {
                tracing::debug!(%error, "discarding undecodable variables payload");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn from_items(items: Vec<Value>) -> Vec<TemplateVariable> {
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(variables: &[TemplateVariable]) -> Vec<&str> {
        variables.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_array_passes_through() {
        let raw = json!([
            {"name": "a", "display_name": "A", "required": true, "sort_order": 0},
            {"name": "b", "display_name": "B", "required": false, "sort_order": 1}
        ]);
        let variables = normalize_variables(Some(raw));
        assert_eq!(names(&variables), ["a", "b"]);
        assert!(!variables[1].required);
        assert_eq!(variables[1].sort_order, 1);
    }

    #[test]
    fn test_encoded_array_is_decoded() {
        let raw = Value::String(r#"[{"name":"topic","display_name":"Topic"}]"#.to_string());
        let variables = normalize_variables(Some(raw));
        assert_eq!(names(&variables), ["topic"]);
        assert_eq!(variables[0].display_name, "Topic");
    }

    #[test]
    fn test_malformed_string_is_empty() {
        let raw = Value::String("[{not json".to_string());
        assert!(normalize_variables(Some(raw)).is_empty());
    }

    #[test]
    fn test_encoded_non_array_is_empty() {
        let raw = Value::String(r#"{"name":"a"}"#.to_string());
        assert!(normalize_variables(Some(raw)).is_empty());
    }

    #[test]
    fn test_absent_and_null_are_empty() {
        assert!(normalize_variables(None).is_empty());
        assert!(normalize_variables(Some(Value::Null)).is_empty());
        assert!(normalize_variables(Some(json!(42))).is_empty());
    }

    #[test]
    fn test_missing_required_defaults_to_true() {
        let variables = normalize_variables(Some(json!([{"name": "a"}])));
        assert!(variables[0].required);
    }
}

// Predicates over the metadata attached to the stub that served a request

use serde_json::Value;

/// Predicate over stub metadata
pub trait MetadataPredicate: Send + Sync {
    fn matches(&self, metadata: &Value) -> bool;
}

impl<F> MetadataPredicate for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn matches(&self, metadata: &Value) -> bool {
        self(metadata)
    }
}

/// JSON subset matcher.
///
/// Objects match when every key of the pattern is present with a matching value.
/// Arrays match when every pattern element matches some element of the candidate.
/// Anything else compares by equality.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataPattern {
    expected: Value,
}

impl MetadataPattern {
    pub fn new(expected: Value) -> Self {
        Self { expected }
    }

    /// Matches metadata containing `key` with exactly `value`
    pub fn key_equal_to(key: &str, value: Value) -> Self {
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), value);
        Self::new(Value::Object(object))
    }
}

fn contains(candidate: &Value, expected: &Value) -> bool {
    match (candidate, expected) {
        (Value::Object(actual), Value::Object(wanted)) => wanted
            .iter()
            .all(|(key, value)| actual.get(key).is_some_and(|v| contains(v, value))),
        (Value::Array(actual), Value::Array(wanted)) => wanted
            .iter()
            .all(|value| actual.iter().any(|v| contains(v, value))),
        _ => candidate == expected,
    }
}

impl MetadataPredicate for MetadataPattern {
    fn matches(&self, metadata: &Value) -> bool {
        contains(metadata, &self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_subset_matches() {
        let metadata = json!({
            "team": "payments",
            "tags": ["slow", "flaky"],
            "owner": { "name": "ops", "pager": true }
        });

        assert!(MetadataPattern::new(json!({"team": "payments"})).matches(&metadata));
        assert!(MetadataPattern::new(json!({"tags": ["flaky"]})).matches(&metadata));
        assert!(MetadataPattern::new(json!({"owner": {"pager": true}})).matches(&metadata));
        assert!(!MetadataPattern::new(json!({"team": "search"})).matches(&metadata));
        assert!(!MetadataPattern::key_equal_to("missing", json!(1)).matches(&metadata));
    }

    #[test]
    fn null_metadata_only_matches_null() {
        assert!(!MetadataPattern::new(json!({"a": 1})).matches(&Value::Null));
        assert!(MetadataPattern::new(Value::Null).matches(&Value::Null));
    }
}

//! Recover a JSON object from free-form model text.
//!
//! Models wrap JSON in markdown fences and prose. The sanitizer removes the
//! fences, then keeps everything from the first `{` to the last `}` and
//! requires that slice to parse.
//!
//! This is a brace-scanning heuristic, not a parser. A reply that contains
//! two independent objects is sliced into one unparseable string and yields
//! `None`; prose containing stray braces around the object does the same.
//! Callers treat `None` as "unparseable" and never continue with partial data.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;

/// An opening fence starts a line; a closing fence ends one. Backticks in
/// the middle of a line, such as inside a JSON string, are left alone.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*```(?:json)?|```[ \t]*$").expect("fence pattern compiles")
});

/// Remove triple-backtick fences, with or without a `json` tag.
pub fn strip_fences(raw: &str) -> Cow<'_, str> {
    FENCE.replace_all(raw, "")
}

/// First `{` through last `}`, inclusive.
pub fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Full sanitization: fences, brace slice, parse.
pub fn extract_json(raw: &str) -> Option<Value> {
    let unfenced = strip_fences(raw);
    let slice = brace_slice(&unfenced)?;
    match serde_json::from_str::<Value>(slice) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, slice_len = slice.len(), "sanitize.parse_failed");
            None
        }
    }
}

/// [`extract_json`] followed by a typed decode. A well-formed object of the
/// wrong shape is also `None`.
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let value = extract_json(raw)?;
    serde_json::from_value(value)
        .map_err(|e| tracing::debug!(error = %e, "sanitize.shape_mismatch"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn fenced_object_inside_prose_round_trips() {
        let original = json!({
            "isValid": true,
            "credibilityScore": 0.91,
            "sourceType": "news",
            "analysis": "Established outlet, byline present.",
            "nested": {"tags": ["a", "b"], "depth": {"level": 2}},
            "date": "2024-05-01"
        });
        let wrapped = format!(
            "Sure, here is the assessment:\n```json\n{}\n```\nLet me know if you need more.",
            serde_json::to_string_pretty(&original).unwrap()
        );
        assert_eq!(extract_json(&wrapped), Some(original));
    }

    #[test]
    fn untagged_and_uppercase_fences_are_stripped() {
        assert_eq!(extract_json("```\n{\"a\":1}\n```"), Some(json!({"a": 1})));
        assert_eq!(extract_json("```JSON\n{\"a\":2}```"), Some(json!({"a": 2})));
    }

    #[test]
    fn backticks_inside_string_values_survive() {
        let original = json!({
            "analysis": "see ```code``` block",
            "confidence": 0.9
        });
        let wrapped = format!("Here:\n```json\n{original}\n```\nbye");
        assert_eq!(extract_json(&wrapped), Some(original));

        let pretty = format!(
            "```json\n{}\n```",
            serde_json::to_string_pretty(&json!({"quotes": ["```rust", "fn main() {}```"]})).unwrap()
        );
        assert_eq!(
            extract_json(&pretty),
            Some(json!({"quotes": ["```rust", "fn main() {}```"]}))
        );
    }

    #[test]
    fn nested_braces_keep_the_outer_object() {
        let raw = r#"{"outer": {"inner": {"x": "}"}}}"#;
        assert_eq!(
            extract_json(raw),
            Some(json!({"outer": {"inner": {"x": "}"}}}))
        );
    }

    #[test]
    fn two_independent_objects_are_not_recovered() {
        assert_eq!(extract_json(r#"{"a": 1} and also {"b": 2}"#), None);
    }

    #[test]
    fn missing_or_inverted_braces_yield_none() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("only an opening {"), None);
        assert_eq!(extract_json("} backwards {"), None);
        assert_eq!(brace_slice("} x {"), None);
    }

    #[test]
    fn malformed_slice_yields_none() {
        assert_eq!(extract_json("{\"a\": tru}"), None);
    }

    #[test]
    fn typed_parse_rejects_wrong_shape() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Reply {
            confidence: f64,
        }
        assert_eq!(
            parse_reply::<Reply>("```json\n{\"confidence\": 0.9}\n```"),
            Some(Reply { confidence: 0.9 })
        );
        assert_eq!(parse_reply::<Reply>("{\"confidence\": \"high\"}"), None);
    }
}

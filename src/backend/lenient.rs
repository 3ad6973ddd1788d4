//! Tolerant JSON-to-model mapping.
//!
//! The backend evolves independently and has shipped the same field as
//! `imageUrl`, `image_url` and `ImageURL`. Each model field is described by a
//! [`Field`]: an ordered list of candidate keys. Lookup walks the candidates
//! in order for an exact match, then walks them again comparing
//! case-insensitively against every key of the payload. The first hit wins.
//! Absent optional values fall back to defaults (`""`, `0`, `false`, empty
//! list) instead of failing the decode.
//!
//! A payload that is itself an error envelope (an object with `detail`)
//! never decodes into a defaulted model; it fails with the detail text.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::message::parse_timestamp_value;

/// Keys under which list endpoints wrap their items.
pub const LIST_ENVELOPE: Field = Field::new("items", &["items", "results", "data"]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload was a backend error envelope.
    #[error("{0}")]
    Backend(String),
    #[error("expected {expected}, got {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
}

/// A model field and the ordered keys it may arrive under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

impl Field {
    pub const fn new(name: &'static str, candidates: &'static [&'static str]) -> Self {
        Self { name, candidates }
    }
}

/// Read-only view over one JSON object with alias-aware accessors.
#[derive(Debug, Clone, Copy)]
pub struct LenientObject<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> LenientObject<'a> {
    /// Wraps `value`, failing on error envelopes and non-objects.
    pub fn new(value: &'a Value) -> Result<Self, DecodeError> {
        check_error_envelope(value)?;

        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(DecodeError::Shape {
                expected: "object",
                found: kind_of(other),
            }),
        }
    }

    /// Resolves `field`; explicit `null` counts as absent.
    pub fn lookup(&self, field: &Field) -> Option<&'a Value> {
        let exact = field
            .candidates
            .iter()
            .find_map(|candidate| self.map.get(*candidate));

        exact
            .or_else(|| {
                field.candidates.iter().find_map(|candidate| {
                    self.map
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(candidate))
                        .map(|(_, value)| value)
                })
            })
            .filter(|value| !value.is_null())
    }

    pub fn string(&self, field: &Field) -> String {
        self.opt_string(field).unwrap_or_default()
    }

    pub fn opt_string(&self, field: &Field) -> Option<String> {
        match self.lookup(field)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Identifiers are mandatory; everything else has a default.
    pub fn required_id(&self, field: &Field) -> Result<String, DecodeError> {
        self.opt_string(field)
            .filter(|value| !value.is_empty())
            .ok_or(DecodeError::MissingField(field.name))
    }

    pub fn u32(&self, field: &Field) -> u32 {
        self.number(field)
            .map(|value| value.clamp(0.0, u32::MAX as f64) as u32)
            .unwrap_or_default()
    }

    pub fn f64(&self, field: &Field) -> Option<f64> {
        self.number(field)
    }

    pub fn bool(&self, field: &Field) -> bool {
        match self.lookup(field) {
            Some(Value::Bool(value)) => *value,
            Some(Value::Number(value)) => value.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(value)) => {
                matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
            }
            _ => false,
        }
    }

    pub fn timestamp(&self, field: &Field) -> Option<DateTime<Utc>> {
        self.lookup(field).and_then(parse_timestamp_value)
    }

    /// Decodes a nested list; a missing list is empty.
    pub fn list<T>(
        &self,
        field: &Field,
        decode: impl Fn(&Value) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        match self.lookup(field) {
            None => Ok(Vec::new()),
            Some(value) => decode_items(value, decode),
        }
    }

    fn number(&self, field: &Field) -> Option<f64> {
        match self.lookup(field)? {
            Value::Number(value) => value.as_f64(),
            Value::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Fails when `value` is an object carrying a `detail` error message.
pub fn check_error_envelope(value: &Value) -> Result<(), DecodeError> {
    let Some(detail) = value.as_object().and_then(|map| map.get("detail")) else {
        return Ok(());
    };

    Err(DecodeError::Backend(detail_text(detail)))
}

/// Human-readable text of a `detail` value.
///
/// Validation errors arrive as a list of objects with `msg`; those are joined.
pub fn detail_text(detail: &Value) -> String {
    match detail {
        Value::String(text) => text.clone(),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| match entry.get("msg") {
                Some(Value::String(msg)) => msg.clone(),
                _ => entry.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Decodes a list response: a bare array, or an object wrapping it.
pub fn decode_list<T>(
    value: &Value,
    decode: impl Fn(&Value) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    check_error_envelope(value)?;

    match value {
        Value::Array(_) => decode_items(value, decode),
        Value::Object(_) => {
            let object = LenientObject::new(value)?;
            let items = object
                .lookup(&LIST_ENVELOPE)
                .ok_or(DecodeError::MissingField(LIST_ENVELOPE.name))?;
            decode_items(items, decode)
        }
        other => Err(DecodeError::Shape {
            expected: "array",
            found: kind_of(other),
        }),
    }
}

/// Entries that cannot be decoded are skipped, not fatal to the list.
fn decode_items<T>(
    value: &Value,
    decode: impl Fn(&Value) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let Value::Array(entries) = value else {
        return Err(DecodeError::Shape {
            expected: "array",
            found: kind_of(value),
        });
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match decode(entry) {
            Ok(item) => items.push(item),
            Err(error) => tracing::warn!(
                code = "LENIENT_LIST_ENTRY_SKIPPED",
                index,
                error = %error,
                "skipping list entry that failed to decode"
            ),
        }
    }

    Ok(items)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const NAME: Field = Field::new("name", &["name", "title"]);
    const IMAGE: Field = Field::new("image_url", &["imageUrl", "image_url"]);
    const COUNT: Field = Field::new("count", &["count", "total"]);
    const FLAG: Field = Field::new("is_online", &["isOnline", "is_online", "online"]);

    #[test]
    fn exact_candidates_are_tried_in_order() {
        let value = json!({"title": "second", "name": "first"});
        let object = LenientObject::new(&value).expect("object");

        assert_eq!(object.string(&NAME), "first");
    }

    #[test]
    fn falls_back_to_case_insensitive_match() {
        let value = json!({"ImageURL": "https://cdn/x.png"});
        let object = LenientObject::new(&value).expect("object");

        assert_eq!(object.string(&IMAGE), "https://cdn/x.png");
    }

    #[test]
    fn exact_match_beats_case_insensitive_match() {
        let value = json!({"IMAGEURL": "loose", "image_url": "exact"});
        let object = LenientObject::new(&value).expect("object");

        assert_eq!(object.string(&IMAGE), "exact");
    }

    #[test]
    fn null_and_missing_fall_back_to_defaults() {
        let value = json!({"name": null});
        let object = LenientObject::new(&value).expect("object");

        assert_eq!(object.string(&NAME), "");
        assert_eq!(object.u32(&COUNT), 0);
        assert!(!object.bool(&FLAG));
        assert_eq!(object.f64(&COUNT), None);
    }

    #[test]
    fn coerces_numbers_and_booleans_sent_as_strings() {
        let value = json!({"total": "12", "online": "true"});
        let object = LenientObject::new(&value).expect("object");

        assert_eq!(object.u32(&COUNT), 12);
        assert!(object.bool(&FLAG));
    }

    #[test]
    fn negative_numbers_clamp_to_zero() {
        let value = json!({"count": -4});
        let object = LenientObject::new(&value).expect("object");

        assert_eq!(object.u32(&COUNT), 0);
    }

    #[test]
    fn required_id_accepts_numbers_and_rejects_absence() {
        const ID: Field = Field::new("id", &["id"]);
        let numeric = json!({"id": 42});
        let missing = json!({});

        assert_eq!(
            LenientObject::new(&numeric).expect("object").required_id(&ID),
            Ok("42".to_owned())
        );
        assert_eq!(
            LenientObject::new(&missing).expect("object").required_id(&ID),
            Err(DecodeError::MissingField("id"))
        );
    }

    #[test]
    fn detail_envelope_fails_with_its_text() {
        let value = json!({"detail": "Not Found"});

        let error = LenientObject::new(&value).expect_err("envelope must fail");

        assert_eq!(error, DecodeError::Backend("Not Found".to_owned()));
        assert_eq!(error.to_string(), "Not Found");
    }

    #[test]
    fn validation_detail_lists_are_joined() {
        let value = json!({"detail": [{"msg": "field required"}, {"msg": "bad id"}]});

        let error = check_error_envelope(&value).expect_err("envelope must fail");

        assert_eq!(
            error,
            DecodeError::Backend("field required; bad id".to_owned())
        );
    }

    #[test]
    fn decode_list_accepts_bare_and_wrapped_arrays() {
        let decode = |value: &Value| {
            LenientObject::new(value).map(|object| object.string(&NAME))
        };

        let bare = decode_list(&json!([{"name": "a"}, {"name": "b"}]), decode).expect("bare");
        let wrapped = decode_list(&json!({"results": [{"title": "a"}]}), decode).expect("wrapped");

        assert_eq!(bare, vec!["a", "b"]);
        assert_eq!(wrapped, vec!["a"]);
    }

    #[test]
    fn decode_list_skips_broken_entries() {
        let decode = |value: &Value| LenientObject::new(value).map(|object| object.string(&NAME));

        let items = decode_list(&json!([{"name": "a"}, 7, {"name": "c"}]), decode).expect("list");

        assert_eq!(items, vec!["a", "c"]);
    }

    #[test]
    fn decode_list_surfaces_error_envelope() {
        let decode = |value: &Value| LenientObject::new(value).map(|object| object.string(&NAME));

        let error = decode_list(&json!({"detail": "Forbidden"}), decode).expect_err("must fail");

        assert_eq!(error, DecodeError::Backend("Forbidden".to_owned()));
    }
}

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single chat message, delivered either by REST history or by the realtime channel.
///
/// `id` is the de-duplication key across both sources. `sent_at` and `created_at`
/// are kept exactly as received: some realtime payloads carry only `createdAt`,
/// and the two are never merged into one another.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, alias = "chat_id", deserialize_with = "opt_id_string")]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "sent_at", deserialize_with = "lenient_timestamp")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "is_from_specialist",
        alias = "fromSpecialist",
        alias = "from_specialist"
    )]
    pub is_from_specialist: bool,
    #[serde(default, alias = "is_read")]
    pub is_read: bool,
    #[serde(default, alias = "created_at", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Label for the sender column from the specialist's point of view.
    pub fn sender_label(&self) -> &'static str {
        if self.is_from_specialist {
            "You"
        } else {
            "Client"
        }
    }
}

/// Accepts ids sent as strings or as numbers.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Timestamps arrive as RFC 3339, as naive ISO-8601 (treated as UTC) or as unix time.
/// Unparseable values decode to `None` rather than failing the whole payload.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp_value))
}

pub fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp(raw),
        Value::Number(number) => number.as_i64().and_then(from_unix),
        _ => None,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

fn from_unix(value: i64) -> Option<DateTime<Utc>> {
    // Anything past 10^11 is milliseconds.
    if value.abs() >= 100_000_000_000 {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

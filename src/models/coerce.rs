//! Lenient serde adapters for date, number and text fields.
//!
//! Dates accept RFC 3339 timestamps, bare `YYYY-MM-DD` dates or epoch
//! milliseconds, and always serialize as UTC with millisecond precision.
//! Numbers accept JSON numbers or numeric strings. Text accepts strings,
//! numbers or booleans and stores their string form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Millis(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberInput {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextInput {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<TextInput> for String {
    fn from(input: TextInput) -> Self {
        match input {
            TextInput::Text(text) => text,
            TextInput::Bool(b) => b.to_string(),
            TextInput::Int(n) => n.to_string(),
            TextInput::UInt(n) => n.to_string(),
            TextInput::Float(n) => n.to_string(),
        }
    }
}

/// Timestamps without an offset, read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a date the way clients send them.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a date as it is returned to clients, e.g. `2019-05-14T00:00:00.000Z`.
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub mod date {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        match DateInput::deserialize(deserializer)? {
            DateInput::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| de::Error::custom(format!("timestamp {} out of range", ms))),
            DateInput::Text(text) => parse_date(&text)
                .ok_or_else(|| de::Error::custom(format!("invalid date {:?}", text))),
        }
    }
}

pub mod number {
    use super::*;

    /// Whole numbers are written without a fractional part.
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = match NumberInput::deserialize(deserializer)? {
            NumberInput::Number(n) => n,
            NumberInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid number {:?}", text)))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(de::Error::custom("number must be finite"))
        }
    }
}

pub mod text {
    use super::*;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        TextInput::deserialize(deserializer).map(String::from)
    }
}

pub mod text_list {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        let values = Vec::<TextInput>::deserialize(deserializer)?;
        Ok(values.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "date")]
        when: DateTime<Utc>,
        #[serde(with = "number")]
        amount: f64,
    }

    #[test]
    fn test_plain_date_becomes_utc_midnight() {
        let sample: Sample =
            serde_json::from_value(serde_json::json!({ "when": "2019-05-14", "amount": 3 }))
                .unwrap();
        assert_eq!(format_date(&sample.when), "2019-05-14T00:00:00.000Z");
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        let sample: Sample = serde_json::from_value(
            serde_json::json!({ "when": "2020-01-01T02:30:00+02:00", "amount": 1.5 }),
        )
        .unwrap();
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["when"], "2020-01-01T00:30:00.000Z");
        assert_eq!(json["amount"], 1.5);
    }

    #[test]
    fn test_epoch_millis_and_numeric_string() {
        let sample: Sample =
            serde_json::from_value(serde_json::json!({ "when": 0, "amount": " 7 " })).unwrap();
        assert_eq!(format_date(&sample.when), "1970-01-01T00:00:00.000Z");
        assert_eq!(sample.amount, 7.0);
        assert_eq!(serde_json::to_value(&sample).unwrap()["amount"], 7);
    }

    #[test]
    fn test_timestamps_without_offset_are_utc() {
        assert_eq!(
            parse_date("2019-05-14T10:00:00").map(|d| format_date(&d)),
            Some("2019-05-14T10:00:00.000Z".to_string())
        );
        assert_eq!(
            parse_date("2019-05-14 10:00:00.250").map(|d| format_date(&d)),
            Some("2019-05-14T10:00:00.250Z".to_string())
        );
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Labels {
        #[serde(with = "text")]
        label: String,
        #[serde(default, with = "text_list")]
        tags: Vec<String>,
    }

    #[test]
    fn test_text_takes_string_form_of_scalars() {
        let labels: Labels = serde_json::from_value(
            serde_json::json!({ "label": 22, "tags": [true, -3, 1.5, "x"] }),
        )
        .unwrap();
        assert_eq!(labels.label, "22");
        assert_eq!(labels.tags, ["true", "-3", "1.5", "x"]);

        let json = serde_json::to_value(&labels).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "label": "22", "tags": ["true", "-3", "1.5", "x"] })
        );

        let missing: Labels =
            serde_json::from_value(serde_json::json!({ "label": "a" })).unwrap();
        assert!(missing.tags.is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        let bad_date = serde_json::from_value::<Sample>(
            serde_json::json!({ "when": "last tuesday", "amount": 1 }),
        );
        assert!(bad_date.is_err());

        let bad_number = serde_json::from_value::<Sample>(
            serde_json::json!({ "when": "2020-01-01", "amount": "a few" }),
        );
        assert!(bad_number.is_err());
    }
}

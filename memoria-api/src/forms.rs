/// Request-body helpers shared by the route handlers
///
/// HTML forms send every field as a string and send an empty string for a
/// blank input. The deserializers here treat a blank value as absent and
/// accept the date formats browsers and clients commonly produce.

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a date or date-time string
///
/// Accepts ISO-8601 date-times with or without seconds, RFC 3339 with an
/// offset (converted to UTC), and a bare date (midnight).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `Option<T>` from a string field where blank means `None`
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Optional trimmed text where blank means `None`
pub fn blank_text_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty()))
}

/// Optional date-time in any format [`parse_datetime`] accepts
pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_datetime(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
        _ => Ok(None),
    }
}

/// Parses a checkbox-style boolean
///
/// `true`, `1`, `on` and `yes` are true; `false`, `0`, `off`, `no` and blank are false.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Parses a required numeric multipart field
pub fn number_field<T>(name: &str, raw: &str) -> Result<T, ApiError>
where
    T: FromStr,
{
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Field '{name}' must be a number")))
}

/// Parses an optional numeric multipart field; blank means `None`
pub fn optional_number_field<T>(name: &str, raw: &str) -> Result<Option<T>, ApiError>
where
    T: FromStr,
{
    if raw.trim().is_empty() {
        return Ok(None);
    }
    number_field(name, raw).map(Some)
}

/// Missing required multipart field
pub fn missing_field(name: &str) -> ApiError {
    ApiError::BadRequest(format!("Missing '{name}' field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "blank_as_none")]
        number: Option<i64>,

        #[serde(default, deserialize_with = "blank_text_as_none")]
        note: Option<String>,

        #[serde(default, deserialize_with = "optional_datetime")]
        when: Option<NaiveDateTime>,
    }

    fn form(body: &str) -> Result<Sample, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(body)
    }

    #[test]
    fn test_datetime_formats() {
        let full = parse_datetime("2024-03-01T09:30:15").unwrap();
        assert_eq!((full.hour(), full.minute(), full.second()), (9, 30, 15));

        let local_input = parse_datetime("2024-03-01T09:30").unwrap();
        assert_eq!(local_input.minute(), 30);

        let spaced = parse_datetime("2024-03-01 09:30:00").unwrap();
        assert_eq!(spaced, full.with_second(0).unwrap());

        let date_only = parse_datetime("2024-03-01").unwrap();
        assert_eq!((date_only.day(), date_only.hour()), (1, 0));

        let offset = parse_datetime("2024-03-01T10:30:00+01:00").unwrap();
        assert_eq!(offset.hour(), 9);

        assert!(parse_datetime("next tuesday").is_none());
    }

    #[test]
    fn test_blank_fields_are_none() {
        let sample = form("number=&note=++&when=").unwrap();
        assert_eq!(sample.number, None);
        assert_eq!(sample.note, None);
        assert_eq!(sample.when, None);

        let missing = form("").unwrap();
        assert_eq!(missing.number, None);
    }

    #[test]
    fn test_present_fields_parse() {
        let sample = form("number=42&note=+hi+&when=2024-01-02").unwrap();
        assert_eq!(sample.number, Some(42));
        assert_eq!(sample.note.as_deref(), Some("hi"));
        assert_eq!(sample.when.map(|w| w.day()), Some(2));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(form("number=abc").is_err());
        assert!(form("when=someday").is_err());
    }

    #[test]
    fn test_number_fields() {
        assert_eq!(number_field::<i64>("user_id", " 12 ").unwrap(), 12);
        assert!(matches!(
            number_field::<i64>("user_id", "twelve"),
            Err(ApiError::BadRequest(_))
        ));
        assert_eq!(optional_number_field::<i64>("folder_id", "").unwrap(), None);
        assert_eq!(optional_number_field::<i64>("folder_id", "4").unwrap(), Some(4));
    }

    #[test]
    fn test_flags() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("On"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}

pub mod artifact;
pub mod backlog;
pub mod state;
pub mod user;

use chrono::{DateTime, TimeZone, Utc};

/// Parses the store's epoch-millisecond string encoding of release instants.
pub(crate) fn parse_epoch_ms(raw: &str) -> Option<DateTime<Utc>> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

pub(crate) fn format_epoch_ms(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

pub(crate) fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decodes a JSON tag-list column; malformed or null columns read as empty.
pub(crate) fn decode_tags(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

pub(crate) fn encode_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        serde_json::to_string(tags).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_ms_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        let encoded = format_epoch_ms(at);
        assert_eq!(parse_epoch_ms(&encoded), Some(at));
    }

    #[test]
    fn epoch_ms_rejects_garbage() {
        assert_eq!(parse_epoch_ms("not a number"), None);
        assert_eq!(parse_epoch_ms(""), None);
    }

    #[test]
    fn tags_round_trip() {
        let tags = vec!["rewatch".to_string(), "2024".to_string()];
        let encoded = encode_tags(&tags).unwrap();
        assert_eq!(decode_tags(Some(&encoded)), tags);
        assert!(decode_tags(None).is_empty());
        assert!(decode_tags(Some("not json")).is_empty());
        assert_eq!(encode_tags(&[]), None);
    }
}

//! Conversions from raw filter values to typed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`), `YYYY-MM-DD HH:MM:SS` (UTC) or a
/// bare date (`2024-05-01`, midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// `true`/`false` in any case, or `1`/`0`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-05-01 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-05-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn bool_formats() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}

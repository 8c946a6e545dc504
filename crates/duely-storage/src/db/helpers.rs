//! Database helper functions for safe type conversions.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

use crate::error::{Result, StorageError};

/// Format a timestamp as fixed-width RFC3339 UTC text.
///
/// Every stored timestamp has the same width and offset, so SQLite's string
/// comparison orders them chronologically.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC3339 datetime string from database, returning a rusqlite error on failure.
pub fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Trim a user-supplied label and reject it if nothing is left.
pub fn normalize_label(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorageError::Invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime_round_trips() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let text = format_datetime(dt);
        assert_eq!(text, "2024-05-06T07:08:09.000000Z");
        assert_eq!(parse_datetime(&text).unwrap(), dt);
    }

    #[test]
    fn test_formatted_datetimes_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let later = earlier + chrono::Duration::milliseconds(1500);
        assert!(format_datetime(earlier) < format_datetime(later));
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("name", "  Work ").unwrap(), "Work");
        assert!(matches!(
            normalize_label("name", "   "),
            Err(StorageError::Invalid(_))
        ));
    }
}

//! Date helpers

use chrono::{DateTime, Local, Utc};

/// The server-local calendar day, "YYYY-MM-DD". Games roll over at local
/// midnight.
pub fn today() -> String {
    Local::now().date_naive().to_string()
}

/// Format a unix-seconds timestamp as RFC 3339 for API responses
pub fn timestamp_to_rfc3339(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_format() {
        let day = today();
        // YYYY-MM-DD
        assert_eq!(day.len(), 10);
        assert_eq!(day.as_bytes()[4], b'-');
        assert_eq!(day.as_bytes()[7], b'-');
    }

    #[test]
    fn test_timestamp_formatting() {
        let formatted = timestamp_to_rfc3339(0);
        assert!(formatted.starts_with("1970-01-01T00:00:00"));
    }
}

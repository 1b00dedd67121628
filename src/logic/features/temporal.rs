//! Temporal Features
//!
//! Session duration, peak activity hour and weekend ratio from log
//! timestamps. Unparseable timestamps degrade to documented defaults and
//! never fail the extraction.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc, Weekday};

/// Hour used when no timestamp parses
pub const DEFAULT_PEAK_HOUR: f64 = 12.0;

/// Weekend ratio used when no timestamp parses
pub const DEFAULT_WEEKEND_RATIO: f64 = 0.5;

/// Minimum session duration in minutes
pub const MIN_SESSION_MINUTES: f64 = 1.0;

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 (with `Z` or an offset)
/// and naive `YYYY-MM-DDTHH:MM:SS[.fff]` forms.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Parse every timestamp that parses, dropping the rest
pub fn parse_all(timestamps: &[&str]) -> Vec<DateTime<Utc>> {
    timestamps.iter().filter_map(|ts| parse_timestamp(ts)).collect()
}

/// Minutes between the earliest and latest timestamp, floored at
/// [`MIN_SESSION_MINUTES`]. Fewer than two parsed timestamps also floor.
pub fn session_duration_minutes(times: &[DateTime<Utc>]) -> f64 {
    let (min, max) = match (times.iter().min(), times.iter().max()) {
        (Some(min), Some(max)) if times.len() >= 2 => (min, max),
        _ => return MIN_SESSION_MINUTES,
    };

    let minutes = (*max - *min).num_seconds() as f64 / 60.0;
    minutes.max(MIN_SESSION_MINUTES)
}

/// Most frequent hour of day, [`DEFAULT_PEAK_HOUR`] if nothing parsed
pub fn peak_activity_hour(times: &[DateTime<Utc>]) -> f64 {
    if times.is_empty() {
        return DEFAULT_PEAK_HOUR;
    }

    let mut hours: HashMap<u32, u32> = HashMap::new();
    for t in times {
        *hours.entry(t.hour()).or_insert(0) += 1;
    }

    hours
        .into_iter()
        .max_by_key(|&(hour, count)| (count, std::cmp::Reverse(hour)))
        .map(|(hour, _)| hour as f64)
        .unwrap_or(DEFAULT_PEAK_HOUR)
}

/// Fraction of timestamps falling on Saturday/Sunday,
/// [`DEFAULT_WEEKEND_RATIO`] if nothing parsed
pub fn weekend_ratio(times: &[DateTime<Utc>]) -> f64 {
    if times.is_empty() {
        return DEFAULT_WEEKEND_RATIO;
    }

    let weekend = times
        .iter()
        .filter(|t| matches!(t.weekday(), Weekday::Sat | Weekday::Sun))
        .count();

    weekend as f64 / times.len() as f64
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2025-10-06T09:30:00Z").is_some());
        assert!(parse_timestamp("2025-10-06T09:30:00+05:30").is_some());
        assert!(parse_timestamp("2025-10-06T09:30:00").is_some());
        assert!(parse_timestamp("2025-10-06 09:30:00.123").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not-a-time").is_none());
    }

    #[test]
    fn test_session_duration() {
        let times = parse_all(&["2025-10-06T09:00:00Z", "2025-10-06T09:45:00Z"]);
        assert!((session_duration_minutes(&times) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_session_duration_floor() {
        // single timestamp -> floor
        let times = parse_all(&["2025-10-06T09:00:00Z"]);
        assert_eq!(session_duration_minutes(&times), MIN_SESSION_MINUTES);

        // identical timestamps -> floor, no division blowup downstream
        let times = parse_all(&["2025-10-06T09:00:00Z", "2025-10-06T09:00:00Z"]);
        assert_eq!(session_duration_minutes(&times), MIN_SESSION_MINUTES);

        // nothing parseable -> floor
        assert_eq!(session_duration_minutes(&[]), MIN_SESSION_MINUTES);
    }

    #[test]
    fn test_peak_hour() {
        let times = parse_all(&[
            "2025-10-06T14:00:00Z",
            "2025-10-06T14:30:00Z",
            "2025-10-06T09:00:00Z",
        ]);
        assert_eq!(peak_activity_hour(&times), 14.0);
        assert_eq!(peak_activity_hour(&[]), DEFAULT_PEAK_HOUR);
    }

    #[test]
    fn test_weekend_ratio() {
        // 2025-10-04 is a Saturday, 2025-10-06 a Monday
        let times = parse_all(&["2025-10-04T10:00:00Z", "2025-10-06T10:00:00Z"]);
        assert!((weekend_ratio(&times) - 0.5).abs() < 1e-9);
        assert_eq!(weekend_ratio(&[]), DEFAULT_WEEKEND_RATIO);
    }
}

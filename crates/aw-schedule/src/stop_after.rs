//! `stop-after:` resolution (spec §4.5): absolute dates or relative deltas
//! (`+25h`, `+7d`), evaluated once at compile time into an absolute UTC
//! instant.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::ScheduleError;

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+(\d+)([hd])$").expect("valid regex"));

/// Resolve a `stop-after:` expression against `now` (the compile-time
/// clock, injected so tests can supply a fixed instant — spec §9 "Injected
/// collaborators").
pub fn resolve_stop_after(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    let raw = raw.trim();

    if let Some(caps) = RELATIVE_RE.captures(raw) {
        let amount: i64 = caps[1].parse().expect("regex guarantees digits");
        let delta = match &caps[2] {
            "h" => Duration::hours(amount),
            "d" => Duration::days(amount),
            _ => unreachable!("regex only matches h/d"),
        };
        return Ok(now + delta);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ScheduleError::InvalidStopAfter(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn relative_hours() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let resolved = resolve_stop_after("+25h", now).unwrap();
        assert_eq!(resolved, now + Duration::hours(25));
    }

    #[test]
    fn relative_days() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let resolved = resolve_stop_after("+7d", now).unwrap();
        assert_eq!(resolved, now + Duration::days(7));
    }

    #[test]
    fn absolute_rfc3339() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let resolved = resolve_stop_after("2026-03-01T00:00:00Z", now).unwrap();
        assert_eq!(resolved.to_rfc3339(), "2026-03-01T00:00:00+00:00");
    }

    #[test]
    fn invalid_expression_errors() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(resolve_stop_after("whenever", now).is_err());
    }
}

//! Fuzzy schedule grammar (spec §4.5): translates human schedule
//! expressions into a deterministic 5-field cron string. The fuzzy
//! placement (minute, and sometimes hour) is a deterministic function of
//! the workflow's file path — never wall-clock or RNG — so two
//! compilations of the same source always agree (spec §8 "Fuzzy schedule
//! stability").

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScheduleError;

static PLAIN_CRON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+\s+\S+\s+\S+\s+\S+\s+\S+$").expect("valid regex")
});

static EVERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^every\s+(\d+)\s*(minutes?|m|hours?|h)$").expect("valid regex"));

static DAILY_AROUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^daily\s+around\s+(\d{1,2}):(\d{2})(?:\s+(utc[+-]?\d*))?$").expect("valid regex")
});

static DAILY_BETWEEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^daily\s+between\s+(\d{1,2}):(\d{2})\s+and\s+(\d{1,2}):(\d{2})(?:\s+(utc[+-]?\d*))?$",
    )
    .expect("valid regex")
});

static WEEKLY_ON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^weekly\s+on\s+(\w+)$").expect("valid regex"));

static WEEKLY_ON_AROUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^weekly\s+on\s+(\w+)\s+around\s+(\d{1,2}):(\d{2})(?:\s+(utc[+-]?\d*))?$")
        .expect("valid regex")
});

/// Resolve a fuzzy schedule expression against the workflow's source path
/// (spec §9: scatter is `sha(workflow-file-path) mod interval`).
pub fn resolve_schedule(raw: &str, workflow_path: &Path) -> Result<String, ScheduleError> {
    let seed = aw_core::hash::content_hash_u64(workflow_path.as_os_str().as_encoded_bytes());
    resolve_with_seed(raw, seed)
}

/// Same as [`resolve_schedule`] but with an explicit scatter seed, for
/// deterministic unit tests.
pub fn resolve_with_seed(raw: &str, seed: u64) -> Result<String, ScheduleError> {
    let raw = raw.trim();

    if PLAIN_CRON_RE.is_match(raw) && raw.split_whitespace().count() == 5 {
        return Ok(raw.to_string());
    }

    if raw.eq_ignore_ascii_case("hourly") {
        let minute = seed % 60;
        return Ok(format!("{minute} * * * *"));
    }
    if raw.eq_ignore_ascii_case("daily") {
        let minute = seed % 60;
        return Ok(format!("{minute} 0 * * *"));
    }
    if raw.eq_ignore_ascii_case("weekly") {
        let minute = seed % 60;
        return Ok(format!("{minute} 0 * * 0"));
    }

    if let Some(caps) = EVERY_RE.captures(raw) {
        let n: u32 = caps[1].parse().expect("regex guarantees digits");
        let unit = caps[2].to_ascii_lowercase();
        if unit.starts_with('m') {
            if n < 5 {
                return Err(ScheduleError::IntervalTooShort(n));
            }
            return Ok(format!("*/{n} * * * *"));
        }
        return Ok(format!("0 */{n} * * *"));
    }

    if let Some(caps) = WEEKLY_ON_RE.captures(raw) {
        let dow = parse_weekday(&caps[1])?;
        let minute = seed % 60;
        return Ok(format!("{minute} 0 * * {dow}"));
    }

    if let Some(caps) = WEEKLY_ON_AROUND_RE.captures(raw) {
        let dow = parse_weekday(&caps[1])?;
        let hour: i64 = caps[2].parse().expect("regex guarantees digits");
        let shift = caps.get(4).map(|m| parse_utc_offset(m.as_str())).transpose()?.unwrap_or(0);
        let utc_hour = shift_hour(hour, shift);
        let minute = seed % 60;
        return Ok(format!("{minute} {utc_hour} * * {dow}"));
    }

    if let Some(caps) = DAILY_AROUND_RE.captures(raw) {
        let hour: i64 = caps[1].parse().expect("regex guarantees digits");
        validate_time(hour, &caps[2])?;
        let shift = caps.get(3).map(|m| parse_utc_offset(m.as_str())).transpose()?.unwrap_or(0);
        let utc_hour = shift_hour(hour, shift);
        let minute = seed % 60;
        return Ok(format!("{minute} {utc_hour} * * *"));
    }

    if let Some(caps) = DAILY_BETWEEN_RE.captures(raw) {
        let hour1: i64 = caps[1].parse().expect("regex guarantees digits");
        let hour2: i64 = caps[3].parse().expect("regex guarantees digits");
        validate_time(hour1, &caps[2])?;
        validate_time(hour2, &caps[4])?;
        let shift = caps.get(5).map(|m| parse_utc_offset(m.as_str())).transpose()?.unwrap_or(0);
        let utc_hour1 = shift_hour(hour1, shift);
        let utc_hour2 = shift_hour(hour2, shift);
        let span = (utc_hour2 - utc_hour1).rem_euclid(24) + 1;
        let hour = (utc_hour1 + ((seed / 60) % span as u64) as i64).rem_euclid(24);
        let minute = seed % 60;
        return Ok(format!("{minute} {hour} * * *"));
    }

    Err(ScheduleError::Unrecognized(raw.to_string()))
}

fn validate_time(hour: i64, minute_str: &str) -> Result<(), ScheduleError> {
    let minute: i64 = minute_str.parse().map_err(|_| ScheduleError::InvalidTimeOfDay(minute_str.to_string()))?;
    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(ScheduleError::InvalidTimeOfDay(format!("{hour}:{minute_str}")));
    }
    Ok(())
}

/// Shift a local hour by a signed UTC offset (`utc-5` means local clock is
/// 5 hours behind UTC, so `utc_hour = local_hour - offset`).
fn shift_hour(local_hour: i64, utc_offset: i64) -> i64 {
    (local_hour - utc_offset).rem_euclid(24)
}

fn parse_utc_offset(raw: &str) -> Result<i64, ScheduleError> {
    let lower = raw.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("utc") else {
        return Err(ScheduleError::InvalidUtcOffset(raw.to_string()));
    };
    if rest.is_empty() {
        return Ok(0);
    }
    rest.parse::<i64>().map_err(|_| ScheduleError::InvalidUtcOffset(raw.to_string()))
}

fn parse_weekday(name: &str) -> Result<u8, ScheduleError> {
    match name.to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Ok(0),
        "monday" | "mon" => Ok(1),
        "tuesday" | "tue" | "tues" => Ok(2),
        "wednesday" | "wed" => Ok(3),
        "thursday" | "thu" | "thurs" => Ok(4),
        "friday" | "fri" => Ok(5),
        "saturday" | "sat" => Ok(6),
        other => Err(ScheduleError::UnknownWeekday(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_cron_passes_through() {
        assert_eq!(resolve_with_seed("0 3 * * *", 12345).unwrap(), "0 3 * * *");
    }

    #[test]
    fn hourly_scatters_minute() {
        let cron = resolve_with_seed("hourly", 125).unwrap();
        assert_eq!(cron, "5 * * * *");
    }

    #[test]
    fn every_5_minutes_is_allowed() {
        assert_eq!(resolve_with_seed("every 5 minutes", 0).unwrap(), "*/5 * * * *");
    }

    #[test]
    fn every_3_minutes_is_rejected() {
        let err = resolve_with_seed("every 3 minutes", 0).unwrap_err();
        assert_eq!(err, ScheduleError::IntervalTooShort(3));
    }

    #[test]
    fn every_6_hours() {
        assert_eq!(resolve_with_seed("every 6h", 0).unwrap(), "0 */6 * * *");
    }

    #[test]
    fn daily_around_with_utc_offset_matches_spec_example() {
        // spec §8 scenario 5: seed (call it H) mod 60 minute, hour 19 for
        // "daily around 14:00 utc-5".
        let cron = resolve_with_seed("daily around 14:00 utc-5", 125).unwrap();
        assert_eq!(cron, "5 19 * * *");
    }

    #[test]
    fn weekly_on_monday() {
        let cron = resolve_with_seed("weekly on monday", 61).unwrap();
        assert_eq!(cron, "1 0 * * 1");
    }

    #[test]
    fn daily_between_stays_in_range() {
        let cron = resolve_with_seed("daily between 9:00 and 11:00", 0).unwrap();
        let parts: Vec<&str> = cron.split_whitespace().collect();
        let hour: i64 = parts[1].parse().unwrap();
        assert!((9..=11).contains(&hour));
    }

    #[test]
    fn determinism_same_seed_same_cron() {
        let a = resolve_with_seed("daily around 14:00 utc-5", 999).unwrap();
        let b = resolve_with_seed("daily around 14:00 utc-5", 999).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unrecognized_expression_errors() {
        assert!(resolve_with_seed("whenever", 0).is_err());
    }

    proptest::proptest! {
        /// Spec §8 "Fuzzy schedule stability": the same expression resolved
        /// against the same seed always scatters to the same cron string,
        /// for any seed and any of the fixed-form expressions.
        #[test]
        fn hourly_is_deterministic_for_any_seed(seed: u64) {
            let a = resolve_with_seed("hourly", seed).unwrap();
            let b = resolve_with_seed("hourly", seed).unwrap();
            proptest::prop_assert_eq!(a, b);
        }

        /// The scattered minute is always a valid cron minute field,
        /// regardless of how large the seed is.
        #[test]
        fn hourly_minute_is_always_in_range(seed: u64) {
            let cron = resolve_with_seed("hourly", seed).unwrap();
            let minute: u64 = cron.split_whitespace().next().unwrap().parse().unwrap();
            proptest::prop_assert!(minute < 60);
        }

        /// "daily between" always scatters into the declared hour span,
        /// whatever seed a workflow's file path happens to hash to.
        #[test]
        fn daily_between_always_stays_in_declared_span(seed: u64) {
            let cron = resolve_with_seed("daily between 9:00 and 11:00", seed).unwrap();
            let parts: Vec<&str> = cron.split_whitespace().collect();
            let hour: i64 = parts[1].parse().unwrap();
            proptest::prop_assert!((9..=11).contains(&hour));
        }
    }
}

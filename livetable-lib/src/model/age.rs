//! Elapsed-age formatting and parsing for time columns.
//!
//! Ages are displayed as compact human durations such as `10s`, `3m`, `19h`
//! or `3y125d`. Sorting and diffing must never compare those strings
//! lexicographically, so [`parse_age`] turns them back into a [`Duration`].

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

/// Cell value shown when a timestamp is missing or unparseable.
pub const UNKNOWN_AGE: &str = "<unknown>";

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const YEAR: u64 = 365 * DAY;

/// Parses a human age like `3y125d`, `2h5m` or `10s`.
///
/// Returns `None` for empty or malformed values such as [`UNKNOWN_AGE`].
pub fn parse_age(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let mut total = 0u64;
    let mut digits = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let n: u64 = digits.parse().ok()?;
        digits.clear();
        let unit = match c {
            'y' => YEAR,
            'd' => DAY,
            'h' => HOUR,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                total = total.checked_add(n / 1000)?;
                continue;
            }
            'm' => MINUTE,
            's' => 1,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(unit)?)?;
    }
    if !digits.is_empty() {
        return None;
    }

    Some(Duration::from_secs(total))
}

/// Formats a duration the way age columns display it.
///
/// Precision drops as the duration grows: seconds under two minutes, minutes
/// and seconds under ten minutes, and so on up to years and days.
pub fn human_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 2 * MINUTE {
        return format!("{secs}s");
    }
    let minutes = secs / MINUTE;
    if minutes < 10 {
        let s = secs % MINUTE;
        if s == 0 {
            return format!("{minutes}m");
        }
        return format!("{minutes}m{s}s");
    }
    if minutes < 3 * 60 {
        return format!("{minutes}m");
    }
    let hours = secs / HOUR;
    if hours < 8 {
        let m = (secs % HOUR) / MINUTE;
        if m == 0 {
            return format!("{hours}h");
        }
        return format!("{hours}h{m}m");
    }
    if hours < 48 {
        return format!("{hours}h");
    }
    let days = secs / DAY;
    if days < 8 {
        let h = (secs % DAY) / HOUR;
        if h == 0 {
            return format!("{days}d");
        }
        return format!("{days}d{h}h");
    }
    if days < 2 * 365 {
        return format!("{days}d");
    }
    let years = secs / YEAR;
    if years < 8 {
        let d = (secs % YEAR) / DAY;
        if d == 0 {
            return format!("{years}y");
        }
        return format!("{years}y{d}d");
    }
    format!("{years}y")
}

/// Returns the age of `timestamp` relative to now.
pub fn to_age(timestamp: DateTime<Utc>) -> String {
    let elapsed = (Utc::now() - timestamp).to_std().unwrap_or(Duration::ZERO);
    human_duration(elapsed)
}

/// Column decorator turning RFC 3339 timestamps into ages.
///
/// Values that already look like ages, or are not timestamps at all, are
/// passed through untouched.
pub fn age_decorator(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => to_age(ts.with_timezone(&Utc)),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("10s"), Some(Duration::from_secs(10)));
        assert_eq!(parse_age("3m"), Some(Duration::from_secs(180)));
        assert_eq!(parse_age("19h"), Some(Duration::from_secs(19 * HOUR)));
        assert_eq!(
            parse_age("3y125d"),
            Some(Duration::from_secs(3 * YEAR + 125 * DAY))
        );
        assert_eq!(parse_age("1500ms"), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_parse_age_rejects_garbage() {
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age(UNKNOWN_AGE), None);
        assert_eq!(parse_age("12"), None);
        assert_eq!(parse_age("h"), None);
        assert_eq!(parse_age("3w"), None);
    }

    #[test]
    fn test_ages_order_by_duration() {
        let mut ages = vec!["3y125d", "10s", "2y12d", "19h", "3m"];
        ages.sort_by_key(|a| parse_age(a));
        assert_eq!(ages, vec!["10s", "3m", "19h", "2y12d", "3y125d"]);
    }

    #[test]
    fn test_human_duration() {
        assert_eq!(human_duration(Duration::from_secs(10)), "10s");
        assert_eq!(human_duration(Duration::from_secs(190)), "3m10s");
        assert_eq!(human_duration(Duration::from_secs(30 * MINUTE)), "30m");
        assert_eq!(human_duration(Duration::from_secs(5 * HOUR)), "5h");
        assert_eq!(human_duration(Duration::from_secs(19 * HOUR)), "19h");
        assert_eq!(human_duration(Duration::from_secs(3 * DAY + HOUR)), "3d1h");
        assert_eq!(
            human_duration(Duration::from_secs(3 * YEAR + 125 * DAY)),
            "3y125d"
        );
    }

    #[test]
    fn test_human_duration_round_trips_through_parse() {
        for secs in [5, 150, 4000, 20 * HOUR, 9 * DAY, 3 * YEAR + 7 * DAY] {
            let shown = human_duration(Duration::from_secs(secs));
            assert!(parse_age(&shown).is_some(), "{shown} should parse");
        }
    }

    #[test]
    fn test_age_decorator_passthrough() {
        assert_eq!(age_decorator("3m"), "3m");
        assert_eq!(age_decorator(UNKNOWN_AGE), UNKNOWN_AGE);
    }
}

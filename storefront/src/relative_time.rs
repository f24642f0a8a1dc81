//! Humanized relative time ("3 days ago", "in an hour").
//!
//! Every unit is rounded independently from the absolute distance and the
//! first matching threshold wins, so 44 seconds is "a few seconds" while 45
//! seconds is already "a minute".

use chrono::{DateTime, Utc};

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;
/// Average month length in days (400-year Gregorian cycle).
const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;

/// Half-up rounding on non-negative values.
fn round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Distance phrase without direction ("a few seconds", "3 days")
#[must_use]
#[allow(clippy::cast_precision_loss)] // millisecond spans far below 2^52
pub fn humanize(millis: i64) -> String {
    let ms = millis.unsigned_abs() as f64;

    let seconds = round(ms / MS_PER_SECOND);
    let minutes = round(ms / MS_PER_MINUTE);
    let hours = round(ms / MS_PER_HOUR);
    let days = round(ms / MS_PER_DAY);
    let months = round(ms / MS_PER_DAY / DAYS_PER_MONTH);
    let years = round(ms / MS_PER_DAY / DAYS_PER_MONTH / 12.0);

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

/// Relative phrase for `then` as seen from `now`
///
/// Instants at or before `now` read "… ago"; later ones read "in …".
#[must_use]
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = then.signed_duration_since(now).num_milliseconds();
    let phrase = humanize(delta);
    if delta > 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storefront_testing::test_clock;
    use storefront_core::environment::Clock;

    fn ago(delta: Duration) -> String {
        let now = test_clock().now();
        from_now(now - delta, now)
    }

    #[test]
    fn seconds_and_minutes() {
        assert_eq!(ago(Duration::zero()), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(44)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(45)), "a minute ago");
        assert_eq!(ago(Duration::seconds(89)), "a minute ago");
        assert_eq!(ago(Duration::seconds(90)), "2 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
    }

    #[test]
    fn hours_and_days() {
        assert_eq!(ago(Duration::minutes(45)), "an hour ago");
        assert_eq!(ago(Duration::minutes(89)), "an hour ago");
        assert_eq!(ago(Duration::minutes(90)), "2 hours ago");
        assert_eq!(ago(Duration::hours(21)), "21 hours ago");
        assert_eq!(ago(Duration::hours(22)), "a day ago");
        assert_eq!(ago(Duration::hours(35)), "a day ago");
        assert_eq!(ago(Duration::hours(36)), "2 days ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(25)), "25 days ago");
    }

    #[test]
    fn months_and_years() {
        assert_eq!(ago(Duration::days(26)), "a month ago");
        assert_eq!(ago(Duration::days(45)), "a month ago");
        assert_eq!(ago(Duration::days(46)), "2 months ago");
        assert_eq!(ago(Duration::days(300)), "10 months ago");
        assert_eq!(ago(Duration::days(320)), "a year ago");
        assert_eq!(ago(Duration::days(547)), "a year ago");
        assert_eq!(ago(Duration::days(548)), "2 years ago");
        assert_eq!(ago(Duration::days(3650)), "10 years ago");
    }

    #[test]
    fn future_instants_read_forward() {
        let now = test_clock().now();
        assert_eq!(from_now(now + Duration::hours(3), now), "in 3 hours");
        assert_eq!(from_now(now + Duration::seconds(10), now), "in a few seconds");
    }
}

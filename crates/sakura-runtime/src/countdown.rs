//! Countdown to the event

use chrono::{DateTime, FixedOffset, Utc};
use sakura_core::{Result, SakuraError};
use std::fmt;

/// 6:00 PM IST on the day of the event
pub const DEFAULT_TARGET: &str = "2026-12-12T18:00:00+05:30";

/// Whole days, hours, minutes, and seconds left
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Remaining {
    /// `DD:HH:MM:SS`, each field zero-padded to two digits
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    target: DateTime<FixedOffset>,
}

impl Default for Countdown {
    fn default() -> Self {
        // DEFAULT_TARGET is a valid RFC 3339 literal
        Self::parse(DEFAULT_TARGET).unwrap_or_else(|_| Self {
            target: DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
        })
    }
}

impl Countdown {
    pub fn new(target: DateTime<FixedOffset>) -> Self {
        Self { target }
    }

    /// Parse an RFC 3339 timestamp such as `2026-12-12T18:00:00+05:30`
    pub fn parse(target: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(target.trim())
            .map(Self::new)
            .map_err(|e| SakuraError::CountdownError(format!("'{target}': {e}")))
    }

    pub fn target(&self) -> DateTime<FixedOffset> {
        self.target
    }

    /// Time left at `now`; all zero once the target has passed
    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        let total_ms = (self.target.with_timezone(&Utc) - now).num_milliseconds();
        if total_ms <= 0 {
            return Remaining::default();
        }
        let total_secs = total_ms / 1000;
        Remaining {
            days: total_secs / 86_400,
            hours: (total_secs / 3_600) % 24,
            minutes: (total_secs / 60) % 60,
            seconds: total_secs % 60,
        }
    }

    pub fn remaining_now(&self) -> Remaining {
        self.remaining(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn default_target_parses() {
        let countdown = Countdown::default();
        assert_eq!(countdown.target().to_rfc3339(), "2026-12-12T18:00:00+05:30");
    }

    #[test]
    fn splits_into_fields() {
        let countdown = Countdown::default();
        // Target is 12:30:00Z; one day, two hours, three minutes, four seconds earlier
        let now = utc("2026-12-11T10:26:56Z");
        let left = countdown.remaining(now);
        assert_eq!(
            left,
            Remaining {
                days: 1,
                hours: 2,
                minutes: 3,
                seconds: 4
            }
        );
        assert_eq!(left.to_string(), "01:02:03:04");
    }

    #[test]
    fn days_may_exceed_two_digits() {
        let countdown = Countdown::default();
        let left = countdown.remaining(utc("2026-01-01T00:00:00Z"));
        assert!(left.days >= 100);
        assert!(left.to_string().starts_with(&left.days.to_string()));
    }

    #[test]
    fn zero_after_target() {
        let countdown = Countdown::default();
        assert!(countdown.remaining(utc("2026-12-12T12:30:00Z")).is_zero());
        assert!(countdown.remaining(utc("2030-01-01T00:00:00Z")).is_zero());
        assert_eq!(Remaining::default().to_string(), "00:00:00:00");
    }

    #[test]
    fn sub_second_remainder_truncates() {
        let countdown = Countdown::parse("2026-12-12T12:30:00Z").unwrap();
        let now = utc("2026-12-12T12:29:59.400Z");
        assert_eq!(countdown.remaining(now).seconds, 0);
        assert!(countdown.remaining(now).is_zero());
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!(matches!(
            Countdown::parse("next tuesday"),
            Err(SakuraError::CountdownError(_))
        ));
    }
}

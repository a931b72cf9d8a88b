//! TTL Module
//!
//! Time-to-live values, given either as seconds or as a calendar interval,
//! and their normalization to whole seconds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde_json::Value;

use crate::error::{CacheError, Result};

// == TTL ==
/// How long an entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// A fixed number of seconds; 0 means no expiry
    Seconds(i64),
    /// A calendar interval, resolved against the current time
    Interval(Interval),
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::Seconds(0)
    }
}

impl From<i64> for Ttl {
    fn from(seconds: i64) -> Self {
        Ttl::Seconds(seconds)
    }
}

impl From<Interval> for Ttl {
    fn from(interval: Interval) -> Self {
        Ttl::Interval(interval)
    }
}

impl FromStr for Ttl {
    type Err = CacheError;

    /// Accepts an integer number of seconds or an ISO-8601 duration.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(seconds) => Ok(Ttl::Seconds(seconds)),
            Err(_) => s.parse::<Interval>().map(Ttl::Interval),
        }
    }
}

impl TryFrom<&Value> for Ttl {
    type Error = CacheError;

    /// Accepts a JSON integer, or a string in any form `parse` accepts.
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Ttl::Seconds).ok_or_else(|| {
                CacheError::InvalidTtl(format!("{n} is not a whole number of seconds"))
            }),
            Value::String(text) => text.parse(),
            other => Err(CacheError::InvalidTtl(format!(
                "{other} is neither seconds nor an interval"
            ))),
        }
    }
}

// == Normalize ==
/// Converts a TTL to whole seconds, resolving intervals against now.
pub fn normalize(ttl: &Ttl) -> Result<i64> {
    normalize_at(ttl, Utc::now())
}

/// Converts a TTL to whole seconds, resolving intervals against `now`.
///
/// Months and years are added on the calendar, so "P1M" from the 1st of
/// February is 28 or 29 days.
pub fn normalize_at(ttl: &Ttl, now: DateTime<Utc>) -> Result<i64> {
    match ttl {
        Ttl::Seconds(seconds) => Ok(*seconds),
        Ttl::Interval(interval) => interval.seconds_from(now),
    }
}

// == Interval ==
/// Calendar interval, in the shape of an ISO-8601 duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interval {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Interval {
    /// An interval of whole days.
    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    /// An interval of whole months.
    pub fn months(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    /// Number of seconds between `start` and `start + self`.
    pub fn seconds_from(&self, start: DateTime<Utc>) -> Result<i64> {
        let overflow = || CacheError::InvalidTtl(format!("Interval {self} is out of range"));

        let months = self
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .ok_or_else(overflow)?;

        let clock = i64::from(self.days) * 86_400
            + i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);

        let end = start
            .checked_add_months(Months::new(months))
            .and_then(|t| t.checked_add_signed(TimeDelta::try_seconds(clock)?))
            .ok_or_else(overflow)?;

        Ok((end - start).num_seconds())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        for (amount, unit) in [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')] {
            if amount > 0 {
                write!(f, "{amount}{unit}")?;
            }
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            write!(f, "T")?;
            for (amount, unit) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
                if amount > 0 {
                    write!(f, "{amount}{unit}")?;
                }
            }
        } else if self.years == 0 && self.months == 0 && self.days == 0 {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

impl FromStr for Interval {
    type Err = CacheError;

    /// Parses `PnYnMnDTnHnMnS` or `PnW` ISO-8601 durations.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CacheError::InvalidTtl(format!("\"{s}\" is not a valid interval"));

        let body = s.strip_prefix('P').ok_or_else(invalid)?;
        let (date, time) = match body.split_once('T') {
            Some((_, "")) => return Err(invalid()),
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };
        if date.is_empty() && time.is_none() {
            return Err(invalid());
        }

        let mut interval = Interval::default();
        for (amount, unit) in components(date).ok_or_else(invalid)? {
            let slot = match unit {
                'Y' => &mut interval.years,
                'M' => &mut interval.months,
                'W' => {
                    interval.days = amount.checked_mul(7).ok_or_else(invalid)?;
                    continue;
                }
                'D' => &mut interval.days,
                _ => return Err(invalid()),
            };
            *slot = amount;
        }
        for (amount, unit) in components(time.unwrap_or("")).ok_or_else(invalid)? {
            let slot = match unit {
                'H' => &mut interval.hours,
                'M' => &mut interval.minutes,
                'S' => &mut interval.seconds,
                _ => return Err(invalid()),
            };
            *slot = amount;
        }

        Ok(interval)
    }
}

/// Splits `1Y2M` into `[(1, 'Y'), (2, 'M')]`.
fn components(s: &str) -> Option<Vec<(u32, char)>> {
    let mut parts = Vec::new();
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            parts.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }
    digits.is_empty().then_some(parts)
}

//! Recurrence rules and next-date calculation.
//!
//! | Rule    | Behaviour                                             |
//! |---------|-------------------------------------------------------|
//! | `d <n>` | Every `n` days, `1 <= n <= 400`                        |
//! | `y`     | Every year on the same month/day (Feb 29 → Mar 1)      |

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use todo_core::{format_date, parse_date};

use crate::error::{RepeatError, RepeatResult};

pub const MAX_INTERVAL_DAYS: u32 = 400;

/// A parsed recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatRule {
    /// Fixed interval of whole days.
    Days(u32),
    /// Same month/day, one calendar year later.
    Yearly,
}

impl FromStr for RepeatRule {
    type Err = RepeatError;

    fn from_str(rule: &str) -> RepeatResult<Self> {
        if rule.is_empty() {
            return Err(RepeatError::EmptyRule);
        }

        // Single-space split: "d  5" has an empty middle token and is malformed.
        let tokens: Vec<&str> = rule.split(' ').collect();
        match tokens[0] {
            "d" => {
                let [_, n] = tokens.as_slice() else {
                    return Err(RepeatError::MalformedRule(rule.to_string()));
                };
                match n.parse::<i64>() {
                    Ok(days) if (1..=MAX_INTERVAL_DAYS as i64).contains(&days) => {
                        Ok(RepeatRule::Days(days as u32))
                    }
                    _ => Err(RepeatError::InvalidInterval(n.to_string())),
                }
            }
            "y" if tokens.len() == 1 => Ok(RepeatRule::Yearly),
            "y" => Err(RepeatError::MalformedRule(rule.to_string())),
            _ => Err(RepeatError::UnsupportedRule(rule.to_string())),
        }
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatRule::Days(n) => write!(f, "d {n}"),
            RepeatRule::Yearly => write!(f, "y"),
        }
    }
}

impl RepeatRule {
    /// One interval after `date`, or `None` past the end of the calendar.
    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            RepeatRule::Days(n) => date.checked_add_days(Days::new(u64::from(n))),
            RepeatRule::Yearly => {
                let year = date.year().checked_add(1)?;
                NaiveDate::from_ymd_opt(year, date.month(), date.day())
                    // Only Feb 29 can miss; it rolls over to Mar 1.
                    .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            }
        }
    }

    /// First occurrence strictly after `now`, stepping from `start`.
    ///
    /// Always steps at least once, so the result is later than `start` even
    /// when `start` is already in the future.
    pub fn next_after(self, now: NaiveDate, start: NaiveDate) -> RepeatResult<NaiveDate> {
        let mut date = start;
        loop {
            date = self
                .step(date)
                .ok_or_else(|| RepeatError::InvalidDate(format_date(date)))?;
            if date > now {
                return Ok(date);
            }
        }
    }
}

/// Next date for `repeat`, starting at `date` (`YYYYMMDD`) relative to `now`.
///
/// Returns the result formatted as `YYYYMMDD`.
pub fn next_date(now: NaiveDate, date: &str, repeat: &str) -> RepeatResult<String> {
    let start = parse_date(date).ok_or_else(|| RepeatError::InvalidDate(date.to_string()))?;
    let rule: RepeatRule = repeat.parse()?;
    rule.next_after(now, start).map(format_date)
}

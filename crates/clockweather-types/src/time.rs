//! Calendar, time-of-day, and shift types.
//!
//! [`ClockState`] is the only temporal cursor in the engine. The shift is
//! always derived from its time and never stored alongside it.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A calendar day, keyed and serialized as `YYYY-MM-DD`.
pub type CalendarDate = NaiveDate;

/// Number of shifts in one day.
pub const SHIFTS_PER_DAY: u8 = 6;

/// Length of one shift in minutes.
pub const MINUTES_PER_SHIFT: u16 = 240;

/// Minutes in a full day.
pub const MINUTES_PER_DAY: u16 = 1440;

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// Errors produced when parsing or building a [`TimeOfDay`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTimeError {
    /// The string is not of the form `HH:MM`.
    #[error("malformed time {input:?}: expected HH:MM")]
    Format {
        /// The rejected input.
        input: String,
    },

    /// Hour or minute is outside the 24-hour clock.
    #[error("time {hour}:{minute:02} out of range (hour 0-23, minute 0-59)")]
    OutOfRange {
        /// The parsed hour.
        hour: u8,
        /// The parsed minute.
        minute: u8,
    },
}

/// A 24-hour wall-clock time with minute granularity.
///
/// Hours are always in `0..=23` and minutes in `0..=59`; the constructors
/// reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// `00:00`.
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Build a time from its components.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTimeError::OutOfRange`] if `hour > 23` or `minute > 59`.
    pub const fn new(hour: u8, minute: u8) -> Result<Self, ParseTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ParseTimeError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Hour component, `0..=23`.
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Minute component, `0..=59`.
    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight, `0..1440`.
    pub fn minutes_since_midnight(self) -> u16 {
        u16::from(self.hour)
            .saturating_mul(60)
            .saturating_add(u16::from(self.minute))
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParseTimeError::Format {
            input: s.to_owned(),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(format_err)?;
        let hour = parse_component(h).ok_or_else(format_err)?;
        let minute = parse_component(m).ok_or_else(format_err)?;
        Self::new(hour, minute)
    }
}

/// Parse one or two ASCII digits.
fn parse_component(raw: &str) -> Option<u8> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Shift
// ---------------------------------------------------------------------------

/// Returned when a shift number falls outside `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("shift {0} out of range (expected 1-6)")]
pub struct InvalidShift(pub u8);

/// One of the six four-hour blocks of a day, numbered from 1 at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Shift(u8);

impl Shift {
    /// 00:00 - 03:59.
    pub const FIRST: Self = Self(1);
    /// 20:00 - 23:59.
    pub const LAST: Self = Self(SHIFTS_PER_DAY);
    /// All shifts in day order.
    pub const ALL: [Self; 6] = [Self(1), Self(2), Self(3), Self(4), Self(5), Self(6)];

    /// Validate a 1-based shift number.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidShift`] for values outside `1..=6`.
    pub const fn new(number: u8) -> Result<Self, InvalidShift> {
        if number == 0 || number > SHIFTS_PER_DAY {
            return Err(InvalidShift(number));
        }
        Ok(Self(number))
    }

    /// The 1-based shift number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// First minute of the day that belongs to this shift.
    pub fn start_minute(self) -> u16 {
        u16::from(self.0.saturating_sub(1)).saturating_mul(MINUTES_PER_SHIFT)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Shift {
    type Error = InvalidShift;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Shift> for u8 {
    fn from(value: Shift) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// Clock state
// ---------------------------------------------------------------------------

/// The in-world date and time.
///
/// Owned by the surrounding application and passed by value into the
/// engine. Only the clock advancer produces new states from old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClockState {
    /// Current calendar day.
    pub date: CalendarDate,
    /// Current wall-clock time.
    #[ts(type = "string")]
    pub time: TimeOfDay,
}

impl ClockState {
    /// Build a clock state from its parts.
    pub const fn new(date: CalendarDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.time)
    }
}

//! World clock arithmetic for the Clock & Weather engine.
//!
//! The [`ClockState`] is the single source of truth for in-world time. This
//! module derives the shift from it and produces new states from old ones.
//!
//! # Design Principles
//!
//! - The shift is computed from the time of day -- never stored
//!   independently. The clock is the source of truth.
//! - Advancing is total: every `(state, delta)` pair yields a valid state.
//!   Hours wrap with floor semantics, so `-1` o'clock is 23:00 the day
//!   before, not `-1`.
//! - All arithmetic is checked or saturating (no silent overflow). A date
//!   pushed past chrono's representable range pins to its boundary.

use chrono::{Days, NaiveDate};
use clockweather_types::{CalendarDate, ClockState, Shift, TimeOfDay};
use tracing::{debug, warn};

/// Hours in one day.
const HOURS_PER_DAY: i64 = 24;

/// Map a time of day to its shift.
///
/// The day is cut into six 240-minute blocks from midnight:
///
/// | Minutes     | Time          | Shift |
/// |-------------|---------------|-------|
/// | 0 - 239     | 00:00 - 03:59 | 1     |
/// | 240 - 479   | 04:00 - 07:59 | 2     |
/// | 480 - 719   | 08:00 - 11:59 | 3     |
/// | 720 - 959   | 12:00 - 15:59 | 4     |
/// | 960 - 1199  | 16:00 - 19:59 | 5     |
/// | 1200 +      | 20:00 - 23:59 | 6     |
///
/// Every minute in `0..`[`MINUTES_PER_DAY`] maps to exactly one shift.
///
/// [`MINUTES_PER_DAY`]: clockweather_types::MINUTES_PER_DAY
pub fn resolve_shift(time: TimeOfDay) -> Shift {
    let minutes = time.minutes_since_midnight();
    // The last shift has no upper bound.
    Shift::ALL
        .into_iter()
        .rev()
        .find(|shift| minutes >= shift.start_minute())
        .unwrap_or(Shift::FIRST)
}

/// Move the clock by a signed number of whole hours.
///
/// Only the hour changes; minutes are kept. Crossing midnight in either
/// direction moves the date by as many days as were crossed.
pub fn advance(state: ClockState, delta_hours: i64) -> ClockState {
    let raw_hour = i64::from(state.time.hour()).saturating_add(delta_hours);
    let day_offset = raw_hour.checked_div_euclid(HOURS_PER_DAY).unwrap_or(0);
    let hour = raw_hour.checked_rem_euclid(HOURS_PER_DAY).unwrap_or(0);

    // rem_euclid keeps the hour in 0..24, so both conversions succeed.
    let time = u8::try_from(hour)
        .ok()
        .and_then(|h| TimeOfDay::new(h, state.time.minute()).ok())
        .unwrap_or(TimeOfDay::MIDNIGHT);
    let date = offset_date(state.date, day_offset);

    let next = ClockState::new(date, time);
    debug!(from = %state, to = %next, delta_hours, "Clock advanced");
    next
}

/// Shift a date by a signed number of days, saturating at chrono's limits.
pub fn offset_date(date: CalendarDate, days: i64) -> CalendarDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or_else(|| {
        warn!(%date, days, "date out of range, clamping");
        if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN }
    })
}

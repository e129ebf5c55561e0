//! Scene darkness by hour of day.

use clockweather_types::TimeOfDay;

/// Full night.
pub const NIGHT: f64 = 1.0;
/// Dawn twilight.
pub const DAWN: f64 = 0.7;
/// Daylight.
pub const DAY: f64 = 0.0;
/// Evening twilight.
pub const DUSK: f64 = 0.5;

/// Scene darkness for a time of day, from `0.0` (day) to `1.0` (night).
///
/// Only the hour matters:
///
/// | Hours         | Darkness |
/// |---------------|----------|
/// | 22:00 - 03:59 | 1.0      |
/// | 04:00 - 05:59 | 0.7      |
/// | 06:00 - 17:59 | 0.0      |
/// | 18:00 - 21:59 | 0.5      |
pub const fn darkness_for(time: TimeOfDay) -> f64 {
    match time.hour() {
        4..=5 => DAWN,
        6..=17 => DAY,
        18..=21 => DUSK,
        _ => NIGHT,
    }
}

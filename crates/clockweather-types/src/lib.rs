//! Shared type definitions for the Clock & Weather engine.
//!
//! This crate is the single source of truth for the data model shared by
//! the weather table, the derivation pipeline, and the presentation layer.
//! Types flow downstream to `TypeScript` via `ts-rs` so a dashboard can
//! render reports without re-declaring their shape.
//!
//! # Modules
//!
//! - [`time`] -- Calendar date, time of day, shift, and clock state
//! - [`enums`] -- Wind direction, visibility bands, weather conditions, effect kinds
//! - [`structs`] -- Table rows, derived weather, effect descriptors, and reports

pub mod enums;
pub mod structs;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Condition, EFFECT_ID_PREFIX, ENGINE_EFFECT_IDS, EffectKind, UnknownWindDirection,
    VisibilityCategory, WindDirection,
};
pub use structs::{
    Altitude, DayRecord, DerivedWeather, EffectDescriptor, MAX_VISIBILITY_M, Marker, Markers,
    NO_DATA_TAG, WeatherCode, WeatherObservation, WeatherReport,
};
pub use time::{
    CalendarDate, ClockState, InvalidShift, MINUTES_PER_DAY, MINUTES_PER_SHIFT, ParseTimeError,
    SHIFTS_PER_DAY, Shift, TimeOfDay,
};

//! Weather table, metric derivation, and ambient effects for the Clock &
//! Weather engine.
//!
//! Everything downstream of the clock lives here: looking up the authored
//! observation for a (date, shift), deriving display values from it, and
//! turning the result into particle-effect instructions.
//!
//! # Modules
//!
//! - [`table`] -- The immutable [`WeatherTable`] and the swappable
//!   [`TableHandle`] that holds the current one.
//! - [`metrics`] -- Altitude-adjusted temperature, feels-like, visibility
//!   and visibility bands.
//! - [`effects`] -- Weather-to-effect mapping and the [`EffectSink`] seam
//!   for the external renderer.
//! - [`error`] -- Error types for table loading.
//!
//! [`WeatherTable`]: table::WeatherTable
//! [`TableHandle`]: table::TableHandle
//! [`EffectSink`]: effects::EffectSink

pub mod effects;
pub mod error;
pub mod metrics;
pub mod table;

// Re-export primary types at crate root.
pub use effects::{ApplySummary, EffectSink, apply_effects, map_effects, wind_angle};
pub use error::TableError;
pub use metrics::derive_weather;
pub use table::{TableHandle, WeatherTable};

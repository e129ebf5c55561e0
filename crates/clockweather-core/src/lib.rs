//! World clock, configuration, and the weather engine for Clock & Weather.
//!
//! This crate owns in-world time and drives the derivation pipeline from it:
//! clock reading, shift, table lookup, derived metrics, and ambient effects.
//!
//! # Modules
//!
//! - [`clock`] -- Shift resolution and hour-based clock advancement.
//! - [`config`] -- Configuration loading from `clockweather-config.yaml`
//!   into strongly-typed structs.
//! - [`engine`] -- [`WeatherEngine`], which builds a [`WeatherReport`] for
//!   a clock reading and pushes its effects to an [`EffectSink`].
//! - [`lighting`] -- Scene darkness by hour of day.
//!
//! [`WeatherEngine`]: engine::WeatherEngine
//! [`WeatherReport`]: clockweather_types::WeatherReport
//! [`EffectSink`]: clockweather_world::EffectSink

pub mod clock;
pub mod config;
pub mod engine;
pub mod lighting;

pub use clock::{advance, resolve_shift};
pub use config::{ClockweatherConfig, ConfigError};
pub use engine::WeatherEngine;
pub use lighting::darkness_for;

//! The weather engine façade.
//!
//! [`WeatherEngine`] wires the pipeline together for one clock reading:
//!
//! 1. Resolve the shift from the time of day.
//! 2. Look up the authored observation for (date, shift).
//! 3. Derive display metrics at the requested altitude.
//! 4. Map the derived weather to ambient effects.
//! 5. Optionally compute scene darkness.
//!
//! The engine holds no clock. Callers own the [`ClockState`] and hand it in
//! on every call, so the clock stays the single source of truth.

use std::sync::Arc;

use clockweather_types::{
    Altitude, CalendarDate, ClockState, DerivedWeather, Shift, WeatherReport,
};
use clockweather_world::{
    ApplySummary, EffectSink, TableHandle, WeatherTable, apply_effects, derive_weather,
    map_effects,
};
use tracing::{debug, info};

use crate::clock::resolve_shift;
use crate::config::{ClockConfig, fallback_start_date};
use crate::lighting::darkness_for;

/// Derives weather reports from a swappable weather table.
#[derive(Debug, Default)]
pub struct WeatherEngine {
    table: TableHandle,
    ambient_light: bool,
}

impl WeatherEngine {
    /// Build an engine over `table` with ambient light control off.
    pub fn new(table: WeatherTable) -> Self {
        info!(
            dates = table.date_count(),
            observations = table.observation_count(),
            "Weather engine ready"
        );
        Self {
            table: TableHandle::new(table),
            ambient_light: false,
        }
    }

    /// Enable or disable the darkness field on reports.
    #[must_use]
    pub const fn with_ambient_light(mut self, enabled: bool) -> Self {
        self.ambient_light = enabled;
        self
    }

    /// The table currently in use.
    pub fn table(&self) -> Arc<WeatherTable> {
        self.table.snapshot()
    }

    /// Swap in a freshly loaded table. In-flight reports keep the old one.
    pub fn reload(&self, table: WeatherTable) {
        let _previous = self.table.replace(table);
    }

    /// Derived weather for `clock` at `altitude`, or the no-data state.
    pub fn derive(&self, clock: ClockState, altitude: Altitude) -> DerivedWeather {
        self.derive_at(clock.date, resolve_shift(clock.time), altitude)
    }

    fn derive_at(&self, date: CalendarDate, shift: Shift, altitude: Altitude) -> DerivedWeather {
        let table = self.table.snapshot();
        derive_weather(table.lookup(date, shift), altitude)
    }

    /// Full report for one clock reading.
    pub fn report(&self, clock: ClockState, altitude: Altitude) -> WeatherReport {
        let shift = resolve_shift(clock.time);
        let weather = self.derive_at(clock.date, shift, altitude);
        let effects = map_effects(&weather);
        let darkness = self.ambient_light.then(|| darkness_for(clock.time));

        debug!(
            %clock,
            %shift,
            %altitude,
            code = %weather.weather_code,
            has_data = weather.has_data,
            effects = effects.len(),
            "Weather report built"
        );

        WeatherReport {
            clock,
            shift,
            altitude,
            weather,
            effects,
            darkness,
        }
    }

    /// Clock to start from when no saved state exists.
    ///
    /// The configured start date wins, then the earliest date in the table,
    /// then 2014-06-14. The table is keyed by date, so the earliest date is
    /// used even when the document lists a later date first.
    pub fn initial_clock(&self, config: &ClockConfig) -> ClockState {
        let date = config
            .start_date
            .or_else(|| self.table.snapshot().first_date())
            .unwrap_or_else(fallback_start_date);
        ClockState::new(date, config.start_time)
    }

    /// Push a report's effects to the renderer, replacing this engine's
    /// previous effects.
    pub fn refresh_effects<S: EffectSink>(sink: &mut S, report: &WeatherReport) -> ApplySummary {
        apply_effects(sink, &report.effects)
    }
}

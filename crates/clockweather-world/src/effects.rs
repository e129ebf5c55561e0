//! Mapping from derived weather to ambient particle effects.
//!
//! # Rules
//!
//! Each rule is checked on its own; several may fire for one weather code.
//!
//! | Tag contains      | Emits | Density / speed                                        |
//! |-------------------|-------|--------------------------------------------------------|
//! | `rain`            | rain  | heavy 0.8/2.0, light 0.3/1.0, else 0.5/1.5             |
//! | `snow`            | snow  | blizzard 1.0/2.5, heavy 0.7/1.5, light 0.2/0.5, else 0.4/1.0 |
//! | `fog` or `mist`   | fog   | 0.5/0.3, no direction                                  |
//! | `thunder`         | rain  | 0.9/2.5 (a second rain layer when `rain` also matched) |
//!
//! Rain and snow travel in the direction the wind blows *toward*; see
//! [`wind_angle`].
//!
//! # Applying
//!
//! [`apply_effects`] switches off every identifier in
//! [`ENGINE_EFFECT_IDS`] and then switches on each descriptor under its
//! kind's identifier. Effects placed by anything else are never touched.

use clockweather_types::{
    DerivedWeather, ENGINE_EFFECT_IDS, EffectDescriptor, EffectKind, Marker, WindDirection,
};
use tracing::{debug, info, warn};

/// Angle used when the wind direction is unknown: travel left, toward the west edge.
pub const DEFAULT_WIND_ANGLE: u16 = 180;

/// Particle travel angle in degrees for wind blowing *from* `direction`.
///
/// 0° points right, 90° up, 180° left, 270° down on the scene.
pub const fn wind_angle(direction: Option<WindDirection>) -> u16 {
    match direction {
        Some(WindDirection::N) => 270,
        Some(WindDirection::NE) => 315,
        Some(WindDirection::E) => 0,
        Some(WindDirection::SE) => 45,
        Some(WindDirection::S) => 90,
        Some(WindDirection::SW) => 135,
        Some(WindDirection::W) | None => DEFAULT_WIND_ANGLE,
        Some(WindDirection::NW) => 225,
    }
}

const fn directed(kind: EffectKind, density: f64, speed: f64, angle: u16) -> EffectDescriptor {
    EffectDescriptor {
        kind,
        density,
        speed,
        direction: Some(angle),
    }
}

/// Effects for one weather state, in rule order.
///
/// Deterministic: the same weather always yields the same list. The
/// missing-data state yields no effects.
pub fn map_effects(weather: &DerivedWeather) -> Vec<EffectDescriptor> {
    let code = &weather.weather_code;
    let angle = wind_angle(weather.wind_direction);
    let mut effects = Vec::new();

    if code.has(Marker::Rain) {
        let (density, speed) = if code.has(Marker::Heavy) {
            (0.8, 2.0)
        } else if code.has(Marker::Light) {
            (0.3, 1.0)
        } else {
            (0.5, 1.5)
        };
        effects.push(directed(EffectKind::Rain, density, speed, angle));
    }

    if code.has(Marker::Snow) {
        let (density, speed) = if code.has(Marker::Blizzard) {
            (1.0, 2.5)
        } else if code.has(Marker::Heavy) {
            (0.7, 1.5)
        } else if code.has(Marker::Light) {
            (0.2, 0.5)
        } else {
            (0.4, 1.0)
        };
        effects.push(directed(EffectKind::Snow, density, speed, angle));
    }

    if code.has(Marker::Fog) {
        effects.push(EffectDescriptor {
            kind: EffectKind::Fog,
            density: 0.5,
            speed: 0.3,
            direction: None,
        });
    }

    // Thunder is drawn as an extra, heavier rain layer.
    if code.has(Marker::Thunder) {
        effects.push(directed(EffectKind::Rain, 0.9, 2.5, angle));
    }

    debug!(code = %code, count = effects.len(), "Mapped weather to effects");
    effects
}

/// External particle renderer.
///
/// Implementations only ever receive identifiers from
/// [`ENGINE_EFFECT_IDS`].
pub trait EffectSink {
    /// Error reported by the renderer.
    type Error: std::fmt::Display;

    /// Stop the effect registered under `effect_id`, if running.
    fn switch_off(&mut self, effect_id: &str) -> Result<(), Self::Error>;

    /// Start (or restart) `effect` under `effect_id`.
    fn switch_on(&mut self, effect_id: &str, effect: &EffectDescriptor)
    -> Result<(), Self::Error>;
}

/// Outcome of one [`apply_effects`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Engine identifiers switched off.
    pub cleared: usize,
    /// Descriptors switched on.
    pub applied: usize,
    /// Sink calls that failed.
    pub failed: usize,
}

/// Replace this engine's effects on `sink` with `effects`.
///
/// Failures are logged and counted; one failing call never stops the rest.
pub fn apply_effects<S: EffectSink>(sink: &mut S, effects: &[EffectDescriptor]) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for effect_id in ENGINE_EFFECT_IDS {
        match sink.switch_off(effect_id) {
            Ok(()) => summary.cleared = summary.cleared.saturating_add(1),
            Err(err) => {
                warn!(effect_id, error = %err, "failed to clear effect");
                summary.failed = summary.failed.saturating_add(1);
            }
        }
    }

    for effect in effects {
        let effect_id = effect.kind.effect_id();
        match sink.switch_on(effect_id, effect) {
            Ok(()) => summary.applied = summary.applied.saturating_add(1),
            Err(err) => {
                warn!(effect_id, error = %err, "failed to apply effect");
                summary.failed = summary.failed.saturating_add(1);
            }
        }
    }

    info!(
        cleared = summary.cleared,
        applied = summary.applied,
        failed = summary.failed,
        "Ambient effects updated"
    );
    summary
}

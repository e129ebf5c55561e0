//! Core record types: table observations, derived weather, and effect
//! descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    Condition, EffectKind, VisibilityCategory, WindDirection, deserialize_lenient_direction,
};
use crate::time::{ClockState, Shift};

/// Tag carried by [`DerivedWeather::no_data`] in place of a weather code.
pub const NO_DATA_TAG: &str = "no_data";

/// Visibility reported when no observation is available, in meters.
pub const MAX_VISIBILITY_M: u32 = 10_000;

// ---------------------------------------------------------------------------
// Weather code
// ---------------------------------------------------------------------------

/// A word that may appear inside a weather tag and drives effect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Tag contains `rain`.
    Rain,
    /// Tag contains `snow`.
    Snow,
    /// Tag contains `fog` or `mist`.
    Fog,
    /// Tag contains `thunder`.
    Thunder,
    /// Tag contains `heavy`.
    Heavy,
    /// Tag contains `light`.
    Light,
    /// Tag contains `blizzard`.
    Blizzard,
}

impl Marker {
    const fn bit(self) -> u8 {
        match self {
            Self::Rain => 0b000_0001,
            Self::Snow => 0b000_0010,
            Self::Fog => 0b000_0100,
            Self::Thunder => 0b000_1000,
            Self::Heavy => 0b001_0000,
            Self::Light => 0b010_0000,
            Self::Blizzard => 0b100_0000,
        }
    }
}

/// Set of [`Marker`]s found in a tag, computed once when the tag is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Markers(u8);

impl Markers {
    /// Scan a tag for every marker word.
    pub fn scan(tag: &str) -> Self {
        let found = [
            (Marker::Rain, tag.contains("rain")),
            (Marker::Snow, tag.contains("snow")),
            (Marker::Fog, tag.contains("fog") || tag.contains("mist")),
            (Marker::Thunder, tag.contains("thunder")),
            (Marker::Heavy, tag.contains("heavy")),
            (Marker::Light, tag.contains("light")),
            (Marker::Blizzard, tag.contains("blizzard")),
        ];
        Self(
            found
                .into_iter()
                .filter(|&(_, hit)| hit)
                .fold(0, |acc, (marker, _)| acc | marker.bit()),
        )
    }

    /// Whether `marker` was found in the tag.
    pub const fn contains(self, marker: Marker) -> bool {
        self.0 & marker.bit() != 0
    }

    /// Whether no marker was found.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A weather tag from the table (`"heavy_rain"`, `"clear_sky"`, ...).
///
/// The raw tag is kept verbatim for the presentation layer; the
/// [`Condition`] and [`Markers`] are derived from it once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WeatherCode {
    tag: String,
    condition: Condition,
    markers: Markers,
}

impl WeatherCode {
    /// Classify a raw tag.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let condition = Condition::from_tag(&tag);
        let markers = Markers::scan(&tag);
        Self {
            tag,
            condition,
            markers,
        }
    }

    /// The marker used when no observation exists. Has no condition or markers.
    pub fn no_data() -> Self {
        Self {
            tag: NO_DATA_TAG.to_owned(),
            condition: Condition::Unlisted,
            markers: Markers::default(),
        }
    }

    /// The raw tag as authored in the table.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Exact-tag classification used for base visibility.
    pub const fn condition(&self) -> Condition {
        self.condition
    }

    /// Substring markers used for effect selection.
    pub const fn markers(&self) -> Markers {
        self.markers
    }

    /// Shorthand for `self.markers().contains(marker)`.
    pub const fn has(&self, marker: Marker) -> bool {
        self.markers.contains(marker)
    }
}

impl From<String> for WeatherCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for WeatherCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<WeatherCode> for String {
    fn from(value: WeatherCode) -> Self {
        value.tag
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

// ---------------------------------------------------------------------------
// Altitude
// ---------------------------------------------------------------------------

/// Observer altitude above sea level in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct Altitude(pub u32);

impl Altitude {
    /// Sea level.
    pub const SEA_LEVEL: Self = Self(0);
    /// Highest altitude a user may select.
    pub const MAX: Self = Self(3900);
    /// Granularity of user-selected altitudes.
    pub const STEP_M: u32 = 150;

    /// Altitude in meters.
    pub const fn meters(self) -> u32 {
        self.0
    }

    /// Whether the value lies on the selectable `0..=3900` step-150 grid.
    pub const fn is_selectable(self) -> bool {
        self.0 <= Self::MAX.0 && self.0 % Self::STEP_M == 0
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One authored weather record for a (date, shift) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WeatherObservation {
    /// Which shift of the day this row describes.
    #[ts(type = "number")]
    pub shift: Shift,
    /// Weather tag, e.g. `heavy_snow`.
    #[ts(type = "string")]
    pub weather_code: WeatherCode,
    /// Wind tag, e.g. `gale`. Opaque to the engine.
    #[serde(default)]
    pub wind_code: String,
    /// Where the wind blows from. `None` if absent or unrecognised.
    #[serde(default, deserialize_with = "deserialize_lenient_direction")]
    pub wind_direction: Option<WindDirection>,
    /// Wind speed in m/s.
    #[serde(default)]
    pub windspeed: f64,
    /// Temperature in °C at sea level, before altitude adjustment.
    #[serde(default)]
    pub temp: f64,
}

/// All observations authored for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DayRecord {
    /// Per-shift rows, in any order.
    #[serde(default)]
    pub shifts: Vec<WeatherObservation>,
}

impl DayRecord {
    /// Find the row for `shift`. The first matching row wins.
    pub fn observation(&self, shift: Shift) -> Option<&WeatherObservation> {
        self.shifts.iter().find(|obs| obs.shift == shift)
    }
}

// ---------------------------------------------------------------------------
// Derived weather
// ---------------------------------------------------------------------------

/// Display-ready weather for one observation at one altitude.
///
/// Recomputed on every request; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DerivedWeather {
    /// Weather tag, or `no_data` when the table had no row.
    #[ts(type = "string")]
    pub weather_code: WeatherCode,
    /// Wind tag as authored.
    pub wind_code: String,
    /// Where the wind blows from.
    pub wind_direction: Option<WindDirection>,
    /// Wind speed in m/s.
    pub windspeed: f64,
    /// Altitude-adjusted temperature in °C (integral).
    pub temp: f64,
    /// Perceived temperature in °C (integral).
    pub feels_like: f64,
    /// Visibility distance in meters.
    pub visibility: u32,
    /// Banded visibility.
    pub visibility_category: VisibilityCategory,
    /// `false` only for the missing-data fallback.
    pub has_data: bool,
}

impl DerivedWeather {
    /// The fixed state reported whenever the table has no row for the
    /// requested date and shift. Independent of altitude.
    pub fn no_data() -> Self {
        Self {
            weather_code: WeatherCode::no_data(),
            wind_code: String::new(),
            wind_direction: None,
            windspeed: 0.0,
            temp: 0.0,
            feels_like: 0.0,
            visibility: MAX_VISIBILITY_M,
            visibility_category: VisibilityCategory::Excellent,
            has_data: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// One ambient particle effect for the external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EffectDescriptor {
    /// Effect kind.
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// Particle density in `[0, 1]`.
    pub density: f64,
    /// Particle speed, always positive.
    pub speed: f64,
    /// Travel direction in degrees `[0, 360)`. Absent for fog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u16>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the presentation layer needs for one clock reading.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WeatherReport {
    /// The clock the report was computed for.
    pub clock: ClockState,
    /// Shift derived from the clock's time.
    #[ts(type = "number")]
    pub shift: Shift,
    /// Altitude used for the temperature adjustment.
    pub altitude: Altitude,
    /// Derived weather, or the no-data state.
    pub weather: DerivedWeather,
    /// Ambient effects for the renderer.
    pub effects: Vec<EffectDescriptor>,
    /// Scene darkness in `[0, 1]`, when ambient light control is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darkness: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn markers_follow_substrings() {
        let code = WeatherCode::new("thunderstorm_rain");
        assert!(code.has(Marker::Rain));
        assert!(code.has(Marker::Thunder));
        assert!(!code.has(Marker::Snow));
        assert!(!code.has(Marker::Heavy));

        let code = WeatherCode::new("light_snow");
        assert!(code.has(Marker::Snow));
        assert!(code.has(Marker::Light));

        assert!(WeatherCode::new("mist").has(Marker::Fog));
        assert!(WeatherCode::new("clear_sky").markers().is_empty());
    }

    #[test]
    fn no_data_code_has_no_markers() {
        let code = WeatherCode::no_data();
        assert_eq!(code.tag(), NO_DATA_TAG);
        assert_eq!(code.condition(), Condition::Unlisted);
        assert!(code.markers().is_empty());
    }

    #[test]
    fn observation_reads_table_json() {
        let json = serde_json::json!({
            "shift": 2,
            "weatherCode": "heavy_rain",
            "windCode": "strong_breeze",
            "windDirection": "SW",
            "windspeed": 11.5,
            "temp": 7
        });
        let obs: WeatherObservation = serde_json::from_value(json).unwrap();
        assert_eq!(obs.shift.get(), 2);
        assert_eq!(obs.weather_code.condition(), Condition::HeavyPrecipitation);
        assert_eq!(obs.wind_direction, Some(WindDirection::SW));
        assert_eq!(obs.windspeed, 11.5);
        assert_eq!(obs.temp, 7.0);
    }

    #[test]
    fn observation_tolerates_missing_and_odd_wind_fields() {
        let json = serde_json::json!({
            "shift": 1,
            "weatherCode": "fair",
            "windDirection": "sideways"
        });
        let obs: WeatherObservation = serde_json::from_value(json).unwrap();
        assert_eq!(obs.wind_direction, None);
        assert_eq!(obs.wind_code, "");
        assert_eq!(obs.windspeed, 0.0);

        let json = serde_json::json!({ "shift": 1, "weatherCode": "fair" });
        let obs: WeatherObservation = serde_json::from_value(json).unwrap();
        assert_eq!(obs.wind_direction, None);
    }

    #[test]
    fn observation_treats_non_string_direction_as_unknown() {
        for direction in [
            serde_json::json!(90),
            serde_json::json!(true),
            serde_json::json!({ "deg": 90 }),
            serde_json::json!(["N"]),
            serde_json::Value::Null,
        ] {
            let json = serde_json::json!({
                "shift": 4,
                "weatherCode": "rain",
                "windDirection": direction,
                "windspeed": 3.0
            });
            let obs: WeatherObservation = serde_json::from_value(json).unwrap();
            assert_eq!(obs.wind_direction, None);
            assert_eq!(obs.windspeed, 3.0);
        }
    }

    #[test]
    fn observation_rejects_bad_shift() {
        let json = serde_json::json!({ "shift": 0, "weatherCode": "fair" });
        assert!(serde_json::from_value::<WeatherObservation>(json).is_err());
    }

    #[test]
    fn day_record_finds_first_matching_shift() {
        let json = serde_json::json!({ "shifts": [
            { "shift": 3, "weatherCode": "fog", "temp": 1 },
            { "shift": 3, "weatherCode": "rain", "temp": 2 }
        ]});
        let day: DayRecord = serde_json::from_value(json).unwrap();
        let obs = day.observation(Shift::new(3).unwrap()).unwrap();
        assert_eq!(obs.weather_code.tag(), "fog");
        assert!(day.observation(Shift::FIRST).is_none());
    }

    #[test]
    fn fog_descriptor_omits_direction() {
        let fog = EffectDescriptor {
            kind: EffectKind::Fog,
            density: 0.5,
            speed: 0.3,
            direction: None,
        };
        let json = serde_json::to_value(fog).unwrap();
        assert_eq!(json["type"], "fog");
        assert!(json.get("direction").is_none());
    }

    #[test]
    fn altitude_grid() {
        assert!(Altitude(0).is_selectable());
        assert!(Altitude(3900).is_selectable());
        assert!(!Altitude(4050).is_selectable());
        assert!(!Altitude(100).is_selectable());
    }
}

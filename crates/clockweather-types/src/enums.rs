//! Enumeration types for the Clock & Weather engine.
//!
//! Closed sets of tags that flow from the weather table through the
//! derivation pipeline to the presentation and effect sinks.

use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Wind direction
// ---------------------------------------------------------------------------

/// Compass point the wind is blowing *from*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WindDirection {
    /// North.
    N,
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South.
    S,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

impl WindDirection {
    /// All eight compass points, clockwise from north.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Return the compass abbreviation (`"N"`, `"NE"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the eight compass abbreviations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wind direction: {0:?}")]
pub struct UnknownWindDirection(pub String);

impl FromStr for WindDirection {
    type Err = UnknownWindDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownWindDirection(s.to_owned()))
    }
}

/// Lenient deserializer for optional wind directions in table rows.
///
/// Absent, `null`, empty, unrecognised, or non-string values (numbers,
/// objects) all become `None`.
pub fn deserialize_lenient_direction<'de, D>(
    deserializer: D,
) -> Result<Option<WindDirection>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawDirection> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDirection::Text(s)) => s.parse().ok(),
        Some(RawDirection::Other(_)) | None => None,
    })
}

/// Any JSON value a direction field may hold.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDirection {
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Banded description of a visibility distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VisibilityCategory {
    /// 10 000 m or more.
    Excellent,
    /// 4 000 m up to 10 000 m.
    Good,
    /// 1 000 m up to 4 000 m.
    Moderate,
    /// 200 m up to 1 000 m.
    Poor,
    /// Under 200 m.
    VeryPoor,
}

// ---------------------------------------------------------------------------
// Weather condition (base visibility classes)
// ---------------------------------------------------------------------------

/// Canonical weather condition recognised by exact tag.
///
/// Every tag the visibility table knows about maps to one variant; any
/// other tag is [`Condition::Unlisted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// `clear_sky`, `clear` or `fair`.
    Clear,
    /// `partly_cloudy` or `cloudy`.
    Cloudy,
    /// `overcast`.
    Overcast,
    /// `fog` or `mist`.
    Fog,
    /// `light_rain` or `light_snow`.
    LightPrecipitation,
    /// `rain` or `snow`.
    Precipitation,
    /// `heavy_rain`, `heavy_snow` or `blizzard`.
    HeavyPrecipitation,
    /// `thunderstorm`.
    Thunderstorm,
    /// Any tag not listed above.
    Unlisted,
}

impl Condition {
    /// Classify a raw weather tag. Matching is exact, not by substring.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "clear_sky" | "clear" | "fair" => Self::Clear,
            "partly_cloudy" | "cloudy" => Self::Cloudy,
            "overcast" => Self::Overcast,
            "fog" | "mist" => Self::Fog,
            "light_rain" | "light_snow" => Self::LightPrecipitation,
            "rain" | "snow" => Self::Precipitation,
            "heavy_rain" | "heavy_snow" | "blizzard" => Self::HeavyPrecipitation,
            "thunderstorm" => Self::Thunderstorm,
            _ => Self::Unlisted,
        }
    }
}

// ---------------------------------------------------------------------------
// Ambient effects
// ---------------------------------------------------------------------------

/// Namespace prefix for every effect identifier this engine emits.
pub const EFFECT_ID_PREFIX: &str = "clockweather";

/// Every effect identifier owned by this engine, including reserved ones
/// that no current descriptor uses. Clearing these never touches effects
/// placed by anyone else.
pub const ENGINE_EFFECT_IDS: [&str; 5] = [
    "clockweather-rain",
    "clockweather-snow",
    "clockweather-fog",
    "clockweather-lightning",
    "clockweather-leaves",
];

/// Kind of ambient particle effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Falling rain.
    Rain,
    /// Falling snow.
    Snow,
    /// Drifting fog.
    Fog,
}

impl EffectKind {
    /// Stable renderer identifier for this kind, namespaced to the engine.
    pub const fn effect_id(self) -> &'static str {
        match self {
            Self::Rain => "clockweather-rain",
            Self::Snow => "clockweather-snow",
            Self::Fog => "clockweather-fog",
        }
    }

    /// Renderer type name (`"rain"`, `"snow"`, `"fog"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Fog => "fog",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wind_direction_parses_case_insensitively() {
        assert_eq!("ne".parse::<WindDirection>().unwrap(), WindDirection::NE);
        assert_eq!(" SW ".parse::<WindDirection>().unwrap(), WindDirection::SW);
        assert!("NNE".parse::<WindDirection>().is_err());
        assert!("".parse::<WindDirection>().is_err());
    }

    #[test]
    fn wind_direction_display_round_trips() {
        for dir in WindDirection::ALL {
            assert_eq!(dir.to_string().parse::<WindDirection>().unwrap(), dir);
        }
    }

    #[test]
    fn condition_matches_exact_tags_only() {
        assert_eq!(Condition::from_tag("clear_sky"), Condition::Clear);
        assert_eq!(Condition::from_tag("mist"), Condition::Fog);
        assert_eq!(Condition::from_tag("blizzard"), Condition::HeavyPrecipitation);
        assert_eq!(Condition::from_tag("thunderstorm"), Condition::Thunderstorm);
        // Compound codes are not in the table even though they contain known words.
        assert_eq!(Condition::from_tag("thunderstorm_rain"), Condition::Unlisted);
        assert_eq!(Condition::from_tag("freezing_fog"), Condition::Unlisted);
        assert_eq!(Condition::from_tag("Rain"), Condition::Unlisted);
    }

    #[test]
    fn effect_ids_are_namespaced_and_reserved() {
        for kind in [EffectKind::Rain, EffectKind::Snow, EffectKind::Fog] {
            assert!(kind.effect_id().starts_with(EFFECT_ID_PREFIX));
            assert!(ENGINE_EFFECT_IDS.contains(&kind.effect_id()));
            assert!(kind.effect_id().ends_with(kind.as_str()));
        }
    }

    #[test]
    fn visibility_category_serializes_as_variant_name() {
        let json = serde_json::to_string(&VisibilityCategory::VeryPoor).unwrap();
        assert_eq!(json, "\"VeryPoor\"");
    }
}

//! Derivation of secondary weather metrics from a table observation.
//!
//! Given one [`WeatherObservation`] and the observer's [`Altitude`] this
//! module produces a [`DerivedWeather`]:
//!
//! 1. **Temperature** -- lapse-rate adjusted, about 1 °C per 150 m:
//!    `round(temp - round(altitude / 150))`.
//! 2. **Feels-like** -- an ordered rule list; the first matching rule wins:
//!
//!    | # | Condition                        | Result                    |
//!    |---|----------------------------------|---------------------------|
//!    | 1 | `T <= 10` and wind `> 4.8` m/s   | wind-chill formula        |
//!    | 2 | `T > 27` and wind `< 3` m/s      | `T + 2`                   |
//!    | 3 | wind `> 8` m/s                   | `T - 1`                   |
//!    | 4 | otherwise                        | `T`                       |
//!
//!    Rules 1 and 3 overlap; an input matching both takes rule 1.
//! 3. **Visibility** -- a base distance from the exact weather tag, cut to
//!    70 % when wind exceeds 15 m/s, then rounded to whole meters.
//! 4. **Visibility category** -- banded from the post-wind visibility.
//!
//! All rounding is `f64::round` (half away from zero), so `-2.5` becomes `-3`.

use clockweather_types::{
    Altitude, Condition, DerivedWeather, MAX_VISIBILITY_M, VisibilityCategory, WeatherCode,
    WeatherObservation,
};

/// Meters of altitude per degree of cooling.
pub const LAPSE_RATE_M_PER_DEG: f64 = 150.0;

/// Wind chill applies at or below this temperature (°C).
const WIND_CHILL_MAX_TEMP: f64 = 10.0;
/// Wind chill applies above this wind speed (m/s).
const WIND_CHILL_MIN_WIND: f64 = 4.8;
/// Heat surrogate applies above this temperature (°C).
const HEAT_MIN_TEMP: f64 = 27.0;
/// Heat surrogate applies below this wind speed (m/s).
const HEAT_MAX_WIND: f64 = 3.0;
/// A breeze knocks a degree off above this wind speed (m/s).
const BREEZE_MIN_WIND: f64 = 8.0;
/// Wind above this speed (m/s) reduces visibility.
const VISIBILITY_WIND_LIMIT: f64 = 15.0;
/// Fraction of visibility left in strong wind.
const VISIBILITY_WIND_FACTOR: f64 = 0.7;

/// Round half away from zero, folding `-0.0` into `0.0`.
fn round(value: f64) -> f64 {
    value.round() + 0.0
}

/// Lapse-rate adjusted temperature, rounded to whole degrees.
pub fn adjust_temperature(raw_temp: f64, altitude: Altitude) -> f64 {
    let cooling = round(f64::from(altitude.meters()) / LAPSE_RATE_M_PER_DEG);
    round(raw_temp - cooling)
}

/// Canadian wind-chill index with wind speed converted to km/h.
///
/// Evaluated term by term, without fused multiply-add.
#[allow(clippy::suboptimal_flops)]
fn wind_chill(temp: f64, windspeed: f64) -> f64 {
    let wind_kmh = windspeed * 3.6;
    let wind_term = wind_kmh.powf(0.16);
    13.12 + 0.6215 * temp - 11.37 * wind_term + 0.3965 * temp * wind_term
}

/// Perceived temperature for an adjusted temperature and wind speed.
///
/// Rules are tried in order and the first match wins; see the module docs.
pub fn feels_like(temp: f64, windspeed: f64) -> f64 {
    if temp <= WIND_CHILL_MAX_TEMP && windspeed > WIND_CHILL_MIN_WIND {
        return round(wind_chill(temp, windspeed));
    }
    if temp > HEAT_MIN_TEMP && windspeed < HEAT_MAX_WIND {
        return round(temp + 2.0);
    }
    if windspeed > BREEZE_MIN_WIND {
        return round(temp - 1.0);
    }
    round(temp)
}

/// Base visibility in meters for a weather condition, before wind.
pub const fn base_visibility(condition: Condition) -> u32 {
    match condition {
        Condition::Clear | Condition::Unlisted => MAX_VISIBILITY_M,
        Condition::Cloudy => 8_000,
        Condition::Overcast => 6_000,
        Condition::LightPrecipitation => 4_000,
        Condition::Thunderstorm => 2_000,
        Condition::Precipitation => 1_000,
        Condition::Fog | Condition::HeavyPrecipitation => 200,
    }
}

/// Visibility in whole meters for a weather code and wind speed.
pub fn visibility(code: &WeatherCode, windspeed: f64) -> u32 {
    let mut meters = f64::from(base_visibility(code.condition()));
    if windspeed > VISIBILITY_WIND_LIMIT {
        meters *= VISIBILITY_WIND_FACTOR;
    }
    whole_meters(meters)
}

/// Round a non-negative distance to whole meters.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_meters(meters: f64) -> u32 {
    // Inputs are bounded by MAX_VISIBILITY_M, so the clamp only guards NaN.
    round(meters).clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Band a visibility distance. Thresholds are checked from high to low.
pub const fn visibility_category(visibility: u32) -> VisibilityCategory {
    if visibility >= 10_000 {
        VisibilityCategory::Excellent
    } else if visibility >= 4_000 {
        VisibilityCategory::Good
    } else if visibility >= 1_000 {
        VisibilityCategory::Moderate
    } else if visibility >= 200 {
        VisibilityCategory::Poor
    } else {
        VisibilityCategory::VeryPoor
    }
}

/// Derive display-ready weather from an observation.
///
/// `None` (no row for the requested date and shift) short-circuits to
/// [`DerivedWeather::no_data`] without evaluating any formula, whatever the
/// altitude.
pub fn derive_weather(
    observation: Option<&WeatherObservation>,
    altitude: Altitude,
) -> DerivedWeather {
    let Some(obs) = observation else {
        return DerivedWeather::no_data();
    };

    let temp = adjust_temperature(obs.temp, altitude);
    let feels_like = feels_like(temp, obs.windspeed);
    let visibility = visibility(&obs.weather_code, obs.windspeed);

    DerivedWeather {
        weather_code: obs.weather_code.clone(),
        wind_code: obs.wind_code.clone(),
        wind_direction: obs.wind_direction,
        windspeed: obs.windspeed,
        temp,
        feels_like,
        visibility,
        visibility_category: visibility_category(visibility),
        has_data: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use clockweather_types::{Shift, WindDirection};

    use super::*;

    fn observation(code: &str, windspeed: f64, temp: f64) -> WeatherObservation {
        WeatherObservation {
            shift: Shift::FIRST,
            weather_code: WeatherCode::new(code),
            wind_code: "breeze".to_owned(),
            wind_direction: Some(WindDirection::N),
            windspeed,
            temp,
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round(2.5), 3.0);
        assert_eq!(round(-2.5), -3.0);
        assert_eq!(round(-0.4).to_string(), "0");
    }

    #[test]
    fn temperature_drops_one_degree_per_150m() {
        assert_eq!(adjust_temperature(5.0, Altitude(0)), 5.0);
        assert_eq!(adjust_temperature(5.0, Altitude(300)), 3.0);
        assert_eq!(adjust_temperature(5.0, Altitude(3900)), -21.0);
        // 75 / 150 = 0.5 rounds up to a full degree.
        assert_eq!(adjust_temperature(5.0, Altitude(75)), 4.0);
        // Fractional table temperatures are rounded after the subtraction.
        assert_eq!(adjust_temperature(5.4, Altitude(150)), 4.0);
        assert_eq!(adjust_temperature(-1.5, Altitude(150)), -3.0);
    }

    #[test]
    fn wind_chill_rule() {
        assert_eq!(feels_like(3.0, 10.0), -3.0);
        assert_eq!(feels_like(0.0, 5.0), -5.0);
        assert_eq!(feels_like(-10.0, 12.0), -21.0);
        assert_eq!(feels_like(10.0, 4.9), 8.0);
    }

    #[test]
    fn wind_chill_needs_more_than_4_8_ms() {
        assert_eq!(feels_like(3.0, 4.8), 3.0);
    }

    #[test]
    fn wind_chill_beats_breeze_rule_when_both_match() {
        // 10 °C at 8.5 m/s satisfies rule 1 and rule 3; rule 1 gives 7, rule 3 would give 9.
        assert_eq!(feels_like(10.0, 8.5), 7.0);
    }

    #[test]
    fn heat_rule() {
        assert_eq!(feels_like(28.0, 2.0), 30.0);
        assert_eq!(feels_like(27.0, 2.0), 27.0);
        assert_eq!(feels_like(28.0, 3.0), 28.0);
    }

    #[test]
    fn breeze_rule() {
        assert_eq!(feels_like(15.0, 9.0), 14.0);
        assert_eq!(feels_like(15.0, 8.0), 15.0);
        assert_eq!(feels_like(30.0, 20.0), 29.0);
    }

    #[test]
    fn visibility_by_condition() {
        let cases = [
            ("clear_sky", 10_000),
            ("fair", 10_000),
            ("partly_cloudy", 8_000),
            ("overcast", 6_000),
            ("mist", 200),
            ("light_snow", 4_000),
            ("rain", 1_000),
            ("blizzard", 200),
            ("thunderstorm", 2_000),
            ("thunderstorm_rain", 10_000),
            ("volcanic_ash", 10_000),
        ];
        for (tag, expected) in cases {
            assert_eq!(visibility(&WeatherCode::new(tag), 5.0), expected, "{tag}");
        }
    }

    #[test]
    fn strong_wind_cuts_visibility() {
        assert_eq!(visibility(&WeatherCode::new("clear_sky"), 15.0), 10_000);
        assert_eq!(visibility(&WeatherCode::new("clear_sky"), 15.1), 7_000);
        assert_eq!(visibility(&WeatherCode::new("fog"), 20.0), 140);
        assert_eq!(visibility(&WeatherCode::new("overcast"), 16.0), 4_200);
    }

    #[test]
    fn category_bands() {
        assert_eq!(visibility_category(10_000), VisibilityCategory::Excellent);
        assert_eq!(visibility_category(9_999), VisibilityCategory::Good);
        assert_eq!(visibility_category(4_000), VisibilityCategory::Good);
        assert_eq!(visibility_category(3_999), VisibilityCategory::Moderate);
        assert_eq!(visibility_category(1_000), VisibilityCategory::Moderate);
        assert_eq!(visibility_category(999), VisibilityCategory::Poor);
        assert_eq!(visibility_category(200), VisibilityCategory::Poor);
        assert_eq!(visibility_category(199), VisibilityCategory::VeryPoor);
        assert_eq!(visibility_category(0), VisibilityCategory::VeryPoor);
    }

    #[test]
    fn heavy_rain_at_300m() {
        let obs = observation("heavy_rain", 10.0, 5.0);
        let derived = derive_weather(Some(&obs), Altitude(300));
        assert_eq!(derived.temp, 3.0);
        assert_eq!(derived.feels_like, -3.0);
        assert_eq!(derived.visibility, 200);
        assert_eq!(derived.visibility_category, VisibilityCategory::Poor);
        assert_eq!(derived.wind_direction, Some(WindDirection::N));
        assert!(derived.has_data);
    }

    #[test]
    fn clear_sky_light_wind() {
        let derived = derive_weather(Some(&observation("clear_sky", 5.0, 18.0)), Altitude(0));
        assert_eq!(derived.visibility, 10_000);
        assert_eq!(derived.visibility_category, VisibilityCategory::Excellent);
    }

    #[test]
    fn fog_in_gale() {
        let derived = derive_weather(Some(&observation("fog", 20.0, 12.0)), Altitude(0));
        assert_eq!(derived.visibility, 140);
        assert_eq!(derived.visibility_category, VisibilityCategory::VeryPoor);
    }

    #[test]
    fn missing_observation_ignores_altitude() {
        for meters in [0, 150, 3900] {
            let derived = derive_weather(None, Altitude(meters));
            assert_eq!(derived, DerivedWeather::no_data());
            assert_eq!(derived.temp, 0.0);
            assert_eq!(derived.feels_like, 0.0);
            assert_eq!(derived.windspeed, 0.0);
            assert_eq!(derived.visibility, 10_000);
            assert!(!derived.has_data);
        }
    }
}

//! Command-line front end for the Clock & Weather engine.
//!
//! Every invocation resumes the saved clock, applies one command, saves the
//! clock if it changed, and prints the resulting weather report as JSON on
//! stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `clockweather-config.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing)
//! 4. Load the weather table (empty if missing or unreadable)
//! 5. Resume the saved clock, or start from the configured one
//! 6. Run the command, save, and print the report

mod error;
mod sink;
mod store;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clockweather_core::config::validate_altitude;
use clockweather_core::{ClockweatherConfig, WeatherEngine, advance};
use clockweather_types::{Altitude, TimeOfDay};
use clockweather_world::WeatherTable;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::sink::LogEffectSink;
use crate::store::SavedState;

/// In-world clock and weather for tabletop scenes.
#[derive(Parser, Debug)]
#[command(name = "clockweather")]
#[command(about = "Advance the in-world clock and report the weather", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "clockweather-config.yaml")]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the weather report for the current clock
    Show,
    /// Move the clock by whole hours (negative to go back)
    Advance {
        /// Hours to move
        #[arg(allow_negative_numbers = true)]
        hours: i64,
    },
    /// Jump to a calendar date, keeping the time of day
    SetDate {
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },
    /// Set the time of day, keeping the date
    SetTime {
        /// Time as HH:MM
        time: TimeOfDay,
    },
    /// Select the observer altitude
    SetAltitude {
        /// Meters above sea level (0-3900, step 150)
        meters: u32,
    },
    /// Push the current effects to the renderer
    Effects,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the saved state, or the command
/// argument is invalid.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), EngineError> {
    let config = ClockweatherConfig::load_or_default(&cli.config)?;
    init_logging(&config.logging.level, cli.json_logs);
    info!(
        config = %cli.config.display(),
        table = %config.weather.table_path.display(),
        state = %config.state.path.display(),
        "Configuration loaded"
    );

    let table = WeatherTable::load_or_empty(&config.weather.table_path);
    let engine = WeatherEngine::new(table).with_ambient_light(config.lighting.control_ambient_light);

    let saved = store::load(&config.state.path)?;
    let resumed = saved.is_some();
    let mut state = saved.unwrap_or_else(|| SavedState {
        clock: engine.initial_clock(&config.clock),
        altitude: config.weather.altitude,
    });
    let before = state;

    let force_effects = apply_command(&cli.command, &mut state)?;

    if state != before || !resumed {
        store::save(&config.state.path, &state)?;
    }

    let report = engine.report(state.clock, state.altitude);
    let clock_changed = state.clock != before.clock;
    if force_effects || (clock_changed && config.effects.auto_apply) {
        let mut sink = LogEffectSink::default();
        let summary = WeatherEngine::refresh_effects(&mut sink, &report);
        info!(
            active = sink.active().len(),
            failed = summary.failed,
            "Renderer effects refreshed"
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Apply one command to the state. Returns `true` when effects should be
/// pushed regardless of configuration.
fn apply_command(command: &Command, state: &mut SavedState) -> Result<bool, EngineError> {
    match *command {
        Command::Show => {}
        Command::Advance { hours } => state.clock = advance(state.clock, hours),
        Command::SetDate { date } => state.clock.date = date,
        Command::SetTime { time } => state.clock.time = time,
        Command::SetAltitude { meters } => {
            state.altitude =
                validate_altitude(Altitude(meters)).map_err(|err| EngineError::Argument {
                    message: err.to_string(),
                })?;
        }
        Command::Effects => return Ok(true),
    }
    Ok(false)
}

/// Structured logging to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clockweather_types::ClockState;

    use super::*;

    fn state() -> SavedState {
        SavedState {
            clock: ClockState::new("2014-06-14".parse().unwrap(), "23:30".parse().unwrap()),
            altitude: Altitude(0),
        }
    }

    #[test]
    fn cli_parses_negative_hours() {
        let cli = Cli::try_parse_from(["clockweather", "advance", "-3"]).unwrap();
        assert!(matches!(cli.command, Command::Advance { hours: -3 }));
    }

    #[test]
    fn cli_rejects_bad_time() {
        assert!(Cli::try_parse_from(["clockweather", "set-time", "24:00"]).is_err());
    }

    #[test]
    fn advance_command_moves_clock() {
        let mut s = state();
        let force = apply_command(&Command::Advance { hours: 2 }, &mut s).unwrap();
        assert!(!force);
        assert_eq!(s.clock.date, "2014-06-15".parse::<NaiveDate>().unwrap());
        assert_eq!(s.clock.time, TimeOfDay::new(1, 30).unwrap());
    }

    #[test]
    fn set_altitude_validates_grid() {
        let mut s = state();
        apply_command(&Command::SetAltitude { meters: 300 }, &mut s).unwrap();
        assert_eq!(s.altitude, Altitude(300));

        let err = apply_command(&Command::SetAltitude { meters: 301 }, &mut s).unwrap_err();
        assert!(matches!(err, EngineError::Argument { .. }));
        assert_eq!(s.altitude, Altitude(300));
    }

    #[test]
    fn effects_command_forces_push() {
        let mut s = state();
        assert!(apply_command(&Command::Effects, &mut s).unwrap());
        assert_eq!(s, state());
    }
}

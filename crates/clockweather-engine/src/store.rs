//! Saved clock and altitude between command runs.
//!
//! ```json
//! { "clock": { "date": "2014-06-14", "time": "06:00" }, "altitude": 300 }
//! ```

use std::path::Path;

use clockweather_types::{Altitude, ClockState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EngineError;

/// Everything a run needs to resume where the last one stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    /// In-world clock.
    pub clock: ClockState,
    /// Selected observer altitude.
    #[serde(default)]
    pub altitude: Altitude,
}

/// Read the saved state. A missing file is `Ok(None)`.
pub fn load(path: &Path) -> Result<Option<SavedState>, EngineError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No saved state");
            return Ok(None);
        }
        Err(source) => {
            return Err(EngineError::StateIo {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let state: SavedState = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), clock = %state.clock, "Loaded saved state");
    Ok(Some(state))
}

/// Overwrite the saved state.
pub fn save(path: &Path, state: &SavedState) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json).map_err(|source| EngineError::StateIo {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), clock = %state.clock, altitude = %state.altitude, "State saved");
    Ok(())
}

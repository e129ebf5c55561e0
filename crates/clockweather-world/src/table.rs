//! The weather table: authored observations keyed by calendar date.
//!
//! A table is immutable once built. Reloading produces a new table that is
//! swapped in wholesale through a [`TableHandle`], so concurrent readers see
//! either the old table or the new one, never a mix.
//!
//! # Document format
//!
//! ```json
//! {
//!   "2014-06-14": {
//!     "shifts": [
//!       { "shift": 1, "weatherCode": "clear_sky", "windCode": "calm",
//!         "windDirection": "N", "windspeed": 1.2, "temp": 11 }
//!     ]
//!   }
//! }
//! ```
//!
//! Leniency works per row. A row that does not match the row shape is
//! skipped with a warning and the other rows of its date still load. A
//! whole entry is skipped only when its key is not a `YYYY-MM-DD` date or
//! its body is not an object with a `shifts` array.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use clockweather_types::{CalendarDate, DayRecord, Shift, WeatherObservation};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::TableError;

/// Immutable mapping from calendar date to that day's observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    days: BTreeMap<CalendarDate, DayRecord>,
}

impl WeatherTable {
    /// An empty table. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a table document.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Json`] if the text is not a JSON object.
    /// Malformed entries and rows are skipped, not reported as errors.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;
        let mut days = BTreeMap::new();
        let mut skipped: usize = 0;

        for (key, body) in raw {
            let Ok(date) = CalendarDate::parse_from_str(key.trim(), "%Y-%m-%d") else {
                warn!(key = %key, "skipping weather table entry with non-date key");
                skipped = skipped.saturating_add(1);
                continue;
            };
            let Some(rows) = shift_rows(body) else {
                warn!(%date, "skipping weather table entry without a shifts array");
                skipped = skipped.saturating_add(1);
                continue;
            };

            let mut shifts = Vec::with_capacity(rows.len());
            for row in rows {
                match serde_json::from_value::<WeatherObservation>(row) {
                    Ok(obs) => shifts.push(obs),
                    Err(err) => {
                        warn!(%date, error = %err, "skipping malformed weather table row");
                        skipped = skipped.saturating_add(1);
                    }
                }
            }
            days.insert(date, DayRecord { shifts });
        }

        let table = Self { days };
        info!(
            dates = table.date_count(),
            observations = table.observation_count(),
            skipped,
            "Weather table parsed"
        );
        Ok(table)
    }

    /// Read and parse a table document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, or
    /// [`TableError::Json`] if it is not a JSON object.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Load a table, degrading to an empty table on any failure.
    ///
    /// A missing or unreadable table is not fatal: every lookup against the
    /// empty table yields the no-data fallback.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(table) => table,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "weather table unavailable, continuing with an empty table"
                );
                Self::empty()
            }
        }
    }

    /// Find the observation for `date` and `shift`.
    ///
    /// A date that was never loaded and a loaded date without a row for
    /// `shift` both return `None`; callers cannot and should not tell the
    /// two apart.
    pub fn lookup(&self, date: CalendarDate, shift: Shift) -> Option<&WeatherObservation> {
        let found = self
            .days
            .get(&date)
            .and_then(|day| day.observation(shift));
        if found.is_none() {
            debug!(%date, %shift, "no weather observation");
        }
        found
    }

    /// Earliest date present in the table.
    pub fn first_date(&self) -> Option<CalendarDate> {
        self.days.keys().next().copied()
    }

    /// Latest date present in the table.
    pub fn last_date(&self) -> Option<CalendarDate> {
        self.days.keys().next_back().copied()
    }

    /// All dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.days.keys().copied()
    }

    /// Number of dates in the table.
    pub fn date_count(&self) -> usize {
        self.days.len()
    }

    /// Number of observation rows across all dates.
    pub fn observation_count(&self) -> usize {
        self.days
            .values()
            .fold(0_usize, |acc, day| acc.saturating_add(day.shifts.len()))
    }

    /// Whether the table holds no dates at all.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// The raw rows of one date entry. A missing or `null` `shifts` field is an
/// empty day; any other non-array body is unusable.
fn shift_rows(body: Value) -> Option<Vec<Value>> {
    let Value::Object(mut fields) = body else {
        return None;
    };
    match fields.remove("shifts") {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(rows)) => Some(rows),
        Some(_) => None,
    }
}

/// Shared, swappable reference to the current weather table.
///
/// Readers take a cheap [`Arc`] snapshot and keep using it for the rest of
/// their request even if a reload lands meanwhile.
#[derive(Debug, Default)]
pub struct TableHandle {
    current: RwLock<Arc<WeatherTable>>,
}

impl TableHandle {
    /// Wrap an initial table.
    pub fn new(table: WeatherTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// The table as of now.
    pub fn snapshot(&self) -> Arc<WeatherTable> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the whole table, returning the previous one.
    pub fn replace(&self, table: WeatherTable) -> Arc<WeatherTable> {
        let next = Arc::new(table);
        info!(
            dates = next.date_count(),
            observations = next.observation_count(),
            "Weather table swapped"
        );
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

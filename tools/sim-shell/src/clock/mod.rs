//! The simulated clock: a single timestamp that starts at real time, can be
//! overridden by the user, and is written back to disk on every change.

mod update;

pub use update::{ClockUpdate, Field, UpdateKind, ValidationError};

use std::path::{Path, PathBuf};

use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use log::{debug, info, warn};
use thiserror::Error;

use crate::filesystem::{FileSystem, Result as FsResult};

/// Size of the on-disk record: one little-endian `i64` of Unix seconds.
pub const RECORD_LEN: usize = 8;

pub const DEFAULT_CLOCK_FILE: &str = "simulated_time.dat";

/// Source of real wall-clock time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error)]
pub enum ClockError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid {0} combination")]
    Composition(UpdateKind),
}

pub fn encode_record(value: DateTime<Local>) -> [u8; RECORD_LEN] {
    value.timestamp().to_le_bytes()
}

/// Decodes a record, rejecting wrong lengths and unrepresentable instants.
pub fn decode_record(bytes: &[u8]) -> Option<DateTime<Local>> {
    let raw: [u8; RECORD_LEN] = bytes.try_into().ok()?;
    DateTime::from_timestamp(i64::from_le_bytes(raw), 0).map(|utc| utc.with_timezone(&Local))
}

/// Where the loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadOutcome {
    Restored,
    Defaulted,
}

#[derive(Debug, Clone, Copy)]
enum ClockState {
    Uninitialized,
    Loaded(DateTime<Local>),
}

pub struct ClockStore<FS: FileSystem> {
    filesystem: FS,
    path: PathBuf,
    time_source: Box<dyn TimeSource>,
    state: ClockState,
}

impl<FS: FileSystem> ClockStore<FS> {
    pub fn new(filesystem: FS, path: impl Into<PathBuf>) -> Self {
        Self::with_time_source(filesystem, path, SystemClock)
    }

    pub fn with_time_source(
        filesystem: FS,
        path: impl Into<PathBuf>,
        time_source: impl TimeSource + 'static,
    ) -> Self {
        Self {
            filesystem,
            path: path.into(),
            time_source: Box::new(time_source),
            state: ClockState::Uninitialized,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ClockState::Loaded(_))
    }

    /// Loads the clock on first use; later calls return the value in memory.
    pub fn ensure_loaded(&mut self) -> DateTime<Local> {
        match self.state {
            ClockState::Loaded(value) => value,
            ClockState::Uninitialized => {
                let (value, outcome) = self.load();
                match outcome {
                    LoadOutcome::Restored => {
                        debug!("Restored simulated time {} from {}", value, self.path.display())
                    }
                    LoadOutcome::Defaulted => {
                        debug!(
                            "No usable clock record at {}, using system time",
                            self.path.display()
                        )
                    }
                }
                self.state = ClockState::Loaded(value);
                value
            }
        }
    }

    fn load(&self) -> (DateTime<Local>, LoadOutcome) {
        let restored = self
            .filesystem
            .read_file(&self.path)
            .ok()
            .and_then(|bytes| decode_record(&bytes));

        match restored {
            Some(value) => (value, LoadOutcome::Restored),
            None => (self.system_now(), LoadOutcome::Defaulted),
        }
    }

    fn system_now(&self) -> DateTime<Local> {
        let now = self.time_source.now();
        // Seconds resolution, to match what the record can hold
        DateTime::from_timestamp(now.timestamp(), 0)
            .unwrap_or(now)
            .with_timezone(&Local)
    }

    pub fn current(&mut self) -> DateTime<Local> {
        self.ensure_loaded()
    }

    /// Validates `update`, applies it to the current value, and persists it.
    ///
    /// Fields not named by the update keep their current local-time value.
    /// On error nothing in memory or on disk changes.
    pub fn propose(&mut self, update: ClockUpdate) -> Result<DateTime<Local>, ClockError> {
        let current = self.ensure_loaded();
        update.validate()?;

        let value = compose(current, update)?;
        self.state = ClockState::Loaded(value);

        // A lost write only costs persistence across restarts.
        if let Err(e) = self.persist() {
            warn!("Failed to save simulated time to {}: {}", self.path.display(), e);
        }
        Ok(value)
    }

    pub fn persist(&mut self) -> FsResult<()> {
        let value = self.ensure_loaded();
        self.filesystem.write_file(&self.path, &encode_record(value))?;
        info!("Saved simulated time {} to {}", value, self.path.display());
        Ok(())
    }
}

/// Overwrites the date or time-of-day fields of `current`'s local breakdown
/// and resolves the result back to an instant in the local timezone.
fn compose(current: DateTime<Local>, update: ClockUpdate) -> Result<DateTime<Local>, ClockError> {
    let local = current.naive_local();

    let composed = match update {
        ClockUpdate::Date { month, day, year } => {
            NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                .map(|date| date.and_time(local.time()))
        }
        ClockUpdate::Time { hour, minute, second } => {
            NaiveTime::from_hms_opt(hour as u32, minute as u32, second as u32)
                .map(|time| local.date().and_time(time))
        }
    };

    composed
        .and_then(resolve_local)
        .ok_or(ClockError::Composition(update.kind()))
}

/// Resolves a wall-clock time the way `mktime` does with DST left to the
/// platform: a repeated hour takes its first occurrence, and a skipped hour
/// is read with the offset in force before the jump, landing after the gap.
fn resolve_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(value) => Some(value),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let before = Local
                .from_local_datetime(&(naive - Duration::days(1)))
                .earliest()?;
            let offset = Duration::seconds(i64::from(before.offset().fix().local_minus_utc()));
            Some(Local.from_utc_datetime(&(naive - offset)))
        }
    }
}

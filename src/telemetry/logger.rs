//! # Telemetry Logger
//!
//! Writes [`FrameRecord`]s to `frames_<timestamp>_<seq>.jsonl` files under the
//! configured directory.
//!
//! ## Record Format
//!
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.015+00:00","tick":1,"steering":32768,
//!  "throttle":0,"brake":0,"clutch":0,"gear":"neutral",
//!  "channels":[1830,1925,2047],"switches":0}
//! ```

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, warn};

use crate::config::TelemetryConfig;
use crate::error::{RcHidError, Result};
use crate::link::OutputFrame;
use crate::wheel::state::{Gear, WheelState};

/// Prefix of every telemetry file name
pub const FILE_PREFIX: &str = "frames_";

/// Extension of every telemetry file name
pub const FILE_EXTENSION: &str = "jsonl";

/// One line of telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    /// RFC 3339 wall-clock time
    pub timestamp: String,
    /// Tick counter of the output loop
    pub tick: u64,
    pub steering: u16,
    pub throttle: u16,
    pub brake: u16,
    pub clutch: u16,
    pub gear: Gear,
    /// Values sent on the link
    pub channels: Vec<u16>,
    pub switches: u8,
}

impl FrameRecord {
    /// Build a record from the wheel state and the frame it produced.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, tick: u64, state: &WheelState, frame: &OutputFrame) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
            tick,
            steering: state.steering,
            throttle: state.throttle,
            brake: state.brake,
            clutch: state.clutch,
            gear: state.gear,
            channels: frame.channels.clone(),
            switches: frame.switches,
        }
    }
}

/// Rotating JSONL writer
pub struct TelemetryLogger {
    log_dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    log_interval: Duration,
    last_record: Option<Instant>,
    writer: Option<BufWriter<File>>,
    current_file: Option<PathBuf>,
    records_in_file: usize,
    file_seq: u64,
}

impl std::fmt::Debug for TelemetryLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLogger")
            .field("log_dir", &self.log_dir)
            .field("current_file", &self.current_file)
            .field("records_in_file", &self.records_in_file)
            .finish_non_exhaustive()
    }
}

impl TelemetryLogger {
    /// Create a logger, creating `log_dir` if needed
    ///
    /// No file is opened until the first record is written.
    ///
    /// # Errors
    ///
    /// Returns `Telemetry` error if the directory cannot be created
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let log_dir = PathBuf::from(&config.log_dir);
        fs::create_dir_all(&log_dir).map_err(|e| {
            RcHidError::Telemetry(format!("Failed to create {}: {}", log_dir.display(), e))
        })?;

        info!("Telemetry logging to {}", log_dir.display());

        Ok(Self {
            log_dir,
            max_records_per_file: config.max_records_per_file.max(1),
            max_files_to_keep: config.max_files_to_keep.max(1),
            log_interval: Duration::from_millis(config.log_interval_ms),
            last_record: None,
            writer: None,
            current_file: None,
            records_in_file: 0,
            file_seq: 0,
        })
    }

    /// Record a tick if the log interval has elapsed since the last record
    ///
    /// # Returns
    ///
    /// * `Result<bool>` - Whether a line was written
    ///
    /// # Errors
    ///
    /// Returns `Telemetry` error if writing or rotating fails
    pub fn record(&mut self, tick: u64, state: &WheelState, frame: &OutputFrame) -> Result<bool> {
        self.record_at(Instant::now(), tick, state, frame)
    }

    fn record_at(&mut self, now: Instant, tick: u64, state: &WheelState, frame: &OutputFrame) -> Result<bool> {
        if let Some(last) = self.last_record {
            if now.saturating_duration_since(last) < self.log_interval {
                return Ok(false);
            }
        }

        self.write_record(&FrameRecord::new(Utc::now(), tick, state, frame))?;
        self.last_record = Some(now);
        Ok(true)
    }

    /// Append one record unconditionally, rotating first if the current file is full
    ///
    /// # Errors
    ///
    /// Returns `Telemetry` error if serialization, writing or rotation fails
    pub fn write_record(&mut self, record: &FrameRecord) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let line = serde_json::to_string(record)
            .map_err(|e| RcHidError::Telemetry(format!("Failed to serialize record: {}", e)))?;

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| RcHidError::Telemetry("No telemetry file open".to_string()))?;
        writeln!(writer, "{}", line)
            .map_err(|e| RcHidError::Telemetry(format!("Failed to write record: {}", e)))?;

        self.records_in_file += 1;
        Ok(())
    }

    /// Flush buffered records to disk
    ///
    /// # Errors
    ///
    /// Returns `Telemetry` error if the flush fails
    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| RcHidError::Telemetry(format!("Failed to flush telemetry: {}", e)))?;
        }
        Ok(())
    }

    /// Path of the file currently being written
    #[must_use]
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    fn rotate(&mut self) -> Result<()> {
        self.flush()?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let (file, path) = loop {
            self.file_seq += 1;
            let name = format!("{}{}_{:04}.{}", FILE_PREFIX, stamp, self.file_seq, FILE_EXTENSION);
            let path = self.log_dir.join(name);

            // A file from an earlier run in the same second keeps its records
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (file, path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(RcHidError::Telemetry(format!(
                        "Failed to open {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        };

        debug!("Telemetry file rotated to {}", path.display());
        self.writer = Some(BufWriter::new(file));
        self.current_file = Some(path);
        self.records_in_file = 0;

        self.enforce_retention()
    }

    /// Delete the oldest telemetry files beyond `max_files_to_keep`.
    fn enforce_retention(&self) -> Result<()> {
        let mut files = list_telemetry_files(&self.log_dir)?;
        if files.len() <= self.max_files_to_keep {
            return Ok(());
        }

        let excess = files.len() - self.max_files_to_keep;
        for path in files.drain(..excess) {
            if Some(path.as_path()) == self.current_file() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed old telemetry file {}", path.display()),
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }

        Ok(())
    }
}

impl Drop for TelemetryLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("{}", e);
        }
    }
}

/// Telemetry files in `dir`, oldest first.
///
/// Ordered by modification time, then by name for files written within the
/// same timestamp tick.
///
/// # Errors
///
/// Returns `Telemetry` error if the directory cannot be read
pub fn list_telemetry_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| RcHidError::Telemetry(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut files: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_telemetry_file(&entry.path()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect();

    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn is_telemetry_file(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    name.starts_with(FILE_PREFIX) && name.ends_with(&format!(".{}", FILE_EXTENSION))
}

use crate::error::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde_json::ser::to_string;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use vigil_common::types::AlertRecord;

/// Filename of the single unbounded rolling log.
pub const ROLLING_FILE: &str = "attacks.log";

const DAILY_PREFIX: &str = "attacks_";
const DAILY_SUFFIX: &str = ".log";

/// Metadata for one daily log file.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct LogFileInfo {
    pub date: String,
    pub filename: String,
    pub size: u64,
}

/// Append-only durable log: one rolling file plus one file per UTC
/// calendar day, both newline-delimited JSON records.
///
/// Appends rely on the platform's append-mode write guarantee: each record
/// is serialized to a single line and written with one `write_all`, so
/// concurrent writers may interleave lines but never corrupt one.
pub struct DurableLog {
    dir: PathBuf,
}

impl DurableLog {
    /// Creates the log directory if needed. Failure here is the one
    /// startup error this layer treats as fatal.
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn rolling_path(&self) -> PathBuf {
        self.dir.join(ROLLING_FILE)
    }

    fn daily_path(&self, now: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("{DAILY_PREFIX}{}{DAILY_SUFFIX}", now.format("%Y-%m-%d")))
    }

    /// Appends `record` to the rolling file and to today's daily file.
    ///
    /// The two appends are independent and best-effort: an I/O failure on
    /// either is logged and swallowed, never propagated to the request.
    pub fn append(&self, record: &AlertRecord) {
        let line = match to_string(record) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize alert record, dropping");
                return;
            }
        };
        if let Err(e) = append_line(&self.rolling_path(), &line) {
            tracing::warn!(file = ROLLING_FILE, error = %e, "Failed to append attack log line");
        }
        let daily = self.daily_path(Utc::now());
        if let Err(e) = append_line(&daily, &line) {
            tracing::warn!(file = %daily.display(), error = %e, "Failed to append daily log line");
        }
    }

    /// Lists daily log files with metadata, sorted by filename (which is
    /// chronological given the fixed date naming).
    pub fn list_daily_files(&self) -> Vec<LogFileInfo> {
        let mut files = Vec::new();
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read log directory");
                return files;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(date) = name
                .strip_prefix(DAILY_PREFIX)
                .and_then(|rest| rest.strip_suffix(DAILY_SUFFIX))
            else {
                continue;
            };
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(LogFileInfo {
                date: date.to_string(),
                filename: name,
                size,
            });
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        files
    }

    /// Reads a log file by bare name for download.
    ///
    /// `name` is never treated as a path: separators or parent references
    /// are rejected outright, so traversal outside the log directory is
    /// impossible.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(StoreError::InvalidFilename {
                name: name.to_string(),
            });
        }
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(std::fs::read(path)?)
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    // One write for the whole line keeps concurrent appends line-atomic.
    file.write_all(format!("{line}\n").as_bytes())
}

use crate::logfile::DurableLog;
use crate::store::AlertStore;
use std::sync::Arc;
use vigil_common::types::AlertRecord;

/// Serves "N most recent alerts" queries across memory and disk.
///
/// The contract is best-effort chronological, not exactly-once: when a
/// query spills to disk, in-memory records are presumed newer than the
/// tail of the rolling file and overlap is not deduplicated.
pub struct AlertReader {
    store: Arc<AlertStore>,
    log: Arc<DurableLog>,
}

impl AlertReader {
    pub fn new(store: Arc<AlertStore>, log: Arc<DurableLog>) -> Self {
        Self { store, log }
    }

    /// Returns up to `limit` records, newest first.
    ///
    /// Fast path: entirely from the in-memory store when it holds enough.
    /// Otherwise the last `limit` lines of the rolling log are parsed
    /// (malformed lines skipped), reversed to newest-first, and appended
    /// after the in-memory records, then truncated to `limit`.
    pub fn recent(&self, limit: usize) -> Vec<AlertRecord> {
        if limit <= self.store.len() {
            return self.store.recent(limit);
        }

        let mut records = self.store.recent(limit);
        let mut disk = self.tail_records(limit);
        disk.reverse();
        records.append(&mut disk);
        records.truncate(limit);
        records
    }

    /// Last `limit` parseable records of the rolling file, oldest first.
    fn tail_records(&self, limit: usize) -> Vec<AlertRecord> {
        let content = match std::fs::read_to_string(self.log.rolling_path()) {
            Ok(content) => content,
            // A missing rolling file just means nothing persisted yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read rolling attack log");
                return Vec::new();
            }
        };
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(limit);
        lines[start..]
            .iter()
            .filter_map(|line| match serde_json::from_str::<AlertRecord>(line) {
                Ok(record) => Some(record),
                Err(_) => {
                    tracing::debug!("Skipping unparseable attack log line");
                    None
                }
            })
            .collect()
    }
}

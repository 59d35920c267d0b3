//! Append-only activity log.
//!
//! # Invariants
//! - The file is only ever opened in append mode.
//! - Unparseable lines are skipped on read, never rewritten.

use super::{StoreError, StoreResult};
use crate::model::log_entry::LogEntry;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry as a single line.
    pub fn append(&self, entry: &LogEntry) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| StoreError::io(&self.path, err))?;
        writeln!(file, "{}", entry.to_line()).map_err(|err| StoreError::io(&self.path, err))
    }

    /// Returns up to `limit` most recent entries, oldest first.
    pub fn tail(&self, limit: usize) -> StoreResult<Vec<LogEntry>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        let entries: Vec<LogEntry> = raw.lines().filter_map(LogEntry::parse_line).collect();
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.into_iter().skip(skip).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityLog;
    use crate::model::log_entry::LogEntry;
    use chrono::Utc;
    use std::fs;

    #[test]
    fn tail_returns_most_recent_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("logs").join("activity.log"));
        assert!(log.tail(5).unwrap().is_empty());

        for idx in 0..4 {
            log.append(&LogEntry::new(Utc::now(), format!("entry {idx}")))
                .unwrap();
        }

        let tail = log.tail(2).unwrap();
        let texts: Vec<&str> = tail.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["entry 2", "entry 3"]);
    }

    #[test]
    fn append_never_rewrites_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("activity.log"));
        fs::write(log.path(), "hand-written line\n").unwrap();

        log.append(&LogEntry::new(Utc::now(), "new")).unwrap();
        let raw = fs::read_to_string(log.path()).unwrap();
        assert!(raw.starts_with("hand-written line\n"));
        assert_eq!(log.tail(10).unwrap().len(), 1);
    }
}

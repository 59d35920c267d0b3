//! Activity log entry model.
//!
//! # Invariants
//! - One entry renders as exactly one line: `<rfc3339>\t<text>`.
//! - Entries are append-only; nothing in the crate rewrites them.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::{Display, Formatter};

const FIELD_SEPARATOR: char = '\t';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl LogEntry {
    /// Builds an entry, flattening newlines and tabs so the line format holds.
    pub fn new(timestamp: DateTime<Utc>, text: impl AsRef<str>) -> Self {
        let text = text
            .as_ref()
            .replace(['\n', '\r', FIELD_SEPARATOR], " ")
            .trim()
            .to_string();
        Self { timestamp, text }
    }

    /// Renders the on-disk line without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{FIELD_SEPARATOR}{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.text
        )
    }

    /// Parses one on-disk line. Returns `None` for lines that do not match.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, text) = line.split_once(FIELD_SEPARATOR)?;
        let timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
            .ok()?
            .with_timezone(&Utc);
        Some(Self {
            timestamp,
            text: text.trim_end_matches(['\n', '\r']).to_string(),
        })
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.text
        )
    }
}

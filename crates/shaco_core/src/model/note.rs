//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its on-disk entry shape.
//! - Validate content before it reaches storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `content` is never blank and is stored exactly as given.
//! - `updated_at >= created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable note identifier.
pub type NoteId = Uuid;

/// Validation errors for note records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    BlankContent,
    NilId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankContent => write!(f, "note content cannot be empty"),
            Self::NilId => write!(f, "note id cannot be nil"),
        }
    }
}

impl Error for NoteValidationError {}

/// One user note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note with a fresh id, stamped at `now`.
    pub fn new(content: impl Into<String>, now: DateTime<Utc>) -> Result<Self, NoteValidationError> {
        let note = Self {
            id: Uuid::new_v4(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        };
        note.validate()?;
        Ok(note)
    }

    /// Replaces content and bumps `updated_at`.
    pub fn replace_content(
        &mut self,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), NoteValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(NoteValidationError::BlankContent);
        }
        self.content = content;
        self.updated_at = now.max(self.created_at);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::BlankContent);
        }
        Ok(())
    }

    /// First line of content, capped for list views.
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or_default();
        let mut preview: String = first_line.chars().take(max_chars).collect();
        if first_line.chars().count() > max_chars || self.content.lines().nth(1).is_some() {
            preview.push_str("...");
        }
        preview
    }

    pub(crate) fn to_entry(&self) -> NoteEntry {
        NoteEntry {
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn from_entry(id: NoteId, entry: NoteEntry) -> Self {
        Self {
            id,
            content: entry.content,
            created_at: entry.created_at,
            updated_at: entry.updated_at.max(entry.created_at),
        }
    }
}

/// Value stored under the note id key in `notes.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Older files only carry `created_at`; `from_entry` lifts the default
    /// up to it.
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteEntry, NoteValidationError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn new_keeps_content_and_rejects_blank_content() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let note = Note::new("  buy milk \n", now).unwrap();
        assert_eq!(note.content, "  buy milk \n");
        assert_eq!(note.created_at, note.updated_at);

        assert_eq!(Note::new("   ", now).unwrap_err(), NoteValidationError::BlankContent);
        let mut note = note;
        assert_eq!(
            note.replace_content("\n\t", now).unwrap_err(),
            NoteValidationError::BlankContent
        );
    }

    #[test]
    fn entry_without_updated_at_reads_as_created_at() {
        let entry: NoteEntry = serde_json::from_str(
            r#"{"content":"old","created_at":"2024-06-01T10:00:00Z"}"#,
        )
        .unwrap();
        let note = Note::from_entry(uuid::Uuid::new_v4(), entry);
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(note.created_at, created);
        assert_eq!(note.updated_at, created);
    }

    #[test]
    fn replace_content_never_moves_updated_at_before_created_at() {
        let created = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut note = Note::new("draft", created).unwrap();
        note.replace_content("final", earlier).unwrap();
        assert_eq!(note.content, "final");
        assert_eq!(note.updated_at, created);
    }

    #[test]
    fn preview_marks_truncation() {
        let now = Utc::now();
        let note = Note::new("first line\nsecond line", now).unwrap();
        assert_eq!(note.preview(40), "first line...");
        let short = Note::new("abc", now).unwrap();
        assert_eq!(short.preview(40), "abc");
    }
}

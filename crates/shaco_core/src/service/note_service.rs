//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete over a `NoteRepository`.
//! - Resolve user-typed ids, including unique prefixes.
//!
//! # Invariants
//! - `update_note` replaces content fully.
//! - A prefix shorter than `MIN_ID_PREFIX_LEN` never matches.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::store::note_store::NoteRepository;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Shortest accepted id prefix.
pub const MIN_ID_PREFIX_LEN: usize = 4;

#[derive(Debug)]
pub enum NoteServiceError {
    Validation(NoteValidationError),
    NotFound(String),
    AmbiguousId { prefix: String, matches: usize },
    Store(StoreError),
    /// Write succeeded but read-back did not find the note.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::AmbiguousId { prefix, matches } => write!(
                f,
                "note id `{prefix}` is ambiguous ({matches} matches); type more characters"
            ),
            Self::Store(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_note(
        &self,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteServiceError> {
        let note = Note::new(content, now)?;
        self.repo.insert_note(&note)?;
        info!("event=note_create module=note status=ok id={}", note.id);
        self.repo
            .get_note(note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Gets one note by full id or unique prefix.
    pub fn get_note(&self, id_or_prefix: &str) -> Result<Note, NoteServiceError> {
        let id = self.resolve_id(id_or_prefix)?;
        self.repo
            .get_note(id)?
            .ok_or_else(|| NoteServiceError::NotFound(id_or_prefix.trim().to_string()))
    }

    /// Lists all notes, newest first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    pub fn update_note(
        &self,
        id_or_prefix: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.get_note(id_or_prefix)?;
        note.replace_content(content, now)?;
        if !self.repo.update_note(&note)? {
            return Err(NoteServiceError::NotFound(note.id.to_string()));
        }
        info!("event=note_update module=note status=ok id={}", note.id);
        Ok(note)
    }

    pub fn delete_note(&self, id_or_prefix: &str) -> Result<Note, NoteServiceError> {
        let id = self.resolve_id(id_or_prefix)?;
        let removed = self
            .repo
            .delete_note(id)?
            .ok_or_else(|| NoteServiceError::NotFound(id.to_string()))?;
        info!("event=note_delete module=note status=ok id={id}");
        Ok(removed)
    }

    /// Resolves a full UUID or a unique case-insensitive prefix.
    pub fn resolve_id(&self, id_or_prefix: &str) -> Result<NoteId, NoteServiceError> {
        let needle = id_or_prefix.trim().to_ascii_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Ok(id);
        }
        if needle.len() < MIN_ID_PREFIX_LEN {
            return Err(NoteServiceError::NotFound(needle));
        }

        let matches: Vec<NoteId> = self
            .repo
            .list_notes()?
            .into_iter()
            .map(|note| note.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [] => Err(NoteServiceError::NotFound(needle)),
            [id] => Ok(*id),
            _ => Err(NoteServiceError::AmbiguousId {
                prefix: needle,
                matches: matches.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteService, NoteServiceError};
    use crate::store::note_store::JsonNoteRepository;
    use chrono::Utc;

    #[test]
    fn short_prefix_never_matches() {
        let dir = tempfile::tempdir().unwrap();
        let service = NoteService::new(JsonNoteRepository::new(dir.path().join("n.json")));
        let note = service.create_note("hello", Utc::now()).unwrap();
        let short = &note.id.to_string()[..3];
        assert!(matches!(
            service.get_note(short),
            Err(NoteServiceError::NotFound(_))
        ));
        let prefix = &note.id.to_string()[..8];
        assert_eq!(service.get_note(prefix).unwrap().id, note.id);
    }
}

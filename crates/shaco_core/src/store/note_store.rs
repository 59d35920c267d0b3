//! Note repository contract and JSON-file implementation.
//!
//! # Responsibility
//! - Persist notes in one JSON object keyed by note id.
//! - Keep serialization details inside the storage boundary.
//!
//! # Invariants
//! - Every write validates the note before touching disk.
//! - Reads reject entries whose key is not a UUID or whose content is blank.
//! - List order is `updated_at DESC, id ASC`.

use super::{read_json, write_json_atomic, StoreError, StoreResult};
use crate::model::note::{Note, NoteEntry, NoteId};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// On-disk document: note id -> entry.
type NoteDocument = BTreeMap<String, NoteEntry>;

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts a new note. Fails with `InvalidData` if the id already exists.
    fn insert_note(&self, note: &Note) -> StoreResult<()>;
    /// Replaces an existing note. Returns `false` when the id is unknown.
    fn update_note(&self, note: &Note) -> StoreResult<bool>;
    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>>;
    fn list_notes(&self) -> StoreResult<Vec<Note>>;
    /// Removes a note. Returns the removed note, if any.
    fn delete_note(&self, id: NoteId) -> StoreResult<Option<Note>>;
}

/// Notes persisted in a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonNoteRepository {
    path: PathBuf,
}

impl JsonNoteRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<BTreeMap<NoteId, Note>> {
        let document: NoteDocument = read_json(&self.path)?.unwrap_or_default();
        let mut notes = BTreeMap::new();
        for (key, entry) in document {
            let id = Uuid::parse_str(&key).map_err(|_| {
                StoreError::InvalidData(format!("invalid note id `{key}` in {}", self.path.display()))
            })?;
            let note = Note::from_entry(id, entry);
            note.validate()
                .map_err(|err| StoreError::InvalidData(format!("note {id}: {err}")))?;
            notes.insert(id, note);
        }
        debug!(
            "event=notes_load module=store status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn save(&self, notes: &BTreeMap<NoteId, Note>) -> StoreResult<()> {
        let document: NoteDocument = notes
            .iter()
            .map(|(id, note)| (id.to_string(), note.to_entry()))
            .collect();
        write_json_atomic(&self.path, &document).inspect_err(|err| {
            warn!("event=notes_save module=store status=error error={err}");
        })?;
        debug!(
            "event=notes_save module=store status=ok count={}",
            document.len()
        );
        Ok(())
    }
}

impl NoteRepository for JsonNoteRepository {
    fn insert_note(&self, note: &Note) -> StoreResult<()> {
        note.validate()
            .map_err(|err| StoreError::InvalidData(err.to_string()))?;

        let mut notes = self.load()?;
        if notes.contains_key(&note.id) {
            return Err(StoreError::InvalidData(format!(
                "note id already exists: {}",
                note.id
            )));
        }
        notes.insert(note.id, note.clone());
        self.save(&notes)
    }

    fn update_note(&self, note: &Note) -> StoreResult<bool> {
        note.validate()
            .map_err(|err| StoreError::InvalidData(err.to_string()))?;

        let mut notes = self.load()?;
        let Some(slot) = notes.get_mut(&note.id) else {
            return Ok(false);
        };
        *slot = note.clone();
        self.save(&notes)?;
        Ok(true)
    }

    fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.load()?.remove(&id))
    }

    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        let mut notes: Vec<Note> = self.load()?.into_values().collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let mut notes = self.load()?;
        let removed = notes.remove(&id);
        if removed.is_some() {
            self.save(&notes)?;
        }
        Ok(removed)
    }
}

//! Note use-case service.
//!
//! # Responsibility
//! - Provide list/search/create/import/export and metadata updates over a
//!   `NoteStore`.
//! - Project notes into list cards for the UI.
//!
//! # Invariants
//! - Listing by state uses the total state parse, so unknown tags land in
//!   `DEFAULT`.
//! - Deleting a note moves it to trash first; only trashed notes are removed.
//! - Card bodies of locked notes are always masked.

use crate::config::EditorConfig;
use crate::model::note::{ImportableNote, Note, NoteId, NoteState};
use crate::repo::note_repo::{NoteStore, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Import payload is not a JSON array of exported notes.
    InvalidImport(String),
    /// Stored notes could not be serialized for export.
    Export(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidImport(message) => write!(f, "invalid note import: {message}"),
            Self::Export(message) => write!(f, "note export failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// What happened to a note passed to [`NoteService::delete_or_trash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    MovedToTrash,
    Deleted,
}

/// List item projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub uid: NoteId,
    /// `None` when the note has no heading; the UI hides the title row.
    pub title: Option<String>,
    /// Masked when the note is locked.
    pub body: String,
    pub display_timestamp: String,
    pub color: u32,
    pub locked: bool,
}

impl NoteCard {
    pub fn from_note(note: &Note) -> Self {
        let title = note.title_text();
        Self {
            uid: note.uid.unwrap_or_default(),
            title: (!title.is_empty()).then_some(title),
            body: note.locked_display_text(),
            display_timestamp: note.display_timestamp.clone(),
            color: note.color,
            locked: note.locked,
        }
    }
}

/// Note service facade over a store implementation.
pub struct NoteService<S: NoteStore> {
    store: S,
    config: EditorConfig,
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EditorConfig::default())
    }

    pub fn with_config(store: S, config: EditorConfig) -> Self {
        Self { store, config }
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Creates and persists a note from a title/body pair.
    pub fn create_note(&mut self, title: &str, body: &str) -> ServiceResult<Note> {
        let mut note = Note::generate_from_text(title, body);
        note.color = self.config.default_color;
        note.save(&mut self.store)?;
        Ok(note)
    }

    pub fn get_note(&self, id: NoteId) -> ServiceResult<Note> {
        self.store
            .get(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Notes in `state`, newest first.
    pub fn list_by_state(&self, state: NoteState) -> ServiceResult<Vec<Note>> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .filter(|note| note.note_state() == state)
            .collect())
    }

    /// Notes in `state` matching every keyword.
    pub fn search(&self, state: NoteState, keywords: &str) -> ServiceResult<Vec<Note>> {
        Ok(self
            .list_by_state(state)?
            .into_iter()
            .filter(|note| note.matches_keywords(keywords))
            .collect())
    }

    pub fn note_cards(&self, state: NoteState) -> ServiceResult<Vec<NoteCard>> {
        Ok(self
            .list_by_state(state)?
            .iter()
            .map(NoteCard::from_note)
            .collect())
    }

    pub fn mark(&mut self, id: NoteId, state: NoteState) -> ServiceResult<Note> {
        let mut note = self.get_note(id)?;
        note.mark(&mut self.store, state)?;
        Ok(note)
    }

    pub fn set_color(&mut self, id: NoteId, color: u32) -> ServiceResult<Note> {
        let mut note = self.get_note(id)?;
        note.color = color;
        note.save(&mut self.store)?;
        Ok(note)
    }

    pub fn set_locked(&mut self, id: NoteId, locked: bool) -> ServiceResult<Note> {
        let mut note = self.get_note(id)?;
        note.locked = locked;
        note.save(&mut self.store)?;
        Ok(note)
    }

    /// Trashes a note, or deletes it permanently when it is already trashed.
    pub fn delete_or_trash(&mut self, id: NoteId) -> ServiceResult<RemovalOutcome> {
        let mut note = self.get_note(id)?;
        if note.note_state() == NoteState::Trash {
            note.delete(&mut self.store)?;
            return Ok(RemovalOutcome::Deleted);
        }
        note.mark(&mut self.store, NoteState::Trash)?;
        Ok(RemovalOutcome::MovedToTrash)
    }

    /// Imports a JSON array of exported notes; returns the created notes.
    pub fn import_notes(&mut self, json: &str) -> ServiceResult<Vec<Note>> {
        let imported: Vec<ImportableNote> = serde_json::from_str(json).map_err(|err| {
            warn!("event=note_import module=service status=error error={err}");
            NoteServiceError::InvalidImport(err.to_string())
        })?;

        let mut created = Vec::with_capacity(imported.len());
        for entry in &imported {
            let mut note = Note::generate_from_import(entry);
            note.save(&mut self.store)?;
            created.push(note);
        }
        info!(
            "event=note_import module=service status=ok count={}",
            created.len()
        );
        Ok(created)
    }

    /// Serializes every stored note as a JSON array of exported notes.
    pub fn export_notes(&self) -> ServiceResult<String> {
        let exported: Vec<ImportableNote> = self
            .store
            .list_all()?
            .iter()
            .map(Note::to_importable)
            .collect();
        serde_json::to_string(&exported).map_err(|err| NoteServiceError::Export(err.to_string()))
    }
}

//! Editing session over one note.
//!
//! # Responsibility
//! - Own the note and its block list while the editor is open.
//! - Route commands through [`apply`] and persist when a command asks for it.
//! - Provide the idempotent save entry point used by the auto-save timer.
//!
//! # Invariants
//! - Only one session edits a given note; no locking is performed.
//! - The auto-save timer is re-armed only while the session is active, so
//!   no save happens after `pause`/`finish`.
//! - A saved note whose block list ends up empty is deleted on exit.

use crate::config::EditorConfig;
use crate::editor::command::{apply, BlockList, EditCommand};
use crate::model::format::{encode_formats, Format};
use crate::model::note::{Note, NoteKind};
use crate::repo::note_repo::{NoteStore, RepoResult};
use chrono::Utc;
use log::{debug, info};
use std::time::Duration;

/// What the timer host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDecision {
    /// Schedule the next tick after the given delay.
    Rearm(Duration),
    Stop,
}

/// How an editing session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    /// Nothing was ever persisted.
    Discarded,
    /// The note became empty and its record was removed.
    Deleted,
    Saved(Note),
}

pub struct EditSession {
    note: Note,
    blocks: BlockList,
    active: bool,
    config: EditorConfig,
    persisted: Option<Note>,
}

impl EditSession {
    /// Opens a session and applies the heading invariant to the block list.
    pub fn open(note: Note, config: EditorConfig) -> Self {
        let mut session = Self {
            note: Note::generate(),
            blocks: BlockList::default(),
            active: false,
            config,
            persisted: None,
        };
        session.reload(note);
        session
    }

    /// Replaces the edited note, re-asserting the heading invariant.
    pub fn reload(&mut self, note: Note) {
        let mut blocks = BlockList::new(note.formats());
        blocks.ensure_heading();
        debug!(
            "event=session_load module=editor status=ok uid={:?} blocks={}",
            note.uid,
            blocks.len()
        );
        self.persisted = (!note.is_unsaved()).then(|| note.clone());
        self.blocks = blocks;
        self.note = note;
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    pub fn formats(&self) -> &[Format] {
        &self.blocks.formats
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the editing surface as visible again.
    pub fn resume(&mut self) {
        self.active = true;
    }

    /// Marks the session inactive and flushes pending edits.
    pub fn pause<S: NoteStore + ?Sized>(&mut self, store: &mut S) -> RepoResult<()> {
        self.active = false;
        self.maybe_update_note(store)
    }

    pub fn set_color(&mut self, color: u32) {
        self.note.color = color;
    }

    /// Applies one command; returns whether it triggered a save.
    pub fn dispatch<S: NoteStore + ?Sized>(
        &mut self,
        command: EditCommand,
        store: &mut S,
    ) -> RepoResult<bool> {
        let applied = apply(std::mem::take(&mut self.blocks), command);
        self.blocks = applied.list;
        if applied.save_required {
            self.maybe_update_note(store)?;
        }
        Ok(applied.save_required)
    }

    /// Serializes the block list into the note and persists it if needed.
    ///
    /// Safe to call repeatedly: an unchanged saved note is not written again,
    /// and an unsaved note without content never reaches the store.
    pub fn maybe_update_note<S: NoteStore + ?Sized>(&mut self, store: &mut S) -> RepoResult<()> {
        let content: Vec<Format> = self
            .blocks
            .formats
            .iter()
            .filter(|format| !format.text.trim().is_empty())
            .cloned()
            .collect();

        self.note.title = NoteKind::RichNote.as_str().to_string();
        self.note.description = encode_formats(&content);

        if self.note.is_unsaved() && content.is_empty() {
            return Ok(());
        }
        if !self.differs_from_persisted() {
            return Ok(());
        }

        self.note.timestamp = Utc::now().timestamp_millis();
        self.note.display_timestamp = Note::format_display_timestamp(self.note.timestamp);
        self.note.save(store)?;
        self.persisted = Some(self.note.clone());
        Ok(())
    }

    /// Auto-save tick; saves and re-arms only while active.
    pub fn on_timer_tick<S: NoteStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> RepoResult<TimerDecision> {
        if !self.active {
            debug!("event=autosave module=editor status=stopped");
            return Ok(TimerDecision::Stop);
        }
        self.maybe_update_note(store)?;
        Ok(TimerDecision::Rearm(self.config.autosave_interval()))
    }

    /// Ends the session: flushes edits and removes a note left empty.
    pub fn finish<S: NoteStore + ?Sized>(mut self, store: &mut S) -> RepoResult<SessionExit> {
        self.active = false;
        self.maybe_update_note(store)?;

        if self.note.is_unsaved() {
            return Ok(SessionExit::Discarded);
        }
        if self.note.formats().is_empty() {
            self.note.delete(store)?;
            info!("event=session_finish module=editor status=ok outcome=deleted");
            return Ok(SessionExit::Deleted);
        }

        info!(
            "event=session_finish module=editor status=ok outcome=saved uid={:?}",
            self.note.uid
        );
        Ok(SessionExit::Saved(self.note))
    }

    fn differs_from_persisted(&self) -> bool {
        match &self.persisted {
            None => true,
            Some(previous) => {
                previous.description != self.note.description
                    || previous.title != self.note.title
                    || previous.color != self.note.color
                    || previous.state != self.note.state
                    || previous.locked != self.note.locked
            }
        }
    }
}

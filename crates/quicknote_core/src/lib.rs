//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note and block invariants.

pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{EditorConfig, DEFAULT_NOTE_COLOR};
pub use editor::command::{apply, Applied, BlockList, EditCommand};
pub use editor::session::{EditSession, SessionExit, TimerDecision};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::format::{decode_formats, encode_formats, find_format_index, Format, FormatType};
pub use model::note::{
    ImportableNote, Note, NoteId, NoteKind, NoteState, SharePayload, StateParse, LOCKED_MASK,
};
pub use repo::note_repo::{NoteStore, RepoError, RepoResult, SqliteNoteRepository};
pub use service::access::{
    with_secret, with_unlocked, AccessOutcome, CredentialVerifier, PincodeVerifier,
};
pub use service::actions::{note_actions, target_state, NoteAction};
pub use service::note_service::{
    NoteCard, NoteService, NoteServiceError, RemovalOutcome, ServiceResult,
};
pub use service::share::{copy_note, share_note, ClipboardTarget, ShareTarget};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

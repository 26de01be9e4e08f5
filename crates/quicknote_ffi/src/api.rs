//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note list/create/state/lock/share use-cases to Dart via FRB.
//! - Host block-editor sessions keyed by a session id.
//! - Flatten core errors into response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - State arguments must be exact tags; unknown tags are rejected.
//! - Locked content (share, unlock, delete, edit) is only reachable with a
//!   secret accepted by the configured pincode.

use log::{info, warn};
use quicknote_core::db::open_db;
use quicknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    with_secret, AccessOutcome, EditCommand, EditSession, EditorConfig, Format, FormatType, Note,
    NoteCard, NoteId, NoteService, NoteServiceError, NoteState, PincodeVerifier, RemovalOutcome,
    RepoError, SessionExit, SqliteNoteRepository, StateParse, TimerDecision,
};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

const NOTES_DB_FILE_NAME: &str = "quicknote.sqlite3";
static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static PINCODE: Mutex<Option<String>> = Mutex::new(None);
static EDIT_SESSIONS: Mutex<BTreeMap<u64, EditSession>> = Mutex::new(BTreeMap::new());
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the pincode that unlocks locked notes. An empty value clears it,
/// after which locked content cannot be reached.
#[flutter_rust_bridge::frb(sync)]
pub fn access_set_pincode(pincode: String) {
    let mut guard = PINCODE.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = (!pincode.is_empty()).then_some(pincode);
}

/// One list card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCardItem {
    pub uid: i64,
    /// Absent when the note has no heading.
    pub title: Option<String>,
    /// Masked for locked notes.
    pub body: String,
    pub display_timestamp: String,
    /// ARGB color.
    pub color: u32,
    pub locked: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub items: Vec<NoteCardItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note id, when the action resolved one.
    pub uid: Option<i64>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, uid: NoteId) -> Self {
        Self {
            ok: true,
            uid: Some(uid),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            uid: None,
            message: message.into(),
        }
    }
}

/// Subject/body pair for the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteShareResponse {
    pub ok: bool,
    pub subject: String,
    pub body: String,
    pub message: String,
}

/// One editor block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockItem {
    pub uid: u32,
    /// Block tag, e.g. `HEADING` or `CHECKLIST_CHECKED`.
    pub format_type: String,
    pub text: String,
}

/// Editor mutation sent by the UI. `format_type` uses the block tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockCommand {
    Append { format_type: String },
    InsertAtFocus { format_type: String },
    Move { from: u32, to: u32 },
    Delete { uid: u32 },
    SetType { uid: u32, format_type: String },
    SetText { uid: u32, text: String },
    Replace { uid: u32, format_type: String, text: String },
    SetChecked { uid: u32, checked: bool },
    Focus { uid: Option<u32> },
}

/// Editor session state after a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSessionResponse {
    pub ok: bool,
    pub session_id: Option<u64>,
    /// Persisted note id; `None` until the first save.
    pub note_uid: Option<i64>,
    pub blocks: Vec<BlockItem>,
    pub focused: Option<u32>,
    /// Whether this call wrote the note.
    pub saved: bool,
    pub message: String,
}

impl EditSessionResponse {
    fn snapshot(session_id: u64, session: &EditSession, saved: bool) -> Self {
        Self {
            ok: true,
            session_id: Some(session_id),
            note_uid: session.note().uid.filter(|uid| *uid != 0),
            blocks: session.formats().iter().map(to_block_item).collect(),
            focused: session.blocks().focused,
            saved,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            session_id: None,
            note_uid: None,
            blocks: Vec::new(),
            focused: None,
            saved: false,
            message: message.into(),
        }
    }
}

/// Auto-save tick result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTickResponse {
    pub ok: bool,
    /// Delay before the next tick; `None` tells the host to stop ticking.
    pub rearm_after_ms: Option<u64>,
    pub message: String,
}

/// How an editor session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFinishResponse {
    pub ok: bool,
    /// `discarded`, `deleted` or `saved`.
    pub outcome: String,
    pub uid: Option<i64>,
    pub message: String,
}

/// Lists note cards in one workflow state (`DEFAULT|FAVOURITE|ARCHIVED|TRASH`).
///
/// `keywords` filters by case-insensitive keyword match when non-empty.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(state: String, keywords: Option<String>) -> NotesListResponse {
    let keywords = keywords.unwrap_or_default();
    let result = parse_state_arg(&state).and_then(|state| {
        with_note_service(|service| {
            let notes = service.search(state, keywords.trim())?;
            Ok(notes.iter().map(NoteCard::from_note).collect::<Vec<_>>())
        })
    });

    match result {
        Ok(cards) => {
            let items: Vec<NoteCardItem> = cards.into_iter().map(to_card_item).collect();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NotesListResponse { items, message }
        }
        Err(err) => NotesListResponse {
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Creates a note from a title/body pair (heading only for a non-empty title).
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(title: String, body: String) -> NoteActionResponse {
    respond(
        "note_create",
        "Note created.",
        with_note_service(|service| {
            let note = service.create_note(title.trim(), body.as_str())?;
            Ok(note.uid.unwrap_or_default())
        }),
    )
}

/// Moves a note to another workflow state.
#[flutter_rust_bridge::frb(sync)]
pub fn note_mark(uid: i64, state: String) -> NoteActionResponse {
    respond(
        "note_mark",
        "Note updated.",
        parse_state_arg(&state).and_then(|state| {
            with_note_service(|service| {
                service.mark(uid, state)?;
                Ok(uid)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_set_color(uid: i64, color: u32) -> NoteActionResponse {
    respond(
        "note_set_color",
        "Color updated.",
        with_note_service(|service| {
            service.set_color(uid, color)?;
            Ok(uid)
        }),
    )
}

/// Locks or unlocks a note. Unlocking a locked note needs `secret`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_set_locked(uid: i64, locked: bool, secret: Option<String>) -> NoteActionResponse {
    respond(
        "note_set_locked",
        if locked { "Note locked." } else { "Note unlocked." },
        with_note_service(|service| {
            if !locked {
                require_access(&service.get_note(uid)?, secret.as_deref())?;
            }
            service.set_locked(uid, locked)?;
            Ok(uid)
        }),
    )
}

/// Trashes a note, or deletes it when it is already in trash.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete_or_trash(uid: i64, secret: Option<String>) -> NoteActionResponse {
    let result = with_note_service(|service| {
        require_access(&service.get_note(uid)?, secret.as_deref())?;
        Ok(service.delete_or_trash(uid)?)
    });
    match result {
        Ok(RemovalOutcome::MovedToTrash) => NoteActionResponse::success("Moved to trash.", uid),
        Ok(RemovalOutcome::Deleted) => NoteActionResponse::success("Note deleted.", uid),
        Err(err) => NoteActionResponse::failure(format!("note_delete_or_trash failed: {err}")),
    }
}

/// Share payload for one note. Locked notes need `secret`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_share(uid: i64, secret: Option<String>) -> NoteShareResponse {
    let result = with_note_service(|service| {
        let note = service.get_note(uid)?;
        require_access(&note, secret.as_deref())?;
        Ok(note.share_payload())
    });
    match result {
        Ok(payload) => NoteShareResponse {
            ok: true,
            subject: payload.subject,
            body: payload.body,
            message: String::new(),
        },
        Err(err) => NoteShareResponse {
            ok: false,
            subject: String::new(),
            body: String::new(),
            message: format!("note_share failed: {err}"),
        },
    }
}

/// Opens an editor session on a stored note, or on a new note when `uid`
/// is `None`. Locked notes need `secret`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_open(uid: Option<i64>, secret: Option<String>) -> EditSessionResponse {
    let result = with_note_service(|service| {
        let note = match uid {
            Some(uid) => {
                let note = service.get_note(uid)?;
                require_access(&note, secret.as_deref())?;
                note
            }
            None => {
                let mut note = Note::generate();
                note.color = EditorConfig::default().default_color;
                note
            }
        };
        Ok(note)
    });

    match result {
        Ok(note) => {
            let mut session = EditSession::open(note, EditorConfig::default());
            session.resume();
            let session_id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
            let response = EditSessionResponse::snapshot(session_id, &session, false);
            edit_sessions().insert(session_id, session);
            info!("event=edit_open module=ffi status=ok session_id={session_id}");
            response
        }
        Err(err) => EditSessionResponse::failure(format!("note_edit_open failed: {err}")),
    }
}

/// Applies one editor command; saves when the command requires it.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_apply(session_id: u64, command: BlockCommand) -> EditSessionResponse {
    let result = with_note_service(|service| {
        let command = to_edit_command(command)?;
        with_edit_session(session_id, |session| {
            let saved = session.dispatch(command, service.store_mut())?;
            Ok(EditSessionResponse::snapshot(session_id, session, saved))
        })
    });
    result.unwrap_or_else(|err| {
        EditSessionResponse::failure(format!("note_edit_apply failed: {err}"))
    })
}

/// Changes the color of the note being edited; stored on the next save.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_set_color(session_id: u64, color: u32) -> EditSessionResponse {
    with_edit_session(session_id, |session| {
        session.set_color(color);
        Ok(EditSessionResponse::snapshot(session_id, session, false))
    })
    .unwrap_or_else(|err| {
        EditSessionResponse::failure(format!("note_edit_set_color failed: {err}"))
    })
}

/// Editor left the screen: stops auto-save and flushes pending edits.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_pause(session_id: u64) -> EditSessionResponse {
    let result = with_note_service(|service| {
        with_edit_session(session_id, |session| {
            session.pause(service.store_mut())?;
            Ok(EditSessionResponse::snapshot(session_id, session, false))
        })
    });
    result.unwrap_or_else(|err| {
        EditSessionResponse::failure(format!("note_edit_pause failed: {err}"))
    })
}

/// Editor is visible again; the host should restart its auto-save ticks.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_resume(session_id: u64) -> EditSessionResponse {
    with_edit_session(session_id, |session| {
        session.resume();
        Ok(EditSessionResponse::snapshot(session_id, session, false))
    })
    .unwrap_or_else(|err| {
        EditSessionResponse::failure(format!("note_edit_resume failed: {err}"))
    })
}

/// Auto-save tick driven by the host timer.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_tick(session_id: u64) -> EditTickResponse {
    let result = with_note_service(|service| {
        with_edit_session(session_id, |session| Ok(session.on_timer_tick(service.store_mut())?))
    });
    match result {
        Ok(TimerDecision::Rearm(delay)) => EditTickResponse {
            ok: true,
            rearm_after_ms: Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)),
            message: String::new(),
        },
        Ok(TimerDecision::Stop) => EditTickResponse {
            ok: true,
            rearm_after_ms: None,
            message: String::new(),
        },
        Err(err) => EditTickResponse {
            ok: false,
            rearm_after_ms: None,
            message: format!("note_edit_tick failed: {err}"),
        },
    }
}

/// Ends an editor session. The session id is released even when the final
/// save fails.
#[flutter_rust_bridge::frb(sync)]
pub fn note_edit_finish(session_id: u64) -> EditFinishResponse {
    let result = with_note_service(|service| {
        let session = edit_sessions()
            .remove(&session_id)
            .ok_or(CallError::UnknownSession(session_id))?;
        Ok(session.finish(service.store_mut())?)
    });
    let (outcome, uid) = match result {
        Ok(SessionExit::Discarded) => ("discarded", None),
        Ok(SessionExit::Deleted) => ("deleted", None),
        Ok(SessionExit::Saved(note)) => ("saved", note.uid),
        Err(err) => {
            return EditFinishResponse {
                ok: false,
                outcome: String::new(),
                uid: None,
                message: format!("note_edit_finish failed: {err}"),
            };
        }
    };
    info!("event=edit_finish module=ffi status=ok session_id={session_id} outcome={outcome}");
    EditFinishResponse {
        ok: true,
        outcome: outcome.to_string(),
        uid,
        message: String::new(),
    }
}

/// Failure inside one FFI call before it is flattened to a message.
#[derive(Debug)]
enum CallError {
    Service(NoteServiceError),
    VerificationRequired,
    UnknownSession(u64),
    InvalidArgument(String),
}

impl Display for CallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::VerificationRequired => write!(f, "verification required: note is locked"),
            Self::UnknownSession(id) => write!(f, "unknown edit session: {id}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
        }
    }
}

impl From<NoteServiceError> for CallError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for CallError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

fn respond(
    operation: &str,
    success_message: &str,
    result: Result<NoteId, String>,
) -> NoteActionResponse {
    match result {
        Ok(uid) => NoteActionResponse::success(success_message, uid),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation}");
            NoteActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn parse_state_arg(raw: &str) -> Result<NoteState, String> {
    match NoteState::parse(raw.trim()) {
        StateParse::Recognized(state) => Ok(state),
        StateParse::Fallback => Err(format!(
            "unknown note state `{}`; expected DEFAULT|FAVOURITE|ARCHIVED|TRASH",
            raw.trim()
        )),
    }
}

fn parse_format_type(tag: &str) -> Result<FormatType, CallError> {
    FormatType::from_tag(tag.trim())
        .ok_or_else(|| CallError::InvalidArgument(format!("unknown block type `{}`", tag.trim())))
}

fn to_edit_command(command: BlockCommand) -> Result<EditCommand, CallError> {
    let index = |value: u32| usize::try_from(value).unwrap_or(usize::MAX);
    let converted = match command {
        BlockCommand::Append { format_type } => {
            EditCommand::Append(parse_format_type(&format_type)?)
        }
        BlockCommand::InsertAtFocus { format_type } => {
            EditCommand::InsertAtFocus(parse_format_type(&format_type)?)
        }
        BlockCommand::Move { from, to } => EditCommand::Move {
            from: index(from),
            to: index(to),
        },
        BlockCommand::Delete { uid } => EditCommand::Delete { uid },
        BlockCommand::SetType { uid, format_type } => EditCommand::SetType {
            uid,
            format_type: parse_format_type(&format_type)?,
        },
        BlockCommand::SetText { uid, text } => EditCommand::SetText { uid, text },
        BlockCommand::Replace {
            uid,
            format_type,
            text,
        } => {
            let mut format = Format::with_text(parse_format_type(&format_type)?, text);
            format.uid = uid;
            EditCommand::Replace(format)
        }
        BlockCommand::SetChecked { uid, checked } => EditCommand::SetChecked { uid, checked },
        BlockCommand::Focus { uid } => EditCommand::Focus(uid),
    };
    Ok(converted)
}

fn require_access(note: &Note, secret: Option<&str>) -> Result<(), CallError> {
    let pincode = PINCODE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_default();
    match with_secret(note, &PincodeVerifier::new(pincode), secret, |_| ()) {
        AccessOutcome::Granted(()) => Ok(()),
        AccessOutcome::Cancelled => Err(CallError::VerificationRequired),
    }
}

fn edit_sessions() -> MutexGuard<'static, BTreeMap<u64, EditSession>> {
    EDIT_SESSIONS.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_edit_session<T>(
    session_id: u64,
    f: impl FnOnce(&mut EditSession) -> Result<T, CallError>,
) -> Result<T, CallError> {
    let mut sessions = edit_sessions();
    let session = sessions
        .get_mut(&session_id)
        .ok_or(CallError::UnknownSession(session_id))?;
    f(session)
}

fn resolve_notes_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("QUICKNOTE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(NOTES_DB_FILE_NAME)
        })
        .clone()
}

fn with_note_service<T>(
    f: impl FnOnce(&mut NoteService<SqliteNoteRepository<'_>>) -> Result<T, CallError>,
) -> Result<T, String> {
    let db_path = resolve_notes_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("notes DB open failed: {err}"))?;
    let repo = SqliteNoteRepository::try_new(&conn)
        .map_err(|err| format!("notes repo init failed: {err}"))?;
    let mut service = NoteService::new(repo);
    f(&mut service).map_err(|err| err.to_string())
}

fn to_card_item(card: NoteCard) -> NoteCardItem {
    NoteCardItem {
        uid: card.uid,
        title: card.title,
        body: card.body,
        display_timestamp: card.display_timestamp,
        color: card.color,
        locked: card.locked,
    }
}

fn to_block_item(format: &Format) -> BlockItem {
    BlockItem {
        uid: format.uid,
        format_type: format.format_type.as_str().to_string(),
        text: format.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        access_set_pincode, core_version, init_logging, note_create, note_delete_or_trash,
        note_edit_apply, note_edit_finish, note_edit_open, note_edit_pause, note_edit_tick,
        note_mark, note_set_locked, note_share, notes_list, ping, resolve_notes_db_path,
        BlockCommand,
    };
    use quicknote_core::db::open_db;
    use rusqlite::{params, Connection, OptionalExtension};
    use std::time::{SystemTime, UNIX_EPOCH};

    // Every test that needs the process-wide pincode sets this same value.
    const TEST_PINCODE: &str = "2468";

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn created_note_is_listed_and_searchable() {
        let token = unique_token("list");
        let created = note_create(token.clone(), "body text".to_string());
        assert!(created.ok, "{}", created.message);
        let uid = created.uid.expect("created note should return uid");

        let response = notes_list("DEFAULT".to_string(), Some(token.clone()));
        let item = response
            .items
            .iter()
            .find(|item| item.uid == uid)
            .expect("created note should be listed");
        assert_eq!(item.title.as_deref(), Some(token.as_str()));
        assert_eq!(item.body, "body text");
    }

    #[test]
    fn locked_note_content_needs_the_pincode() {
        access_set_pincode(TEST_PINCODE.to_string());
        let uid = locked_note("locked", "hidden");

        let response = notes_list("DEFAULT".to_string(), None);
        let item = response
            .items
            .iter()
            .find(|item| item.uid == uid)
            .expect("locked note should be listed");
        assert!(item.body.starts_with("****"));

        let denied = note_share(uid, None);
        assert!(!denied.ok);
        assert!(denied.body.is_empty());
        assert!(denied.message.contains("verification required"));
        assert!(!note_share(uid, Some("0000".to_string())).ok);

        let granted = note_share(uid, Some(TEST_PINCODE.to_string()));
        assert!(granted.ok, "{}", granted.message);
        assert_eq!(granted.body, "hidden");
    }

    #[test]
    fn unlocking_needs_the_pincode() {
        access_set_pincode(TEST_PINCODE.to_string());
        let uid = locked_note("unlock", "x");

        let denied = note_set_locked(uid, false, None);
        assert!(!denied.ok);
        assert!(denied.message.contains("verification required"));
        assert_eq!(stored_column::<bool>(uid, "locked"), Some(true));

        assert!(note_set_locked(uid, false, Some(TEST_PINCODE.to_string())).ok);
        assert_eq!(stored_column::<bool>(uid, "locked"), Some(false));
    }

    #[test]
    fn deleting_a_locked_note_needs_the_pincode() {
        access_set_pincode(TEST_PINCODE.to_string());
        let uid = locked_note("locked-delete", "x");

        assert!(!note_delete_or_trash(uid, None).ok);
        assert_eq!(
            stored_column::<String>(uid, "state").as_deref(),
            Some("DEFAULT")
        );

        let trashed = note_delete_or_trash(uid, Some(TEST_PINCODE.to_string()));
        assert_eq!(trashed.message, "Moved to trash.");
    }

    #[test]
    fn mark_rejects_unknown_state_and_keeps_the_stored_one() {
        let uid = note_create(unique_token("mark"), "x".to_string())
            .uid
            .expect("created note should return uid");
        assert!(note_mark(uid, "ARCHIVED".to_string()).ok);

        let rejected = note_mark(uid, "bogus".to_string());
        assert!(!rejected.ok);
        assert!(rejected.message.contains("unknown note state"));
        assert_eq!(
            stored_column::<String>(uid, "state").as_deref(),
            Some("ARCHIVED")
        );
    }

    #[test]
    fn delete_or_trash_is_two_step() {
        let uid = note_create(unique_token("delete"), "x".to_string())
            .uid
            .expect("created note should return uid");
        assert_eq!(note_delete_or_trash(uid, None).message, "Moved to trash.");
        assert_eq!(note_delete_or_trash(uid, None).message, "Note deleted.");
        let missing = note_delete_or_trash(uid, None);
        assert!(!missing.ok);
        assert!(missing.message.contains("not found"));
    }

    #[test]
    fn edit_session_writes_blocks_and_stops_after_pause() {
        let opened = note_edit_open(None, None);
        assert!(opened.ok, "{}", opened.message);
        let session_id = opened.session_id.expect("session id");
        let types: Vec<&str> = opened
            .blocks
            .iter()
            .map(|block| block.format_type.as_str())
            .collect();
        assert_eq!(types, vec!["HEADING", "TEXT"]);
        assert_eq!(opened.note_uid, None);

        let heading = opened.blocks[0].uid;
        let text = opened.blocks[1].uid;
        let title = unique_token("trip");
        let edited = note_edit_apply(
            session_id,
            BlockCommand::SetText {
                uid: heading,
                text: title.clone(),
            },
        );
        assert!(!edited.saved);
        note_edit_apply(
            session_id,
            BlockCommand::SetType {
                uid: text,
                format_type: "CHECKLIST_UNCHECKED".to_string(),
            },
        );
        note_edit_apply(
            session_id,
            BlockCommand::SetText {
                uid: text,
                text: "passport".to_string(),
            },
        );
        let checked = note_edit_apply(
            session_id,
            BlockCommand::SetChecked {
                uid: text,
                checked: true,
            },
        );
        assert!(checked.ok, "{}", checked.message);
        assert!(checked.saved);
        let uid = checked.note_uid.expect("saved note uid");

        assert_eq!(
            stored_column::<String>(uid, "title").as_deref(),
            Some("RICH_NOTE")
        );
        let description = stored_column::<String>(uid, "description").unwrap_or_default();
        assert!(description.contains("CHECKLIST_CHECKED"));
        assert!(description.contains(&title));

        assert_eq!(note_edit_tick(session_id).rearm_after_ms, Some(1000));
        assert!(note_edit_pause(session_id).ok);
        assert_eq!(note_edit_tick(session_id).rearm_after_ms, None);

        let finished = note_edit_finish(session_id);
        assert!(finished.ok, "{}", finished.message);
        assert_eq!(finished.outcome, "saved");
        assert_eq!(finished.uid, Some(uid));
        assert!(!note_edit_tick(session_id).ok);
    }

    #[test]
    fn emptied_note_is_deleted_when_the_session_finishes() {
        let uid = note_create(String::new(), unique_token("empty"))
            .uid
            .expect("created note should return uid");
        let opened = note_edit_open(Some(uid), None);
        assert!(opened.ok, "{}", opened.message);
        let session_id = opened.session_id.expect("session id");
        let body = opened.blocks[1].uid;

        note_edit_apply(
            session_id,
            BlockCommand::SetText {
                uid: body,
                text: String::new(),
            },
        );
        let finished = note_edit_finish(session_id);
        assert_eq!(finished.outcome, "deleted");
        assert_eq!(stored_column::<String>(uid, "state"), None);
    }

    #[test]
    fn edit_commands_are_validated() {
        let opened = note_edit_open(None, None);
        let session_id = opened.session_id.expect("session id");

        let bad_type = note_edit_apply(
            session_id,
            BlockCommand::Append {
                format_type: "PARAGRAPH".to_string(),
            },
        );
        assert!(!bad_type.ok);
        assert!(bad_type.message.contains("unknown block type"));

        let heading_delete = note_edit_apply(
            session_id,
            BlockCommand::Delete {
                uid: opened.blocks[0].uid,
            },
        );
        assert!(heading_delete.ok);
        assert_eq!(heading_delete.blocks.len(), 2);

        assert_eq!(note_edit_finish(session_id).outcome, "discarded");
        assert!(!note_edit_apply(session_id, BlockCommand::Focus { uid: None }).ok);
    }

    #[test]
    fn editing_a_locked_note_needs_the_pincode() {
        access_set_pincode(TEST_PINCODE.to_string());
        let uid = locked_note("locked-edit", "x");

        let denied = note_edit_open(Some(uid), None);
        assert!(!denied.ok);
        assert!(denied.session_id.is_none());

        let granted = note_edit_open(Some(uid), Some(TEST_PINCODE.to_string()));
        let session_id = granted.session_id.expect("session id");
        assert_eq!(note_edit_finish(session_id).outcome, "saved");
    }

    fn locked_note(prefix: &str, body: &str) -> i64 {
        let uid = note_create(unique_token(prefix), body.to_string())
            .uid
            .expect("created note should return uid");
        assert!(note_set_locked(uid, true, None).ok);
        uid
    }

    fn stored_column<T: rusqlite::types::FromSql>(uid: i64, column: &str) -> Option<T> {
        let conn: Connection = open_db(resolve_notes_db_path()).expect("open db");
        conn.query_row(
            &format!("SELECT {column} FROM note WHERE uid = ?1"),
            params![uid],
            |row| row.get(0),
        )
        .optional()
        .expect("query note row")
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

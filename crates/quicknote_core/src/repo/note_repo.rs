//! Note persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the persistence port the note aggregate saves through.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `insert` has insert-or-replace semantics keyed by `uid`.
//! - `list_all` is ordered by `timestamp DESC, uid DESC`.
//! - The stored `state` text is returned verbatim; parsing happens at use.
//!
//! # See also
//! - crate::model::note

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    uid,
    title,
    description,
    display_timestamp,
    timestamp,
    color,
    state,
    locked
FROM note";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; open the database with `open_db` first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence port for notes.
///
/// Calls are synchronous; retries are the implementation's concern.
pub trait NoteStore {
    /// Inserts or replaces the note and returns its identity.
    fn insert(&mut self, note: &Note) -> RepoResult<NoteId>;
    /// Removes the persisted record of `note`.
    fn delete(&mut self, note: &Note) -> RepoResult<()>;
    fn get(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// All notes, newest first.
    fn list_all(&self) -> RepoResult<Vec<Note>>;
}

impl<S: NoteStore + ?Sized> NoteStore for &mut S {
    fn insert(&mut self, note: &Note) -> RepoResult<NoteId> {
        (**self).insert(note)
    }

    fn delete(&mut self, note: &Note) -> RepoResult<()> {
        (**self).delete(note)
    }

    fn get(&self, id: NoteId) -> RepoResult<Option<Note>> {
        (**self).get(id)
    }

    fn list_all(&self) -> RepoResult<Vec<Note>> {
        (**self).list_all()
    }
}

/// SQLite-backed note store.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "note")? {
            return Err(RepoError::MissingRequiredTable("note"));
        }
        Ok(Self { conn })
    }
}

impl NoteStore for SqliteNoteRepository<'_> {
    fn insert(&mut self, note: &Note) -> RepoResult<NoteId> {
        let existing = note.uid.filter(|uid| *uid != 0);
        let result = self.conn.execute(
            "INSERT OR REPLACE INTO note (
                uid,
                title,
                description,
                display_timestamp,
                timestamp,
                color,
                state,
                locked
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                existing,
                note.title.as_str(),
                note.description.as_str(),
                note.display_timestamp.as_str(),
                note.timestamp,
                i64::from(note.color),
                note.state.as_str(),
                bool_to_int(note.locked),
            ],
        );

        if let Err(err) = result {
            error!("event=note_save module=repo status=error error={err}");
            return Err(err.into());
        }

        let id = existing.unwrap_or_else(|| self.conn.last_insert_rowid());
        info!(
            "event=note_save module=repo status=ok uid={id} mode={}",
            if existing.is_some() { "update" } else { "insert" }
        );
        Ok(id)
    }

    fn delete(&mut self, note: &Note) -> RepoResult<()> {
        let Some(uid) = note.uid.filter(|uid| *uid != 0) else {
            return Ok(());
        };

        let changed = self
            .conn
            .execute("DELETE FROM note WHERE uid = ?1;", [uid])?;
        if changed == 0 {
            return Err(RepoError::NotFound(uid));
        }

        Ok(())
    }

    fn get(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uid = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY timestamp DESC, uid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uid: NoteId = row.get("uid")?;
    let color_raw: i64 = row.get("color")?;
    let color = u32::try_from(color_raw).map_err(|_| {
        RepoError::InvalidData(format!("invalid color value `{color_raw}` in note.color"))
    })?;

    let locked = match row.get::<_, i64>("locked")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid locked value `{other}` in note.locked"
            )));
        }
    };

    Ok(Note {
        uid: Some(uid),
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        display_timestamp: row
            .get::<_, Option<String>>("display_timestamp")?
            .unwrap_or_default(),
        timestamp: row.get::<_, Option<i64>>("timestamp")?.unwrap_or_default(),
        color,
        state: row.get::<_, Option<String>>("state")?.unwrap_or_default(),
        locked,
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

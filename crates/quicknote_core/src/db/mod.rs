//! Note database bootstrap.
//!
//! # Responsibility
//! - Hand out SQLite connections whose note table is ready for use.
//! - Report open and schema failures with the context needed to act on them.
//!
//! # Invariants
//! - The note schema version is `PRAGMA user_version`.
//! - A connection is only returned after the note schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::NOTE_SCHEMA_VERSION;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened or created.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    /// Upgrading the note table to `version` failed; nothing was committed.
    SchemaSetup {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a note schema written by a newer build.
    NewerNoteSchema { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open note database `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaSetup { version, source } => {
                write!(f, "note schema upgrade to v{version} failed: {source}")
            }
            Self::NewerNoteSchema { found, supported } => write!(
                f,
                "note database uses schema v{found}; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::SchemaSetup { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::NewerNoteSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

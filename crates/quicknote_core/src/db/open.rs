//! Connection bootstrap for the note database.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout set.
//! - Returned connections carry the current note schema.

use super::schema::ensure_note_schema;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) a note database file.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", path, || Connection::open(path))
}

/// Opens a private in-memory note database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Path::new(":memory:"), Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    path: &Path,
    opener: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let result = opener()
        .map_err(|source| DbError::Open {
            path: PathBuf::from(path),
            source,
        })
        .and_then(|mut conn| {
            prepare_connection(&mut conn)?;
            Ok(conn)
        });

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

fn prepare_connection(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    ensure_note_schema(conn)
}

//! Note table schema steps.
//!
//! Step `n` (1-based) upgrades a database from schema `n - 1` to `n`.
//! Pending steps run in one transaction.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[&str] = &[include_str!("sql/0001_note.sql")];

/// Note schema version written by this build.
pub const NOTE_SCHEMA_VERSION: u32 = SCHEMA_STEPS.len() as u32;

/// Brings the note table up to [`NOTE_SCHEMA_VERSION`].
pub(super) fn ensure_note_schema(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > NOTE_SCHEMA_VERSION {
        return Err(DbError::NewerNoteSchema {
            found,
            supported: NOTE_SCHEMA_VERSION,
        });
    }

    let applied = usize::try_from(found).unwrap_or(usize::MAX);
    let pending = SCHEMA_STEPS.get(applied..).unwrap_or_default();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in (found + 1..).zip(pending) {
        tx.execute_batch(sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::SchemaSetup { version, source })?;
    }
    tx.commit()?;
    info!(
        "event=note_schema module=db status=ok from_version={found} to_version={NOTE_SCHEMA_VERSION}"
    );
    Ok(())
}

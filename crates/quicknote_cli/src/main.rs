//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quicknote_core` linkage.
//! - Optionally print note cards from a database file.
//!
//! Usage: `quicknote_cli [DB_PATH [STATE]]`

use quicknote_core::db::open_db;
use quicknote_core::{NoteService, NoteState, SqliteNoteRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("quicknote_core ping={}", quicknote_core::ping());
    println!("quicknote_core version={}", quicknote_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let state = NoteState::parse(args.next().as_deref().unwrap_or("DEFAULT")).state();

    match list_cards(&db_path, state) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("quicknote_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn list_cards(db_path: &str, state: NoteState) -> Result<Vec<String>, String> {
    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = NoteService::new(repo);
    let cards = service.note_cards(state).map_err(|err| err.to_string())?;

    Ok(cards
        .into_iter()
        .map(|card| {
            // Bodies are single-line in the listing.
            let body = card.body.replace('\n', " / ");
            match card.title {
                Some(title) => format!(
                    "#{} [{}] {title}: {body}",
                    card.uid, card.display_timestamp
                ),
                None => format!("#{} [{}] {body}", card.uid, card.display_timestamp),
            }
        })
        .collect())
}

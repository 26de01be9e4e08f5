//! Note option rules.
//!
//! Decides which actions the options sheet offers for a note, given its
//! workflow state and whether the editor is open.

use crate::model::note::{Note, NoteState};

/// One entry of the note options sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteAction {
    Restore,
    Edit,
    Favourite,
    Unfavourite,
    Archive,
    Unarchive,
    Share,
    Copy,
    DeletePermanently,
    Trash,
    ChooseColor,
    Popup,
}

/// Visible actions for `note`, in display order.
pub fn note_actions(note: &Note, edit_mode: bool) -> Vec<NoteAction> {
    let state = note.note_state();
    let browsing = !edit_mode;
    let rules = [
        (NoteAction::Restore, state == NoteState::Trash),
        (NoteAction::Edit, browsing),
        (
            NoteAction::Unfavourite,
            state == NoteState::Favourite && browsing,
        ),
        (
            NoteAction::Favourite,
            state != NoteState::Favourite && browsing,
        ),
        (
            NoteAction::Unarchive,
            state == NoteState::Archived && browsing,
        ),
        (NoteAction::Archive, state != NoteState::Archived && browsing),
        (NoteAction::Share, true),
        (NoteAction::Copy, true),
        (
            NoteAction::DeletePermanently,
            state == NoteState::Trash && browsing,
        ),
        (NoteAction::Trash, state != NoteState::Trash && browsing),
        (NoteAction::ChooseColor, true),
        (NoteAction::Popup, true),
    ];

    rules
        .into_iter()
        .filter_map(|(action, visible)| visible.then_some(action))
        .collect()
}

/// Target state of a state-changing action, if any.
pub fn target_state(action: NoteAction) -> Option<NoteState> {
    match action {
        NoteAction::Favourite => Some(NoteState::Favourite),
        NoteAction::Archive => Some(NoteState::Archived),
        NoteAction::Trash => Some(NoteState::Trash),
        NoteAction::Restore | NoteAction::Unfavourite | NoteAction::Unarchive => {
            Some(NoteState::Default)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{note_actions, target_state, NoteAction};
    use crate::model::note::{Note, NoteState};

    #[test]
    fn default_note_outside_editor_offers_favourite_archive_and_trash() {
        let note = Note::generate_from_text("t", "b");
        let actions = note_actions(&note, false);
        assert!(actions.contains(&NoteAction::Favourite));
        assert!(actions.contains(&NoteAction::Archive));
        assert!(actions.contains(&NoteAction::Trash));
        assert!(!actions.contains(&NoteAction::Restore));
        assert!(!actions.contains(&NoteAction::DeletePermanently));
    }

    #[test]
    fn restore_maps_back_to_default() {
        assert_eq!(target_state(NoteAction::Restore), Some(NoteState::Default));
        assert_eq!(target_state(NoteAction::Share), None);
    }
}

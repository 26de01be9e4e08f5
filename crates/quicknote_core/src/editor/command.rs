//! Block-list command protocol.
//!
//! # Responsibility
//! - Express every editor mutation as a command value.
//! - Apply commands as a pure function returning the new list and whether
//!   the change must be persisted right away.
//!
//! # Invariants
//! - The block at index 0 can never be deleted.
//! - New blocks always receive `max_uid + 1`; `max_uid` only grows.
//! - `Move` is an adjacent-swap chain: every block between the two indices
//!   shifts by exactly one slot, the relative order of the others is kept.

use crate::model::format::{find_format_index, Format, FormatType};

/// Editable block list plus session bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    pub formats: Vec<Format>,
    /// Highest uid handed out so far (seeded from the block count).
    pub max_uid: u32,
    /// uid of the block the editing surface considers active.
    pub focused: Option<u32>,
}

impl BlockList {
    /// Starts a list from decoded blocks.
    ///
    /// Blocks are renumbered `1..=n` and `max_uid` is seeded to `n + 1`, so
    /// blocks coming from the codec with missing or repeated uids stay
    /// addressable.
    pub fn new(mut formats: Vec<Format>) -> Self {
        for (index, format) in formats.iter_mut().enumerate() {
            format.uid = uid_after(index);
        }
        let max_uid = uid_after(formats.len());
        Self {
            formats,
            max_uid,
            focused: None,
        }
    }

    /// Enforces the editing start shape.
    ///
    /// A blank HEADING is put first unless one is already there, and an
    /// empty list also receives one TEXT block.
    pub fn ensure_heading(&mut self) {
        let was_empty = self.formats.is_empty();
        let starts_with_heading = self
            .formats
            .first()
            .is_some_and(|first| first.format_type == FormatType::Heading);
        if !starts_with_heading {
            self.insert_empty(0, FormatType::Heading);
        }
        if was_empty {
            self.insert_empty(self.formats.len(), FormatType::Text);
        }
    }

    pub fn index_of(&self, uid: u32) -> Option<usize> {
        find_format_index(&self.formats, uid)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    fn insert_empty(&mut self, position: usize, format_type: FormatType) -> u32 {
        self.max_uid = self.max_uid.saturating_add(1);
        let mut format = Format::new(format_type);
        format.uid = self.max_uid;
        self.formats.insert(position, format);
        self.max_uid
    }

    fn insert_at_focus(&mut self, format_type: FormatType) -> u32 {
        let position = self
            .focused
            .and_then(|uid| self.index_of(uid))
            .map_or(self.formats.len(), |index| index + 1);
        self.insert_empty(position, format_type)
    }

    fn move_block(&mut self, from: usize, to: usize) -> bool {
        let len = self.formats.len();
        if from >= len || to >= len {
            return false;
        }
        if from < to {
            for index in from..to {
                self.formats.swap(index, index + 1);
            }
        } else {
            for index in (to + 1..=from).rev() {
                self.formats.swap(index, index - 1);
            }
        }
        true
    }

    fn delete_block(&mut self, uid: u32) -> bool {
        match self.index_of(uid) {
            Some(index) if index > 0 => {
                self.formats.remove(index);
                if self.focused == Some(uid) {
                    self.focused = None;
                }
                true
            }
            _ => false,
        }
    }

    fn update_block(&mut self, uid: u32, update: impl FnOnce(&mut Format) -> bool) -> bool {
        match self.index_of(uid) {
            Some(index) => update(&mut self.formats[index]),
            None => false,
        }
    }
}

/// `position + 1` as a block uid, saturating at `u32::MAX`.
fn uid_after(position: usize) -> u32 {
    u32::try_from(position)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

/// One editor mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Add an empty block at the end.
    Append(FormatType),
    /// Add an empty block right after the focused one (or at the end).
    InsertAtFocus(FormatType),
    /// Reposition the block at `from` to index `to`.
    Move { from: usize, to: usize },
    Delete { uid: u32 },
    SetType { uid: u32, format_type: FormatType },
    SetText { uid: u32, text: String },
    /// Replace the block carrying the same uid.
    Replace(Format),
    SetChecked { uid: u32, checked: bool },
    Focus(Option<u32>),
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub list: BlockList,
    /// Whether the caller must persist the note immediately.
    pub save_required: bool,
}

/// Applies `command` to `list`.
///
/// Rejected commands (delete at index 0, unknown uid, out-of-range move)
/// return the list unchanged with `save_required == false`.
pub fn apply(mut list: BlockList, command: EditCommand) -> Applied {
    let save_required = match command {
        EditCommand::Append(format_type) => {
            let end = list.formats.len();
            list.insert_empty(end, format_type);
            false
        }
        EditCommand::InsertAtFocus(format_type) => {
            list.insert_at_focus(format_type);
            false
        }
        EditCommand::Move { from, to } => list.move_block(from, to),
        EditCommand::Delete { uid } => list.delete_block(uid),
        EditCommand::SetType { uid, format_type } => {
            list.update_block(uid, |format| {
                format.format_type = format_type;
                true
            });
            false
        }
        EditCommand::SetText { uid, text } => {
            list.update_block(uid, |format| {
                format.text = text;
                true
            });
            false
        }
        EditCommand::Replace(replacement) => {
            list.update_block(replacement.uid, |format| {
                *format = replacement;
                true
            });
            false
        }
        EditCommand::SetChecked { uid, checked } => {
            list.update_block(uid, |format| format.toggle_checked(checked))
        }
        EditCommand::Focus(uid) => {
            list.focused = uid;
            false
        }
    };

    Applied {
        list,
        save_required,
    }
}

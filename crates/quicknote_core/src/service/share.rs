//! Share and copy hand-off.
//!
//! The platform share sheet and clipboard are external; this module only
//! decides what text they receive.

use crate::model::note::Note;

/// Platform share collaborator.
pub trait ShareTarget {
    fn share(&mut self, subject: &str, body: &str);
}

/// Platform clipboard collaborator.
pub trait ClipboardTarget {
    fn copy(&mut self, text: &str);
}

pub fn share_note<T: ShareTarget + ?Sized>(note: &Note, target: &mut T) {
    let payload = note.share_payload();
    target.share(&payload.subject, &payload.body);
}

pub fn copy_note<T: ClipboardTarget + ?Sized>(note: &Note, target: &mut T) {
    target.copy(&note.display_text());
}

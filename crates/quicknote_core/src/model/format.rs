//! Format block model and description codec.
//!
//! # Responsibility
//! - Define the typed content blocks a note is composed of.
//! - Encode/decode the ordered block list stored in `Note.description`.
//!
//! # Invariants
//! - `uid` is unique within one note's block list, not across notes.
//! - `decode_formats` is total: malformed input degrades to an empty list.
//! - `decode_formats(&encode_formats(list)) == list` for every list.

use log::warn;
use serde::{Deserialize, Serialize};

/// Content block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatType {
    Heading,
    SubHeading,
    Text,
    ChecklistChecked,
    ChecklistUnchecked,
    Quote,
    Code,
}

impl FormatType {
    /// Returns whether this block renders as a checklist item.
    pub fn is_checklist(self) -> bool {
        matches!(self, Self::ChecklistChecked | Self::ChecklistUnchecked)
    }

    /// Stable tag used in the serialized description.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "HEADING",
            Self::SubHeading => "SUB_HEADING",
            Self::Text => "TEXT",
            Self::ChecklistChecked => "CHECKLIST_CHECKED",
            Self::ChecklistUnchecked => "CHECKLIST_UNCHECKED",
            Self::Quote => "QUOTE",
            Self::Code => "CODE",
        }
    }

    /// Inverse of [`FormatType::as_str`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        [
            Self::Heading,
            Self::SubHeading,
            Self::Text,
            Self::ChecklistChecked,
            Self::ChecklistUnchecked,
            Self::Quote,
            Self::Code,
        ]
        .into_iter()
        .find(|format_type| format_type.as_str() == tag)
    }
}

/// One typed, orderable content segment of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// Identifier assigned by the editing session.
    #[serde(default)]
    pub uid: u32,
    #[serde(rename = "format")]
    pub format_type: FormatType,
    #[serde(default)]
    pub text: String,
}

impl Format {
    /// Creates an empty block of the given kind.
    pub fn new(format_type: FormatType) -> Self {
        Self::with_text(format_type, String::new())
    }

    pub fn with_text(format_type: FormatType, text: impl Into<String>) -> Self {
        Self {
            uid: 0,
            format_type,
            text: text.into(),
        }
    }

    /// Switches a checklist block between checked and unchecked.
    ///
    /// Returns `true` when the block changed. Non-checklist blocks are left
    /// untouched.
    pub fn toggle_checked(&mut self, checked: bool) -> bool {
        if !self.format_type.is_checklist() {
            return false;
        }
        let target = if checked {
            FormatType::ChecklistChecked
        } else {
            FormatType::ChecklistUnchecked
        };
        if self.format_type == target {
            return false;
        }
        self.format_type = target;
        true
    }
}

#[derive(Serialize)]
struct EncodedNote<'a> {
    note: &'a [Format],
}

#[derive(Deserialize)]
struct DecodedNote {
    #[serde(default)]
    note: Vec<Format>,
}

/// Serializes an ordered block list into a description string.
pub fn encode_formats(formats: &[Format]) -> String {
    match serde_json::to_string(&EncodedNote { note: formats }) {
        Ok(encoded) => encoded,
        // Plain structs with string/enum/int fields cannot fail to serialize.
        Err(_) => String::from("{\"note\":[]}"),
    }
}

/// Parses a description string into its ordered block list.
///
/// Blank or malformed input yields an empty list.
pub fn decode_formats(serialized: &str) -> Vec<Format> {
    let trimmed = serialized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<DecodedNote>(trimmed) {
        Ok(decoded) => decoded.note,
        Err(err) => {
            warn!(
                "event=format_decode module=model status=degraded input_len={} error_line={} error_column={}",
                trimmed.len(),
                err.line(),
                err.column()
            );
            Vec::new()
        }
    }
}

/// Locates a block by uid.
///
/// `None` is the not-found sentinel.
pub fn find_format_index(formats: &[Format], uid: u32) -> Option<usize> {
    formats.iter().position(|format| format.uid == uid)
}

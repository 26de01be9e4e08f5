//! Note aggregate.
//!
//! # Responsibility
//! - Hold note metadata plus the serialized block list (`description`).
//! - Derive read-time projections (title, display text, masked text).
//! - Trigger persistence through an explicitly injected `NoteStore`.
//!
//! # Invariants
//! - `uid == None` or `uid == Some(0)` means the note was never persisted.
//! - `description` always round-trips through the format codec.
//! - Workflow state is stored as text and parsed totally (`DEFAULT` fallback).
//! - `title` carries the note kind tag, never the user-visible title.

use crate::config::DEFAULT_NOTE_COLOR;
use crate::model::format::{decode_formats, encode_formats, Format, FormatType};
use crate::repo::note_repo::{NoteStore, RepoResult};
use chrono::{Local, TimeZone};
use log::info;
use regex::RegexBuilder;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Persisted note identity assigned by the store.
pub type NoteId = i64;

/// Masked body shown in list views for locked notes.
pub const LOCKED_MASK: &str = "******************\n***********\n****************";

const DISPLAY_DATE_FORMAT: &str = "%d %B %Y";

/// Lifecycle bucket of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteState {
    Default,
    Trash,
    Favourite,
    Archived,
}

/// Outcome of parsing a stored workflow state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateParse {
    Recognized(NoteState),
    /// Unknown or missing tag; treated as `NoteState::Default`.
    Fallback,
}

impl StateParse {
    /// Effective state after applying the `DEFAULT` fallback.
    pub fn state(self) -> NoteState {
        match self {
            Self::Recognized(state) => state,
            Self::Fallback => NoteState::Default,
        }
    }
}

impl NoteState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Trash => "TRASH",
            Self::Favourite => "FAVOURITE",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Parses a stored state tag. Never fails.
    pub fn parse(value: &str) -> StateParse {
        match value {
            "DEFAULT" => StateParse::Recognized(Self::Default),
            "TRASH" => StateParse::Recognized(Self::Trash),
            "FAVOURITE" => StateParse::Recognized(Self::Favourite),
            "ARCHIVED" => StateParse::Recognized(Self::Archived),
            _ => StateParse::Fallback,
        }
    }
}

/// Note kind tag stored in `Note.title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// Created from a plain title/body pair.
    Note,
    /// Edited through the block editor.
    RichNote,
}

impl NoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::RichNote => "RICH_NOTE",
        }
    }
}

/// Exported note representation used by import/export flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportableNote {
    #[serde(default)]
    pub title: String,
    /// Written as a signed 32-bit integer, the way exported files carry it.
    #[serde(
        default = "default_color",
        deserialize_with = "deserialize_argb",
        serialize_with = "serialize_argb"
    )]
    pub color: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_timestamp: String,
    #[serde(default)]
    pub timestamp: i64,
}

fn default_color() -> u32 {
    DEFAULT_NOTE_COLOR
}

/// Maps a color read as either a signed or an unsigned 32-bit value to ARGB.
fn argb_from_wire(raw: i64) -> Option<u32> {
    u32::try_from(raw)
        .ok()
        .or_else(|| i32::try_from(raw).ok().map(|signed| signed as u32))
}

fn deserialize_argb<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    argb_from_wire(raw)
        .ok_or_else(|| D::Error::custom(format!("color `{raw}` is outside the 32-bit range")))
}

fn serialize_argb<S: Serializer>(color: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i32(*color as i32)
}

/// Subject/body pair handed to the sharing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub subject: String,
    pub body: String,
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub uid: Option<NoteId>,
    /// Kind tag (`NOTE` / `RICH_NOTE`), not the display title.
    pub title: String,
    /// Encoded block list.
    pub description: String,
    pub display_timestamp: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// ARGB color.
    pub color: u32,
    /// Raw workflow state tag; see [`Note::note_state`].
    pub state: String,
    pub locked: bool,
}

impl Note {
    /// Creates a blank, unsaved note stamped with the current time.
    pub fn generate() -> Self {
        let now = Local::now();
        Self {
            uid: None,
            title: NoteKind::Note.as_str().to_string(),
            description: encode_formats(&[]),
            display_timestamp: now.format(DISPLAY_DATE_FORMAT).to_string(),
            timestamp: now.timestamp_millis(),
            color: DEFAULT_NOTE_COLOR,
            state: NoteState::Default.as_str().to_string(),
            locked: false,
        }
    }

    /// Creates a note from a plain title/body pair.
    ///
    /// A HEADING block is only created for a non-empty title.
    pub fn generate_from_text(title: &str, description: &str) -> Self {
        let mut note = Self::generate();
        let mut formats = Vec::with_capacity(2);
        if !title.is_empty() {
            formats.push(Format::with_text(FormatType::Heading, title));
        }
        formats.push(Format::with_text(FormatType::Text, description));
        note.title = NoteKind::Note.as_str().to_string();
        note.description = encode_formats(&formats);
        note
    }

    /// Creates an unsaved note from an exported representation.
    pub fn generate_from_import(imported: &ImportableNote) -> Self {
        let mut note = Self::generate();
        note.title = imported.title.clone();
        note.color = imported.color;
        note.description = imported.description.clone();
        note.display_timestamp = imported.display_timestamp.clone();
        note.timestamp = imported.timestamp;
        note
    }

    pub fn to_importable(&self) -> ImportableNote {
        ImportableNote {
            title: self.title.clone(),
            color: self.color,
            description: self.description.clone(),
            display_timestamp: self.display_timestamp.clone(),
            timestamp: self.timestamp,
        }
    }

    pub fn is_unsaved(&self) -> bool {
        matches!(self.uid, None | Some(0))
    }

    /// Decoded block list.
    pub fn formats(&self) -> Vec<Format> {
        decode_formats(&self.description)
    }

    pub fn note_state(&self) -> NoteState {
        NoteState::parse(&self.state).state()
    }

    /// User-visible title: text of the first block when it is a HEADING.
    pub fn title_text(&self) -> String {
        match self.formats().into_iter().next() {
            Some(first) if first.format_type == FormatType::Heading => first.text,
            _ => String::new(),
        }
    }

    /// Body text for list, share and copy surfaces.
    pub fn display_text(&self) -> String {
        let mut text = String::new();
        for format in self.formats() {
            match format.format_type {
                FormatType::Heading => continue,
                FormatType::ChecklistChecked => text.push_str("\u{2611} "),
                FormatType::ChecklistUnchecked => text.push_str("\u{2610} "),
                _ => {}
            }
            text.push_str(&format.text);
            text.push('\n');
        }
        text.trim().to_string()
    }

    /// Display text with locked content masked.
    pub fn locked_display_text(&self) -> String {
        if self.locked {
            return LOCKED_MASK.to_string();
        }
        self.display_text()
    }

    pub fn share_payload(&self) -> SharePayload {
        SharePayload {
            subject: self.title_text(),
            body: self.display_text(),
        }
    }

    /// Case-insensitive keyword match over title and body.
    ///
    /// Every whitespace-separated keyword must occur. Locked notes only
    /// expose their title to search.
    pub fn matches_keywords(&self, keywords: &str) -> bool {
        let haystack = if self.locked {
            self.title_text()
        } else {
            format!("{}\n{}", self.title_text(), self.display_text())
        };

        keywords.split_whitespace().all(|keyword| {
            RegexBuilder::new(&regex::escape(keyword))
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(&haystack))
                .unwrap_or(false)
        })
    }

    /// Persists the note. On first save the store-assigned identity is kept.
    pub fn save<S: NoteStore + ?Sized>(&mut self, store: &mut S) -> RepoResult<()> {
        let id = store.insert(self)?;
        if self.is_unsaved() {
            self.uid = Some(id);
        }
        Ok(())
    }

    /// Removes the persisted record and resets this value to a blank note.
    ///
    /// Unsaved notes are left untouched and the store is not called.
    pub fn delete<S: NoteStore + ?Sized>(&mut self, store: &mut S) -> RepoResult<()> {
        let Some(uid) = self.uid.filter(|uid| *uid != 0) else {
            return Ok(());
        };
        store.delete(self)?;
        info!("event=note_delete module=model status=ok uid={uid}");
        self.description = encode_formats(&[]);
        self.uid = Some(0);
        Ok(())
    }

    /// Sets the workflow state and saves immediately.
    pub fn mark<S: NoteStore + ?Sized>(
        &mut self,
        store: &mut S,
        state: NoteState,
    ) -> RepoResult<()> {
        self.state = state.as_str().to_string();
        self.save(store)
    }

    /// Formats an epoch-millisecond timestamp the way `display_timestamp` is stamped.
    pub fn format_display_timestamp(timestamp_ms: i64) -> String {
        Local
            .timestamp_millis_opt(timestamp_ms)
            .single()
            .map(|time| time.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{argb_from_wire, Note, NoteState, StateParse};

    #[test]
    fn parse_recognizes_known_tags() {
        assert_eq!(
            NoteState::parse("ARCHIVED"),
            StateParse::Recognized(NoteState::Archived)
        );
        assert_eq!(NoteState::parse("archived"), StateParse::Fallback);
        assert_eq!(NoteState::parse("").state(), NoteState::Default);
    }

    #[test]
    fn generate_stamps_defaults() {
        let note = Note::generate();
        assert!(note.is_unsaved());
        assert_eq!(note.color, 0xFF00796B);
        assert_eq!(note.note_state(), NoteState::Default);
        assert!(note.formats().is_empty());
        assert!(!note.display_timestamp.is_empty());
    }

    #[test]
    fn zero_uid_counts_as_unsaved() {
        let mut note = Note::generate();
        note.uid = Some(0);
        assert!(note.is_unsaved());
        note.uid = Some(4);
        assert!(!note.is_unsaved());
    }

    #[test]
    fn wire_colors_accept_signed_and_unsigned_forms() {
        assert_eq!(argb_from_wire(-16_746_133), Some(0xFF00796B));
        assert_eq!(argb_from_wire(4_278_221_163), Some(0xFF00796B));
        assert_eq!(argb_from_wire(0), Some(0));
        assert_eq!(argb_from_wire(i64::from(u32::MAX) + 1), None);
        assert_eq!(argb_from_wire(i64::from(i32::MIN) - 1), None);
    }
}

use quicknote_core::{
    encode_formats, Format, FormatType, ImportableNote, Note, NoteState, LOCKED_MASK,
};

fn note_with(blocks: &[Format]) -> Note {
    let mut note = Note::generate();
    note.description = encode_formats(blocks);
    note
}

fn shopping_note() -> Note {
    note_with(&[
        Format::with_text(FormatType::Heading, "Shop"),
        Format::with_text(FormatType::ChecklistUnchecked, "Milk"),
        Format::with_text(FormatType::Text, "notes"),
    ])
}

#[test]
fn generate_from_text_without_title_has_single_text_block() {
    let note = Note::generate_from_text("", "body");
    assert_eq!(
        note.formats(),
        vec![Format::with_text(FormatType::Text, "body")]
    );
    assert_eq!(note.title, "NOTE");
    assert_eq!(note.title_text(), "");
}

#[test]
fn generate_from_text_with_title_has_heading_then_text() {
    let note = Note::generate_from_text("Title", "body");
    assert_eq!(
        note.formats(),
        vec![
            Format::with_text(FormatType::Heading, "Title"),
            Format::with_text(FormatType::Text, "body"),
        ]
    );
    assert_eq!(note.title_text(), "Title");
}

#[test]
fn title_and_display_text_follow_block_types() {
    let note = shopping_note();
    assert_eq!(note.title_text(), "Shop");
    assert_eq!(note.display_text(), "\u{2610} Milk\nnotes");
}

#[test]
fn display_text_marks_checked_items_and_skips_every_heading() {
    let note = note_with(&[
        Format::with_text(FormatType::Text, "intro"),
        Format::with_text(FormatType::Heading, "middle heading"),
        Format::with_text(FormatType::ChecklistChecked, "done"),
        Format::with_text(FormatType::Code, "  x = 1  "),
    ]);
    assert_eq!(note.title_text(), "");
    assert_eq!(note.display_text(), "intro\n\u{2611} done\n  x = 1");
}

#[test]
fn empty_note_renders_no_content() {
    let note = Note::generate();
    assert_eq!(note.display_text(), "");
    assert_eq!(note.title_text(), "");
}

#[test]
fn locked_note_masks_display_text() {
    let mut note = shopping_note();
    note.locked = true;
    assert_eq!(note.locked_display_text(), LOCKED_MASK);

    note.locked = false;
    assert_eq!(note.locked_display_text(), note.display_text());
}

#[test]
fn malformed_description_degrades_to_empty_projections() {
    let mut note = Note::generate();
    note.description = "{broken".to_string();
    assert!(note.formats().is_empty());
    assert_eq!(note.title_text(), "");
    assert_eq!(note.display_text(), "");
}

#[test]
fn unknown_state_text_falls_back_to_default() {
    let mut note = Note::generate();
    note.state = "PINNED".to_string();
    assert_eq!(note.note_state(), NoteState::Default);
    note.state = "TRASH".to_string();
    assert_eq!(note.note_state(), NoteState::Trash);
}

#[test]
fn keyword_search_is_case_insensitive_and_requires_all_keywords() {
    let note = shopping_note();
    assert!(note.matches_keywords("shop MILK"));
    assert!(note.matches_keywords(""));
    assert!(!note.matches_keywords("milk bread"));
}

#[test]
fn keyword_search_treats_regex_characters_literally() {
    let note = note_with(&[Format::with_text(FormatType::Text, "price: $5 (approx.)")]);
    assert!(note.matches_keywords("$5"));
    assert!(note.matches_keywords("(approx.)"));
    assert!(!note.matches_keywords("a.prox"));
}

#[test]
fn locked_note_search_only_sees_title() {
    let mut note = shopping_note();
    note.locked = true;
    assert!(note.matches_keywords("shop"));
    assert!(!note.matches_keywords("milk"));
}

#[test]
fn share_payload_uses_title_and_display_text() {
    let payload = shopping_note().share_payload();
    assert_eq!(payload.subject, "Shop");
    assert_eq!(payload.body, "\u{2610} Milk\nnotes");
}

#[test]
fn import_copies_exported_fields_into_unsaved_note() {
    let imported: ImportableNote = serde_json::from_value(serde_json::json!({
        "title": "RICH_NOTE",
        "color": 4_294_198_070_u32,
        "description": encode_formats(&[Format::with_text(FormatType::Text, "x")]),
        "displayTimestamp": "01 March 2018",
        "timestamp": 1_519_862_400_000_i64
    }))
    .unwrap();

    let note = Note::generate_from_import(&imported);
    assert!(note.is_unsaved());
    assert_eq!(note.title, "RICH_NOTE");
    assert_eq!(note.color, 4_294_198_070);
    assert_eq!(note.display_timestamp, "01 March 2018");
    assert_eq!(note.timestamp, 1_519_862_400_000);
    assert_eq!(note.note_state(), NoteState::Default);
    assert_eq!(note.to_importable(), imported);
}

#[test]
fn import_accepts_signed_color_and_exports_it_signed() {
    let imported: ImportableNote = serde_json::from_str(
        r#"{"title":"NOTE","color":-16746133,"description":"","displayTimestamp":"","timestamp":0}"#,
    )
    .unwrap();
    assert_eq!(imported.color, 0xFF00796B);

    let exported = serde_json::to_value(&imported).unwrap();
    assert_eq!(exported["color"], serde_json::json!(-16_746_133));
}

#[test]
fn import_rejects_color_outside_32_bits() {
    let result = serde_json::from_str::<ImportableNote>(r#"{"color":8589934592}"#);
    assert!(result.is_err());
}

#[test]
fn importable_note_fills_missing_fields_with_defaults() {
    let imported: ImportableNote = serde_json::from_str("{}").unwrap();
    assert_eq!(imported.color, 0xFF00796B);
    assert!(imported.description.is_empty());
}

use quicknote_core::{decode_formats, encode_formats, Format, FormatType};

fn block(uid: u32, format_type: FormatType, text: &str) -> Format {
    let mut format = Format::with_text(format_type, text);
    format.uid = uid;
    format
}

#[test]
fn decode_of_encode_preserves_order_types_and_text() {
    let blocks = vec![
        block(1, FormatType::Heading, "Groceries"),
        block(2, FormatType::SubHeading, "Weekend"),
        block(3, FormatType::ChecklistUnchecked, "Milk"),
        block(4, FormatType::ChecklistChecked, "Eggs"),
        block(5, FormatType::Quote, "\"quoted\" text"),
        block(6, FormatType::Code, "fn main() {\n    println!(\"hi\");\n}"),
        block(7, FormatType::Text, ""),
        block(8, FormatType::Text, "emoji \u{1F600} and \u{2611}"),
    ];

    let decoded = decode_formats(&encode_formats(&blocks));
    assert_eq!(decoded, blocks);
}

#[test]
fn empty_list_encodes_to_an_empty_note() {
    let encoded = encode_formats(&[]);
    assert_eq!(encoded, r#"{"note":[]}"#);
    assert!(decode_formats(&encoded).is_empty());
}

#[test]
fn decode_without_heading_does_not_invent_one() {
    let encoded = encode_formats(&[Format::with_text(FormatType::Text, "body")]);
    let decoded = decode_formats(&encoded);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].format_type, FormatType::Text);
}

#[test]
fn malformed_descriptions_degrade_to_empty_lists() {
    for input in [
        "plain text note from an older version",
        "{\"note\": [",
        "{\"note\": [{\"format\": 42}]}",
        "{\"note\": \"not a list\"}",
        "null",
    ] {
        assert!(decode_formats(input).is_empty(), "input: {input}");
    }
}

#[test]
fn decode_accepts_documents_without_uids() {
    let decoded = decode_formats(
        r#"{"note":[{"format":"HEADING","text":"A"},{"format":"TEXT","text":"B"}]}"#,
    );
    assert_eq!(
        decoded,
        vec![
            Format::with_text(FormatType::Heading, "A"),
            Format::with_text(FormatType::Text, "B"),
        ]
    );
}

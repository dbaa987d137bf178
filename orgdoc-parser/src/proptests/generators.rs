//! Input generators for property-based testing
#![allow(clippy::expect_used)]
use proptest::prelude::*;

/// Any string, including control characters and multi-byte text.
pub fn any_document_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(".*").expect("Failed to create any string strategy")
}

/// Documents built from Org-looking chunks, well-formed or not, so that block rules
/// start and fail in every combination.
pub fn structured_document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("* Header :tag:\n".to_string()),
            Just(":PROPERTIES:\n:CUSTOM_ID: x\n:END:\n".to_string()),
            Just(":NOTES:\n".to_string()),
            Just(":END:\n".to_string()),
            Just("- item\n".to_string()),
            Just("  continuation\n".to_string()),
            Just("1. first\n".to_string()),
            Just("- term :: description\n".to_string()),
            Just("#+BEGIN_SRC python :exports both\n".to_string()),
            Just("#+END_SRC\n".to_string()),
            Just("#+BEGIN_QUOTE\n".to_string()),
            Just("#+END_QUOTE\n".to_string()),
            Just("#+RESULTS:\n".to_string()),
            Just("#+CAPTION: caption\n".to_string()),
            Just("#+OPTIONS: tags:nil d:(\"NOTES\") |:nil\n".to_string()),
            Just("#+TITLE: title\n".to_string()),
            Just("| a | b |\n".to_string()),
            Just("|---+---|\n".to_string()),
            Just("| <l> | <r5> |\n".to_string()),
            Just("[fn:1] note\n".to_string()),
            Just("text with [fn:1] and [[https://example.org][link]]\n".to_string()),
            Just("[[image.png]]\n".to_string()),
            Just(": fixed\n".to_string()),
            Just("\\begin{equation}\n".to_string()),
            Just("-----\n".to_string()),
            Just("\n".to_string()),
            Just("\t\n".to_string()),
            prop::string::string_regex(r"[a-zA-Z0-9 .,:|*#+\-\[\]\t]{0,30}\n")
                .expect("Failed to create text chunk"),
        ],
        0..30,
    )
    .prop_map(|chunks| chunks.concat())
}

/// One line of region content: empty, or starting with a visible character. Lines
/// never start with a comma, since a comma already in front of `*` would be taken
/// as an escape.
pub fn region_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::string::string_regex(r"[a-z*#+:|\-][a-z*#+,: |\-]{0,15}")
            .expect("Failed to create region line strategy"),
    ]
}

/// A table row of one of the three kinds: rule, alignment or content.
pub fn table_row() -> impl Strategy<Value = String> {
    let cells = |cell: BoxedStrategy<String>| {
        prop::collection::vec(cell, 0..5).prop_map(|cells| format!("|{}|", cells.join("|")))
    };
    prop_oneof![
        Just("|---|".to_string()),
        Just("|---+---+---|".to_string()),
        cells(
            prop::string::string_regex(r" ?(<[lcr][0-9]{0,2}>)? ?")
                .expect("Failed to create alignment cell strategy")
                .boxed()
        ),
        cells(
            prop::string::string_regex(r"[a-z0-9 ]{0,6}")
                .expect("Failed to create content cell strategy")
                .boxed()
        ),
    ]
}

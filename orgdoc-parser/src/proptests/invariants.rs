//! Parser invariants checked with property-based testing
use proptest::prelude::*;

use crate::{Attr, Block, Options, Table, parse};

use super::generators::*;

fn tables(blocks: &[Block], found: &mut Vec<Table>) {
    for block in blocks {
        match block {
            Block::Table(table) => found.push(table.clone()),
            Block::BlockQuote(content) | Block::Div { content, .. } => tables(content, found),
            Block::BulletList(items) | Block::OrderedList(items) => {
                items.iter().for_each(|item| tables(item, found));
            }
            Block::DefinitionList(items) => {
                items.iter().for_each(|(_, item)| tables(item, found));
            }
            Block::Header { .. }
            | Block::Para(_)
            | Block::Plain(_)
            | Block::CodeBlock { .. }
            | Block::RawBlock { .. }
            | Block::HorizontalRule => {}
        }
    }
}

/// Escape a region line the way Org does before writing it inside a block.
fn escape(line: &str) -> String {
    if line.starts_with('*') || line.starts_with("#+") {
        format!(",{line}")
    } else {
        line.to_string()
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    /// The parser should never panic on any input, no matter how malformed.
    #[test]
    fn parser_never_panics(input in any_document_string()) {
        let _ = parse(&input, &Options::default());
    }

    /// Org-shaped input, including unterminated and interleaved constructs, always
    /// parses.
    #[test]
    fn structured_input_always_parses(input in structured_document()) {
        prop_assert!(parse(&input, &Options::default()).is_ok());
    }

    /// Alignments match the header width, or the first row's when there is no
    /// header, or are empty when there are no rows.
    #[test]
    fn table_columns_are_consistent(rows in prop::collection::vec(table_row(), 1..8)) {
        let document = parse(&rows.join("\n"), &Options::default()).expect("valid options");
        let mut found = Vec::new();
        tables(&document.blocks, &mut found);
        prop_assert_eq!(found.len(), 1);
        for table in found {
            let columns = table
                .header
                .as_ref()
                .or_else(|| table.rows.first())
                .map_or(0, Vec::len);
            prop_assert_eq!(table.alignments.len(), columns);
        }
    }

    /// Region content comes back exactly as written once the escaping commas and the
    /// baseline indentation are taken off again.
    #[test]
    fn example_region_round_trip(
        body in prop::collection::vec(region_line(), 1..10),
        indent in 0usize..4,
    ) {
        let baseline = " ".repeat(indent);
        let escaped: Vec<String> = body
            .iter()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{baseline}{}", escape(line))
                }
            })
            .collect();
        let input = format!(
            "{baseline}#+BEGIN_EXAMPLE\n{}\n{baseline}#+END_EXAMPLE\n",
            escaped.join("\n")
        );
        let document = parse(&input, &Options::default()).expect("valid options");
        prop_assert_eq!(
            document.blocks,
            vec![Block::CodeBlock {
                attr: Attr::new().with_class("example"),
                text: body.join("\n"),
            }]
        );
    }

    /// Where a footnote is defined does not change the document.
    #[test]
    fn footnote_position_does_not_matter(note in "[a-z]{1,8}( [a-z]{1,8}){0,3}") {
        let before = format!("[fn:n] {note}\n* Text\nSee[fn:n].\n");
        let after = format!("* Text\nSee[fn:n].\n\n[fn:n] {note}\n");
        let before = parse(&before, &Options::default()).expect("valid options");
        let after = parse(&after, &Options::default()).expect("valid options");
        prop_assert_eq!(before, after);
    }
}

//! Bullet, ordered and definition lists.
//!
//! The first item fixes the list's indentation and item width. Later items must start
//! at the same column, and continuation lines must be indented at least to the item
//! width. Continuation lines lose exactly that width and are parsed, together with the
//! item's first line, as a nested block sequence.
use crate::{
    deferred::{Deferred, sequence},
    line::{self, ListMarker, MarkerKind},
    model::{Block, Blocks, Inlines},
};

use super::{Ctx, Lines, parse_text};

/// Text after the item's marker: skip indentation, the marker token and the spaces
/// following it.
fn first_line_text(current: &str) -> &str {
    let rest = current.trim_start_matches([' ', '\t']);
    let marker_len = rest.find(' ').unwrap_or(rest.len());
    rest.get(marker_len..).unwrap_or_default().trim_start_matches(' ')
}

/// Collect the text of one item starting at the cursor, if the cursor is at an item
/// of this list.
///
/// The flag is set when the item is followed by two blank lines, which end the list.
fn raw_item(
    lines: &mut Lines<'_>,
    first: ListMarker,
    tab_width: usize,
    allow_star: bool,
) -> Option<(String, bool)> {
    let marker = line::list_marker(lines.peek()?, tab_width, allow_star)?;
    if marker.kind != first.kind || marker.indent != first.indent {
        return None;
    }
    let mut text = vec![first_line_text(lines.next()?).to_string()];
    let mut blanks = 0;
    while let Some(current) = lines.peek() {
        if line::is_blank(current) {
            blanks += 1;
            if blanks == 2 {
                break;
            }
            text.push(String::new());
        } else if line::indent_width(current, tab_width) >= first.width {
            blanks = 0;
            text.push(line::strip_indent(current, first.width, tab_width));
        } else {
            break;
        }
        lines.next();
    }
    Some((text.join("\n"), blanks == 2))
}

/// Split a definition item at the `::` of its first line. Continuation lines follow the
/// description.
fn definition_item(item: &str) -> Option<(&str, String)> {
    let (first, continuation) = match item.split_once('\n') {
        Some((first, continuation)) => (first, Some(continuation)),
        None => (item, None),
    };
    let (term, description) = line::definition_term(first)?;
    let description = match continuation {
        Some(continuation) => format!("{description}\n{continuation}"),
        None => description.to_string(),
    };
    Some((term, description))
}

/// A list is tight when no item holds more than one paragraph; the paragraphs of a
/// tight list become plain blocks.
fn compact(items: Vec<Blocks>) -> Vec<Blocks> {
    let tight = items
        .iter()
        .all(|item| item.iter().filter(|block| block.is_para()).count() <= 1);
    if !tight {
        return items;
    }
    items
        .into_iter()
        .map(|item| {
            item.into_iter()
                .map(|block| match block {
                    Block::Para(inlines) => Block::Plain(inlines),
                    other => other,
                })
                .collect()
        })
        .collect()
}

/// Parse an item's text with the list context pushed.
fn item_blocks(text: &str, width: usize, ctx: &mut Ctx<'_>) -> Deferred<Blocks> {
    ctx.state.push_list(width);
    let blocks = parse_text(text, ctx);
    ctx.state.pop_list();
    blocks
}

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn list(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let tab_width = ctx.tab_width();
    let allow_star = ctx.state.in_list();
    let first = line::list_marker(lines.peek()?, tab_width, allow_star)?;
    let definition = first.kind == MarkerKind::Bullet
        && lines
            .peek()
            .and_then(|l| line::definition_term(first_line_text(l)))
            .is_some();

    let mut items = Vec::new();
    loop {
        let mark = lines.mark();
        let Some((item, ends_list)) = raw_item(lines, first, tab_width, allow_star) else {
            break;
        };
        if definition && definition_item(&item).is_none() {
            lines.reset(mark);
            break;
        }
        items.push(item);
        if ends_list {
            break;
        }
    }
    if items.is_empty() {
        return None;
    }
    tracing::trace!(items = items.len(), definition, "list");

    if definition {
        let entries: Vec<Deferred<(Inlines, Blocks)>> = items
            .iter()
            .filter_map(|item| definition_item(item))
            .map(|(term, description)| {
                let term = ctx.inlines.parse(term, &ctx.state);
                let description = item_blocks(&description, first.width, ctx);
                term.combine(description, |term, description| (term, description))
            })
            .collect();
        return Some(sequence(entries).map(|entries| {
            let (terms, descriptions): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
            let descriptions = compact(descriptions);
            vec![Block::DefinitionList(terms.into_iter().zip(descriptions).collect())]
        }));
    }

    let parsed: Vec<Deferred<Blocks>> = items
        .iter()
        .map(|item| item_blocks(item, first.width, ctx))
        .collect();
    let kind = first.kind;
    Some(sequence(parsed).map(move |items| {
        let items = compact(items);
        vec![match kind {
            MarkerKind::Bullet => Block::BulletList(items),
            MarkerKind::Ordered => Block::OrderedList(items),
        }]
    }))
}

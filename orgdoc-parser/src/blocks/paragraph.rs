use crate::{
    deferred::Deferred,
    line,
    model::{Block, Blocks},
};

use super::{Ctx, Lines};

/// The fallback rule: the current line and every following line up to one that
/// starts another block.
///
/// Inside a list item, a paragraph directly followed by a nested item is `Plain`, so
/// the item's text and its sublist stay together.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn paragraph(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let tab_width = ctx.tab_width();
    let in_list = ctx.state.in_list();
    let mut text = vec![lines.next()?];
    while let Some(current) = lines
        .peek()
        .filter(|l| !line::starts_block(l, tab_width, in_list))
    {
        lines.next();
        text.push(current);
    }
    let plain = in_list
        && lines
            .peek()
            .and_then(|l| line::list_marker(l, tab_width, true))
            .is_some();
    let content = ctx.inlines.parse(&text.join("\n"), &ctx.state);
    Some(content.map(move |inlines| {
        if inlines.is_empty() {
            Vec::new()
        } else if plain {
            vec![Block::Plain(inlines)]
        } else {
            vec![Block::Para(inlines)]
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blocks::tests::{parse_blocks, s},
        model::Inline,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_join_with_soft_breaks() {
        assert_eq!(
            parse_blocks("one\ntwo\n\nthree"),
            vec![
                Block::Para(vec![s("one"), Inline::SoftBreak, s("two")]),
                Block::Para(vec![s("three")]),
            ]
        );
    }

    #[test]
    fn block_starts_interrupt_a_paragraph() {
        assert_eq!(
            parse_blocks("text\n| cell |"),
            vec![
                Block::Para(vec![s("text")]),
                Block::Table(
                    crate::model::Table::new(vec![vec![vec![Block::Plain(vec![s("cell")])]]])
                        .with_alignments(vec![crate::model::Alignment::Default])
                ),
            ]
        );
    }

    #[test]
    fn hard_line_breaks() {
        assert_eq!(
            parse_blocks("one\\\\\ntwo"),
            vec![Block::Para(vec![s("one"), Inline::LineBreak, s("two")])]
        );
    }

    #[test]
    fn plain_before_a_nested_item() {
        assert_eq!(
            parse_blocks("- a\n  b\n  - c"),
            vec![Block::BulletList(vec![vec![
                Block::Plain(vec![s("a"), Inline::SoftBreak, s("b")]),
                Block::BulletList(vec![vec![Block::Plain(vec![s("c")])]]),
            ]])]
        );
    }
}

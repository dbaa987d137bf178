//! `#+BEGIN_<type>` ... `#+END_<type>` regions.
use std::borrow::Cow;

use crate::{
    deferred::{Deferred, sequence},
    line,
    model::{Block, Blocks, Inline},
};

use super::{Ctx, Lines, attributes::block_attributes, parse_text, source};

/// Drop the escaping comma of `,*` and `,#+` lines.
pub(crate) fn unescape_comma(line: &str) -> Cow<'_, str> {
    let rest = line.trim_start_matches([' ', '\t']);
    let indent = line.get(..line.len() - rest.len()).unwrap_or_default();
    match rest.strip_prefix(',') {
        Some(after) if after.starts_with('*') || after.starts_with("#+") => {
            Cow::Owned(format!("{indent}{after}"))
        }
        _ => Cow::Borrowed(line),
    }
}

/// Collect the lines up to the matching `#+END_<kind>`, consuming the end line.
///
/// Every non-blank line loses up to `indent` columns and its escaping comma. Returns
/// `None` when the input ends first.
pub(crate) fn region_body(
    lines: &mut Lines<'_>,
    kind: &str,
    indent: usize,
    tab_width: usize,
) -> Option<String> {
    let mut body = Vec::new();
    loop {
        let current = lines.next()?;
        if line::is_region_end(current, kind) {
            return Some(body.join("\n"));
        }
        if line::is_blank(current) {
            body.push(current.to_string());
        } else {
            let stripped = line::strip_indent(current, indent, tab_width);
            body.push(unescape_comma(&stripped).into_owned());
        }
    }
}

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn region(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let attributes = block_attributes(lines, ctx);
    let start = line::region_start(lines.peek()?, ctx.tab_width())?;
    lines.next();
    let body = region_body(lines, start.kind, start.indent, ctx.tab_width())?;
    let kind = start.kind.to_lowercase();
    tracing::trace!(kind, "region");
    let blocks = match kind.as_str() {
        "comment" => Deferred::empty(),
        "html" | "latex" | "ascii" => Deferred::pure(vec![Block::RawBlock {
            format: kind.clone(),
            text: body,
        }]),
        "example" => Deferred::pure(vec![Block::CodeBlock {
            attr: attributes.attr().with_class("example"),
            text: body,
        }]),
        "quote" => parse_text(&body, ctx).map(|content| vec![Block::BlockQuote(content)]),
        "verse" => verse(&body, ctx),
        "src" => source::source_block(start.parameters, body, &attributes, lines, ctx),
        _ => {
            let attr = attributes.attr().with_class(kind.clone());
            parse_text(&body, ctx).map(move |content| {
                vec![Block::Div {
                    attr: attr.clone(),
                    content,
                }]
            })
        }
    };
    Some(blocks)
}

/// One paragraph, one line break per source line.
fn verse(body: &str, ctx: &Ctx<'_>) -> Deferred<Blocks> {
    let verses: Vec<_> = body
        .lines()
        .map(|verse| ctx.inlines.parse(verse, &ctx.state))
        .collect();
    if verses.is_empty() {
        return Deferred::empty();
    }
    sequence(verses).map(|verses| {
        let mut content = Vec::new();
        for (index, verse) in verses.into_iter().enumerate() {
            if index > 0 {
                content.push(Inline::LineBreak);
            }
            content.extend(verse);
        }
        vec![Block::Para(content)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blocks::tests::{parse_blocks, s},
        model::Attr,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(",* not a header", "* not a header")]
    #[case("  ,#+TITLE: x", "  #+TITLE: x")]
    #[case(",,* twice", ",,* twice")]
    #[case(", text", ", text")]
    fn comma_escapes(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(unescape_comma(line), expected);
    }

    #[test]
    fn example_region_keeps_escaped_lines_verbatim() {
        assert_eq!(
            parse_blocks("#+BEGIN_EXAMPLE\n,* not a header\n#+END_EXAMPLE"),
            vec![Block::CodeBlock {
                attr: Attr::new().with_class("example"),
                text: "* not a header".to_string()
            }]
        );
    }

    #[test]
    fn commas_outside_regions_are_kept() {
        assert_eq!(
            parse_blocks(",* text"),
            vec![Block::Para(vec![s(",*"), Inline::Space, s("text")])]
        );
    }

    #[test]
    fn baseline_indentation_is_removed() {
        let input = "  #+begin_example\n    indented\n  base\n\n\tx\n  #+end_EXAMPLE";
        assert_eq!(
            parse_blocks(input),
            vec![Block::CodeBlock {
                attr: Attr::new().with_class("example"),
                text: "  indented\nbase\n\n      x".to_string()
            }]
        );
    }

    #[test]
    fn comment_regions_vanish() {
        assert_eq!(
            parse_blocks("#+BEGIN_COMMENT\nsecret\n#+END_COMMENT\nvisible"),
            vec![Block::Para(vec![s("visible")])]
        );
    }

    #[rstest]
    #[case("html")]
    #[case("latex")]
    #[case("ascii")]
    fn raw_regions(#[case] format: &str) {
        let input = format!("#+BEGIN_{}\n<b>x</b>\n#+END_{format}", format.to_uppercase());
        assert_eq!(
            parse_blocks(&input),
            vec![Block::RawBlock {
                format: format.to_string(),
                text: "<b>x</b>".to_string()
            }]
        );
    }

    #[test]
    fn quote_content_is_block_parsed() {
        assert_eq!(
            parse_blocks("#+BEGIN_QUOTE\none\ntwo\n\n- item\n#+END_QUOTE"),
            vec![Block::BlockQuote(vec![
                Block::Para(vec![s("one"), Inline::SoftBreak, s("two")]),
                Block::BulletList(vec![vec![Block::Plain(vec![s("item")])]]),
            ])]
        );
    }

    #[test]
    fn verse_keeps_line_identity() {
        assert_eq!(
            parse_blocks("#+BEGIN_VERSE\nRoses are red\nViolets\n#+END_VERSE"),
            vec![Block::Para(vec![
                s("Roses"),
                Inline::Space,
                s("are"),
                Inline::Space,
                s("red"),
                Inline::LineBreak,
                s("Violets"),
            ])]
        );
    }

    #[test]
    fn other_regions_become_divs() {
        assert_eq!(
            parse_blocks("#+BEGIN_Warning\nCareful\n#+END_warning"),
            vec![Block::div_with_class(
                "warning",
                vec![Block::Para(vec![s("Careful")])]
            )]
        );
    }

    #[test]
    fn unterminated_region_falls_back_to_text() {
        assert_eq!(
            parse_blocks("#+BEGIN_QUOTE\ntext"),
            vec![Block::Para(vec![
                s("#+BEGIN_QUOTE"),
                Inline::SoftBreak,
                s("text")
            ])]
        );
    }
}

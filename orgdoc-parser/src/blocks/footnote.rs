use crate::{deferred::Deferred, line, model::Blocks};

use super::{Ctx, Lines, parse_text};

/// Whether `current` ends the body of a footnote definition.
fn ends_definition(current: &str) -> bool {
    line::footnote_marker(current).is_some() || line::header_level(current).is_some()
}

/// A footnote definition at column 0: `[fn:label] text` or `[1] text`.
///
/// The body runs up to the next definition or headline, and regions inside it are
/// skipped over whole so a `[fn:x]` line within them does not end the body. The
/// definition yields no blocks where it stands; its body is stored in the parse state.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn footnote_definition(
    lines: &mut Lines<'_>,
    ctx: &mut Ctx<'_>,
) -> Option<Deferred<Blocks>> {
    let (label, first) = line::footnote_marker(lines.peek()?)?;
    lines.next();
    let tab_width = ctx.tab_width();
    let mut body = vec![first.trim_start()];
    while let Some(current) = lines.peek().filter(|l| !ends_definition(l)) {
        lines.next();
        body.push(current);
        let Some(start) = line::region_start(current, tab_width) else {
            continue;
        };
        let mark = lines.mark();
        let mut region = Vec::new();
        loop {
            match lines.next() {
                Some(end) if line::is_region_end(end, start.kind) => {
                    body.extend(region);
                    body.push(end);
                    break;
                }
                Some(inner) => region.push(inner),
                // Unterminated: the opening line is ordinary text.
                None => {
                    lines.reset(mark);
                    break;
                }
            }
        }
    }
    tracing::trace!(label, lines = body.len(), "footnote definition");
    let content = parse_text(&body.join("\n"), ctx);
    ctx.state.define_footnote(label, content);
    Some(Deferred::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Options,
        blocks::tests::{s, with_ctx},
        model::{Block, Inline},
    };
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> (Blocks, crate::state::FinalState) {
        with_ctx(&Options::default(), |ctx| parse_text(input, ctx))
    }

    #[test]
    fn definition_is_stored_not_emitted() {
        let (blocks, state) = parse("[fn:1] The note.\n\nStill the note.\n[fn:2] Another");
        assert_eq!(blocks, Vec::<Block>::new());
        assert_eq!(
            state.footnote("1"),
            Some(vec![
                Block::Para(vec![s("The"), Inline::Space, s("note.")]),
                Block::Para(vec![s("Still"), Inline::Space, s("the"), Inline::Space, s("note.")]),
            ])
        );
        assert_eq!(state.footnote("2"), Some(vec![Block::Para(vec![s("Another")])]));
    }

    #[test]
    fn headline_ends_the_body() {
        let (blocks, state) = parse("[1] note\n* Next");
        assert_eq!(state.footnote("1"), Some(vec![Block::Para(vec![s("note")])]));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn regions_inside_the_body_are_kept_whole() {
        let (_, state) = parse("[fn:a] see\n#+BEGIN_EXAMPLE\n[fn:b] literal\n#+END_EXAMPLE");
        assert_eq!(
            state.footnote("a"),
            Some(vec![
                Block::Para(vec![s("see")]),
                Block::CodeBlock {
                    attr: crate::model::Attr::new().with_class("example"),
                    text: "[fn:b] literal".to_string()
                },
            ])
        );
        assert_eq!(state.footnote("b"), None);
    }

    #[test]
    fn later_definition_wins() {
        let (_, state) = parse("[fn:x] first\n[fn:x] second");
        assert_eq!(state.footnote("x"), Some(vec![Block::Para(vec![s("second")])]));
    }

    #[test]
    fn indented_markers_are_not_definitions() {
        let (blocks, state) = parse(" [fn:x] text");
        assert_eq!(state.footnote("x"), None);
        assert_eq!(blocks.len(), 1);
    }
}

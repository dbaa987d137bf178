//! Block grammar.
//!
//! The dispatcher tries every block rule in a fixed order at the current line and
//! commits to the first that matches. A rule that does not match returns `None` and
//! the cursor is put back where it was, so the next rule sees the same input. Rules
//! check the whole structure they need (closing lines, drawer ends) before they touch
//! the parse state, which means a mismatch never leaves state behind.
//!
//! Nested content (list items, drawers, quotes, footnote bodies) is collected as text
//! and handed back to [`parse_text`], which re-enters the full grammar.
use crate::{
    deferred::Deferred, inline::InlineParser, model::Blocks, registry::HeaderRegistry,
    state::ParserState,
};

mod attributes;
mod drawer;
mod example;
mod figure;
mod footnote;
mod header;
mod latex;
mod list;
mod meta;
mod paragraph;
mod region;
mod rule;
mod source;
mod table;

/// A cursor over the lines of one block sequence.
#[derive(Debug)]
pub(crate) struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    pub(crate) fn skip_blank(&mut self) {
        while self.peek().is_some_and(crate::line::is_blank) {
            self.pos += 1;
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }
}

/// Everything a block rule needs besides the input.
pub(crate) struct Ctx<'p> {
    pub(crate) state: ParserState,
    pub(crate) inlines: &'p dyn InlineParser,
    pub(crate) registry: &'p mut dyn HeaderRegistry,
}

impl<'p> Ctx<'p> {
    pub(crate) fn new(
        state: ParserState,
        inlines: &'p dyn InlineParser,
        registry: &'p mut dyn HeaderRegistry,
    ) -> Self {
        Self {
            state,
            inlines,
            registry,
        }
    }

    pub(crate) fn into_state(self) -> ParserState {
        self.state
    }

    pub(crate) fn tab_width(&self) -> usize {
        self.state.tab_width()
    }
}

type Rule = fn(&mut Lines<'_>, &mut Ctx<'_>) -> Option<Deferred<Blocks>>;

/// Block rules in precedence order. The paragraph rule matches any non-blank line,
/// so the table always yields a block while input remains.
const RULES: &[(&str, Rule)] = &[
    ("table", table::table),
    ("region", region::region),
    ("figure", figure::figure),
    ("example", example::example),
    ("drawer", drawer::drawer),
    ("keyword", meta::keyword_or_comment),
    ("header", header::header),
    ("horizontal_rule", rule::horizontal_rule),
    ("list", list::list),
    ("latex", latex::latex_environment),
    ("footnote", footnote::footnote_definition),
    ("paragraph", paragraph::paragraph),
];

/// Parse one block at the cursor, after any blank lines. Returns `None` at the end
/// of input.
pub(crate) fn block(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    lines.skip_blank();
    lines.peek()?;
    let start = lines.mark();
    for (name, rule) in RULES {
        if let Some(blocks) = rule(lines, ctx) {
            if lines.mark() > start {
                tracing::trace!(rule = name, from = start, to = lines.mark(), "matched");
                return Some(blocks);
            }
            tracing::warn!(rule = name, line = start, "rule matched without consuming input");
        }
        lines.reset(start);
    }
    // The paragraph rule always consumes a line, but never loop forever on a bug.
    lines.next();
    Some(Deferred::empty())
}

/// Parse blocks until the input runs out.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn blocks(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Deferred<Blocks> {
    std::iter::from_fn(|| block(lines, ctx)).collect()
}

/// Parse a piece of collected text (an item body, a drawer body) as blocks.
pub(crate) fn parse_text(text: &str, ctx: &mut Ctx<'_>) -> Deferred<Blocks> {
    let mut lines = Lines::new(text);
    blocks(&mut lines, ctx)
}

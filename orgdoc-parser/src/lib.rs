//! A block-level parser for Org-style plain-text markup.
//!
//! Parsing is a single left-to-right scan followed by one resolution pass. The scan
//! recognises blocks and records declarations (`#+OPTIONS:`, `#+LINK:`, footnote
//! definitions, metadata) in the parse state; every block it produces is a
//! [`Deferred`] value. Once the input is exhausted the state is frozen and the whole
//! document is resolved against it, so declarations apply to content on either side
//! of them.
//!
//! ```
//! use orgdoc_parser::{Block, Options, parse};
//!
//! let document = parse("* Intro\nSee the note.[fn:1]\n\n[fn:1] A note.", &Options::default())?;
//! assert!(matches!(document.blocks.first(), Some(Block::Header { level: 1, .. })));
//! assert!(document.footnotes.contains_key("1"));
//! # Ok::<(), orgdoc_parser::Error>(())
//! ```
mod blocks;
mod deferred;
mod error;
mod grammar;
mod inline;
mod line;
mod model;
mod options;
mod registry;
mod state;

#[cfg(test)]
mod proptests;

pub use deferred::{Deferred, sequence};
pub use error::Error;
pub use inline::{BasicInlineParser, InlineParser};
pub use model::{
    Alignment, Attr, Block, Blocks, Cell, Document, Inline, Inlines, Meta, MetaValue, Row,
    Table,
};
pub use options::{DEFAULT_HEADER_ARGS_PREFIX, DEFAULT_TAB_WIDTH, Options, OptionsBuilder};
pub use registry::{AutoIdentifiers, HeaderRegistry};
pub use state::{
    DrawerFilter, ExportSettings, FinalState, Levels, LinkFormatter, ParserState,
    SubSuperscripts,
};

use blocks::{Ctx, Lines};

/// Parse `input` with the built-in inline parser and identifier assignment.
///
/// # Errors
///
/// Fails only when `options` is invalid: a tab width of zero, or an export override
/// outside the `#+OPTIONS:` vocabulary. Input text never fails to parse; anything the
/// block grammar does not recognise ends up in a paragraph.
pub fn parse(input: &str, options: &Options) -> Result<Document, Error> {
    parse_with(input, options, &BasicInlineParser, &mut AutoIdentifiers::new())
}

/// Parse `input`, delegating inline content to `inlines` and headline attributes to
/// `registry`.
///
/// # Errors
///
/// See [`parse`].
#[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn parse_with(
    input: &str,
    options: &Options,
    inlines: &dyn InlineParser,
    registry: &mut dyn HeaderRegistry,
) -> Result<Document, Error> {
    let export = options.initial_export_settings()?;
    let state = ParserState::new(options).with_export_settings(export);
    let mut ctx = Ctx::new(state, inlines, registry);
    let mut lines = Lines::new(input);
    let document = blocks::blocks(&mut lines, &mut ctx);
    let state = ctx.into_state().freeze();
    let blocks = document.resolve(&state);
    tracing::debug!(blocks = blocks.len(), "parsed document");
    Ok(Document {
        meta: state.resolve_meta(),
        blocks,
        footnotes: state.resolve_footnotes(),
        link_formatters: state.link_formatters(),
        export: state.export().clone(),
    })
}

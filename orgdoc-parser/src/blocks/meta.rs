//! Comment lines and `#+KEY: value` declarations.
//!
//! Declarations never produce blocks. They either update the parse state right away
//! (export options, link formats, macros) or add a metadata entry whose value is
//! resolved with the rest of the document.
use crate::{
    deferred::{Deferred, sequence},
    grammar::org_line,
    line,
    model::{Blocks, MetaValue},
    state::LinkFormatter,
};

use super::{Ctx, Lines};

/// Inline-parse `value` into a metadata value.
fn inlines(value: &str, ctx: &Ctx<'_>) -> Deferred<MetaValue> {
    ctx.inlines.parse(value, &ctx.state).map(MetaValue::Inlines)
}

/// Comma-separated inline values, as used for authors and keywords.
fn inline_list(value: &str, ctx: &Ctx<'_>) -> Deferred<MetaValue> {
    let items = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| inlines(item, ctx))
        .collect();
    sequence(items).map(MetaValue::List)
}

fn declaration(key: &str, value: &str, ctx: &mut Ctx<'_>) {
    match key {
        "options" => ctx.state.export_mut().apply_line(value),
        "link" => match org_line::link(value) {
            Ok((name, template)) => ctx.state.define_link(name, LinkFormatter::new(template)),
            Err(e) => tracing::warn!(%e, value, "malformed LINK declaration"),
        },
        "macro" => match org_line::macro_definition(value) {
            Ok((name, body)) => ctx.state.define_macro(name, body),
            Err(e) => tracing::warn!(%e, value, "malformed MACRO declaration"),
        },
        "title" | "subtitle" | "date" | "description" => {
            let value = inlines(value, ctx);
            ctx.state.add_meta(key, value);
        }
        "author" | "keywords" => {
            let value = inline_list(value, ctx);
            ctx.state.add_meta(key, value);
        }
        "nocite" | "header-includes" => {
            let value = inlines(value, ctx).map(|value| MetaValue::List(vec![value]));
            ctx.state.add_meta(key, value);
        }
        "latex_header" | "html_head" => {
            let format = if key == "latex_header" { "latex" } else { "html" };
            ctx.state.add_meta(
                "header-includes",
                Deferred::pure(MetaValue::List(vec![MetaValue::Raw {
                    format: format.to_string(),
                    text: value.to_string(),
                }])),
            );
        }
        "latex_class" => ctx
            .state
            .add_meta("documentclass", Deferred::pure(MetaValue::String(value.to_string()))),
        _ => ctx
            .state
            .add_meta(key, Deferred::pure(MetaValue::String(value.to_string()))),
    }
}

#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn keyword_or_comment(
    lines: &mut Lines<'_>,
    ctx: &mut Ctx<'_>,
) -> Option<Deferred<Blocks>> {
    let current = lines.peek()?;
    if line::is_comment(current) {
        lines.next();
        return Some(Deferred::empty());
    }
    let (key, value) = line::keyword(current)?;
    lines.next();
    if line::is_block_attribute_key(key) {
        tracing::debug!(key, "dangling block attribute, no block follows it");
        return Some(Deferred::empty());
    }
    declaration(&key.to_lowercase(), value, ctx);
    Some(Deferred::empty())
}

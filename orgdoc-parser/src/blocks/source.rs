//! `#+BEGIN_SRC` blocks: language, header arguments, export policy and the
//! `#+RESULTS:` block that may follow.
use crate::{
    deferred::Deferred,
    grammar::{SrcHeader, org_line},
    line,
    model::{Attr, Block, Blocks, Inline},
};

use super::{Ctx, Lines, attributes::BlockAttributes, block};

/// Map Org's language names to the names highlighters know.
fn normalize_language(language: &str) -> &str {
    match language {
        "C" => "c",
        "C++" => "cpp",
        "emacs-lisp" | "lisp" => "commonlisp",
        "js" => "javascript",
        "R" => "r",
        "sh" => "bash",
        "sqlite" => "sql",
        other => other,
    }
}

/// Whether the code and the results of a block are exported, from its
/// `:exports` header argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExportPolicy {
    pub(crate) code: bool,
    pub(crate) results: bool,
}

impl ExportPolicy {
    pub(crate) fn from_exports(exports: Option<&str>) -> Self {
        Self {
            code: !matches!(exports, Some("none" | "results")),
            results: matches!(exports, Some("results" | "both")),
        }
    }
}

/// Header arguments with their prefixed keys, in source order. Arguments without a
/// value mean `yes`.
fn header_arguments(header: &SrcHeader<'_>, prefix: &str) -> Vec<(String, String)> {
    header
        .args
        .iter()
        .map(|(key, value)| (format!("{prefix}{key}"), value.unwrap_or("yes").to_string()))
        .collect()
}

/// Consume `#+RESULTS:` and the block after it, if they follow.
fn results_block(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Deferred<Blocks> {
    let mark = lines.mark();
    lines.skip_blank();
    let is_results = lines
        .peek()
        .and_then(line::keyword)
        .is_some_and(|(key, _)| key.to_ascii_lowercase().starts_with("results"));
    if !is_results {
        lines.reset(mark);
        return Deferred::empty();
    }
    lines.next();
    block(lines, ctx).unwrap_or_default()
}

#[tracing::instrument(level = "trace", skip(body, attributes, lines, ctx))]
pub(crate) fn source_block(
    parameters: &str,
    body: String,
    attributes: &BlockAttributes,
    lines: &mut Lines<'_>,
    ctx: &mut Ctx<'_>,
) -> Deferred<Blocks> {
    let header = org_line::src_header(parameters).unwrap_or_else(|e| {
        tracing::warn!(%e, parameters, "malformed src block header, ignoring its arguments");
        SrcHeader::default()
    });
    if !header.switches.is_empty() {
        tracing::trace!(switches = ?header.switches, "ignoring src block switches");
    }
    let prefix = ctx.state.header_args_prefix().to_string();
    let arguments = header_arguments(&header, &prefix);
    let exports_key = format!("{prefix}exports");
    let policy = ExportPolicy::from_exports(
        arguments
            .iter()
            .rev()
            .find(|(key, _)| *key == exports_key)
            .map(|(_, value)| value.as_str()),
    );

    let mut attr = Attr::new().with_id(attributes.name.clone().unwrap_or_default());
    if let Some(language) = header.language {
        attr.push_class(normalize_language(language));
    }
    if !arguments.is_empty() {
        attr.push_class(format!("{prefix}block"));
        if let Some(language) = header.language {
            attr.insert(format!("{prefix}language"), language);
        }
        for (key, value) in arguments {
            attr.insert(key, value);
        }
    }

    let code = Block::CodeBlock { attr, text: body };
    let code = match &attributes.caption {
        Some(caption) => caption.clone().map(move |caption| {
            vec![Block::Div {
                attr: Attr::new(),
                content: vec![
                    Block::Plain(vec![Inline::Span {
                        attr: Attr::new().with_class("label"),
                        content: caption,
                    }]),
                    code.clone(),
                ],
            }]
        }),
        None => Deferred::pure(vec![code]),
    };
    let results = results_block(lines, ctx);

    match policy {
        ExportPolicy {
            code: true,
            results: true,
        } => code.append(results),
        ExportPolicy { code: true, .. } => code,
        ExportPolicy { results: true, .. } => results,
        _ => {
            tracing::debug!("src block excluded by its :exports argument");
            Deferred::empty()
        }
    }
}

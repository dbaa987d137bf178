//! Inline content.
//!
//! The block parser never looks inside inline text. It hands every run of text to an
//! [`InlineParser`] and only sequences the deferred results.
use std::borrow::Cow;

use crate::{
    deferred::Deferred,
    line,
    model::{Attr, Inline, Inlines},
    state::{FinalState, ParserState},
};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "tif", "tiff", "xpm", "pbm",
];

/// Parses a run of inline text into deferred inline content.
pub trait InlineParser {
    /// `text` may span several lines. `state` is the scan-time state; anything that
    /// depends on declarations later in the document must be read from the
    /// [`FinalState`] inside the returned [`Deferred`].
    fn parse(&self, text: &str, state: &ParserState) -> Deferred<Inlines>;
}

/// A small inline parser: words and spaces, line breaks, footnote references, links
/// and images, and `{{{macro(args)}}}` expansion. Emphasis and other markup are kept as
/// literal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicInlineParser;

/// Whether a link target points at an image, judged by its extension.
#[must_use]
pub(crate) fn is_image_target(target: &str) -> bool {
    target
        .rsplit_once('.')
        .is_some_and(|(_, extension)| {
            IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
}

/// Split `[[target][description]]` or `[[target]]` off the front of `text`.
fn split_link(text: &str) -> Option<(&str, Option<&str>, &str)> {
    let rest = text.strip_prefix("[[")?;
    let (target, rest) = rest.split_once(']')?;
    if target.is_empty() || target.contains('[') {
        return None;
    }
    if let Some(rest) = rest.strip_prefix(']') {
        return Some((target, None, rest));
    }
    let (description, rest) = rest.strip_prefix('[')?.split_once("]]")?;
    Some((target, Some(description), rest))
}

/// Expand `{{{name(arg1,arg2)}}}` calls of macros defined so far. Calls to unknown
/// macros stay literal. Expansion happens once; macro bodies are not re-expanded.
fn expand_macros<'a>(text: &'a str, state: &ParserState) -> Cow<'a, str> {
    if !text.contains("{{{") {
        return Cow::Borrowed(text);
    }
    let mut expanded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{{") {
        let (before, call) = rest.split_at(start);
        expanded.push_str(before);
        let Some((inner, after)) = call.get(3..).and_then(|c| c.split_once("}}}")) else {
            expanded.push_str(call);
            return Cow::Owned(expanded);
        };
        let (name, args) = match inner.split_once('(') {
            Some((name, args)) => (name, args.strip_suffix(')').unwrap_or(args)),
            None => (inner, ""),
        };
        match state.macro_body(name.trim()) {
            Some(body) => {
                let args: Vec<&str> = args.split(',').map(str::trim).collect();
                substitute_args(body, &args, &mut expanded);
            }
            None => {
                tracing::debug!(name, "unknown macro left as text");
                expanded.push_str(call.get(..inner.len() + 6).unwrap_or(call));
            }
        }
        rest = after;
    }
    expanded.push_str(rest);
    Cow::Owned(expanded)
}

/// Replace `$N` in a macro body with the N-th argument. The whole digit run is the
/// index; references past the last argument become empty.
fn substitute_args(body: &str, args: &[&str], out: &mut String) {
    let mut rest = body;
    while let Some(dollar) = rest.find('$') {
        let (before, from_dollar) = rest.split_at(dollar);
        out.push_str(before);
        let after = from_dollar.get(1..).unwrap_or_default();
        let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        match after.get(..digits).and_then(|n| n.parse::<usize>().ok()) {
            Some(index) if index > 0 => {
                out.push_str(args.get(index - 1).copied().unwrap_or_default());
            }
            _ => out.push_str(from_dollar.get(..=digits).unwrap_or(from_dollar)),
        }
        rest = after.get(digits..).unwrap_or_default();
    }
    out.push_str(rest);
}

impl BasicInlineParser {
    fn line(&self, text: &str, state: &ParserState, out: &mut Vec<Deferred<Inlines>>) {
        let mut word = String::new();
        let mut rest = text.trim();
        while let Some(c) = rest.chars().next() {
            if c.is_whitespace() {
                flush(&mut word, out);
                out.push(Deferred::pure(vec![Inline::Space]));
                rest = rest.trim_start();
                continue;
            }
            if c == '[' {
                if let Some((target, description, after)) = split_link(rest) {
                    flush(&mut word, out);
                    out.push(self.link(target, description, state));
                    rest = after;
                    continue;
                }
                if let Some((label, after)) = line::footnote_marker(rest) {
                    flush(&mut word, out);
                    let marker = rest.get(..rest.len() - after.len()).unwrap_or(rest);
                    out.push(note_reference(label, marker));
                    rest = after;
                    continue;
                }
            }
            word.push(c);
            rest = rest.get(c.len_utf8()..).unwrap_or_default();
        }
        flush(&mut word, out);
    }

    fn link(&self, target: &str, description: Option<&str>, state: &ParserState) -> Deferred<Inlines> {
        let raw = target.to_string();
        let href = Deferred::new(move |state: &FinalState| state.expand_link(&raw));
        match description {
            None if is_image_target(target) => href.map(|target| {
                vec![Inline::Image {
                    attr: Attr::new(),
                    target,
                    title: String::new(),
                    alt: Vec::new(),
                }]
            }),
            None => {
                let text = target.to_string();
                href.map(move |target| {
                    vec![Inline::Link {
                        target,
                        content: vec![Inline::Str(text.clone())],
                    }]
                })
            }
            Some(description) => href.combine(self.parse(description, state), |target, content| {
                vec![Inline::Link { target, content }]
            }),
        }
    }
}

fn flush(word: &mut String, out: &mut Vec<Deferred<Inlines>>) {
    if !word.is_empty() {
        out.push(Deferred::pure(vec![Inline::Str(std::mem::take(word))]));
    }
}

/// A footnote reference, looked up in the final footnote table. Unknown labels keep
/// their marker text; references are dropped entirely when footnotes are not exported.
fn note_reference(label: &str, marker: &str) -> Deferred<Inlines> {
    let label = label.to_string();
    let marker = marker.to_string();
    Deferred::new(move |state: &FinalState| {
        if !state.export().footnotes {
            return Vec::new();
        }
        match state.footnote(&label) {
            Some(body) => vec![Inline::Note(body)],
            None => vec![Inline::Str(marker.clone())],
        }
    })
}

impl InlineParser for BasicInlineParser {
    #[tracing::instrument(level = "trace", skip(self, state))]
    fn parse(&self, text: &str, state: &ParserState) -> Deferred<Inlines> {
        let text = expand_macros(text, state);
        let mut out = Vec::new();
        let mut lines = text.lines().filter(|l| !l.trim().is_empty()).peekable();
        while let Some(current) = lines.next() {
            let current = current.trim_end();
            let (current, hard_break) = match current.strip_suffix("\\\\") {
                Some(stripped) => (stripped, true),
                None => (current, false),
            };
            self.line(current, state, &mut out);
            if lines.peek().is_none() {
                break;
            }
            if hard_break {
                out.push(Deferred::pure(vec![Inline::LineBreak]));
            } else {
                out.push(Deferred::new(|state: &FinalState| {
                    if state.export().preserve_breaks {
                        vec![Inline::LineBreak]
                    } else {
                        vec![Inline::SoftBreak]
                    }
                }));
            }
        }
        out.into_iter().collect()
    }
}

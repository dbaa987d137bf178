//! Parse state: the single mutable record threaded through the scan, and the frozen
//! record deferred values resolve against.
use std::{collections::BTreeMap, rc::Rc};

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    Options,
    deferred::Deferred,
    model::{Blocks, Meta, MetaValue},
};

mod export;

pub use export::{DrawerFilter, ExportSettings, Levels, SubSuperscripts};

/// An abbreviated link type declared with `#+LINK: key template`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkFormatter {
    pub template: String,
}

impl LinkFormatter {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Expand `target` with this template.
    ///
    /// `%s` is replaced by the target, `%h` by its form-url-encoded form; a template
    /// with neither gets the target appended.
    #[must_use]
    pub fn format(&self, target: &str) -> String {
        if self.template.contains("%s") {
            self.template.replace("%s", target)
        } else if self.template.contains("%h") {
            let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
            self.template.replace("%h", &encoded)
        } else {
            format!("{}{target}", self.template)
        }
    }
}

/// State collected while the input is scanned.
///
/// Block components read and update it in place. Nothing here is visible to deferred
/// values until [`ParserState::freeze`] turns it into a [`FinalState`].
#[derive(Debug)]
pub struct ParserState {
    tab_width: usize,
    header_args_prefix: String,
    export: ExportSettings,
    meta: Vec<(String, Deferred<MetaValue>)>,
    link_formatters: FxHashMap<String, LinkFormatter>,
    footnotes: FxHashMap<String, Deferred<Blocks>>,
    macros: FxHashMap<String, String>,
    /// Marker widths of the list items currently being parsed, innermost last.
    list_context: Vec<usize>,
}

impl ParserState {
    pub(crate) fn new(options: &Options) -> Self {
        Self {
            tab_width: options.tab_width.max(1),
            header_args_prefix: options.header_args_prefix.clone(),
            export: options.export.clone(),
            meta: Vec::new(),
            link_formatters: FxHashMap::default(),
            footnotes: FxHashMap::default(),
            macros: FxHashMap::default(),
            list_context: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn with_export_settings(mut self, export: ExportSettings) -> Self {
        self.export = export;
        self
    }

    /// Export settings as declared so far.
    #[must_use]
    pub fn export(&self) -> &ExportSettings {
        &self.export
    }

    pub(crate) fn export_mut(&mut self) -> &mut ExportSettings {
        &mut self.export
    }

    #[must_use]
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    #[must_use]
    pub fn header_args_prefix(&self) -> &str {
        &self.header_args_prefix
    }

    /// The body of a macro declared with `#+MACRO:` earlier in the document.
    #[must_use]
    pub fn macro_body(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    /// Whether the scan is currently inside a list item.
    #[must_use]
    pub fn in_list(&self) -> bool {
        !self.list_context.is_empty()
    }

    /// Append a metadata entry. Entries are never overwritten; repeated keys are
    /// merged when the state is resolved.
    pub(crate) fn add_meta(&mut self, key: impl Into<String>, value: Deferred<MetaValue>) {
        self.meta.push((key.into(), value));
    }

    pub(crate) fn define_link(&mut self, key: impl Into<String>, formatter: LinkFormatter) {
        self.link_formatters.insert(key.into(), formatter);
    }

    pub(crate) fn define_macro(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.macros.insert(name.into(), body.into());
    }

    /// Store a footnote body. A later definition of the same label replaces it.
    pub(crate) fn define_footnote(&mut self, label: impl Into<String>, body: Deferred<Blocks>) {
        let label = label.into();
        if self.footnotes.insert(label.clone(), body).is_some() {
            tracing::debug!(label, "footnote redefined, keeping the later definition");
        }
    }

    pub(crate) fn push_list(&mut self, width: usize) {
        self.list_context.push(width);
    }

    pub(crate) fn pop_list(&mut self) {
        self.list_context.pop();
    }

    /// End the scan. The returned state is read-only.
    #[must_use]
    pub(crate) fn freeze(self) -> FinalState {
        FinalState {
            frozen: Rc::new(Frozen {
                export: self.export,
                meta: self.meta,
                link_formatters: self.link_formatters,
                footnotes: self.footnotes,
            }),
            in_note: false,
        }
    }
}

#[derive(Debug)]
struct Frozen {
    export: ExportSettings,
    meta: Vec<(String, Deferred<MetaValue>)>,
    link_formatters: FxHashMap<String, LinkFormatter>,
    footnotes: FxHashMap<String, Deferred<Blocks>>,
}

/// The parse state after scanning has finished, as seen by deferred values.
#[derive(Clone, Debug)]
pub struct FinalState {
    frozen: Rc<Frozen>,
    in_note: bool,
}

impl FinalState {
    #[must_use]
    pub fn export(&self) -> &ExportSettings {
        &self.frozen.export
    }

    #[must_use]
    pub fn link_formatter(&self, key: &str) -> Option<&LinkFormatter> {
        self.frozen.link_formatters.get(key)
    }

    /// Expand an abbreviated link (`key:rest`) with its declared formatter. Targets
    /// without a matching formatter come back unchanged.
    #[must_use]
    pub fn expand_link(&self, target: &str) -> String {
        target
            .split_once(':')
            .and_then(|(key, rest)| self.link_formatter(key).map(|f| f.format(rest)))
            .unwrap_or_else(|| target.to_string())
    }

    /// The body of footnote `label`.
    ///
    /// Footnote bodies are resolved without access to the footnote table, so a
    /// reference inside a footnote yields `None`.
    #[must_use]
    pub fn footnote(&self, label: &str) -> Option<Blocks> {
        if self.in_note {
            return None;
        }
        let body = self.frozen.footnotes.get(label)?;
        Some(body.resolve(&self.without_footnotes()))
    }

    pub(crate) fn without_footnotes(&self) -> Self {
        Self {
            frozen: Rc::clone(&self.frozen),
            in_note: true,
        }
    }

    /// Merge the metadata entries in declaration order and drop the keys the export
    /// settings exclude.
    pub(crate) fn resolve_meta(&self) -> Meta {
        let mut meta = Meta::new();
        for (key, value) in &self.frozen.meta {
            let value = value.resolve(self);
            let merged = match meta.remove(key) {
                Some(earlier) => earlier.merge(value),
                None => value,
            };
            meta.insert(key.clone(), merged);
        }
        let export = self.export();
        for (key, keep) in [
            ("author", export.author),
            ("date", export.date),
            ("email", export.email),
            ("title", export.title),
        ] {
            if !keep && meta.remove(key).is_some() {
                tracing::debug!(key, "metadata excluded by export settings");
            }
        }
        meta
    }

    pub(crate) fn resolve_footnotes(&self) -> BTreeMap<String, Blocks> {
        let notes = self.without_footnotes();
        self.frozen
            .footnotes
            .iter()
            .map(|(label, body)| (label.clone(), body.resolve(&notes)))
            .collect()
    }

    pub(crate) fn link_formatters(&self) -> BTreeMap<String, LinkFormatter> {
        self.frozen
            .link_formatters
            .iter()
            .map(|(key, formatter)| (key.clone(), formatter.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Inline};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.org/%s/view", "a b", "https://example.org/a b/view")]
    #[case("https://example.org/?q=%h", "a b&c", "https://example.org/?q=a+b%26c")]
    #[case("https://example.org/wiki/", "Page", "https://example.org/wiki/Page")]
    fn link_formatter_templates(#[case] template: &str, #[case] target: &str, #[case] expected: &str) {
        assert_eq!(LinkFormatter::new(template).format(target), expected);
    }

    #[test]
    fn later_link_declarations_win() {
        let mut state = ParserState::new(&Options::default());
        state.define_link("gh", LinkFormatter::new("https://old/"));
        state.define_link("gh", LinkFormatter::new("https://github.com/%s"));
        let state = state.freeze();
        assert_eq!(state.expand_link("gh:rust-lang"), "https://github.com/rust-lang");
        assert_eq!(state.expand_link("other:x"), "other:x");
    }

    #[test]
    fn footnotes_do_not_resolve_inside_footnotes() {
        let mut state = ParserState::new(&Options::default());
        let nested = Deferred::new(|state: &FinalState| {
            let found = state.footnote("a").is_some();
            vec![Block::Plain(vec![Inline::Str(found.to_string())])]
        });
        state.define_footnote("a", nested);
        let state = state.freeze();
        assert_eq!(
            state.footnote("a"),
            Some(vec![Block::Plain(vec![Inline::Str("false".into())])])
        );
    }

    #[test]
    fn metadata_merges_and_honours_export_settings() {
        let mut state = ParserState::new(&Options::default());
        state.add_meta("title", Deferred::pure(MetaValue::String("A".into())));
        state.add_meta("keywords", Deferred::pure(MetaValue::String("x".into())));
        state.add_meta("keywords", Deferred::pure(MetaValue::String("y".into())));
        state.export_mut().title = false;
        let meta = state.freeze().resolve_meta();
        assert_eq!(meta.get("title"), None);
        assert_eq!(
            meta.get("keywords"),
            Some(&MetaValue::List(vec![
                MetaValue::String("x".into()),
                MetaValue::String("y".into())
            ]))
        );
    }
}

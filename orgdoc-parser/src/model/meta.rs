use std::collections::BTreeMap;

use serde::Serialize;

use super::Inline;

/// Finalized document metadata, keyed by lowercased declaration name.
pub type Meta = BTreeMap<String, MetaValue>;

/// A `MetaValue` is the value of one metadata entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[non_exhaustive]
pub enum MetaValue {
    String(String),
    Bool(bool),
    Inlines(Vec<Inline>),
    List(Vec<MetaValue>),
    /// An export snippet for one backend (`#+LATEX_HEADER:`, `#+HTML_HEAD:`).
    Raw { format: String, text: String },
}

impl MetaValue {
    /// Merge a later declaration of the same key into this one.
    ///
    /// Nothing is ever overwritten: the earlier value stays first and the entry is
    /// promoted to a list when needed.
    #[must_use]
    pub fn merge(self, later: MetaValue) -> MetaValue {
        match (self, later) {
            (MetaValue::List(mut earlier), MetaValue::List(later)) => {
                earlier.extend(later);
                MetaValue::List(earlier)
            }
            (MetaValue::List(mut earlier), later) => {
                earlier.push(later);
                MetaValue::List(earlier)
            }
            (earlier, MetaValue::List(later)) => {
                let mut items = Vec::with_capacity(later.len() + 1);
                items.push(earlier);
                items.extend(later);
                MetaValue::List(items)
            }
            (earlier, later) => MetaValue::List(vec![earlier, later]),
        }
    }
}

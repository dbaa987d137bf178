//! The data models for a parsed Org document.
use std::collections::BTreeMap;

use serde::Serialize;

mod attributes;
mod meta;
mod tables;

pub use attributes::*;
pub use meta::*;
pub use tables::*;

use crate::state::{ExportSettings, LinkFormatter};

pub type Inlines = Vec<Inline>;
pub type Blocks = Vec<Block>;

/// A `Document` is the finalized result of a parse.
///
/// Besides the block tree it carries the resolved metadata, the footnote table, the
/// link-format registry that inline renderers consult when they resolve references,
/// and the export settings in force at the end of the document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Document {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: Meta,
    pub blocks: Blocks,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub footnotes: BTreeMap<String, Blocks>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub link_formatters: BTreeMap<String, LinkFormatter>,
    #[serde(default, skip_serializing_if = "ExportSettings::is_default")]
    pub export: ExportSettings,
}

/// An `Inline` is a piece of inline content.
///
/// This crate treats inline content as opaque: it is produced by an
/// [`InlineParser`](crate::InlineParser) and only sequenced and concatenated by
/// the block parser.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Inline {
    Str(String),
    Space,
    SoftBreak,
    LineBreak,
    Span {
        attr: Attr,
        content: Inlines,
    },
    Link {
        target: String,
        content: Inlines,
    },
    Image {
        attr: Attr,
        target: String,
        title: String,
        alt: Inlines,
    },
    Note(Blocks),
}

/// A `Block` represents a structural element of a document.
///
/// Blocks appear in document order; nested blocks (list items, quotes, drawers)
/// are themselves sequences of blocks.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Header {
        level: usize,
        attr: Attr,
        content: Inlines,
    },
    Para(Inlines),
    Plain(Inlines),
    CodeBlock {
        attr: Attr,
        text: String,
    },
    RawBlock {
        format: String,
        text: String,
    },
    BlockQuote(Blocks),
    Div {
        attr: Attr,
        content: Blocks,
    },
    Table(Table),
    BulletList(Vec<Blocks>),
    OrderedList(Vec<Blocks>),
    DefinitionList(Vec<(Inlines, Blocks)>),
    HorizontalRule,
}

impl Block {
    /// Wrap `content` in a `Div` carrying a single class.
    #[must_use]
    pub fn div_with_class(class: impl Into<String>, content: Blocks) -> Self {
        Block::Div {
            attr: Attr::new().with_class(class),
            content,
        }
    }

    #[must_use]
    pub(crate) fn is_para(&self) -> bool {
        matches!(self, Block::Para(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blocks_serialize_adjacently_tagged() {
        let block = Block::Div {
            attr: Attr::new().with_class("notes"),
            content: vec![Block::Para(vec![Inline::Str("hi".into()), Inline::Space])],
        };
        let json = serde_json::to_value(&block).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "type": "div",
                "content": {
                    "attr": { "classes": ["notes"] },
                    "content": [
                        { "type": "para", "content": [
                            { "type": "str", "content": "hi" },
                            { "type": "space" }
                        ]}
                    ]
                }
            })
        );
    }

    #[test]
    fn horizontal_rule_serializes_without_content() {
        let json = serde_json::to_value(Block::HorizontalRule).expect("serializable");
        assert_eq!(json, serde_json::json!({ "type": "horizontal_rule" }));
    }
}

//! Table types for Org documents.

use serde::Serialize;

use super::{Attr, Block, Inline};

/// Horizontal alignment of a table column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Default,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Map an alignment-cookie letter (`<l>`, `<c>`, `<r>`) to an alignment.
    #[must_use]
    pub fn from_cookie(letter: char) -> Option<Self> {
        match letter {
            'l' => Some(Self::Left),
            'c' => Some(Self::Center),
            'r' => Some(Self::Right),
            _ => None,
        }
    }
}

/// A single table cell: a sequence of blocks (usually one `Plain`).
pub type Cell = Vec<Block>;

/// A table row.
pub type Row = Vec<Cell>;

/// A `Table` represents a table in a document.
///
/// `alignments` always has exactly as many entries as the header row, or as the
/// first body row when there is no header, or none when the table has no rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Table {
    #[serde(default, skip_serializing_if = "Attr::is_empty")]
    pub attr: Attr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<Inline>,
    pub alignments: Vec<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Row>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new table with the given body rows.
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: Option<Row>) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_alignments(mut self, alignments: Vec<Alignment>) -> Self {
        self.alignments = alignments;
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: Vec<Inline>) -> Self {
        self.caption = caption;
        self
    }

    #[must_use]
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attr = attr;
        self
    }
}

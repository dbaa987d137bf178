//! Export settings controlled by `#+OPTIONS:` lines.
use serde::Serialize;

use crate::{Error, grammar::org_line};

/// Which generic drawers survive into the output.
///
/// `PROPERTIES` drawers are never part of the output, whatever the filter says.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawerFilter {
    /// Keep every drawer except the named ones (`d:t` is `Exclude([])`).
    Exclude(Vec<String>),
    /// Keep only the named drawers (`d:nil` is `Include([])`).
    Include(Vec<String>),
}

impl Default for DrawerFilter {
    fn default() -> Self {
        Self::Exclude(vec!["LOGBOOK".to_string()])
    }
}

impl DrawerFilter {
    /// Decide whether a drawer named `name` (compared case-insensitively) is exported.
    #[must_use]
    pub fn keeps(&self, name: &str) -> bool {
        let name = name.to_uppercase();
        if name == "PROPERTIES" {
            return false;
        }
        match self {
            Self::Exclude(names) => !names.contains(&name),
            Self::Include(names) => names.contains(&name),
        }
    }
}

/// Depth setting for `toc` and `num`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Levels {
    Off,
    All,
    UpTo(usize),
}

impl Levels {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "t" => Some(Self::All),
            "nil" => Some(Self::Off),
            digits => digits.parse().ok().map(Self::UpTo),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubSuperscripts {
    Off,
    #[default]
    On,
    /// Only the braced forms `a_{b}` and `a^{b}` are recognised.
    Braces,
}

/// The export vocabulary of `#+OPTIONS:`.
///
/// The drawer filter is read while scanning, since it decides which blocks exist at
/// all. Every other setting is consulted only while deferred values resolve, so a
/// declaration anywhere in the document governs the whole of it.
///
/// The parser itself acts on drawers, footnotes, tags, the metadata switches and fixed
/// width lines. The rest (`toc`, `num`, `todo`, `H`, `*`, `^`, `'`, `-`, `|`, `\n`) is
/// for renderers, which read the final values from [`Document::export`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ExportSettings {
    /// `d`
    pub drawers: DrawerFilter,
    /// `f`
    pub footnotes: bool,
    /// `tags`
    pub tags: bool,
    /// `author`
    pub author: bool,
    /// `date`
    pub date: bool,
    /// `email`
    pub email: bool,
    /// `title`
    pub title: bool,
    /// `toc`
    pub toc: Levels,
    /// `num`
    pub numbering: Levels,
    /// `todo`
    pub todo_keywords: bool,
    /// `H`
    pub headline_levels: usize,
    /// `*`
    pub emphasis: bool,
    /// `^`
    pub sub_superscripts: SubSuperscripts,
    /// `'`
    pub smart_quotes: bool,
    /// `-`
    pub special_strings: bool,
    /// `:`
    pub fixed_width: bool,
    /// `|`
    pub tables: bool,
    /// `\n`
    pub preserve_breaks: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            drawers: DrawerFilter::default(),
            footnotes: true,
            tags: true,
            author: true,
            date: true,
            email: false,
            title: true,
            toc: Levels::All,
            numbering: Levels::All,
            todo_keywords: true,
            headline_levels: 3,
            emphasis: true,
            sub_superscripts: SubSuperscripts::default(),
            smart_quotes: false,
            special_strings: true,
            fixed_width: true,
            tables: true,
            preserve_breaks: false,
        }
    }
}

fn flag(value: &str) -> Option<bool> {
    match value {
        "t" => Some(true),
        "nil" => Some(false),
        _ => None,
    }
}

impl ExportSettings {
    pub(crate) fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply a single `key:value` pair from the `#+OPTIONS:` vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExportSetting`] if the key is not part of the vocabulary
    /// or the value does not fit it. The settings are left untouched in that case.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let invalid = || Error::InvalidExportSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "d" => self.drawers = org_line::drawer_filter(value).map_err(|_| invalid())?,
            "toc" => self.toc = Levels::parse(value).ok_or_else(invalid)?,
            "num" => self.numbering = Levels::parse(value).ok_or_else(invalid)?,
            "H" => self.headline_levels = value.parse().map_err(|_| invalid())?,
            "^" => {
                self.sub_superscripts = match value {
                    "t" => SubSuperscripts::On,
                    "nil" => SubSuperscripts::Off,
                    "{}" => SubSuperscripts::Braces,
                    _ => return Err(invalid()),
                }
            }
            _ => {
                let slot = match key {
                    "f" => &mut self.footnotes,
                    "tags" => &mut self.tags,
                    "author" => &mut self.author,
                    "date" => &mut self.date,
                    "email" => &mut self.email,
                    "title" => &mut self.title,
                    "todo" => &mut self.todo_keywords,
                    "*" => &mut self.emphasis,
                    "'" => &mut self.smart_quotes,
                    "-" => &mut self.special_strings,
                    ":" => &mut self.fixed_width,
                    "|" => &mut self.tables,
                    "\\n" => &mut self.preserve_breaks,
                    _ => return Err(invalid()),
                };
                *slot = flag(value).ok_or_else(invalid)?;
            }
        }
        Ok(())
    }

    /// Apply every pair of an `#+OPTIONS:` line.
    ///
    /// Documents are allowed to carry options this parser does not know (`creator`,
    /// `timestamp`, ...), so unknown or malformed pairs are skipped.
    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn apply_line(&mut self, line: &str) {
        let pairs = match org_line::options(line) {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::warn!(%e, line, "malformed OPTIONS line, ignoring it");
                return;
            }
        };
        for (key, value) in pairs {
            if let Err(e) = self.apply(key, value) {
                tracing::debug!(%e, "ignoring export option");
            }
        }
    }
}

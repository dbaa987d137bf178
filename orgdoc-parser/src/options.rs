use crate::{Error, state::ExportSettings};

/// Prefix applied to the keys of src-block header arguments when they are attached
/// to a code block's key/values.
pub const DEFAULT_HEADER_ARGS_PREFIX: &str = "rundoc-";

/// Org's default tab stop.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Initial configuration of a parse.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Options {
    /// Width of a tab stop, used when measuring indentation of regions and list
    /// continuation lines.
    pub tab_width: usize,
    /// Export settings in effect before the first `#+OPTIONS:` line.
    pub export: ExportSettings,
    pub header_args_prefix: String,
    /// Raw `key:value` overrides, validated and applied when a parse starts.
    pub(crate) export_overrides: Vec<(String, String)>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            export: ExportSettings::default(),
            header_args_prefix: DEFAULT_HEADER_ARGS_PREFIX.to_string(),
            export_overrides: Vec::new(),
        }
    }
}

impl Options {
    /// Create a new `OptionsBuilder` for fluent configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use orgdoc_parser::Options;
    ///
    /// let options = Options::builder()
    ///     .with_tab_width(4)
    ///     .with_export_option("d", "(\"NOTES\")")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Create a new `Options` with default settings.
    ///
    /// Equivalent to `Options::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration and compute the export settings a parse starts from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTabWidth`] for a tab stop of zero and
    /// [`Error::InvalidExportSetting`] for an override outside the `#+OPTIONS:`
    /// vocabulary.
    pub(crate) fn initial_export_settings(&self) -> Result<ExportSettings, Error> {
        if self.tab_width == 0 {
            return Err(Error::InvalidTabWidth(self.tab_width));
        }
        let mut export = self.export.clone();
        for (key, value) in &self.export_overrides {
            export.apply(key, value)?;
        }
        Ok(export)
    }
}

/// Builder for `Options`.
///
/// Create an `OptionsBuilder` using `Options::builder()`.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.options.tab_width = tab_width;
        self
    }

    /// Replace the whole set of initial export settings.
    #[must_use]
    pub fn with_export_settings(mut self, export: ExportSettings) -> Self {
        self.options.export = export;
        self
    }

    /// Override one export setting using the `#+OPTIONS:` syntax, e.g.
    /// `with_export_option("tags", "nil")`.
    ///
    /// The pair is validated when parsing starts; an unknown key or a malformed
    /// value makes [`crate::parse`] return [`Error::InvalidExportSetting`].
    #[must_use]
    pub fn with_export_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options
            .export_overrides
            .push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_header_args_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.header_args_prefix = prefix.into();
        self
    }

    /// Build the `Options` from this builder.
    #[must_use]
    pub fn build(self) -> Options {
        self.options
    }
}

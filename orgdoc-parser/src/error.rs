#[non_exhaustive]
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid tab width: {0}")]
    InvalidTabWidth(usize),

    #[error("Invalid export setting: {key}:{value}")]
    InvalidExportSetting { key: String, value: String },
}

impl Error {
    /// Get advice for this error if available.
    /// Returns helpful information for resolving the error.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTabWidth(..) => {
                Some("The tab width must be at least 1 column (Org's default is 8)")
            }
            Self::InvalidExportSetting { .. } => Some(
                "Export options use the #+OPTIONS: vocabulary, for example `d:nil`, `tags:t` or `d:(\"NOTES\")`",
            ),
        }
    }
}

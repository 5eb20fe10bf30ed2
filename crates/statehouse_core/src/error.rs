use crate::fetch::FetchError;
use thiserror::Error;

/// Failures that abort the scrape of a single bill.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A pattern or structural assumption about a page no longer holds.
    #[error("format mismatch in {context}: {detail}")]
    FormatMismatch { context: &'static str, detail: String },

    #[error("can't see if {description:?} passed or failed")]
    UnrecognizedFormat { description: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

impl ScrapeError {
    pub(crate) fn mismatch(context: &'static str, detail: impl Into<String>) -> Self {
        Self::FormatMismatch {
            context,
            detail: detail.into(),
        }
    }
}

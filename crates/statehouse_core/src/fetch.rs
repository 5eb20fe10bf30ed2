use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("couldn't open {url}: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    /// The site served its own error page (e.g. a transient database failure).
    #[error("{url} served an error page containing {marker:?}")]
    Rejected { url: String, marker: String },

    #[error("no page available for {0}")]
    NotFound(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Transport { .. })
    }
}

/// Source of page bodies. Retries and timeouts are the implementor's business.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Serves pages from memory. Used for offline replays and tests.
#[derive(Debug, Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.insert(url.into(), body.into());
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageFetcher for MapFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

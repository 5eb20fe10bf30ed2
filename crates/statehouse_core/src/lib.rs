//! Extracts bills, actions and roll-call votes from the Utah Legislature's site.
//!
//! [`timeline::StatusTimeline`] is the entry point for a bill's status page;
//! [`bill::scrape_bill`] drives a whole bill through a [`fetch::PageFetcher`].

pub mod bill;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod html;
pub mod schema;
pub mod timeline;
pub mod votes;

pub use error::ScrapeError;
pub use fetch::{FetchError, MapFetcher, PageFetcher};

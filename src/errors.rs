//! Error types for the fetch, scrape and output stages.
//!
//! - [`FetchError`]: the listing page could not be obtained (transport
//!   failure, timeout or a non-2xx status)
//! - [`ScrapeError`]: a [`FetchError`] tagged with the publisher it hit,
//!   the only way a whole source fails
//! - [`OutputError`]: a digest snapshot could not be written
//!
//! Everything after the fetch degrades per card and has no error type.

use crate::models::Source;
use thiserror::Error;

/// Failure to obtain a listing page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// A whole-source scrape failure, tagged with the publisher.
///
/// Per-card problems never produce one of these; they are skipped and logged.
#[derive(Error, Debug)]
#[error("failed to scrape {publisher}: {cause}")]
pub struct ScrapeError {
    pub publisher: Source,
    #[source]
    pub cause: FetchError,
}

/// Failure to write a digest snapshot to disk.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

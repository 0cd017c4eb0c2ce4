//! Maps a requested source name onto its scraper.
//!
//! Lookup is case-insensitive. Known sources without a scraper and names
//! outside the enumeration both answer with an empty list; only a failing
//! scraper produces an error.

use crate::errors::ScrapeError;
use crate::models::{NewsItem, Source};
use crate::scrapers::{self, PageFetcher, SourceProfile};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What a requested source name resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Resolution {
    Scrape(&'static SourceProfile),
    Placeholder(Source),
    Unknown,
}

pub fn resolve(name: &str) -> Resolution {
    match Source::from_name(name) {
        Some(source) => match scrapers::profile_for(source) {
            Some(profile) => Resolution::Scrape(profile),
            None => Resolution::Placeholder(source),
        },
        None => Resolution::Unknown,
    }
}

/// Cheap to clone; all clones share one fetcher.
#[derive(Clone)]
pub struct Dispatcher {
    fetcher: Arc<dyn PageFetcher>,
}

impl Dispatcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Scrape the source called `name`.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_for(&self, name: &str) -> Result<Vec<NewsItem>, ScrapeError> {
        match resolve(name) {
            Resolution::Scrape(profile) => scrapers::scrape(profile, self.fetcher.as_ref()).await,
            Resolution::Placeholder(source) => {
                info!(event = "dispatch.placeholder_source", %source, "Source not implemented yet; returning empty list");
                Ok(Vec::new())
            }
            Resolution::Unknown => {
                warn!(event = "dispatch.unknown_source", requested = %name, "Unknown source; returning empty list");
                Ok(Vec::new())
            }
        }
    }
}

//! Publisher scrapers.
//!
//! Every publisher goes through the same pipeline; what differs is a
//! [`SourceProfile`] configuration value:
//!
//! 1. **Fetch**: one GET of the listing URL with a browser-like User-Agent
//!    and any publisher-specific headers
//! 2. **Locate**: the first card selector that matches at least one node
//! 3. **Filter**: optionally drop nodes that don't look like article cards
//! 4. **Extract**: run the [`crate::extract`] strategies over each card
//! 5. **Normalize**: absolute URLs and ISO-8601 dates via [`crate::normalize`]
//! 6. **Guard**: keep only records with a title and an absolute link
//!
//! # Supported Sources
//!
//! | Source | Module | Listing |
//! |--------|--------|---------|
//! | Rhodium Group | [`rhg`] | research index |
//! | McKinsey & Company | [`mckinsey`] | featured insights |
//!
//! Fetch failures abort the scrape with a [`ScrapeError`]; everything after
//! the fetch degrades per card and never fails the whole list.

pub mod mckinsey;
pub mod rhg;

use crate::errors::{FetchError, ScrapeError};
use crate::extract::{self, FieldRules, RawFields};
use crate::models::{NewsItem, Source};
use crate::normalize::{self, LINK_SENTINEL};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// How one publisher's listing page is scraped.
#[derive(Debug)]
pub struct SourceProfile {
    pub source: Source,
    pub listing_url: &'static str,
    /// Origin that relative URLs on the page resolve against.
    pub origin: &'static str,
    /// Extra request headers beyond the User-Agent.
    pub headers: &'static [(&'static str, &'static str)],
    /// Card selectors in priority order; the first with any match is used.
    pub card_selectors: &'static [&'static str],
    /// Drop matched nodes that lack an image or a title/link region.
    pub require_image: bool,
    pub fields: FieldRules,
}

/// The scrape profile for a source, if that source has a scraper.
pub fn profile_for(source: Source) -> Option<&'static SourceProfile> {
    match source {
        Source::Rhg => Some(&rhg::PROFILE),
        Source::McKinsey => Some(&mckinsey::PROFILE),
        _ => None,
    }
}

/// Retrieves a page body. The network seam of the pipeline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError>;
}

/// [`PageFetcher`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that identifies as `user_agent`. A `None` timeout
    /// leaves requests bounded only by the transport.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched listing page");
        Ok(body)
    }
}

/// Why a matched card produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Filtered,
    MissingTitle,
    MissingLink,
    UnresolvableLink,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Filtered => "filtered",
            SkipReason::MissingTitle => "missing_title",
            SkipReason::MissingLink => "missing_link",
            SkipReason::UnresolvableLink => "unresolvable_link",
        }
    }
}

/// Outcome of running the extraction half of the pipeline over one page.
#[derive(Debug, Default)]
pub struct Extraction {
    pub items: Vec<NewsItem>,
    pub skipped: usize,
    /// The card selector that matched, if any did.
    pub selector: Option<&'static str>,
}

/// Nodes matched by the first selector that yields at least one match.
pub fn find_cards<'a>(
    document: &'a Html,
    selectors: &[&'static str],
) -> (Option<&'static str>, Vec<ElementRef<'a>>) {
    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            warn!(selector = %css, "Invalid card selector; skipping");
            continue;
        };
        let cards: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !cards.is_empty() {
            return (Some(*css), cards);
        }
    }
    (None, Vec::new())
}

/// Turn raw fields into a record, or say why not.
pub fn build_item(
    profile: &SourceProfile,
    fields: RawFields,
    now: DateTime<Utc>,
) -> Result<NewsItem, SkipReason> {
    let title = fields.title.ok_or(SkipReason::MissingTitle)?;
    let raw_link = fields.link.ok_or(SkipReason::MissingLink)?;
    let link = normalize::normalize_link(Some(raw_link.as_str()), profile.origin);
    if link == LINK_SENTINEL {
        return Err(SkipReason::UnresolvableLink);
    }

    Ok(NewsItem {
        id: link.clone(),
        title,
        link,
        source: profile.source,
        published_date: normalize::normalize_date_at(fields.date.as_deref(), now),
        summary: fields.summary,
        image_url: normalize::normalize_image(fields.image.as_deref(), profile.origin),
    })
}

/// Parse a listing page and turn every usable card into a [`NewsItem`].
///
/// This is the synchronous half of [`scrape`]: locate cards with the first
/// matching selector, apply the structural filter when the profile asks
/// for it, extract and normalize fields, and drop cards that end up without
/// a title or an absolute link. Each dropped card emits one `item.skipped`
/// debug event.
///
/// # Arguments
///
/// * `profile` - Selectors, origin and filter setting for the publisher
/// * `html` - The listing page body
/// * `now` - Scrape time, used for cards whose date is missing or unparseable
///
/// # Returns
///
/// An [`Extraction`] with the items in document order, the number of
/// skipped cards and the selector that matched. When no selector matches,
/// the extraction is empty and a warning with a preview of the page is
/// logged.
pub fn extract_items(profile: &SourceProfile, html: &str, now: DateTime<Utc>) -> Extraction {
    let document = Html::parse_document(html);
    let (selector, cards) = find_cards(&document, profile.card_selectors);
    let Some(selector) = selector else {
        warn!(
            source = %profile.source,
            preview = %truncate_for_log(html, 200),
            "No card selector matched; page structure may have changed"
        );
        return Extraction::default();
    };

    let mut extraction = Extraction {
        selector: Some(selector),
        ..Extraction::default()
    };
    for (index, card) in cards.into_iter().enumerate() {
        let built = if profile.require_image && !extract::looks_like_card(card, &profile.fields) {
            Err(SkipReason::Filtered)
        } else {
            build_item(profile, extract::extract_fields(card, &profile.fields), now)
        };
        match built {
            Ok(item) => extraction.items.push(item),
            Err(reason) => {
                extraction.skipped += 1;
                debug!(
                    event = "item.skipped",
                    source = %profile.source,
                    index,
                    reason = reason.as_str(),
                    "Skipped card"
                );
            }
        }
    }
    extraction
}

/// Fetch and scrape one publisher.
///
/// Issues a single GET of the profile's listing URL through `fetcher`
/// (no retries), then hands the body to [`extract_items`] with the current
/// time as the date fallback.
///
/// # Arguments
///
/// * `profile` - The publisher to scrape
/// * `fetcher` - Network seam; [`HttpFetcher`] in production
///
/// # Returns
///
/// The extracted items, possibly empty. A transport failure or non-2xx
/// status returns a [`ScrapeError`] naming the publisher; nothing that
/// happens after the fetch is an error.
///
/// # Events
///
/// Exactly one `scrape.completed` (info) or `scrape.failed` (error) event
/// per call, carrying the source, duration and item/skip counts.
#[instrument(level = "info", skip_all, fields(source = %profile.source))]
pub async fn scrape(
    profile: &SourceProfile,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<NewsItem>, ScrapeError> {
    let t0 = Instant::now();
    let body = match fetcher.fetch(profile.listing_url, profile.headers).await {
        Ok(body) => body,
        Err(cause) => {
            error!(
                event = "scrape.failed",
                source = %profile.source,
                url = profile.listing_url,
                duration_ms = t0.elapsed().as_millis() as u64,
                error = %cause,
                "Scrape failed"
            );
            return Err(ScrapeError {
                publisher: profile.source,
                cause,
            });
        }
    };

    let extraction = extract_items(profile, &body, Utc::now());
    info!(
        event = "scrape.completed",
        source = %profile.source,
        selector = extraction.selector.unwrap_or("none"),
        items = extraction.items.len(),
        skipped = extraction.skipped,
        duration_ms = t0.elapsed().as_millis() as u64,
        "Scrape completed"
    );
    Ok(extraction.items)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies or statuses keyed by URL and records requests.
    #[derive(Debug, Default)]
    pub struct CannedFetcher {
        pages: HashMap<String, Result<String, u16>>,
        pub requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl CannedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        pub fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), Err(status));
            self
        }
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push((
                url.to_string(),
                headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}

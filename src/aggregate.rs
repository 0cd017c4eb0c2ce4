//! Multi-source fetch for the feed.
//!
//! Each requested source is scraped as an independent concurrent future.
//! A failing source is reported in [`Digest::failures`] and never hides the
//! results of the others. Combined items are ordered newest first.

use crate::dispatch::Dispatcher;
use crate::models::{Digest, NewsItem, SourceFailure};
use futures::future::join_all;
use std::cmp::Reverse;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Scrape every name in `names` concurrently and merge the results.
#[instrument(level = "info", skip(dispatcher))]
pub async fn aggregate(dispatcher: &Dispatcher, names: &[String]) -> Digest {
    let t0 = Instant::now();
    let results = join_all(names.iter().map(|name| dispatcher.fetch_for(name))).await;

    let mut digest = Digest::default();
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(items) => digest.items.extend(items),
            Err(e) => {
                warn!(source = %name, error = %e, "Source unavailable; continuing with the rest");
                digest.failures.push(SourceFailure {
                    source: name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    sort_newest_first(&mut digest.items);

    info!(
        sources = names.len(),
        items = digest.items.len(),
        failed = digest.failures.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Aggregated sources"
    );
    digest
}

/// Order by `publishedDate`, newest first. Unparseable dates sort last.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by_key(|item| Reverse(item.published_at()));
}

/// Keep the items whose source label is among `selected` (case-insensitive).
pub fn filter_by_sources(items: &[NewsItem], selected: &[String]) -> Vec<NewsItem> {
    items
        .iter()
        .filter(|item| {
            selected
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(item.source.label()))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use crate::scrapers::{mckinsey, rhg, testing::CannedFetcher};
    use std::sync::Arc;

    fn item(source: Source, link: &str, date: &str) -> NewsItem {
        NewsItem {
            id: link.to_string(),
            title: link.to_string(),
            link: link.to_string(),
            source,
            published_date: date.to_string(),
            summary: None,
            image_url: None,
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut items = vec![
            item(Source::Rhg, "https://rhg.com/old", "2024-01-01T00:00:00.000Z"),
            item(Source::McKinsey, "https://www.mckinsey.com/new", "2025-06-01T00:00:00.000Z"),
            item(Source::Rhg, "https://rhg.com/mid", "2025-01-01T12:00:00.000Z"),
        ];
        sort_newest_first(&mut items);
        let links: Vec<&str> = items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://www.mckinsey.com/new", "https://rhg.com/mid", "https://rhg.com/old"]
        );
    }

    #[test]
    fn test_filter_by_sources() {
        let items = vec![
            item(Source::Rhg, "https://rhg.com/a", "2025-01-01T00:00:00.000Z"),
            item(Source::McKinsey, "https://www.mckinsey.com/b", "2025-01-01T00:00:00.000Z"),
        ];
        let kept = filter_by_sources(&items, &["mckinsey".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, Source::McKinsey);
        assert!(filter_by_sources(&items, &[]).is_empty());
    }

    #[tokio::test]
    async fn test_failed_source_does_not_hide_others() {
        let fetcher = CannedFetcher::new()
            .page(
                rhg::PROFILE.listing_url,
                r#"<article class="research-card"><h3><a href="/research/x/">X</a></h3>
                   <time datetime="2025-02-01T00:00:00Z"></time></article>
                   <article class="research-card"><h3><a href="/research/y/">Y</a></h3>
                   <time datetime="2025-03-01T00:00:00Z"></time></article>"#,
            )
            .status(mckinsey::PROFILE.listing_url, 500);
        let dispatcher = Dispatcher::new(Arc::new(fetcher));
        let names = vec!["RHG".to_string(), "McKinsey".to_string(), "NYT".to_string()];

        let digest = aggregate(&dispatcher, &names).await;
        assert_eq!(digest.items.len(), 2);
        assert_eq!(digest.items[0].title, "Y");
        assert_eq!(digest.items[1].title, "X");
        assert_eq!(digest.failures.len(), 1);
        assert_eq!(digest.failures[0].source, "McKinsey");
        assert!(digest.failures[0].message.contains("500"));
    }
}

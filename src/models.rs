//! Data models shared by the scrapers, the dispatcher and the HTTP surface.
//!
//! - [`Source`]: the fixed enumeration of publisher identifiers
//! - [`NewsItem`]: one normalized listing entry scraped from a publisher page
//! - [`Digest`]: the combined, sorted result of scraping several sources
//!
//! The JSON field names use camelCase because the browser feed consumes
//! these records directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A publisher the feed knows about.
///
/// Only [`Source::Rhg`] and [`Source::McKinsey`] have scrapers; the rest are
/// recognized so the dispatcher can answer them with an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "RHG")]
    Rhg,
    #[serde(rename = "McKinsey")]
    McKinsey,
    #[serde(rename = "NYT")]
    Nyt,
    #[serde(rename = "WSJ")]
    Wsj,
    #[serde(rename = "S&P Global")]
    SpGlobal,
    #[serde(rename = "Reddit")]
    Reddit,
    #[serde(rename = "YouTube")]
    YouTube,
}

impl Source {
    /// Every known source, implemented ones first.
    pub const ALL: [Source; 7] = [
        Source::Rhg,
        Source::McKinsey,
        Source::Nyt,
        Source::Wsj,
        Source::SpGlobal,
        Source::Reddit,
        Source::YouTube,
    ];

    /// The label emitted in [`NewsItem::source`] and shown by the feed filter.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Rhg => "RHG",
            Source::McKinsey => "McKinsey",
            Source::Nyt => "NYT",
            Source::Wsj => "WSJ",
            Source::SpGlobal => "S&P Global",
            Source::Reddit => "Reddit",
            Source::YouTube => "YouTube",
        }
    }

    /// Case-insensitive lookup of a requested source name.
    ///
    /// Returns `None` for names outside the enumeration; callers decide how
    /// lenient to be about that.
    pub fn from_name(name: &str) -> Option<Source> {
        match name.trim().to_uppercase().as_str() {
            "RHG" => Some(Source::Rhg),
            "MCKINSEY" => Some(Source::McKinsey),
            "NYT" => Some(Source::Nyt),
            "WSJ" => Some(Source::Wsj),
            "S&P GLOBAL" | "S&P" | "SP GLOBAL" => Some(Source::SpGlobal),
            "REDDIT" => Some(Source::Reddit),
            "YOUTUBE" => Some(Source::YouTube),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized news item.
///
/// `id` and `link` are always the same absolute URL. Optional fields are
/// omitted from the JSON rather than emitted as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Natural key: the absolute article link.
    pub id: String,
    pub title: String,
    pub link: String,
    pub source: Source,
    /// ISO-8601 timestamp with millisecond precision, e.g. `2025-01-15T00:00:00.000Z`.
    pub published_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewsItem {
    /// Parsed form of [`NewsItem::published_date`], used for ordering.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A source that failed during a multi-source fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    /// The name as requested by the caller.
    pub source: String,
    pub message: String,
}

/// Items from several sources, newest first, plus the sources that failed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Digest {
    pub items: Vec<NewsItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SourceFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(published_date: &str) -> NewsItem {
        NewsItem {
            id: "https://rhg.com/research/a".to_string(),
            title: "A".to_string(),
            link: "https://rhg.com/research/a".to_string(),
            source: Source::Rhg,
            published_date: published_date.to_string(),
            summary: None,
            image_url: None,
        }
    }

    #[test]
    fn test_source_from_name_is_case_insensitive() {
        assert_eq!(Source::from_name("rhg"), Some(Source::Rhg));
        assert_eq!(Source::from_name("McKinsey"), Some(Source::McKinsey));
        assert_eq!(Source::from_name("  MCKINSEY "), Some(Source::McKinsey));
        assert_eq!(Source::from_name("s&p"), Some(Source::SpGlobal));
        assert_eq!(Source::from_name("S&P Global"), Some(Source::SpGlobal));
        assert_eq!(Source::from_name("bloomberg"), None);
    }

    #[test]
    fn test_source_labels_round_trip_through_lookup() {
        for source in Source::ALL {
            assert_eq!(Source::from_name(source.label()), Some(source));
        }
    }

    #[test]
    fn test_news_item_omits_absent_optionals() {
        let json = serde_json::to_value(item("2025-01-15T00:00:00.000Z")).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["source"], "RHG");
        assert_eq!(obj["publishedDate"], "2025-01-15T00:00:00.000Z");
        assert!(!obj.contains_key("summary"));
        assert!(!obj.contains_key("imageUrl"));
    }

    #[test]
    fn test_news_item_emits_present_optionals_in_camel_case() {
        let mut it = item("2025-01-15T00:00:00.000Z");
        it.summary = Some("Overview".to_string());
        it.image_url = Some("https://rhg.com/img/a.jpg".to_string());
        let json = serde_json::to_string(&it).unwrap();
        assert!(json.contains("\"summary\":\"Overview\""));
        assert!(json.contains("\"imageUrl\":\"https://rhg.com/img/a.jpg\""));
    }

    #[test]
    fn test_published_at_parses_timestamp() {
        let at = item("2025-01-15T00:00:00.000Z").published_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2025-01-15T00:00:00+00:00");
        assert!(item("not a date").published_at().is_none());
    }

    #[test]
    fn test_digest_skips_empty_failures() {
        let json = serde_json::to_string(&Digest::default()).unwrap();
        assert_eq!(json, r#"{"items":[]}"#);
    }
}

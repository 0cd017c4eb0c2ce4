//! Normalization of raw extracted fields into their canonical form.
//!
//! - URLs: relative, protocol-relative and absolute candidates become
//!   absolute `http(s)` URLs, resolved against the publisher origin.
//! - Dates: loosely formatted text becomes an ISO-8601 UTC timestamp with
//!   millisecond precision, falling back to "now" when nothing parses.
//!
//! Neither half ever fails: malformed input is recovered with a defined
//! fallback and, for dates, a warning event.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use url::Url;

/// Placeholder link produced when a candidate href cannot be resolved.
pub const LINK_SENTINEL: &str = "#";

fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate.get(..8).unwrap_or(candidate).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve `candidate` into an absolute `http(s)` URL.
///
/// Rules, in order:
/// 1. already absolute (`http://`, `https://`): returned unchanged;
/// 2. protocol-relative (`//host/...`): prefixed with `https:`;
/// 3. anything else: joined onto `origin`.
///
/// Returns `None` for empty input, unparseable results and non-web schemes
/// such as `javascript:` or `mailto:`.
pub fn resolve_url(candidate: &str, origin: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    if has_http_scheme(candidate) {
        return Some(candidate.to_string());
    }
    if candidate.starts_with("//") {
        let rewritten = format!("https:{candidate}");
        return Url::parse(&rewritten).ok().map(|_| rewritten);
    }

    let base = Url::parse(origin).ok()?;
    let joined = base.join(candidate).ok()?;
    match joined.scheme() {
        "http" | "https" => Some(joined.to_string()),
        _ => None,
    }
}

/// Normalize an article link; unresolvable links become [`LINK_SENTINEL`].
pub fn normalize_link(candidate: Option<&str>, origin: &str) -> String {
    candidate
        .and_then(|c| resolve_url(c, origin))
        .unwrap_or_else(|| LINK_SENTINEL.to_string())
}

/// Normalize an image URL; unresolvable images are dropped.
pub fn normalize_image(candidate: Option<&str>, origin: &str) -> Option<String> {
    candidate.and_then(|c| resolve_url(c, origin))
}

/// Format an instant the way the feed expects: `2025-01-15T00:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());
static LEADING_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(published|updated|posted|date)\s*(on)?\s*:?\s*").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DISPLAY_DATETIME_FORMATS: &[&str] = &[
    "%B %d %Y %I:%M %p",
    "%b %d %Y %I:%M %p",
    "%d %B %Y %I:%M %p",
    "%d %b %Y %I:%M %p",
    "%B %d %Y %H:%M",
    "%b %d %Y %H:%M",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Month-and-year text, parsed with a leading `1` so it lands on the 1st.
const MONTH_YEAR_FORMATS: &[&str] = &["%d %B %Y", "%d %b %Y"];

/// `%Y` accepts one- and two-digit years, and `%d` happily eats the first
/// two digits of a bare year (`January 2025` reads as the 20th of year 25).
/// Anything earlier than this is such a misread.
const MIN_YEAR: i32 = 1900;

fn plausible(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    (naive.year() >= MIN_YEAR).then(|| naive.and_utc())
}

fn parse_datetime(text: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(text, fmt)
            .ok()
            .and_then(plausible)
    })
}

fn parse_date(text: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(plausible)
    })
}

/// Best-effort parse of a publisher date string.
///
/// Machine formats (RFC 3339, RFC 2822, naive ISO date-times) are tried
/// first. Displayed text like `January 15, 2025`, `Jan. 15th, 2025 10:30 AM`
/// or `Published: 15 Jan 2025` is cleaned up and tried next; date-only text
/// lands at midnight UTC and month-and-year text (`March 2025`) on the 1st.
///
/// # Returns
///
/// `None` when nothing parses or the only readings put the year before 1900.
pub fn parse_loose_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_datetime(text, DATETIME_FORMATS) {
        return Some(dt);
    }

    let cleaned = LEADING_LABEL.replace(text, "");
    let cleaned = ORDINAL_SUFFIX.replace_all(&cleaned, "$1");
    let cleaned = cleaned
        .replace([',', '.'], " ")
        .replace("Sept ", "Sep ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    parse_datetime(&cleaned, DISPLAY_DATETIME_FORMATS)
        .or_else(|| parse_date(&cleaned, DATE_FORMATS))
        .or_else(|| parse_date(&format!("1 {cleaned}"), MONTH_YEAR_FORMATS))
}

/// Normalize a publisher date into an ISO-8601 timestamp.
///
/// Absent, blank or unparseable input yields `now`, the scrape time.
pub fn normalize_date_at(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let text = raw.map(str::trim).filter(|s| !s.is_empty());
    let parsed = text.and_then(|t| {
        let parsed = parse_loose_date(t);
        if parsed.is_none() {
            warn!(event = "date.unparseable", raw = %t, "Unparseable date; using scrape time");
        }
        parsed
    });
    format_timestamp(parsed.unwrap_or(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ORIGIN: &str = "https://rhg.com";

    #[test]
    fn test_absolute_urls_are_unchanged() {
        let url = "https://rhg.com/research/trade-2025?ref=home#top";
        assert_eq!(resolve_url(url, ORIGIN).as_deref(), Some(url));
        assert_eq!(
            resolve_url("HTTP://Example.com/A", ORIGIN).as_deref(),
            Some("HTTP://Example.com/A")
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for candidate in ["/research/x", "research/y", "//cdn.example.com/a.jpg", "../z?q=1"] {
            let once = resolve_url(candidate, ORIGIN).unwrap();
            let twice = resolve_url(&once, ORIGIN).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_protocol_relative_is_rewritten_to_https() {
        assert_eq!(
            resolve_url("//cdn.example.com/a.jpg", ORIGIN).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_origin() {
        assert_eq!(
            resolve_url("/research/trade-2025", ORIGIN).as_deref(),
            Some("https://rhg.com/research/trade-2025")
        );
        assert_eq!(
            resolve_url("img/trade.jpg", "https://www.mckinsey.com").as_deref(),
            Some("https://www.mckinsey.com/img/trade.jpg")
        );
    }

    #[test]
    fn test_unresolvable_candidates() {
        assert_eq!(resolve_url("", ORIGIN), None);
        assert_eq!(resolve_url("   ", ORIGIN), None);
        assert_eq!(resolve_url("javascript:void(0)", ORIGIN), None);
        assert_eq!(resolve_url("mailto:press@rhg.com", ORIGIN), None);
        assert_eq!(resolve_url("/a", "not an origin"), None);
    }

    #[test]
    fn test_link_and_image_fallbacks_differ() {
        assert_eq!(normalize_link(Some("javascript:void(0)"), ORIGIN), LINK_SENTINEL);
        assert_eq!(normalize_link(None, ORIGIN), LINK_SENTINEL);
        assert_eq!(normalize_image(Some("javascript:void(0)"), ORIGIN), None);
        assert_eq!(
            normalize_image(Some("/img/trade.jpg"), ORIGIN).as_deref(),
            Some("https://rhg.com/img/trade.jpg")
        );
    }

    #[test]
    fn test_date_machine_formats() {
        let now = Utc::now();
        assert_eq!(
            normalize_date_at(Some("2025-01-15T00:00:00Z"), now),
            "2025-01-15T00:00:00.000Z"
        );
        assert_eq!(
            normalize_date_at(Some("2025-01-15T09:30:00+02:00"), now),
            "2025-01-15T07:30:00.000Z"
        );
        assert_eq!(
            normalize_date_at(Some("Wed, 15 Jan 2025 10:00:00 GMT"), now),
            "2025-01-15T10:00:00.000Z"
        );
        assert_eq!(
            normalize_date_at(Some("2025-01-15T10:00:00"), now),
            "2025-01-15T10:00:00.000Z"
        );
        assert_eq!(
            normalize_date_at(Some("2025-01-15T10:00Z"), now),
            "2025-01-15T10:00:00.000Z"
        );
    }

    #[test]
    fn test_date_display_formats_with_time() {
        let now = Utc::now();
        for text in [
            "Jan 15, 2025 10:30 AM",
            "January 15, 2025 10:30 am",
            "15 Jan 2025 10:30",
        ] {
            assert_eq!(
                normalize_date_at(Some(text), now),
                "2025-01-15T10:30:00.000Z",
                "input: {text}"
            );
        }
        assert_eq!(
            normalize_date_at(Some("Jan 15, 2025 3:05 PM"), now),
            "2025-01-15T15:05:00.000Z"
        );
    }

    #[test]
    fn test_month_and_year_land_on_the_first() {
        let now = Utc::now();
        assert_eq!(
            normalize_date_at(Some("January 2025"), now),
            "2025-01-01T00:00:00.000Z"
        );
        assert_eq!(normalize_date_at(Some("Dec 2024"), now), "2024-12-01T00:00:00.000Z");
        assert_eq!(
            normalize_date_at(Some("Published: March 2025"), now),
            "2025-03-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_short_years_are_never_read_as_first_century() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            normalize_date_at(Some("01/15/25"), now),
            "2025-01-15T00:00:00.000Z"
        );
        assert_eq!(parse_loose_date("Jan 15 25"), None);
        assert_eq!(parse_loose_date("0025-01-15"), None);
    }

    #[test]
    fn test_date_display_formats() {
        let now = Utc::now();
        let expected = "2025-01-15T00:00:00.000Z";
        for text in [
            "2025-01-15",
            "January 15, 2025",
            "Jan 15, 2025",
            "Jan. 15th, 2025",
            "15 January 2025",
            "01/15/2025",
            "Published: January 15, 2025",
        ] {
            assert_eq!(normalize_date_at(Some(text), now), expected, "input: {text}");
        }
        assert_eq!(
            normalize_date_at(Some("Sept. 3, 2024"), now),
            "2024-09-03T00:00:00.000Z"
        );
    }

    #[test]
    fn test_date_falls_back_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let expected = "2026-03-01T12:00:00.000Z";
        assert_eq!(normalize_date_at(None, now), expected);
        assert_eq!(normalize_date_at(Some("  "), now), expected);
        assert_eq!(normalize_date_at(Some("yesterday-ish"), now), expected);
        assert_eq!(normalize_date_at(Some("2025-02-30"), now), expected);
    }

    #[test]
    fn test_default_fallback_is_close_to_scrape_time() {
        let before = Utc::now();
        let out = normalize_date_at(Some("not a date"), Utc::now());
        let parsed = DateTime::parse_from_rfc3339(&out).unwrap().with_timezone(&Utc);
        assert!((parsed - before).num_seconds().abs() <= 5);
    }
}

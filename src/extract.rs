//! Field extraction from a single item card.
//!
//! Each field is located through an ordered list of strategies; the first
//! non-empty result wins. Every function here is pure and infallible:
//! absence is `None`, never an error.

use crate::utils::{collapse_whitespace, non_empty};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// One place a card may carry its title and/or link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleLinkStrategy {
    /// An anchor inside a heading. Text is the title, `href` is the link.
    HeadingLink(&'static str),
    /// An anchor around the card image. `href` is the link, the image's
    /// `alt` text is the title.
    ImageLink {
        link: &'static str,
        image: &'static str,
    },
    /// The card element is itself an anchor. Link only.
    CardAnchor,
    /// A heading without an anchor. Title only.
    BareHeading(&'static str),
}

/// Per-publisher selector lists, each in priority order.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub title_link: &'static [TitleLinkStrategy],
    pub summary: &'static [&'static str],
    /// Category label that some markup repeats at the start of the summary.
    pub eyebrow: &'static [&'static str],
    /// Social share link lists that some markup appends to the summary.
    pub share: &'static [&'static str],
    pub date: &'static [&'static str],
    pub image: &'static [&'static str],
}

/// Raw field values pulled from one card. Nothing is guaranteed present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawFields {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
}

fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    root.select(&selector).next()
}

fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Visible text of an element, whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value().attr(name).and_then(non_empty)
}

fn first_text(card: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .flat_map(|css| select_all(card, css))
        .find_map(|el| non_empty(&element_text(el)))
}

fn apply_strategy(card: ElementRef<'_>, strategy: &TitleLinkStrategy) -> (Option<String>, Option<String>) {
    match *strategy {
        TitleLinkStrategy::HeadingLink(css) => match select_first(card, css) {
            Some(anchor) => (non_empty(&element_text(anchor)), attr(anchor, "href")),
            None => (None, None),
        },
        TitleLinkStrategy::ImageLink { link, image } => match select_first(card, link) {
            Some(anchor) => {
                let alt = select_first(anchor, image)
                    .or_else(|| select_first(card, image))
                    .and_then(|img| attr(img, "alt"));
                (alt, attr(anchor, "href"))
            }
            None => (None, None),
        },
        TitleLinkStrategy::CardAnchor => {
            if card.value().name() == "a" {
                (None, attr(card, "href"))
            } else {
                (None, None)
            }
        }
        TitleLinkStrategy::BareHeading(css) => (
            select_first(card, css).and_then(|h| non_empty(&element_text(h))),
            None,
        ),
    }
}

/// Walk the title/link strategies in order, filling whichever of the two is
/// still missing, and stop once both are known.
pub fn extract_title_link(
    card: ElementRef<'_>,
    strategies: &[TitleLinkStrategy],
) -> (Option<String>, Option<String>) {
    let mut title = None;
    let mut link = None;
    for strategy in strategies {
        let (t, l) = apply_strategy(card, strategy);
        if title.is_none() {
            title = t;
        }
        if link.is_none() {
            link = l;
        }
        if title.is_some() && link.is_some() {
            break;
        }
    }
    (title, link)
}

static TRAILING_SHARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*\bshare(\s+(this|on))?\s*:?(\s*\b(linkedin|twitter|x|facebook|email|e-mail|print|copy link)\b[\s,|]*)+$",
    )
    .unwrap()
});

fn is_label_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '|' | '-' | '–' | '—' | '·')
}

/// Drop a leading category label when the summary repeats it.
///
/// The label must end at a word boundary: `Report` is stripped from
/// `Report: Body` but not from `Reports from the field`.
pub fn strip_eyebrow(text: &str, eyebrow: Option<&str>) -> String {
    let Some(eyebrow) = eyebrow.map(str::trim).filter(|e| !e.is_empty()) else {
        return text.to_string();
    };
    let Some(rest) = text
        .get(..eyebrow.len())
        .filter(|head| head.eq_ignore_ascii_case(eyebrow))
        .map(|_| &text[eyebrow.len()..])
    else {
        return text.to_string();
    };
    if rest.chars().next().is_some_and(|c| !is_label_separator(c)) {
        return text.to_string();
    }
    rest.trim_start_matches(is_label_separator).to_string()
}

/// Drop a trailing social share label list.
///
/// `share` is the text of the card's share container when the markup has
/// one; otherwise a generic `Share LinkedIn Twitter ...` tail is recognized.
pub fn strip_share_labels(text: &str, share: Option<&str>) -> String {
    if let Some(share) = share.map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(head) = text.strip_suffix(share) {
            return head.trim_end().to_string();
        }
    }
    TRAILING_SHARE.replace(text, "").trim_end().to_string()
}

/// Summary from the first description container, minus any repeated
/// eyebrow label and trailing share links.
pub fn extract_summary(card: ElementRef<'_>, rules: &FieldRules) -> Option<String> {
    let text = first_text(card, rules.summary)?;
    let eyebrow = first_text(card, rules.eyebrow);
    let share = first_text(card, rules.share);
    let text = strip_eyebrow(&text, eyebrow.as_deref());
    let text = strip_share_labels(&text, share.as_deref());
    non_empty(&text)
}

/// Publication date text, preferring a machine-readable `datetime`
/// attribute on any candidate over displayed text.
pub fn extract_date(card: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    let candidates: Vec<ElementRef<'_>> = selectors
        .iter()
        .flat_map(|css| select_all(card, css))
        .collect();
    candidates
        .iter()
        .find_map(|el| attr(*el, "datetime"))
        .or_else(|| candidates.iter().find_map(|el| non_empty(&element_text(*el))))
}

/// First URL of a responsive `srcset` value.
///
/// ```ignore
/// assert_eq!(first_srcset_url("/a-400.jpg 400w, /a-800.jpg 800w").as_deref(), Some("/a-400.jpg"));
/// ```
pub fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
        .and_then(|entry| entry.split_whitespace().next())
        .map(str::to_string)
}

fn direct_source(el: ElementRef<'_>) -> Option<String> {
    ["src", "data-src"]
        .iter()
        .filter_map(|name| attr(el, name))
        .find(|src| !src.starts_with("data:"))
}

fn srcset_source(el: ElementRef<'_>) -> Option<String> {
    ["srcset", "data-srcset"]
        .iter()
        .filter_map(|name| attr(el, name))
        .find_map(|set| first_srcset_url(&set))
}

/// Image candidate from the first element that carries any usable source.
///
/// Within that element a direct source attribute wins over the first
/// `srcset` entry. Inline `data:` placeholders are ignored, so a lazy-load
/// image falls through to its `srcset`.
pub fn extract_image(card: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .flat_map(|css| select_all(card, css))
        .find_map(|el| direct_source(el).or_else(|| srcset_source(el)))
}

/// Structural check used by publishers whose card selector is broad:
/// a card must show an image and a title-or-link region.
pub fn looks_like_card(card: ElementRef<'_>, rules: &FieldRules) -> bool {
    if extract_image(card, rules.image).is_none() {
        return false;
    }
    let (title, link) = extract_title_link(card, rules.title_link);
    title.is_some() || link.is_some()
}

/// Run every field extractor over one card.
pub fn extract_fields(card: ElementRef<'_>, rules: &FieldRules) -> RawFields {
    let (title, link) = extract_title_link(card, rules.title_link);
    RawFields {
        title,
        link,
        summary: extract_summary(card, rules),
        date: extract_date(card, rules.date),
        image: extract_image(card, rules.image),
    }
}

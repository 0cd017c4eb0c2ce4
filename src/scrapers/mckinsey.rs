//! McKinsey & Company featured insights.
//!
//! The [featured insights](https://www.mckinsey.com/featured-insights) page
//! serves a lighter server-rendered variant only when the request looks
//! like an English-language browser, so the profile sends `Accept` and
//! `Accept-Language` alongside the User-Agent.
//!
//! Content blocks are matched with broad selectors that also catch
//! newsletter and podcast promos; the structural filter keeps only blocks
//! that show an image and a title or link.

use super::SourceProfile;
use crate::extract::{FieldRules, TitleLinkStrategy};
use crate::models::Source;

pub static PROFILE: SourceProfile = SourceProfile {
    source: Source::McKinsey,
    listing_url: "https://www.mckinsey.com/featured-insights",
    origin: "https://www.mckinsey.com",
    headers: &[
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.9"),
    ],
    card_selectors: &[
        "div.mdc-c-content-block",
        "[data-component='mdc-c-content-block']",
        ".GenericItem_mck-c-generic-item__container",
        "li.item",
    ],
    require_image: true,
    fields: FieldRules {
        title_link: &[
            TitleLinkStrategy::HeadingLink(".mdc-c-heading a[href]"),
            TitleLinkStrategy::HeadingLink("h3 a[href], h2 a[href]"),
            TitleLinkStrategy::ImageLink {
                link: ".mdc-c-content-block__image a[href], a.item-image[href]",
                image: "img",
            },
            TitleLinkStrategy::CardAnchor,
            TitleLinkStrategy::BareHeading(".mdc-c-heading, h3, h2"),
        ],
        summary: &[".mdc-c-description", ".description", "p"],
        eyebrow: &[".mdc-c-eyebrow", ".eyebrow"],
        share: &[".mdc-c-share", ".share"],
        date: &["time", ".mdc-c-date", ".date"],
        image: &["img", "picture source"],
    },
};

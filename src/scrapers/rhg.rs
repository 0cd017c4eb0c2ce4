//! Rhodium Group research listing.
//!
//! The research index at [rhg.com](https://rhg.com/research/) renders one
//! `<article>` per publication. Older templates wrap the title in `h3`,
//! newer ones in `h2`; chart notes sometimes carry no heading at all and
//! only an image link with descriptive alt text.
//!
//! # URL Pattern
//!
//! Article and image links are usually site-relative (`/research/slug/`)
//! and resolve against `https://rhg.com`.

use super::SourceProfile;
use crate::extract::{FieldRules, TitleLinkStrategy};
use crate::models::Source;

pub static PROFILE: SourceProfile = SourceProfile {
    source: Source::Rhg,
    listing_url: "https://rhg.com/research/",
    origin: "https://rhg.com",
    headers: &[],
    card_selectors: &[
        "article.research-card",
        ".research-listing article",
        "article.post",
        ".card--research",
    ],
    require_image: false,
    fields: FieldRules {
        title_link: &[
            TitleLinkStrategy::HeadingLink("h3 a[href]"),
            TitleLinkStrategy::HeadingLink("h2 a[href]"),
            TitleLinkStrategy::ImageLink {
                link: ".research-card__image a[href], figure a[href]",
                image: "img",
            },
            TitleLinkStrategy::CardAnchor,
            TitleLinkStrategy::BareHeading("h3, h2, .research-card__title"),
        ],
        summary: &[".research-card__excerpt", ".excerpt", "p"],
        eyebrow: &[".research-card__type", ".eyebrow"],
        share: &[".share-links", ".social-share"],
        date: &["time", ".research-card__date", ".date"],
        image: &["img", "picture source"],
    },
};

//! Presentation helpers shared by every front end

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::{CatalogRecord, ImageLinks, ImageSize};
use crate::image::{optimize, SizeHint};

/// Characters of description shown on a result card
pub const CARD_DESCRIPTION_LIMIT: usize = 200;

const CARD_COVER_PREFERENCE: [ImageSize; 4] = [
    ImageSize::Medium,
    ImageSize::Thumbnail,
    ImageSize::Small,
    ImageSize::SmallThumbnail,
];

const DETAIL_COVER_PREFERENCE: [ImageSize; 6] = [
    ImageSize::ExtraLarge,
    ImageSize::Large,
    ImageSize::Medium,
    ImageSize::Thumbnail,
    ImageSize::Small,
    ImageSize::SmallThumbnail,
];

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Cover for a result card
pub fn card_cover(links: &ImageLinks) -> Option<String> {
    links
        .first_of(&CARD_COVER_PREFERENCE)
        .map(|url| optimize(url, SizeHint::Thumbnail))
}

/// Largest available cover for the detail view
pub fn detail_cover(links: &ImageLinks) -> Option<String> {
    links
        .first_of(&DETAIL_COVER_PREFERENCE)
        .map(|url| optimize(url, SizeHint::Detail))
}

pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Cut `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

/// Plain-text card description
pub fn card_description(record: &CatalogRecord) -> String {
    truncate(strip_html(&record.description).trim(), CARD_DESCRIPTION_LIMIT)
}

pub fn author_line(record: &CatalogRecord) -> String {
    record.author_line()
}

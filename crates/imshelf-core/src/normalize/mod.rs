//! Result normalization: raw volumes in, admitted catalog records out
//!
//! A raw volume becomes a [`CatalogRecord`] only if:
//! 1. it has a non-empty id and a `volumeInfo` block
//! 2. its description is non-empty after trimming
//! 3. it has at least one non-empty cover URL
//! 4. its maturity rating is not `MATURE`
//! 5. its folded description contains no banned term
//!
//! Refused volumes are dropped silently by [`normalize`]; [`admit`] reports
//! the reason for a single volume. [`check`] applies the same predicates to
//! an existing record.

pub mod policy;

use std::fmt;

use crate::domain::record::UNKNOWN_TITLE;
use crate::domain::{
    CatalogRecord, ImageLinks, ImageSize, IndustryIdentifier, RawImageLinks, RawVolume,
};

pub use policy::{find_banned_term, fold_text, BANNED_TERMS, MATURE_RATING};

/// Why a raw volume was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingId,
    MissingVolumeInfo,
    EmptyDescription,
    NoImage,
    Mature,
    BannedTerm(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingId => write!(f, "missing id"),
            Rejection::MissingVolumeInfo => write!(f, "missing volume info"),
            Rejection::EmptyDescription => write!(f, "empty description"),
            Rejection::NoImage => write!(f, "no cover image"),
            Rejection::Mature => write!(f, "mature rating"),
            Rejection::BannedTerm(term) => write!(f, "banned term '{}'", term),
        }
    }
}

/// Normalize a batch, keeping admitted volumes in input order
pub fn normalize(raw_items: impl IntoIterator<Item = RawVolume>) -> Vec<CatalogRecord> {
    raw_items
        .into_iter()
        .filter_map(|raw| match admit(raw) {
            Ok(record) => Some(record),
            Err(rejection) => {
                tracing::trace!(%rejection, "dropping volume");
                None
            }
        })
        .collect()
}

/// Check every admission predicate and build the record
pub fn admit(raw: RawVolume) -> Result<CatalogRecord, Rejection> {
    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(Rejection::MissingId)?;
    let info = raw.volume_info.ok_or(Rejection::MissingVolumeInfo)?;

    let title = info
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let industry_identifiers = info.industry_identifiers.map(|ids| {
        ids.into_iter()
            .filter_map(|id| {
                Some(IndustryIdentifier {
                    kind: id.kind?,
                    identifier: id.identifier?,
                })
            })
            .collect()
    });

    let record = CatalogRecord {
        id,
        title,
        subtitle: info.subtitle,
        authors: info.authors,
        description: info.description.unwrap_or_default(),
        image_links: collect_image_links(info.image_links.unwrap_or_default()),
        maturity_rating: info.maturity_rating,
        info_link: info.info_link,
        preview_link: info.preview_link,
        published_date: info.published_date,
        publisher: info.publisher,
        language: info.language,
        page_count: info.page_count,
        average_rating: info.average_rating,
        ratings_count: info.ratings_count,
        categories: info.categories,
        industry_identifiers,
    };
    check(&record)?;
    Ok(record)
}

/// Re-check a record that did not come through [`admit`], such as one
/// restored from the local cache
pub fn check(record: &CatalogRecord) -> Result<(), Rejection> {
    if record.id.trim().is_empty() {
        return Err(Rejection::MissingId);
    }
    if record.description.trim().is_empty() {
        return Err(Rejection::EmptyDescription);
    }
    if record.image_links.iter().all(|(_, url)| url.trim().is_empty()) {
        return Err(Rejection::NoImage);
    }
    if record.maturity_rating.as_deref() == Some(MATURE_RATING) {
        return Err(Rejection::Mature);
    }
    if let Some(term) = find_banned_term(&record.description) {
        return Err(Rejection::BannedTerm(term));
    }
    Ok(())
}

fn collect_image_links(raw: RawImageLinks) -> ImageLinks {
    let mut links = ImageLinks::default();
    let entries = [
        (ImageSize::SmallThumbnail, raw.small_thumbnail),
        (ImageSize::Thumbnail, raw.thumbnail),
        (ImageSize::Small, raw.small),
        (ImageSize::Medium, raw.medium),
        (ImageSize::Large, raw.large),
        (ImageSize::ExtraLarge, raw.extra_large),
    ];
    for (size, url) in entries {
        if let Some(url) = url {
            links.set(size, url);
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(json: &str) -> RawVolume {
        RawVolume::from_json(json).unwrap()
    }

    fn valid() -> RawVolume {
        volume(
            r#"{
                "id": "zyTCAlFPjgYC",
                "volumeInfo": {
                    "title": "The Google Story",
                    "authors": ["David A. Vise", "Mark Malseed"],
                    "description": "Here is the story behind one of the most remarkable companies.",
                    "imageLinks": {"thumbnail": "http://books.google.com/books/content?id=zyTCAlFPjgYC&printsec=frontcover&img=1&zoom=1"},
                    "maturityRating": "NOT_MATURE",
                    "pageCount": 207,
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "055380457X"},
                        {"type": "OTHER"}
                    ]
                }
            }"#,
        )
    }

    #[test]
    fn test_admit_valid_volume() {
        let record = admit(valid()).unwrap();
        assert_eq!(record.id, "zyTCAlFPjgYC");
        assert_eq!(record.title, "The Google Story");
        assert_eq!(record.authors.as_ref().unwrap().len(), 2);
        assert_eq!(record.page_count, Some(207));
        assert!(record.image_links.thumbnail.is_some());
        // Incomplete identifier pairs are dropped
        assert_eq!(record.industry_identifiers.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_id() {
        let mut raw = valid();
        raw.id = Some("  ".to_string());
        assert_eq!(admit(raw), Err(Rejection::MissingId));

        let mut raw = valid();
        raw.id = None;
        assert_eq!(admit(raw), Err(Rejection::MissingId));
    }

    #[test]
    fn test_missing_volume_info() {
        let raw = volume(r#"{"id": "x"}"#);
        assert_eq!(admit(raw), Err(Rejection::MissingVolumeInfo));
    }

    #[test]
    fn test_blank_description() {
        let mut raw = valid();
        raw.volume_info.as_mut().unwrap().description = Some(" \n\t ".to_string());
        assert_eq!(admit(raw), Err(Rejection::EmptyDescription));
    }

    #[test]
    fn test_no_image() {
        let mut raw = valid();
        raw.volume_info.as_mut().unwrap().image_links = Some(RawImageLinks {
            thumbnail: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(admit(raw), Err(Rejection::NoImage));
    }

    #[test]
    fn test_large_image_alone_is_enough() {
        let mut raw = valid();
        raw.volume_info.as_mut().unwrap().image_links = Some(RawImageLinks {
            extra_large: Some("https://example.com/xl.jpg".to_string()),
            ..Default::default()
        });
        assert!(admit(raw).is_ok());
    }

    #[test]
    fn test_mature_rating() {
        let mut raw = valid();
        raw.volume_info.as_mut().unwrap().maturity_rating = Some("MATURE".to_string());
        assert_eq!(admit(raw.clone()), Err(Rejection::Mature));
        assert!(normalize(vec![raw]).is_empty());
    }

    #[test]
    fn test_banned_description() {
        let mut raw = valid();
        raw.volume_info.as_mut().unwrap().description =
            Some("Um romance erótico inesquecível".to_string());
        assert_eq!(admit(raw), Err(Rejection::BannedTerm("erotic")));
    }

    #[test]
    fn test_missing_title_uses_sentinel() {
        let mut raw = valid();
        raw.volume_info.as_mut().unwrap().title = None;
        assert_eq!(admit(raw).unwrap().title, UNKNOWN_TITLE);
    }

    #[test]
    fn test_normalize_preserves_order_and_drops_refused() {
        let mut refused = valid();
        refused.id = Some("refused".to_string());
        refused.volume_info.as_mut().unwrap().maturity_rating = Some("MATURE".to_string());

        let mut second = valid();
        second.id = Some("second".to_string());

        let records = normalize(vec![valid(), refused, second]);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["zyTCAlFPjgYC", "second"]);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let batch = vec![valid(), valid()];
        let first = serde_json::to_string(&normalize(batch.clone())).unwrap();
        let second = serde_json::to_string(&normalize(batch)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::NoImage.to_string(), "no cover image");
        assert_eq!(
            Rejection::BannedTerm("xxx").to_string(),
            "banned term 'xxx'"
        );
    }

    #[test]
    fn test_check_accepts_admitted_record() {
        let record = admit(valid()).unwrap();
        assert_eq!(check(&record), Ok(()));
    }

    #[test]
    fn test_check_applies_admission_predicates() {
        let admitted = admit(valid()).unwrap();

        let mut mature = admitted.clone();
        mature.maturity_rating = Some("MATURE".to_string());
        assert_eq!(check(&mature), Err(Rejection::Mature));

        let mut blank = admitted.clone();
        blank.description = "  ".to_string();
        assert_eq!(check(&blank), Err(Rejection::EmptyDescription));

        let mut coverless = admitted.clone();
        coverless.image_links = ImageLinks {
            thumbnail: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(check(&coverless), Err(Rejection::NoImage));

        let mut banned = admitted;
        banned.description = "Fotografia e NUDEZ".to_string();
        assert_eq!(check(&banned), Err(Rejection::BannedTerm("nudez")));
    }
}

//! Normalized catalog entries

use serde::{Deserialize, Serialize};

/// Title used when the provider omits one
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Author line used when a record has no authors
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Size tags the provider uses for cover images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSize {
    SmallThumbnail,
    Thumbnail,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl ImageSize {
    /// All size tags, smallest first
    pub const ALL: [ImageSize; 6] = [
        ImageSize::SmallThumbnail,
        ImageSize::Thumbnail,
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::ExtraLarge,
    ];

    /// Get string representation (the provider's key)
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::SmallThumbnail => "smallThumbnail",
            ImageSize::Thumbnail => "thumbnail",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::ExtraLarge => "extraLarge",
        }
    }
}

/// Cover image URLs by size tag
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_large: Option<String>,
}

impl ImageLinks {
    pub fn get(&self, size: ImageSize) -> Option<&str> {
        let slot = match size {
            ImageSize::SmallThumbnail => &self.small_thumbnail,
            ImageSize::Thumbnail => &self.thumbnail,
            ImageSize::Small => &self.small,
            ImageSize::Medium => &self.medium,
            ImageSize::Large => &self.large,
            ImageSize::ExtraLarge => &self.extra_large,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, size: ImageSize) -> &mut Option<String> {
        match size {
            ImageSize::SmallThumbnail => &mut self.small_thumbnail,
            ImageSize::Thumbnail => &mut self.thumbnail,
            ImageSize::Small => &mut self.small,
            ImageSize::Medium => &mut self.medium,
            ImageSize::Large => &mut self.large,
            ImageSize::ExtraLarge => &mut self.extra_large,
        }
    }

    /// Set a size tag. Blank URLs clear the entry.
    pub fn set(&mut self, size: ImageSize, url: impl Into<String>) {
        let url = url.into();
        *self.slot_mut(size) = if url.trim().is_empty() {
            None
        } else {
            Some(url)
        };
    }

    /// Present entries, smallest first
    pub fn iter(&self) -> impl Iterator<Item = (ImageSize, &str)> {
        ImageSize::ALL
            .into_iter()
            .filter_map(move |size| self.get(size).map(|url| (size, url)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// First present URL in the given preference order
    pub fn first_of(&self, preference: &[ImageSize]) -> Option<&str> {
        preference.iter().find_map(|size| self.get(*size))
    }

    /// Rewrite every present URL
    pub fn map_urls(self, f: impl Fn(&str) -> String) -> Self {
        let mut mapped = ImageLinks::default();
        for (size, url) in self.iter() {
            mapped.set(size, f(url));
        }
        mapped
    }
}

/// ISBN/ISSN style identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// A normalized, policy-filtered book entry
///
/// Every record held in a result set passed all admission predicates in
/// [`crate::normalize`]. Serialized field names follow the provider's
/// camelCase keys so cached values stay readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    pub description: String,
    pub image_links: ImageLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

impl CatalogRecord {
    /// Consume the record, rewriting its image URLs
    pub fn with_image_links(self, f: impl Fn(&str) -> String) -> Self {
        Self {
            image_links: self.image_links.map_urls(f),
            ..self
        }
    }

    /// Authors joined for display, or the unknown-author sentinel
    pub fn author_line(&self) -> String {
        match &self.authors {
            Some(authors) if !authors.is_empty() => authors.join(", "),
            _ => UNKNOWN_AUTHOR.to_string(),
        }
    }

    /// First ISBN-13, falling back to ISBN-10
    pub fn isbn(&self) -> Option<&str> {
        let ids = self.industry_identifiers.as_ref()?;
        ["ISBN_13", "ISBN_10"].iter().find_map(|kind| {
            ids.iter()
                .find(|id| id.kind == *kind)
                .map(|id| id.identifier.as_str())
        })
    }
}

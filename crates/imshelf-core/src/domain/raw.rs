//! Untrusted volume shapes as returned by the Google Books API
//!
//! API docs: https://developers.google.com/books/docs/v1/reference/volumes
//!
//! Every field is optional and decodes as absent when the provider sends
//! an unexpected type, so a single odd field never drops a whole batch.

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};

/// A single volume as sent by the provider
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawVolume {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub volume_info: Option<RawVolumeInfo>,
}

/// The `volumeInfo` block of a volume
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawVolumeInfo {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub title: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub image_links: Option<RawImageLinks>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub maturity_rating: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub info_link: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub preview_link: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub ratings_count: Option<u32>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub language: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub industry_identifiers: Option<Vec<RawIndustryIdentifier>>,
}

/// Cover image URLs keyed by the provider's size tags
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawImageLinks {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub small: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub medium: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub large: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub extra_large: Option<String>,
}

/// ISBN/ISSN style identifier pair
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawIndustryIdentifier {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub identifier: Option<String>,
}

impl RawVolume {
    /// Decode the `items` array of a search response.
    ///
    /// A missing or non-array `items` yields an empty batch; entries that
    /// are not objects are skipped.
    pub fn batch_from_json(json: &str) -> Result<Vec<RawVolume>, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        let items = match value.get("items") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        };

        Ok(items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| RawVolume::deserialize(item).ok())
            .collect())
    }

    /// Decode a single-volume response (lookup by id)
    pub fn from_json(json: &str) -> Result<RawVolume, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//! Domain models for imshelf
//!
//! [`RawVolume`] is the untrusted shape decoded from the remote catalog.
//! [`CatalogRecord`] is the validated entry used everywhere else. Only
//! [`crate::normalize`] converts one into the other.

pub mod raw;
pub mod record;

pub use raw::{RawImageLinks, RawIndustryIdentifier, RawVolume, RawVolumeInfo};
pub use record::{CatalogRecord, ImageLinks, ImageSize, IndustryIdentifier};

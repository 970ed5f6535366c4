//! Remote catalog access
//!
//! [`CatalogClient`] is the seam the session and suggestion engine talk
//! to; [`RemoteCatalog`] implements it against the Google Books volumes
//! API over any [`crate::http::HttpTransport`].

pub mod remote;

pub use remote::RemoteCatalog;

use async_trait::async_trait;

use crate::domain::CatalogRecord;
use crate::error::CatalogError;
use crate::normalize::Rejection;

/// Result of looking up a single volume
///
/// `Filtered` and `Missing` both read as "absent" to the UI but stay
/// distinct for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(CatalogRecord),
    Filtered(Rejection),
    Missing,
}

impl LookupOutcome {
    pub fn into_record(self) -> Option<CatalogRecord> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            LookupOutcome::Filtered(_) | LookupOutcome::Missing => None,
        }
    }
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search volumes. Blank queries return no records without a request.
    async fn search(
        &self,
        query: &str,
        page_size: u32,
        offset: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError>;

    /// Popular volumes for a topic chosen at random on every call
    async fn browse_popular(
        &self,
        page_size: u32,
        offset: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError>;

    /// Look up a single volume by id
    async fn lookup(&self, id: &str) -> Result<LookupOutcome, CatalogError>;

    /// Look up a single volume, absent when missing or filtered
    async fn get_by_id(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        Ok(self.lookup(id).await?.into_record())
    }
}

//! Title suggestions for partial queries
//!
//! The engine does no rate limiting of its own; callers debounce it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::normalize::fold_text;

/// A suggested title and the volume it came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub id: String,
}

pub struct SuggestionEngine<C> {
    client: Arc<C>,
    page_size: u32,
}

impl<C: CatalogClient> SuggestionEngine<C> {
    /// `page_size` is the number of volumes requested per lookup
    pub fn new(client: Arc<C>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Distinct titles for a partial query, in remote relevance order.
    ///
    /// Titles are compared after folding, so "Dune" and "DUNE" count once.
    pub async fn suggest(
        &self,
        partial_query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, CatalogError> {
        let partial_query = partial_query.trim();
        if partial_query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let records = self.client.search(partial_query, self.page_size, 0).await?;

        let mut seen = HashSet::new();
        Ok(records
            .into_iter()
            .filter(|record| seen.insert(fold_text(record.title.trim())))
            .take(limit)
            .map(|record| Suggestion {
                title: record.title,
                id: record.id,
            })
            .collect())
    }
}

//! Session state, its persisted subset, and render snapshots

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, CacheStore, CacheStoreExt};
use crate::domain::CatalogRecord;
use crate::normalize::check;
use crate::suggest::Suggestion;

/// What the result list is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Popular volumes for a random topic
    #[default]
    Browse,
    /// Results for the user's query
    Search,
}

impl Mode {
    /// Mode from the persisted `popular-cache` flag
    pub fn from_popular(popular: bool) -> Self {
        if popular {
            Mode::Browse
        } else {
            Mode::Search
        }
    }

    pub fn is_popular(&self) -> bool {
        matches!(self, Mode::Browse)
    }
}

/// Loading state machine
///
/// ```text
/// Idle → Loading → Idle | Error
/// Idle → LoadingMore → Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    LoadingMore,
    Error,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Loading | Phase::LoadingMore)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    /// Text in the search field
    pub query: String,
    /// Query behind the current Search results (debounced)
    pub active_query: String,
    pub page: u32,
    pub mode: Mode,
    pub results: Vec<CatalogRecord>,
    pub phase: Phase,
    pub has_more: bool,
    pub error: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub loading_suggestions: bool,
}

impl SessionState {
    pub fn initial() -> Self {
        Self {
            query: String::new(),
            active_query: String::new(),
            page: 0,
            mode: Mode::Browse,
            results: Vec::new(),
            phase: Phase::Idle,
            has_more: true,
            error: None,
            suggestions: Vec::new(),
            loading_suggestions: false,
        }
    }

    /// Restore the persisted subset; anything unreadable falls back to
    /// the initial value.
    ///
    /// Cached records are re-checked against the admission rules and a
    /// page whose next offset would not fit in `u32` is discarded.
    pub fn hydrate<S: CacheStore + ?Sized>(store: &S, page_size: u32) -> Self {
        let mut state = Self::initial();
        state.query = store.get(CacheKey::Query.as_str(), String::new());
        state.mode = Mode::from_popular(store.get(CacheKey::Popular.as_str(), true));

        let page: u32 = store.get(CacheKey::Page.as_str(), 0u32);
        if next_offset(page, page_size).is_some() {
            state.page = page;
        } else {
            tracing::debug!(page, "cached page out of range, starting over");
        }

        let cached: Vec<CatalogRecord> = store.get(CacheKey::Books.as_str(), Vec::new());
        let admitted = cached.into_iter().filter(|record| match check(record) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::debug!(id = %record.id, %rejection, "dropping cached record");
                false
            }
        });
        merge_unique(&mut state.results, admitted.collect());

        if state.mode == Mode::Search {
            state.active_query = state.query.trim().to_string();
        }
        state
    }

    /// Write the persisted subset. Failures are logged, never returned.
    pub fn persist<S: CacheStore + ?Sized>(&self, store: &S) {
        let writes = [
            store.set(CacheKey::Books.as_str(), &self.results),
            store.set(CacheKey::Query.as_str(), &self.query),
            store.set(CacheKey::Page.as_str(), &self.page),
            store.set(CacheKey::Popular.as_str(), &self.mode.is_popular()),
        ];
        for result in writes {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to persist session state");
            }
        }
    }

    pub fn persist_query<S: CacheStore + ?Sized>(&self, store: &S) {
        if let Err(e) = store.set(CacheKey::Query.as_str(), &self.query) {
            tracing::warn!(error = %e, "failed to persist query");
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            query: self.query.clone(),
            mode: self.mode,
            phase: self.phase,
            page: self.page,
            results: self.results.clone(),
            loading: self.phase == Phase::Loading,
            loading_more: self.phase == Phase::LoadingMore,
            error: self.error.clone(),
            has_more: self.has_more,
            suggestions: self.suggestions.clone(),
            loading_suggestions: self.loading_suggestions,
        }
    }
}

/// Everything the presentation layer needs to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub query: String,
    pub mode: Mode,
    pub phase: Phase,
    pub page: u32,
    pub results: Vec<CatalogRecord>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub has_more: bool,
    pub suggestions: Vec<Suggestion>,
    pub loading_suggestions: bool,
}

/// Offset of the page after `page`, `None` when it overflows
pub(crate) fn next_offset(page: u32, page_size: u32) -> Option<(u32, u32)> {
    let next_page = page.checked_add(1)?;
    let offset = next_page.checked_mul(page_size)?;
    Some((next_page, offset))
}

/// Append records whose id is not yet present.
///
/// Existing order is kept and survivors keep their incoming order.
/// Returns the number of records appended.
pub fn merge_unique(existing: &mut Vec<CatalogRecord>, incoming: Vec<CatalogRecord>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.id.clone()).collect();
    let before = existing.len();
    existing.extend(incoming.into_iter().filter(|r| seen.insert(r.id.clone())));
    existing.len() - before
}

//! Catalog session controller
//!
//! Owns the query, page cursor and result set, and turns user intents into
//! catalog requests. All operations take `&self` so a presentation loop can
//! drive several of them concurrently on one executor; the rules that keep
//! that safe are:
//!
//! - typed input is debounced before it reaches the network
//! - a fetch that replaces results takes a new [`Generation`] ticket and
//!   commits only while that ticket is current
//! - load-more is guarded by the phase, so repeated signals are no-ops
//! - after [`CatalogSession::shutdown`] nothing commits
//! - failures set `error` but never discard loaded results
//!
//! Requests have no timeout beyond the transport's; a hung request leaves
//! the session in `Loading`/`LoadingMore`.

mod state;

pub use state::{merge_unique, Mode, Phase, SessionSnapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheKey, CacheStore};
use crate::catalog::CatalogClient;
use crate::config::SessionConfig;
use crate::domain::CatalogRecord;
use crate::error::CatalogError;
use crate::schedule::{Debouncer, Generation};
use crate::suggest::SuggestionEngine;
use state::{next_offset, SessionState};

pub struct CatalogSession<C, S> {
    client: Arc<C>,
    store: Arc<S>,
    suggestions: SuggestionEngine<C>,
    config: SessionConfig,
    state: Mutex<SessionState>,
    query_debounce: Debouncer,
    suggestion_debounce: Debouncer,
    fetches: Generation,
    suggestion_requests: Generation,
    alive: AtomicBool,
}

impl<C: CatalogClient, S: CacheStore> CatalogSession<C, S> {
    /// Create a session, hydrating persisted state from `store`
    pub fn open(client: Arc<C>, store: Arc<S>, config: SessionConfig) -> Self {
        let state = SessionState::hydrate(store.as_ref(), config.page_size);
        tracing::debug!(
            cached = state.results.len(),
            mode = ?state.mode,
            page = state.page,
            "session hydrated"
        );

        Self {
            suggestions: SuggestionEngine::new(client.clone(), config.suggestion_page_size),
            query_debounce: Debouncer::new(config.debounce()),
            suggestion_debounce: Debouncer::new(config.suggestion_debounce()),
            client,
            store,
            config,
            state: Mutex::new(state),
            fetches: Generation::new(),
            suggestion_requests: Generation::new(),
            alive: AtomicBool::new(true),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Initial fetch. A hydrated Search session repeats its query; a
    /// Browse session fetches only when nothing was cached.
    pub async fn start(&self) {
        let restored_query = {
            let state = self.state.lock().await;
            if !self.is_alive() {
                return;
            }
            match state.mode {
                Mode::Search => {
                    let query = state.query.trim();
                    (!query.is_empty()).then(|| query.to_string())
                }
                Mode::Browse => None,
            }
        };
        if let Some(query) = restored_query {
            self.search_now(&query).await;
            return;
        }

        let ticket = {
            let mut state = self.state.lock().await;
            if !self.is_alive() || !state.results.is_empty() {
                return;
            }
            state.phase = Phase::Loading;
            state.error = None;
            self.fetches.advance()
        };

        let outcome = self.client.browse_popular(self.config.page_size, 0).await;

        let mut state = self.state.lock().await;
        if !self.may_commit(ticket) {
            tracing::debug!("discarding superseded browse response");
            return;
        }
        match outcome {
            Ok(records) => {
                state.results.clear();
                merge_unique(&mut state.results, records);
                state.page = 0;
                state.mode = Mode::Browse;
                state.has_more = true;
                state.phase = Phase::Idle;
                state.persist(self.store.as_ref());
            }
            Err(e) => {
                tracing::warn!(error = %e, "initial browse failed");
                state.error = Some(e.user_message().to_string());
                state.phase = Phase::Error;
            }
        }
    }

    /// Keystroke in the search field: query now, fetch and suggestions
    /// once the input settles
    pub async fn on_input(&self, text: &str) {
        if !self.set_query(text, false).await {
            return;
        }
        tokio::join!(self.debounced_search(text), self.debounced_suggestions(text));
    }

    /// Search submitted
    pub async fn on_search(&self, text: &str) {
        if !self.set_query(text, true).await {
            return;
        }
        self.debounced_search(text).await;
    }

    /// Suggestion picked; behaves like submitting its title
    pub async fn on_select_suggestion(&self, title: &str) {
        self.on_search(title).await;
    }

    /// Clear the search field and go back to Browse mode without
    /// refetching
    pub async fn on_clear(&self) {
        self.query_debounce.cancel();
        self.suggestion_debounce.cancel();
        self.fetches.advance();
        self.suggestion_requests.advance();

        let mut state = self.state.lock().await;
        if !self.is_alive() {
            return;
        }
        state.query.clear();
        state.active_query.clear();
        state.mode = Mode::Browse;
        state.page = 0;
        state.suggestions.clear();
        state.loading_suggestions = false;
        if state.phase.is_busy() {
            state.phase = Phase::Idle;
        }
        state.persist(self.store.as_ref());
    }

    /// Next page for the current mode, merged into the results
    pub async fn on_load_more(&self) {
        let page_size = self.config.page_size;
        let (ticket, mode, query, next_page, offset) = {
            let mut state = self.state.lock().await;
            if !self.is_alive() || !state.has_more || state.phase.is_busy() {
                return;
            }
            let Some((next_page, offset)) = next_offset(state.page, page_size) else {
                tracing::debug!(page = state.page, "no further page offset");
                state.has_more = false;
                return;
            };
            state.phase = Phase::LoadingMore;
            state.error = None;
            (
                self.fetches.current(),
                state.mode,
                state.active_query.clone(),
                next_page,
                offset,
            )
        };

        let outcome = match mode {
            Mode::Search => self.client.search(&query, page_size, offset).await,
            Mode::Browse => self.client.browse_popular(page_size, offset).await,
        };

        let mut state = self.state.lock().await;
        if !self.may_commit(ticket) {
            tracing::debug!(next_page, "discarding superseded page");
            return;
        }
        match outcome {
            Ok(records) => {
                let received = records.len();
                let appended = merge_unique(&mut state.results, records);
                tracing::debug!(next_page, received, appended, "page merged");
                state.page = next_page;
                if received == 0 {
                    state.has_more = false;
                }
                state.phase = Phase::Idle;
                state.persist(self.store.as_ref());
            }
            Err(e) => {
                tracing::warn!(error = %e, next_page, "load more failed");
                state.error = Some(e.user_message().to_string());
                state.phase = Phase::Idle;
            }
        }
    }

    /// Forget everything persisted and start over with a Browse fetch
    pub async fn reset(&self) {
        self.query_debounce.cancel();
        self.suggestion_debounce.cancel();
        self.fetches.advance();
        self.suggestion_requests.advance();

        {
            let mut state = self.state.lock().await;
            if !self.is_alive() {
                return;
            }
            for key in CacheKey::ALL {
                if let Err(e) = self.store.remove(key.as_str()) {
                    tracing::warn!(key = key.as_str(), error = %e, "failed to clear cache entry");
                }
            }
            *state = SessionState::initial();
        }

        self.start().await;
    }

    /// Record for the detail view: from the loaded results, else remote
    pub async fn details(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        let local = {
            let state = self.state.lock().await;
            state.results.iter().find(|r| r.id == id).cloned()
        };
        match local {
            Some(record) => Ok(Some(record)),
            None => self.client.get_by_id(id).await,
        }
    }

    /// Teardown: in-flight responses are dropped from now on
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.query_debounce.cancel();
        self.suggestion_debounce.cancel();
        self.fetches.advance();
        self.suggestion_requests.advance();
    }

    fn may_commit(&self, ticket: u64) -> bool {
        self.is_alive() && self.fetches.is_current(ticket)
    }

    /// Update the field text. Submitting closes the suggestion list.
    async fn set_query(&self, text: &str, submitted: bool) -> bool {
        let mut state = self.state.lock().await;
        if !self.is_alive() {
            return false;
        }
        state.query = text.to_string();
        state.persist_query(self.store.as_ref());
        if submitted {
            self.suggestion_debounce.cancel();
            self.suggestion_requests.advance();
            state.suggestions.clear();
            state.loading_suggestions = false;
        }
        true
    }

    async fn debounced_search(&self, text: &str) {
        if !self.query_debounce.settle().await {
            return;
        }
        let query = text.trim();
        if query.is_empty() {
            return;
        }
        self.search_now(query).await;
    }

    async fn search_now(&self, query: &str) {
        let ticket = {
            let mut state = self.state.lock().await;
            if !self.is_alive() {
                return;
            }
            state.phase = Phase::Loading;
            state.mode = Mode::Search;
            state.page = 0;
            state.has_more = true;
            state.error = None;
            state.active_query = query.to_string();
            self.fetches.advance()
        };

        let page_size = self.config.page_size;
        let outcome = self.client.search(query, page_size, 0).await;

        let mut state = self.state.lock().await;
        if !self.may_commit(ticket) {
            tracing::debug!(query, "discarding superseded search response");
            return;
        }
        match outcome {
            Ok(records) => {
                let received = records.len();
                state.results.clear();
                merge_unique(&mut state.results, records);
                state.page = 0;
                if received < page_size as usize {
                    state.has_more = false;
                }
                state.phase = Phase::Idle;
                state.persist(self.store.as_ref());
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed");
                state.error = Some(e.user_message().to_string());
                state.phase = Phase::Error;
            }
        }
    }

    async fn debounced_suggestions(&self, text: &str) {
        let partial = text.trim();
        if partial.is_empty() {
            self.suggestion_debounce.cancel();
            self.suggestion_requests.advance();
            let mut state = self.state.lock().await;
            state.suggestions.clear();
            state.loading_suggestions = false;
            return;
        }

        if !self.suggestion_debounce.settle().await {
            return;
        }

        let ticket = {
            let mut state = self.state.lock().await;
            if !self.is_alive() {
                return;
            }
            state.loading_suggestions = true;
            self.suggestion_requests.advance()
        };

        let outcome = self
            .suggestions
            .suggest(partial, self.config.suggestion_limit)
            .await;

        let mut state = self.state.lock().await;
        if !self.is_alive() || !self.suggestion_requests.is_current(ticket) {
            return;
        }
        state.loading_suggestions = false;
        match outcome {
            Ok(suggestions) => state.suggestions = suggestions,
            Err(e) => {
                tracing::debug!(error = %e, "suggestion lookup failed");
                state.suggestions.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImageLinks, ImageSize};

    fn record(id: &str) -> CatalogRecord {
        let mut image_links = ImageLinks::default();
        image_links.set(ImageSize::Thumbnail, format!("https://example.com/{}.jpg", id));
        CatalogRecord {
            id: id.to_string(),
            title: format!("Title {}", id),
            subtitle: None,
            authors: None,
            description: "A description.".to_string(),
            image_links,
            maturity_rating: None,
            info_link: None,
            preview_link: None,
            published_date: None,
            publisher: None,
            language: None,
            page_count: None,
            average_rating: None,
            ratings_count: None,
            categories: None,
            industry_identifiers: None,
        }
    }

    fn ids(records: &[CatalogRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_merge_unique_appends_new_ids_in_order() {
        let mut existing = vec![record("A"), record("B")];
        let appended = merge_unique(&mut existing, vec![record("B"), record("C")]);
        assert_eq!(appended, 1);
        assert_eq!(ids(&existing), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merge_unique_dedups_within_batch() {
        let mut existing = Vec::new();
        merge_unique(&mut existing, vec![record("X"), record("Y"), record("X")]);
        assert_eq!(ids(&existing), vec!["X", "Y"]);
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(next_offset(0, 20), Some((1, 20)));
        assert_eq!(next_offset(2, 20), Some((3, 60)));
        assert_eq!(next_offset(u32::MAX, 20), None);
        assert_eq!(next_offset(300_000_000, 20), None);
    }

    #[test]
    fn test_mode_popular_flag() {
        assert_eq!(Mode::from_popular(true), Mode::Browse);
        assert_eq!(Mode::from_popular(false), Mode::Search);
        assert!(Mode::Browse.is_popular());
    }

    #[test]
    fn test_snapshot_flags_follow_phase() {
        let mut state = SessionState::initial();
        state.phase = Phase::LoadingMore;
        let snapshot = state.snapshot();
        assert!(snapshot.loading_more);
        assert!(!snapshot.loading);
        assert!(snapshot.has_more);
    }
}

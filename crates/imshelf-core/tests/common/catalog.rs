//! In-memory catalog and transport doubles

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;
use url::Url;

use imshelf_core::{
    CatalogClient, CatalogError, CatalogRecord, HttpError, HttpResponse, HttpTransport,
    ImageLinks, ImageSize, LookupOutcome,
};

/// Key under which browse requests are scripted and gated
pub const BROWSE: &str = "<browse>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search {
        query: String,
        page_size: u32,
        offset: u32,
    },
    Browse {
        page_size: u32,
        offset: u32,
    },
    Lookup {
        id: String,
    },
}

type Page = Result<Vec<CatalogRecord>, CatalogError>;

/// Catalog that serves scripted pages and records every call.
///
/// Unscripted pages are empty. A gated key blocks its requests until the
/// gate's sender publishes `true`.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<Call>>,
    pages: Mutex<HashMap<(String, u32), Page>>,
    volumes: Mutex<HashMap<String, CatalogRecord>>,
    gates: Mutex<HashMap<String, watch::Receiver<bool>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(&self, query: &str, offset: u32, page: Page) -> &Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), offset), page);
        self
    }

    pub fn on_browse(&self, offset: u32, page: Page) -> &Self {
        self.on_search(BROWSE, offset, page)
    }

    pub fn with_volume(&self, record: CatalogRecord) -> &Self {
        self.volumes
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
        self
    }

    /// Block requests for `key` (a query or [`BROWSE`]) until released
    pub fn gate(&self, key: &str) -> watch::Sender<bool> {
        let (tx, rx) = watch::channel(false);
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<(String, u32, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Search {
                    query,
                    page_size,
                    offset,
                } => Some((query, page_size, offset)),
                _ => None,
            })
            .collect()
    }

    pub fn browse_offsets(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Browse { offset, .. } => Some(offset),
                _ => None,
            })
            .collect()
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pass_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(mut gate) = gate {
            let _ = gate.wait_for(|open| *open).await;
        }
    }

    fn page(&self, key: &str, offset: u32) -> Page {
        self.pages
            .lock()
            .unwrap()
            .get(&(key.to_string(), offset))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(
        &self,
        query: &str,
        page_size: u32,
        offset: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.record_call(Call::Search {
            query: query.to_string(),
            page_size,
            offset,
        });
        self.pass_gate(query).await;
        self.page(query, offset)
    }

    async fn browse_popular(
        &self,
        page_size: u32,
        offset: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.record_call(Call::Browse { page_size, offset });
        self.pass_gate(BROWSE).await;
        self.page(BROWSE, offset)
    }

    async fn lookup(&self, id: &str) -> Result<LookupOutcome, CatalogError> {
        self.record_call(Call::Lookup { id: id.to_string() });
        Ok(self
            .volumes
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .map(LookupOutcome::Found)
            .unwrap_or(LookupOutcome::Missing))
    }
}

pub fn unavailable() -> CatalogError {
    CatalogError::Rejected {
        status: 503,
        reason: "Service Unavailable".to_string(),
    }
}

/// Minimal admissible record
pub fn record(id: &str, title: &str) -> CatalogRecord {
    let mut image_links = ImageLinks::default();
    image_links.set(
        ImageSize::Thumbnail,
        format!("https://books.google.com/books/content?id={}&zoom=1", id),
    );
    CatalogRecord {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: None,
        authors: Some(vec!["Test Author".to_string()]),
        description: format!("Description of {}.", title),
        image_links,
        maturity_rating: Some("NOT_MATURE".to_string()),
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

/// Records titled after their ids
pub fn records(ids: &[&str]) -> Vec<CatalogRecord> {
    ids.iter()
        .map(|id| record(id, &format!("Book {}", id)))
        .collect()
}

pub fn ids(records: &[CatalogRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

/// Transport that replays queued responses and remembers request URLs
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requested: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            reason: None,
            body: body.into(),
        }));
        self
    }

    pub fn fail(self, error: HttpError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requested(&self) -> Vec<Url> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        self.requested.lock().unwrap().push(url.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(HttpError::RequestFailed {
                    message: "no scripted response".to_string(),
                })
            })
    }
}

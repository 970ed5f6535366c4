//! Google Books volumes API client
//!
//! API docs: https://developers.google.com/books/docs/v1/using
//! Search: GET /volumes?q=&printType=books&maxResults=&startIndex=
//! Lookup: GET /volumes/{id}

use async_trait::async_trait;
use rand::seq::SliceRandom;
use url::Url;

use super::{CatalogClient, LookupOutcome};
use crate::config::ApiConfig;
use crate::domain::{CatalogRecord, RawVolume};
use crate::error::CatalogError;
use crate::http::{HttpError, HttpResponse, HttpTransport, ReqwestTransport};
use crate::image::{optimize, SizeHint};
use crate::normalize::{admit, normalize};

/// Topic used if the configured list is empty
const FALLBACK_TOPIC: &str = "bestseller";

pub struct RemoteCatalog<T: HttpTransport = ReqwestTransport> {
    transport: T,
    base_url: String,
    api_key: Option<String>,
    topics: Vec<String>,
}

impl RemoteCatalog<ReqwestTransport> {
    /// Client over reqwest, configured from `[api]`
    pub fn from_config(config: &ApiConfig) -> Result<Self, CatalogError> {
        let transport = ReqwestTransport::new(&config.user_agent, config.timeout())?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> RemoteCatalog<T> {
    pub fn new(transport: T, config: &ApiConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            topics: config
                .browse_topics
                .iter()
                .filter(|t| !t.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn pick_topic(&self) -> &str {
        self.topics
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_TOPIC)
    }

    fn volumes_url(&self, params: &[(&str, String)]) -> Result<Url, HttpError> {
        let base = format!("{}/volumes", self.base_url);
        let mut url = Url::parse(&base).map_err(|_| HttpError::InvalidUrl { url: base.clone() })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        Ok(url)
    }

    fn volume_url(&self, id: &str) -> Result<Url, HttpError> {
        let base = format!("{}/volumes", self.base_url);
        let invalid = || HttpError::InvalidUrl { url: base.clone() };
        let mut url = Url::parse(&base).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    async fn fetch_volumes(
        &self,
        query: &str,
        page_size: u32,
        offset: u32,
        order_by: Option<&str>,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("printType", "books".to_string()),
            ("maxResults", page_size.to_string()),
            ("startIndex", offset.to_string()),
        ];
        if let Some(order) = order_by {
            params.push(("orderBy", order.to_string()));
        }
        let url = self.volumes_url(&params)?;

        tracing::debug!(query, page_size, offset, "fetching volumes");
        let response = self.transport.get(&url).await?;
        ensure_success(&response)?;

        let raw = match RawVolume::batch_from_json(&response.body) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(query, error = %e, "undecodable search response, treating as empty");
                return Ok(Vec::new());
            }
        };

        let received = raw.len();
        let records: Vec<CatalogRecord> = normalize(raw).into_iter().map(thumbnail_images).collect();
        tracing::debug!(query, received, admitted = records.len(), "volumes normalized");
        Ok(records)
    }
}

#[async_trait]
impl<T: HttpTransport> CatalogClient for RemoteCatalog<T> {
    async fn search(
        &self,
        query: &str,
        page_size: u32,
        offset: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_volumes(query, page_size, offset, None).await
    }

    async fn browse_popular(
        &self,
        page_size: u32,
        offset: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let topic = self.pick_topic().to_string();
        tracing::debug!(topic = %topic, "browsing popular topic");
        self.fetch_volumes(&topic, page_size, offset, Some("relevance"))
            .await
    }

    async fn lookup(&self, id: &str) -> Result<LookupOutcome, CatalogError> {
        let url = self.volume_url(id)?;
        let response = self.transport.get(&url).await?;

        if response.status == 404 {
            return Ok(LookupOutcome::Missing);
        }
        ensure_success(&response)?;

        let raw = match RawVolume::from_json(&response.body) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(id, error = %e, "undecodable volume response, treating as missing");
                return Ok(LookupOutcome::Missing);
            }
        };

        match admit(raw) {
            Ok(record) => Ok(LookupOutcome::Found(thumbnail_images(record))),
            Err(rejection) => {
                tracing::debug!(id, %rejection, "volume exists but was filtered");
                Ok(LookupOutcome::Filtered(rejection))
            }
        }
    }
}

fn ensure_success(response: &HttpResponse) -> Result<(), CatalogError> {
    if response.is_success() {
        return Ok(());
    }
    Err(CatalogError::Rejected {
        status: response.status,
        reason: response
            .reason
            .clone()
            .unwrap_or_else(|| "Unknown status".to_string()),
    })
}

fn thumbnail_images(record: CatalogRecord) -> CatalogRecord {
    record.with_image_links(|url| optimize(url, SizeHint::Thumbnail))
}

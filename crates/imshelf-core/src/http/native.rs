//! Native HTTP transport using reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{HttpError, HttpResponse, HttpTransport};

pub struct ReqwestTransport {
    client: Client,
    user_agent: String,
}

impl ReqwestTransport {
    /// Build a transport. `timeout` of `None` leaves requests unbounded
    /// beyond reqwest's own connection handling.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| HttpError::RequestFailed {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::RequestFailed {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let reason = status.canonical_reason().map(str::to_string);

        let body = response.text().await.map_err(|e| HttpError::BodyRead {
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

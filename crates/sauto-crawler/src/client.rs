//! HTTP access to the search and detail endpoints.
//!
//! The client owns transport policy — timeouts, user agent, status
//! handling — and reports every dispatched request to the injected
//! [`RequestAudit`]. It deliberately does no retrying: transient failures
//! surface as errors and the orchestrator decides what degrades and what
//! terminates.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use sauto_core::SearchParams;
use serde_json::Value;

use crate::audit::RequestAudit;
use crate::error::CrawlerError;

pub struct SautoClient {
    client: Client,
    search_url: Url,
    detail_url: String,
    audit: Option<Arc<dyn RequestAudit>>,
}

impl SautoClient {
    /// Creates a client with configured timeout and `User-Agent`.
    ///
    /// Both base URLs are validated here so a malformed configuration
    /// surfaces at startup rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::InvalidBaseUrl`] for an unparseable base URL
    /// and [`CrawlerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        search_url: &str,
        detail_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CrawlerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let search_url = parse_base(search_url)?;
        parse_base(detail_url)?;
        Ok(Self {
            client,
            search_url,
            detail_url: detail_url.trim_end_matches('/').to_string(),
            audit: None,
        })
    }

    /// Attaches a request audit observer.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn RequestAudit>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Fetches one search page. The body is returned as raw JSON — the
    /// caller extracts `results` and the total count from it.
    ///
    /// # Errors
    ///
    /// - [`CrawlerError::Http`] — network-level failure.
    /// - [`CrawlerError::UnexpectedStatus`] — any non-2xx status.
    /// - [`CrawlerError::Deserialize`] — body is not valid JSON.
    pub async fn search_page(&self, params: &SearchParams) -> Result<Value, CrawlerError> {
        let url = self.search_page_url(params);
        self.get_json(url.as_str(), "search page").await
    }

    /// Fetches the full detail payload for one listing.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::search_page`].
    pub async fn fetch_detail(&self, id: i64) -> Result<Value, CrawlerError> {
        let url = format!("{}/{id}", self.detail_url);
        self.get_json(&url, "item detail").await
    }

    fn search_page_url(&self, params: &SearchParams) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn get_json(&self, url: &str, context: &str) -> Result<Value, CrawlerError> {
        if let Some(audit) = &self.audit {
            audit.request_dispatched(url);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| CrawlerError::Deserialize {
            context: format!("{context} from {url}"),
            source,
        })
    }
}

fn parse_base(url: &str) -> Result<Url, CrawlerError> {
    Url::parse(url).map_err(|e| CrawlerError::InvalidBaseUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

//! Two-stage fetch orchestration: search pages → per-listing detail.
//!
//! Stage 1 walks search pages under the pagination driver, filters each
//! page through the strict filter, and enriches the survivors. Stage 2
//! fetches the detail payload for every survivor that carries an id, with
//! a bounded number of requests in flight; completion order is arbitrary
//! and emission happens as each detail settles. Detail enrichment is
//! best-effort: a detail failure degrades the record, it never drops it.
//! Every record passing the filter is emitted exactly once.

use futures::stream::{self, StreamExt};
use sauto_core::{FilterConfig, SearchParams};
use serde_json::Value;

use crate::client::SautoClient;
use crate::error::CrawlerError;
use crate::filter;
use crate::pagination::PageState;
use crate::sink::RecordSink;
use crate::total::extract_total;
use crate::types::{ListingRecord, SearchListing};

pub struct Crawler {
    client: SautoClient,
    filter: FilterConfig,
    listing_url_base: String,
    max_concurrent_details: usize,
    /// Politeness delay between search page requests (applied after every
    /// page except the first).
    inter_page_delay_ms: u64,
}

/// Counters reported after a crawl runs to termination.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlTotals {
    /// Search pages successfully fetched and parsed.
    pub pages: u64,
    /// Records handed to the sink.
    pub emitted: u64,
    /// Results rejected by the strict filter.
    pub filtered_out: u64,
    /// Detail fetches that failed (the records were still emitted).
    pub detail_failures: u64,
}

impl Crawler {
    #[must_use]
    pub fn new(
        client: SautoClient,
        filter: FilterConfig,
        listing_url_base: impl Into<String>,
        max_concurrent_details: usize,
        inter_page_delay_ms: u64,
    ) -> Self {
        Self {
            client,
            filter,
            listing_url_base: listing_url_base.into(),
            max_concurrent_details: max_concurrent_details.max(1),
            inter_page_delay_ms,
        }
    }

    /// Runs one crawl from `params` to natural termination.
    ///
    /// A search-page failure (transport or parse) terminates pagination
    /// without failing the crawl — records from earlier pages are already
    /// emitted, and detail failures only degrade individual records. The
    /// only error that propagates is a sink write failure.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::Sink`] when the sink rejects a record.
    pub async fn run(
        &self,
        params: SearchParams,
        sink: &mut dyn RecordSink,
    ) -> Result<CrawlTotals, CrawlerError> {
        let mut totals = CrawlTotals::default();
        let mut state = PageState::first(params);
        let mut is_first_page = true;

        loop {
            if !is_first_page && self.inter_page_delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.inter_page_delay_ms))
                    .await;
            }
            is_first_page = false;

            let body = match self.client.search_page(state.params()).await {
                Ok(body) => body,
                Err(error) => {
                    tracing::error!(
                        offset = state.offset(),
                        %error,
                        "search page failed; stopping pagination"
                    );
                    break;
                }
            };
            totals.pages += 1;

            // Raw page length feeds the pagination heuristic; malformed
            // entries are dropped from processing but still counted.
            let results = body
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let page_len = results.len();

            self.process_page(results, sink, &mut totals).await?;

            let total = extract_total(&body);
            tracing::debug!(
                offset = state.offset(),
                page_len,
                total,
                "search page processed"
            );

            match state.next(total, page_len) {
                Some(next) => state = next,
                None => break,
            }
        }

        Ok(totals)
    }

    /// Filters one page's results and drives the detail stage for the
    /// survivors.
    async fn process_page(
        &self,
        results: Vec<Value>,
        sink: &mut dyn RecordSink,
        totals: &mut CrawlTotals,
    ) -> Result<(), CrawlerError> {
        let mut pending = Vec::new();
        for raw in results {
            let listing: SearchListing = match serde_json::from_value(raw) {
                Ok(listing) => listing,
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed result entry");
                    continue;
                }
            };
            if !filter::passes(&listing, &self.filter) {
                totals.filtered_out += 1;
                continue;
            }

            let id = listing.ad_id();
            let record = ListingRecord::from_listing(listing, &self.listing_url_base);
            match id {
                Some(id) => pending.push((id, record)),
                None => {
                    // No identifier: expected edge, emit without a detail
                    // fetch.
                    totals.emitted += 1;
                    sink.emit(record)?;
                }
            }
        }

        let mut details = stream::iter(pending.into_iter().map(|(id, record)| {
            let client = &self.client;
            async move { (record, client.fetch_detail(id).await) }
        }))
        .buffer_unordered(self.max_concurrent_details);

        while let Some((record, outcome)) = details.next().await {
            let record = match outcome {
                Ok(detail) => record.with_detail(detail),
                Err(error) => {
                    totals.detail_failures += 1;
                    tracing::warn!(
                        id = record.id,
                        %error,
                        "detail fetch failed; emitting base record"
                    );
                    match error {
                        CrawlerError::Deserialize { .. } => record.with_detail_parse_failure(),
                        transport => record.with_detail_transport_failure(transport.to_string()),
                    }
                }
            };
            totals.emitted += 1;
            sink.emit(record)?;
        }

        Ok(())
    }
}

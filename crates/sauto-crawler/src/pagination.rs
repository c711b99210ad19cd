//! Offset-based pagination over the search endpoint.
//!
//! Each page's response decides the continuation: with a known total the
//! crawl advances while `offset + limit < total`; with an unknown total it
//! falls back to the full-page heuristic (a page of exactly `limit` results
//! implies more may follow). The heuristic inherits the API's ambiguity: it
//! terminates early when the true result count is an exact multiple of
//! `limit`, and it overshoots by one page if the API pads short final
//! pages. That behavior is deliberate — the upstream contract gives nothing
//! better to key on.

use sauto_core::SearchParams;

/// Offset/limit cursor for one search page, carried alongside the request
/// so the response handler can derive the next page without re-parsing
/// parameters.
#[derive(Debug, Clone)]
pub struct PageState {
    params: SearchParams,
    offset: u64,
    limit: u64,
}

impl PageState {
    /// Initial page state for a crawl. Offset and limit come from the
    /// params (already validated at load time).
    #[must_use]
    pub fn first(params: SearchParams) -> Self {
        let offset = params.offset();
        let limit = params.limit();
        Self {
            params,
            offset,
            limit,
        }
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Continuation decision after this page's response.
    ///
    /// `total` is the extracted total result count (`None` when unknown);
    /// `page_len` is the raw, pre-filter size of the page's results array.
    /// Returns the next page's state, or `None` when the crawl terminates.
    #[must_use]
    pub fn next(&self, total: Option<i64>, page_len: usize) -> Option<PageState> {
        let next_offset = self.offset + self.limit;
        let advance = match total {
            None => self.limit > 0 && page_len as u64 == self.limit,
            Some(total) => i64::try_from(next_offset).is_ok_and(|next| next < total),
        };
        if !advance {
            return None;
        }
        Some(PageState {
            params: self.params.with_offset(next_offset),
            offset: next_offset,
            limit: self.limit,
        })
    }
}

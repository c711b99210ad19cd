//! Client-side strict filter.
//!
//! The upstream search API matches loosely; this predicate is the guard
//! that keeps a crawl configured for one manufacturer/model/seller type
//! from emitting records of another. Each unset dimension is a no-op, so
//! with no criteria loaded the predicate accepts everything.

use sauto_core::FilterConfig;

use crate::types::SearchListing;

/// Whether `listing` exactly matches every configured criterion.
#[must_use]
pub fn passes(listing: &SearchListing, config: &FilterConfig) -> bool {
    if let Some(want) = config.manufacturer_seo.as_deref() {
        if listing.manufacturer_seo() != Some(want) {
            return false;
        }
    }

    if let Some(want) = config.model_seo.as_deref() {
        if listing.model_seo() != Some(want) {
            return false;
        }
    }

    if let Some(seller) = config.seller_type.as_deref() {
        let is_dealer = listing.is_dealer();
        if seller == "bazar" && !is_dealer {
            return false;
        }
        if seller == "soukromy" && is_dealer {
            return false;
        }
    }

    true
}

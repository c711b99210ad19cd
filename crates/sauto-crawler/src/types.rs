//! Loosely-shaped listing payloads from the search API.
//!
//! The search endpoint returns semi-structured records; only the fields the
//! strict filter and enrichment need are typed here. Everything else rides
//! along in the `extra` map and is round-tripped untouched into the output
//! record, so downstream consumers see the full upstream payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of the search response `results` array.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchListing {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub manufacturer_cb: Option<Codebook>,
    #[serde(default)]
    pub model_cb: Option<Codebook>,
    /// Arbitrary JSON; its truthiness distinguishes dealer listings from
    /// private-seller listings.
    #[serde(default)]
    pub premise: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchListing {
    /// Listing identifier. A zero id is treated as absent, matching the
    /// upstream convention where 0 marks an unassigned record.
    #[must_use]
    pub fn ad_id(&self) -> Option<i64> {
        self.id.filter(|&id| id != 0)
    }

    #[must_use]
    pub fn manufacturer_seo(&self) -> Option<&str> {
        self.manufacturer_cb.as_ref().and_then(Codebook::seo)
    }

    #[must_use]
    pub fn model_seo(&self) -> Option<&str> {
        self.model_cb.as_ref().and_then(Codebook::seo)
    }

    /// Whether this is a dealer ("bazar") listing.
    #[must_use]
    pub fn is_dealer(&self) -> bool {
        self.premise.as_ref().is_some_and(truthy)
    }
}

/// Manufacturer/model descriptor: display name plus SEO slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Codebook {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub seo_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Codebook {
    fn seo(&self) -> Option<&str> {
        self.seo_name.as_deref()
    }
}

/// JSON truthiness: null, `false`, zero, and empty strings/arrays/objects
/// are falsy; everything else is truthy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Seller classification derived from `premise` truthiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SellerType {
    #[serde(rename = "bazar")]
    Bazar,
    #[serde(rename = "soukromy")]
    Soukromy,
}

impl SellerType {
    #[must_use]
    pub fn from_dealer_flag(is_dealer: bool) -> Self {
        if is_dealer {
            SellerType::Bazar
        } else {
            SellerType::Soukromy
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SellerType::Bazar => "bazar",
            SellerType::Soukromy => "soukromy",
        }
    }
}

/// Terminal, enriched output record. Created from a filtered search
/// listing, completed exactly once by the detail stage, then emitted.
#[derive(Debug, Clone, Serialize)]
pub struct ListingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_cb: Option<Codebook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_cb: Option<Codebook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premise: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub manufacturer_name: Option<String>,
    pub model_name: Option<String>,
    pub seller_type: SellerType,
    /// Canonical listing page, or `None` when any of manufacturer slug,
    /// model slug, or id is missing.
    pub url: Option<String>,
    pub detail_fetch_ok: bool,
    pub detail_raw: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_error: Option<String>,
}

impl ListingRecord {
    /// Builds the enriched base record. Detail fields start in the
    /// "no detail fetched" state.
    pub(crate) fn from_listing(listing: SearchListing, listing_url_base: &str) -> Self {
        let url = build_listing_url(&listing, listing_url_base);
        let seller_type = SellerType::from_dealer_flag(listing.is_dealer());
        let manufacturer_name = listing
            .manufacturer_cb
            .as_ref()
            .and_then(|cb| cb.name.clone());
        let model_name = listing.model_cb.as_ref().and_then(|cb| cb.name.clone());

        let SearchListing {
            id,
            manufacturer_cb,
            model_cb,
            premise,
            extra,
        } = listing;

        Self {
            id,
            manufacturer_cb,
            model_cb,
            premise,
            extra,
            manufacturer_name,
            model_name,
            seller_type,
            url,
            detail_fetch_ok: false,
            detail_raw: None,
            detail_error: None,
        }
    }

    /// Detail stage succeeded: attach the full parsed payload.
    pub(crate) fn with_detail(mut self, detail: Value) -> Self {
        self.detail_fetch_ok = true;
        self.detail_raw = Some(detail);
        self
    }

    /// Detail response was not parseable structured data. The record is
    /// still emitted, just without enrichment.
    pub(crate) fn with_detail_parse_failure(mut self) -> Self {
        self.detail_fetch_ok = false;
        self.detail_raw = None;
        self
    }

    /// Detail request failed at the transport layer; the error description
    /// travels with the degraded record.
    pub(crate) fn with_detail_transport_failure(mut self, error: String) -> Self {
        self.detail_fetch_ok = false;
        self.detail_raw = None;
        self.detail_error = Some(error);
        self
    }
}

fn build_listing_url(listing: &SearchListing, base: &str) -> Option<String> {
    let manufacturer = listing.manufacturer_seo().filter(|s| !s.is_empty())?;
    let model = listing.model_seo().filter(|s| !s.is_empty())?;
    let id = listing.ad_id()?;
    Some(format!(
        "{}/{manufacturer}/{model}/{id}",
        base.trim_end_matches('/')
    ))
}

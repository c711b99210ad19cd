//! Crawl parameter file loading and the strict-filter configuration.
//!
//! The params file is a flat JSON object. Every scalar entry is forwarded
//! verbatim as a query parameter to the search endpoint; three of the keys
//! (`manufacturer_seo_name`, `model_seo_name`, `seller_type`) additionally
//! feed the client-side strict filter.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::ConfigError;

/// Page size assumed when the params file carries no `limit` entry.
pub const DEFAULT_PAGE_LIMIT: u64 = 35;

/// Query parameters for one search request.
///
/// Values are kept as strings exactly as they will be URL-encoded. `offset`
/// is always present and always a decimal string; deriving the next page
/// goes through [`SearchParams::with_offset`], which re-serializes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(BTreeMap<String, String>);

impl SearchParams {
    /// Builds search params from the raw params-file object.
    ///
    /// Scalar values are stringified; `null` entries are dropped (there is
    /// no meaningful way to send them upstream). `offset` defaults to `"0"`
    /// and both `offset` and `limit` must be non-negative integers.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when a value is non-scalar or when
    /// `offset`/`limit` do not parse as non-negative integers.
    pub fn from_json_object(object: &Map<String, Value>) -> Result<Self, String> {
        let mut params = BTreeMap::new();
        for (key, value) in object {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                Value::Array(_) | Value::Object(_) => {
                    return Err(format!("parameter \"{key}\" must be a scalar"));
                }
            };
            params.insert(key.clone(), rendered);
        }

        let mut this = Self(params);
        let offset = parse_count("offset", this.get("offset").unwrap_or("0"))?;
        this.0.insert("offset".to_string(), offset.to_string());
        if let Some(limit) = this.get("limit") {
            parse_count("limit", limit)?;
        }
        Ok(this)
    }

    /// Convenience constructor for literal parameter sets.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        params
            .entry("offset".to_string())
            .or_insert_with(|| "0".to_string());
        Self(params)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Current page offset. Falls back to 0 when absent or malformed;
    /// loading validates the value, so the fallback is unreachable for
    /// params that came from a file.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.get("offset")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Configured page size, defaulting to [`DEFAULT_PAGE_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.get("limit")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    /// Derives the params for the page at `offset`, leaving every other
    /// parameter untouched. The offset is re-serialized as a decimal string.
    #[must_use]
    pub fn with_offset(&self, offset: u64) -> Self {
        let mut next = self.clone();
        next.0.insert("offset".to_string(), offset.to_string());
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn parse_count(key: &str, raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| format!("parameter \"{key}\" is not a non-negative integer: {raw:?}"))
}

/// Strict-match criteria, normalized. Any unset field disables that filter
/// dimension entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub manufacturer_seo: Option<String>,
    pub model_seo: Option<String>,
    /// `"bazar"` (dealer) or `"soukromy"` (private seller).
    pub seller_type: Option<String>,
}

impl FilterConfig {
    /// Reads the three strict-filter keys out of the search params.
    ///
    /// Missing keys simply leave the dimension unset; this never fails.
    /// Emits one informational line listing the resolved criteria.
    #[must_use]
    pub fn from_search_params(params: &SearchParams) -> Self {
        let config = Self {
            manufacturer_seo: norm_str(params.get("manufacturer_seo_name")),
            model_seo: norm_str(params.get("model_seo_name")),
            seller_type: norm_str(params.get("seller_type")),
        };
        tracing::info!(
            manufacturer = ?config.manufacturer_seo,
            model = ?config.model_seo,
            seller_type = ?config.seller_type,
            "strict filter loaded"
        );
        config
    }
}

/// Trims the value and treats empty strings and the literal `"null"`
/// (case-insensitive) as unset.
fn norm_str(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(trimmed.to_string())
}

/// The fully loaded crawl parameter file: the search query parameters plus
/// the strict-filter criteria derived from them.
#[derive(Debug, Clone)]
pub struct CrawlParams {
    pub search: SearchParams,
    pub filter: FilterConfig,
}

impl CrawlParams {
    /// Interprets an already-parsed params document.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the root is not an object or a
    /// parameter value is unusable (see [`SearchParams::from_json_object`]).
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "root is not a JSON object".to_string())?;
        let search = SearchParams::from_json_object(object)?;
        let filter = FilterConfig::from_search_params(&search);
        Ok(Self { search, filter })
    }
}

/// Loads the crawl parameter file.
///
/// # Errors
///
/// Any failure here is fatal per the error-handling policy: unreadable file,
/// invalid JSON, or unusable parameter values.
pub fn load_crawl_params(path: &Path) -> Result<CrawlParams, ConfigError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ParamsIo {
        path: display.clone(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| ConfigError::ParamsParse {
        path: display.clone(),
        source,
    })?;
    CrawlParams::from_value(&value).map_err(|reason| ConfigError::InvalidParams {
        path: display,
        reason,
    })
}

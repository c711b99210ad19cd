use std::path::PathBuf;

/// Process-level configuration, resolved once at startup from environment
/// variables (see [`crate::config::load_app_config`]).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the listing search endpoint.
    pub search_url: String,
    /// Base URL of the per-item detail endpoint; the item id is appended
    /// as a path segment.
    pub detail_url: String,
    /// Base URL for the canonical listing page, used to construct the
    /// `url` field on emitted records.
    pub listing_url: String,
    /// Path of the crawl parameter file.
    pub params_path: PathBuf,
    /// Path of the append-only request audit log.
    pub audit_log_path: PathBuf,
    /// Where emitted records are written as JSON lines; `None` means stdout.
    pub output_path: Option<PathBuf>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on concurrently in-flight detail requests per page.
    pub max_concurrent_details: usize,
    /// Politeness delay between successive search page requests.
    pub inter_page_delay_ms: u64,
}

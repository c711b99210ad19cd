pub mod app_config;
pub mod config;
pub mod error;
pub mod params;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use params::{load_crawl_params, CrawlParams, FilterConfig, SearchParams, DEFAULT_PAGE_LIMIT};

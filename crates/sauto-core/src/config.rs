use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let search_url = or_default("SAUTO_SEARCH_URL", "https://www.sauto.cz/api/v1/items/search");
    let detail_url = or_default("SAUTO_DETAIL_URL", "https://www.sauto.cz/api/v1/items");
    let listing_url = or_default("SAUTO_LISTING_URL", "https://www.sauto.cz/osobni/detail");
    let params_path = PathBuf::from(or_default("SAUTO_PARAMS_PATH", "./params.json"));
    let audit_log_path = PathBuf::from(or_default("SAUTO_AUDIT_LOG_PATH", "./sauto_requests.log"));
    let output_path = lookup("SAUTO_OUTPUT_PATH").ok().map(PathBuf::from);
    let log_level = or_default("SAUTO_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SAUTO_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SAUTO_USER_AGENT", "sauto-crawler/0.1 (listing-harvest)");
    let max_concurrent_details = parse_usize("SAUTO_MAX_CONCURRENT_DETAILS", "4")?;
    let inter_page_delay_ms = parse_u64("SAUTO_INTER_PAGE_DELAY_MS", "250")?;

    Ok(AppConfig {
        search_url,
        detail_url,
        listing_url,
        params_path,
        audit_log_path,
        output_path,
        log_level,
        request_timeout_secs,
        user_agent,
        max_concurrent_details,
        inter_page_delay_ms,
    })
}

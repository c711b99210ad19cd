use thiserror::Error;

/// Configuration failures. All of these are fatal: they abort the crawl
/// before any request is issued.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("cannot read params file {path}: {source}")]
    ParamsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse params file {path}: {source}")]
    ParamsParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid params file {path}: {reason}")]
    InvalidParams { path: String, reason: String },
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("not found upstream: {what}")]
    NotFound { what: String },

    #[error("rate limited by upstream")]
    RateLimited { reset_at: Option<u64> },

    #[error("network error: {0}")]
    Network(String),
}

impl UpstreamError {
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::NotFound { .. } => "not_found",
            UpstreamError::RateLimited { .. } => "rate_limited",
            UpstreamError::Network(_) => "network",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read repository list {}", path.display())]
    RepoListUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock {} is held by another sync process", path.display())]
    AlreadyRunning { path: PathBuf },

    #[error("mirror base {0:?} must be empty or an http(s) URL prefix")]
    InvalidMirrorBase(String),
}

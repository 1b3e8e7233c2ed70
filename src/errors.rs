// src/errors.rs

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum JobchatError {
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("completion error: {0}")]
    Completion(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl JobchatError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        JobchatError::Completion(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        JobchatError::Config(msg.into())
    }
}

/// Failure modes of a job-search round. Zero results is not an error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport failure or non-2xx status from the search endpoint.
    /// Not retried; the user re-submits if they want another attempt.
    #[error("search request failed: {0}")]
    RequestFailed(String),
}

pub type JobchatResult<T> = Result<T, JobchatError>;

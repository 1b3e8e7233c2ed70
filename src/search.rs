// src/search.rs

use crate::errors::SearchError;
use crate::models::{JobRecord, SearchRequest, SearchResponse};
use log::{debug, warn};
use reqwest::Client;

/// Result cap carried on every request.
pub const MAX_RESULTS: u32 = 5;

impl SearchRequest {
    /// Builds the structured request from raw user input. The input is
    /// assumed non-empty; submission is guarded upstream.
    pub fn from_input(raw_input: &str) -> Self {
        let lowered = raw_input.to_lowercase();
        Self {
            query: raw_input.to_string(),
            max_results: MAX_RESULTS,
            women_friendly_only: lowered.contains("women") || lowered.contains("female"),
        }
    }
}

/// Client for the external job-search endpoint. One POST per round, no
/// retry and no client-side timeout; the typing indicator owns the
/// user-facing timeout.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<JobRecord>, SearchError> {
        debug!(
            "search: query={:?} women_friendly_only={}",
            request.query, request.women_friendly_only
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("search transport failure: {}", e);
                SearchError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("search endpoint returned {}", status);
            return Err(SearchError::RequestFailed(format!(
                "endpoint returned {}",
                status
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::RequestFailed(format!("invalid response body: {}", e)))?;

        debug!("search: {} result(s)", body.results.len());
        Ok(body.results)
    }
}

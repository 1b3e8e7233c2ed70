// src/models.rs

use serde::{Deserialize, Serialize};

/// One job posting as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub posting_date: Option<String>,
    pub salary_range: Option<String>,
    /// Used verbatim as the outbound apply link.
    pub application_url: String,
    pub is_women_friendly: Option<bool>,
    pub skills: Option<Vec<String>>,
}

/// Body of the outbound search POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub women_friendly_only: bool,
}

/// Search endpoint response. A missing or empty `results` field means
/// zero matches, which is a valid outcome, not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<JobRecord>,
}

impl JobRecord {
    /// Test/fixture constructor with only the required fields set.
    pub fn basic(title: &str, company: &str, application_url: &str) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            location: None,
            job_type: None,
            posting_date: None,
            salary_range: None,
            application_url: application_url.to_string(),
            is_women_friendly: None,
            skills: None,
        }
    }
}

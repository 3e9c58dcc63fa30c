use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// One cited source link: display title (possibly empty) plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// Outcome of the AI Mode verification pass. Produced once per run and
/// never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub is_ai_mode: bool,
    pub url_has_udm50: bool,
    /// Marker selectors that matched at least one element, in probe order.
    pub ai_elements_found: Vec<String>,
    pub page_title: String,
    pub final_url: String,
}

/// The externally visible artifact of one run. Built incrementally across
/// pipeline stages; always complete even on partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub url: String,
    pub timestamp: String,
    pub ai_mode_verified: bool,
    pub verification_details: VerificationOutcome,
    pub ai_response: Option<String>,
    pub sources: Vec<SourceLink>,
    pub screenshot: Option<String>,
    pub error: Option<String>,
    pub user_agent: String,
}

impl QueryResult {
    pub fn new(query: &str, url: &str, user_agent: String) -> Self {
        Self {
            query: query.to_string(),
            url: url.to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
            ai_mode_verified: false,
            verification_details: VerificationOutcome::default(),
            ai_response: None,
            sources: Vec::new(),
            screenshot: None,
            error: None,
            user_agent,
        }
    }

    /// First error set wins; later stages never overwrite it.
    pub fn record_error(&mut self, err: &ScrapeError) {
        if self.error.is_none() {
            self.error = Some(err.to_string());
        }
    }

    /// Fold the verification verdict in. A negative verdict downgrades
    /// confidence and annotates the result but does not stop extraction.
    pub fn apply_verification(&mut self, verification: VerificationOutcome) {
        self.ai_mode_verified = verification.is_ai_mode;
        if !verification.is_ai_mode {
            self.record_error(&ScrapeError::ModeMismatch {
                url_signal: verification.url_has_udm50,
                markers: verification.ai_elements_found.len(),
            });
        }
        self.verification_details = verification;
    }
}

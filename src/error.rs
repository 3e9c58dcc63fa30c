use thiserror::Error;

/// Scraping failures. Only browser launch escapes the pipeline as a hard
/// error; everything here ends up recorded on the `QueryResult` instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A navigation or settle wait exceeded its budget. Terminal for the
    /// run, but the result object is still returned populated.
    #[error("navigation timed out after {budget_ms}ms")]
    NavigationTimeout { budget_ms: u64 },

    /// Verification signals did not both confirm AI Mode.
    #[error("AI Mode not verified. URL contains udm=50: {url_signal}, AI elements found: {markers}. Google may have redirected to normal search")]
    ModeMismatch { url_signal: bool, markers: usize },

    /// No content selector yielded acceptable text and the fallback
    /// container was empty too.
    #[error("no AI content found")]
    ContentAbsent,

    /// A single selector lookup, click or attribute read failed. Recovered
    /// locally; never aborts the run.
    #[error("element lookup failed: {0}")]
    TransientElement(String),

    /// SerpAPI path: no credentials available. Raised before any network
    /// call is attempted.
    #[error("missing SerpAPI credentials: set SERPAPI_KEY or pass an api key")]
    CredentialMissing,

    /// SerpAPI path: the upstream request failed. Not retried.
    #[error("SerpAPI request failed: {0}")]
    UpstreamHttp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_mismatch_message_names_both_signals() {
        let err = ScrapeError::ModeMismatch {
            url_signal: true,
            markers: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("udm=50: true"));
        assert!(msg.contains("AI elements found: 0"));
    }

    #[test]
    fn timeout_message_includes_budget() {
        let err = ScrapeError::NavigationTimeout { budget_ms: 30_000 };
        assert_eq!(err.to_string(), "navigation timed out after 30000ms");
    }
}

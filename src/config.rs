use std::path::PathBuf;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

/// Google search endpoint queried with the AI Mode parameter appended.
pub const SEARCH_ENDPOINT: &str = "https://www.google.com/search";
pub const HOMEPAGE_URL: &str = "https://www.google.com/?hl=en";

/// Query parameter that selects the AI-answer rendering mode.
pub const AI_MODE_PARAM: &str = "udm=50";

/// Minimum trimmed length before extracted text counts as a real answer
/// (guards against empty/placeholder containers).
pub const MIN_ANSWER_LEN: usize = 50;

/// Source-link scan is capped to the first N http anchors in document order.
pub const SOURCE_SCAN_CAP: usize = 20;

/// Links back to the engine itself are never reported as sources.
pub const SELF_DOMAIN: &str = "google.com";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

pub static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:124.0) Gecko/20100101 Firefox/124.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/123.0.0.0 Safari/537.36",
    ]
});

pub static VIEWPORTS: Lazy<Vec<(u32, u32)>> = Lazy::new(|| {
    vec![
        (1280, 900),
        (1366, 768),
        (1440, 900),
        (1536, 864),
        (1920, 1080),
    ]
});

pub static TIMEZONES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "America/New_York",
        "America/Chicago",
        "America/Los_Angeles",
        "Europe/London",
        "Europe/Rome",
    ]
});

/// One browser identity drawn from the process-wide pools. Selection takes a
/// caller-supplied `Rng` so tests can pin it with a seeded `StdRng`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub user_agent: &'static str,
    pub viewport: (u32, u32),
    pub timezone: &'static str,
}

impl Fingerprint {
    pub fn randomized(rng: &mut impl Rng) -> Self {
        Self {
            user_agent: USER_AGENTS.choose(rng).copied().unwrap_or(DEFAULT_USER_AGENT),
            viewport: VIEWPORTS.choose(rng).copied().unwrap_or((1280, 900)),
            timezone: TIMEZONES.choose(rng).copied().unwrap_or("America/New_York"),
        }
    }

    /// Fixed identity used when fingerprint randomization is disabled.
    pub fn pinned() -> Self {
        Self {
            user_agent: USER_AGENTS.first().copied().unwrap_or(DEFAULT_USER_AGENT),
            viewport: (1280, 900),
            timezone: "America/New_York",
        }
    }
}

/// Immutable input to one pipeline run.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub query: String,
    pub headless: bool,
    pub timeout_ms: u64,
    pub locale: String,
    pub screenshot: Option<PathBuf>,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub homepage_first: bool,
    pub randomize_fingerprint: bool,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            headless: true,
            timeout_ms: 30_000,
            locale: "en-US".to_string(),
            screenshot: None,
            delay_min_ms: 2_000,
            delay_max_ms: 5_000,
            homepage_first: true,
            randomize_fingerprint: true,
        }
    }

    /// Search URL for this query with the AI Mode parameter appended.
    pub fn target_url(&self) -> String {
        format!(
            "{}?q={}&{}",
            SEARCH_ENDPOINT,
            urlencoding::encode(&self.query),
            AI_MODE_PARAM
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn target_url_percent_encodes_query() {
        let req = QueryRequest::new("capital of France");
        let url = req.target_url();
        assert!(url.starts_with("https://www.google.com/search?q="));
        assert!(url.contains("q=capital%20of%20France"));
    }

    #[test]
    fn target_url_contains_mode_param_exactly_once() {
        let req = QueryRequest::new("what is udm=50 anyway");
        let url = req.target_url();
        // The encoded query must not smuggle in a second literal parameter.
        assert_eq!(url.matches(AI_MODE_PARAM).count(), 1);
        assert!(url.ends_with("&udm=50"));
    }

    #[test]
    fn fingerprint_selection_is_deterministic_with_seeded_rng() {
        let a = Fingerprint::randomized(&mut StdRng::seed_from_u64(7));
        let b = Fingerprint::randomized(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(USER_AGENTS.contains(&a.user_agent));
        assert!(VIEWPORTS.contains(&a.viewport));
        assert!(TIMEZONES.contains(&a.timezone));
    }

    #[test]
    fn pinned_fingerprint_uses_first_pool_entries() {
        let fp = Fingerprint::pinned();
        assert_eq!(fp.user_agent, USER_AGENTS[0]);
        assert_eq!(fp.viewport, (1280, 900));
    }
}

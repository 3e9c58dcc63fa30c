use crate::error::ScrapeError;

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Thin client for the paid scraping-API fallback. The provider's JSON
/// envelope is passed through untouched; no decision logic lives here.
pub struct SerpApiClient {
    api_key: String,
    client: reqwest::Client,
}

impl SerpApiClient {
    /// Fails fast with `CredentialMissing` before any network call.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ScrapeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ScrapeError::CredentialMissing);
        }
        Ok(Self {
            api_key,
            client: reqwest::Client::new(),
        })
    }

    /// Credentials from the `SERPAPI_KEY` environment variable.
    pub fn from_env() -> Result<Self, ScrapeError> {
        let key = std::env::var("SERPAPI_KEY").map_err(|_| ScrapeError::CredentialMissing)?;
        Self::new(key)
    }

    /// Query Google AI Mode through the provider, geo-located via `gl`.
    /// Upstream failures carry the status detail and are not retried.
    pub async fn query(&self, query: &str, gl: &str) -> Result<serde_json::Value, ScrapeError> {
        let response = self
            .client
            .post(SERPAPI_ENDPOINT)
            .form(&[
                ("engine", "google_ai_mode"),
                ("q", query),
                ("gl", gl),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ScrapeError::UpstreamHttp(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::UpstreamHttp(format!(
                "status {status}: {body}"
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ScrapeError::UpstreamHttp(format!("invalid response body: {e}")))
    }
}

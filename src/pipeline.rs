use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scraper::Html;

use crate::config::QueryRequest;
use crate::error::ScrapeError;
use crate::session::Session;
use crate::types::QueryResult;
use crate::{extract, navigate, pacing, verify};

/// Settle wait after navigation; AI content renders asynchronously.
const CONTENT_SETTLE_MS: u64 = 2_000;

/// Run one query end to end. Only browser launch escapes as a hard error;
/// every scraping failure is folded into the returned `QueryResult`.
pub async fn run_query(request: &QueryRequest) -> Result<QueryResult> {
    let mut rng = StdRng::from_entropy();
    run_query_with_rng(request, &mut rng).await
}

/// Same as [`run_query`] with an injected pseudo-random source, so pacing
/// and fingerprint selection are reproducible.
pub async fn run_query_with_rng(
    request: &QueryRequest,
    rng: &mut StdRng,
) -> Result<QueryResult> {
    let target_url = request.target_url();

    // The session owns the browser process; any return path below drops it
    // and kills Chrome.
    let session = Session::launch(request, rng)?;
    let mut result = QueryResult::new(&request.query, &target_url, session.user_agent().to_string());

    pacing::pre_request_delay(request.delay_min_ms, request.delay_max_ms, rng).await;

    let navigated = if request.homepage_first {
        navigate::homepage_flow(&session, request, &target_url, rng).await
    } else {
        navigate::goto_direct(&session, &target_url, request.timeout_ms).await
    };
    if let Err(e) = navigated {
        result.record_error(&e);
        return Ok(result);
    }

    navigate::dismiss_consent(&session).await;
    pacing::settle(CONTENT_SETTLE_MS).await;
    pacing::simulate_reading(session.tab(), rng).await;

    let html = match session.tab().get_content() {
        Ok(html) => html,
        Err(e) => {
            result.record_error(&ScrapeError::TransientElement(format!(
                "failed to read page content: {e}"
            )));
            return Ok(result);
        }
    };
    let final_url = session.tab().get_url();
    let page_title = session.tab().get_title().unwrap_or_default();

    let doc = Html::parse_document(&html);
    result.apply_verification(verify::verify_ai_mode(&doc, &final_url, &page_title));

    if let Some(path) = &request.screenshot {
        match session.screenshot_png(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "screenshot saved");
                result.screenshot = Some(path.display().to_string());
            }
            Err(e) => tracing::warn!(?e, "screenshot capture failed"),
        }
    }

    let (answer, matched) = extract::extract_answer(&doc);
    match answer {
        Some(text) => {
            tracing::info!(selector = ?matched, chars = text.len(), "AI content extracted");
            result.ai_response = Some(text);
        }
        None => result.record_error(&ScrapeError::ContentAbsent),
    }

    result.sources = extract::collect_sources(&doc);
    tracing::info!(sources = result.sources.len(), "extraction complete");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceLink;

    // Fixture page: one AI marker, udm=50 in the final URL, a
    // 120-character answer container, and three anchors of which only one
    // is a unique external link.
    const FIXTURE_ANSWER: &str = "Paris is the capital of France. It has been the nation's main political and cultural centre for many centuries now here.";

    fn fixture_page() -> Html {
        Html::parse_document(&format!(
            "<html><body>\
             <div data-ai-overview>  {FIXTURE_ANSWER}  </div>\
             <a href='https://www.google.com/preferences'>settings</a>\
             <a href='https://en.wikipedia.org/wiki/Paris'>Paris - Wikipedia</a>\
             <a href='https://en.wikipedia.org/wiki/Paris'>Paris again</a>\
             </body></html>"
        ))
    }

    fn extract_fixture(doc: &Html) -> QueryResult {
        let request = QueryRequest::new("capital of France");
        let mut result = QueryResult::new(
            &request.query,
            &request.target_url(),
            "test-agent".to_string(),
        );
        let final_url = "https://www.google.com/search?q=capital%20of%20France&udm=50";
        result.apply_verification(verify::verify_ai_mode(doc, final_url, "capital of France"));
        let (answer, _) = extract::extract_answer(doc);
        match answer {
            Some(text) => result.ai_response = Some(text),
            None => result.record_error(&ScrapeError::ContentAbsent),
        }
        result.sources = extract::collect_sources(doc);
        result
    }

    #[test]
    fn fixture_scenario_verifies_extracts_and_cites_one_source() {
        let doc = fixture_page();
        let result = extract_fixture(&doc);

        assert!(result.ai_mode_verified);
        assert!(result.error.is_none());
        assert_eq!(result.ai_response.as_deref(), Some(FIXTURE_ANSWER));
        assert_eq!(
            result.sources,
            vec![SourceLink {
                title: "Paris - Wikipedia".to_string(),
                url: "https://en.wikipedia.org/wiki/Paris".to_string(),
            }]
        );
    }

    #[test]
    fn identical_inputs_yield_structurally_identical_results() {
        let doc = fixture_page();
        let first = extract_fixture(&doc);
        let second = extract_fixture(&doc);

        assert_eq!(first.ai_mode_verified, second.ai_mode_verified);
        assert_eq!(first.verification_details, second.verification_details);
        assert_eq!(first.ai_response, second.ai_response);
        assert_eq!(first.sources, second.sources);
        assert_eq!(first.error, second.error);
    }

    #[test]
    fn redirected_page_still_extracts_best_effort() {
        // No marker, no udm=50: verification fails but extraction proceeds
        // through the fallback container.
        let doc = Html::parse_document(
            "<div id='center_col'>Google redirected this query to ordinary results.</div>",
        );
        let request = QueryRequest::new("capital of France");
        let mut result = QueryResult::new(
            &request.query,
            &request.target_url(),
            "test-agent".to_string(),
        );
        result.apply_verification(verify::verify_ai_mode(
            &doc,
            "https://www.google.com/search?q=capital+of+France",
            "",
        ));
        let (answer, _) = extract::extract_answer(&doc);
        if let Some(text) = answer {
            result.ai_response = Some(text);
        }

        assert!(!result.ai_mode_verified);
        assert!(result.error.as_deref().unwrap().contains("not verified"));
        assert!(result.ai_response.is_some());
    }
}

use scraper::{Html, Selector};

use crate::config::AI_MODE_PARAM;
use crate::types::VerificationOutcome;

/// Selectors specific to Google AI Mode. These only appear when the
/// AI-answer variant actually rendered, so they double as a redirect
/// detector.
pub const AI_MODE_INDICATORS: &[&str] = &[
    "[data-ai-overview]",
    "[data-attrid='AIOverview']",
    ".AIOverview",
    // AI Mode tab/button that should be active
    "[data-udm='50']",
    // Common AI response containers
    "[jsname='N760b']",
    "[data-hveid][data-ved] .wDYxhc",
];

/// Decide whether the page rendered the AI Mode variant. The verdict
/// requires BOTH independent signals: the mode parameter in the resolved
/// URL and at least one marker element on the page.
pub fn verify_ai_mode(doc: &Html, final_url: &str, page_title: &str) -> VerificationOutcome {
    let url_has_udm50 = final_url.contains(AI_MODE_PARAM);

    let mut ai_elements_found = Vec::new();
    for &css in AI_MODE_INDICATORS {
        if marker_present(doc, css) {
            ai_elements_found.push(css.to_string());
        }
    }

    VerificationOutcome {
        is_ai_mode: url_has_udm50 && !ai_elements_found.is_empty(),
        url_has_udm50,
        ai_elements_found,
        page_title: page_title.to_string(),
        final_url: final_url.to_string(),
    }
}

/// Presence means "matches at least one element", not textual content.
/// A selector that fails to parse counts as absent.
fn marker_present(doc: &Html, css: &str) -> bool {
    match Selector::parse(css) {
        Ok(selector) => doc.select(&selector).next().is_some(),
        Err(e) => {
            tracing::debug!(selector = css, ?e, "marker probe failed");
            false
        }
    }
}

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::config::{QueryRequest, AI_MODE_PARAM, HOMEPAGE_URL};
use crate::error::ScrapeError;
use crate::pacing;
use crate::session::Session;

/// Known consent button labels, tried in order; first match wins.
pub const CONSENT_BUTTON_TEXTS: &[&str] =
    &["Accept all", "Accept", "Accetta tutto", "Accetta", "I agree"];

/// Navigate straight to the constructed AI Mode URL.
pub async fn goto_direct(session: &Session, url: &str, budget_ms: u64) -> Result<(), ScrapeError> {
    tracing::info!(url, "navigating directly");
    goto(session, url, budget_ms)
}

/// Simulate arriving through the homepage: load it, dismiss any consent
/// dialog, type the query character by character, submit, then hop to the
/// AI Mode URL if the results page did not already land there.
pub async fn homepage_flow(
    session: &Session,
    request: &QueryRequest,
    target_url: &str,
    rng: &mut impl Rng,
) -> Result<(), ScrapeError> {
    let budget = request.timeout_ms;
    tracing::info!("navigating via homepage");
    goto(session, HOMEPAGE_URL, budget)?;

    dismiss_consent(session).await;
    pacing::simulate_reading(session.tab(), rng).await;

    match type_and_submit(session, &request.query, rng).await {
        Ok(()) => {
            session
                .tab()
                .wait_until_navigated()
                .map_err(|e| timeout(budget, &e))?;
        }
        Err(reason) => {
            // Search box interaction is best-effort; the direct hop below
            // still reaches the target page.
            tracing::warn!(%reason, "homepage search interaction failed, falling back to direct URL");
        }
    }

    // Idempotent when the submitted search already resolved to AI Mode.
    if !session.tab().get_url().contains(AI_MODE_PARAM) {
        goto(session, target_url, budget)?;
    }
    Ok(())
}

/// Dismiss a cookie/consent dialog if one is present. Absence of the
/// dialog is not an error, and any failure here is swallowed.
pub async fn dismiss_consent(session: &Session) {
    let script = consent_click_script();
    match session.tab().evaluate(&script, false) {
        Ok(outcome) => {
            if let Some(serde_json::Value::String(label)) = outcome.value {
                if label != "no_dialog" {
                    tracing::info!(%label, "consent dialog dismissed");
                    // Give the dialog time to close before continuing.
                    sleep(Duration::from_millis(1_000)).await;
                }
            }
        }
        Err(e) => {
            tracing::debug!(?e, "consent probe failed");
        }
    }
}

fn consent_click_script() -> String {
    let labels = CONSENT_BUTTON_TEXTS
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
        (() => {{
            const labels = [{labels}];
            const buttons = Array.from(document.querySelectorAll('button'));
            for (const label of labels) {{
                const btn = buttons.find(b => (b.textContent || '').trim().includes(label));
                if (btn) {{
                    btn.click();
                    return label;
                }}
            }}
            return 'no_dialog';
        }})();
        "#
    )
}

async fn type_and_submit(
    session: &Session,
    query: &str,
    rng: &mut impl Rng,
) -> Result<(), String> {
    let tab = session.tab();

    // Google serves either a textarea or an input for the search box.
    let search_box = tab
        .wait_for_element_with_custom_timeout("textarea[name='q']", Duration::from_secs(5))
        .or_else(|_| {
            tab.wait_for_element_with_custom_timeout("input[name='q']", Duration::from_secs(3))
        })
        .map_err(|e| format!("search box not found: {e}"))?;

    search_box.click().map_err(|e| e.to_string())?;

    for ch in query.chars() {
        tab.type_str(&ch.to_string()).map_err(|e| e.to_string())?;
        sleep(pacing::typing_delay(rng)).await;
    }

    tab.press_key("Enter").map_err(|e| e.to_string())?;
    Ok(())
}

fn goto(session: &Session, url: &str, budget_ms: u64) -> Result<(), ScrapeError> {
    let tab = session.tab();
    tab.navigate_to(url).map_err(|e| timeout(budget_ms, &e))?;
    tab.wait_until_navigated().map_err(|e| timeout(budget_ms, &e))?;
    Ok(())
}

fn timeout(budget_ms: u64, cause: &anyhow::Error) -> ScrapeError {
    tracing::warn!(%cause, budget_ms, "navigation wait failed");
    ScrapeError::NavigationTimeout { budget_ms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_script_lists_patterns_in_priority_order() {
        let script = consent_click_script();
        let accept_all = script.find("'Accept all'").unwrap();
        let accetta = script.find("'Accetta tutto'").unwrap();
        assert!(accept_all < accetta);
        assert!(script.contains("no_dialog"));
    }
}

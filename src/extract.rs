use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::config::{MIN_ANSWER_LEN, SELF_DOMAIN, SOURCE_SCAN_CAP};
use crate::types::SourceLink;

/// Content container selectors tried in priority order. First acceptable
/// match wins; no merging across selectors.
pub const AI_CONTENT_SELECTORS: &[&str] = &[
    "[data-ai-overview]",
    ".AIOverview",
    "[jsname='N760b']",
    ".wDYxhc[data-hveid]",
    "#center_col .wDYxhc",
];

/// Last-resort containers when no AI selector yields acceptable content.
pub const FALLBACK_SELECTORS: &[&str] = &["#center_col", "[role='main']"];

/// Outcome of a single selector probe. `Failed` means the attempt itself
/// went wrong (bad selector, read error) and the next candidate should be
/// tried; it never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Found(String),
    NotFound,
    Failed(String),
}

/// Read the text of the first element matching `css`.
pub fn probe_text(doc: &Html, css: &str) -> Probe {
    let selector = match Selector::parse(css) {
        Ok(s) => s,
        Err(e) => return Probe::Failed(format!("bad selector {css}: {e:?}")),
    };
    match doc.select(&selector).next() {
        Some(element) => Probe::Found(element.text().collect::<String>()),
        None => Probe::NotFound,
    }
}

/// Try the AI content selectors in order, accepting the first whose trimmed
/// text exceeds the meaningful-content threshold. Returns the answer and
/// the selector that produced it.
pub fn extract_answer(doc: &Html) -> (Option<String>, Option<&'static str>) {
    for &css in AI_CONTENT_SELECTORS {
        match probe_text(doc, css) {
            Probe::Found(text) => {
                let trimmed = text.trim();
                if trimmed.len() > MIN_ANSWER_LEN {
                    return (Some(trimmed.to_string()), Some(css));
                }
            }
            Probe::NotFound => {}
            Probe::Failed(reason) => {
                tracing::debug!(selector = css, %reason, "content probe failed, trying next");
            }
        }
    }

    // Fallback: any non-empty text from the main results container.
    for &css in FALLBACK_SELECTORS {
        if let Probe::Found(text) = probe_text(doc, css) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return (Some(trimmed.to_string()), Some(css));
            }
        }
    }

    (None, None)
}

/// Enumerate cited source links: http(s) anchors in document order, scan
/// capped at the first 20, self-domain links excluded, deduplicated by
/// exact URL keeping first occurrence.
pub fn collect_sources(doc: &Html) -> Vec<SourceLink> {
    let selector = match Selector::parse("a[href^='http']") {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(?e, "source link selector failed to parse");
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut sources = Vec::new();

    for anchor in doc.select(&selector).take(SOURCE_SCAN_CAP) {
        let href = match anchor.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        if href.contains(SELF_DOMAIN) || seen.contains(href) {
            continue;
        }
        seen.insert(href.to_string());
        sources.push(SourceLink {
            title: anchor.text().collect::<String>().trim().to_string(),
            url: href.to_string(),
        });
    }

    sources
}

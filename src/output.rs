use std::path::Path;

use anyhow::{Context, Result};

use crate::types::QueryResult;

/// Write one pretty-printed UTF-8 JSON record per invocation.
pub fn write_json(result: &QueryResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write result to {}", path.display()))?;
    Ok(())
}

/// Console summary: verification verdict, answer preview, sources count.
pub fn print_summary(result: &QueryResult) {
    let v = &result.verification_details;
    println!("\n--- AI Mode verification ---");
    println!(
        "URL contains udm=50: {}",
        if v.url_has_udm50 { "yes" } else { "no" }
    );
    println!("AI elements found: {}", v.ai_elements_found.len());
    println!(
        "AI Mode verified: {}",
        if result.ai_mode_verified { "YES" } else { "NO" }
    );

    if let Some(error) = &result.error {
        println!("\nWarning: {error}");
    }

    match &result.ai_response {
        Some(answer) => {
            let preview: String = answer.chars().take(500).collect();
            let ellipsis = if answer.chars().count() > 500 { "..." } else { "" };
            println!("\n--- AI response ---\n{preview}{ellipsis}");
            println!("\nSources found: {}", result.sources.len());
        }
        None => println!("\nNo AI response found."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceLink, VerificationOutcome};

    #[test]
    fn written_record_round_trips_with_contract_keys() {
        let mut result = QueryResult::new(
            "capital of France",
            "https://www.google.com/search?q=capital%20of%20France&udm=50",
            "test-agent".to_string(),
        );
        result.apply_verification(VerificationOutcome {
            is_ai_mode: true,
            url_has_udm50: true,
            ai_elements_found: vec!["[data-ai-overview]".to_string()],
            page_title: "capital of France".to_string(),
            final_url: result.url.clone(),
        });
        result.ai_response = Some("Paris.".to_string());
        result.sources.push(SourceLink {
            title: "Wikipedia".to_string(),
            url: "https://en.wikipedia.org/wiki/Paris".to_string(),
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.json");
        write_json(&result, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        // Human-readable means indented output.
        assert!(raw.contains("\n  \"query\""));
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["query"], "capital of France");
        assert_eq!(parsed["ai_mode_verified"], true);
        assert_eq!(parsed["sources"][0]["title"], "Wikipedia");
        assert_eq!(
            parsed["verification_details"]["ai_elements_found"][0],
            "[data-ai-overview]"
        );
    }
}

//! Monthly report narrative generation.
//!
//! Produces the four free-text fields of the monthly report (executive
//! summary, complaints, highlights, recommended actions) from a capped
//! excerpt of the month's reviews. Statistics never depend on this: when
//! generation cannot run the report still assembles, with placeholder
//! copy in the narrative slots.

use tracing::warn;

use reverb_core::{defaults, GenerateRequest, GenerationBackend, ReportNarrative, Review};

/// Flatten the month's reviews into a capped prompt excerpt.
///
/// Takes the first reviews in storage order, then applies a plain
/// character cut on top. Both limits are fixed context-budget caps.
fn excerpt(reviews: &[Review]) -> String {
    let bullets = reviews
        .iter()
        .take(defaults::REPORT_EXCERPT_REVIEWS)
        .map(|r| format!("- {} stars: {}", r.rating, r.content))
        .collect::<Vec<_>>()
        .join("\n");
    bullets
        .chars()
        .take(defaults::REPORT_EXCERPT_CHARS)
        .collect()
}

fn narrative_prompt(month: &str, excerpt: &str) -> String {
    format!(
        r#"Analyze these reviews for {month}:
{excerpt}

Provide a JSON with:
1. "summary": Short paragraph summary.
2. "complaints": Top complaints.
3. "highlights": Positive highlights.
4. "actions": Recommended actions."#
    )
}

/// Placeholder narrative used when generation cannot run.
fn placeholder() -> ReportNarrative {
    ReportNarrative {
        summary: defaults::FALLBACK_REPORT_SUMMARY.to_string(),
        complaints: defaults::FALLBACK_REPORT_SECTION.to_string(),
        highlights: defaults::FALLBACK_REPORT_SECTION.to_string(),
        actions: defaults::FALLBACK_REPORT_SECTION.to_string(),
    }
}

/// Generate the narrative fields for one month of reviews.
///
/// An unconfigured backend, a failed call, and an unparseable reply all
/// yield the same placeholder narrative. On a successful parse each
/// field fills independently, defaulting to empty when the provider
/// omits it or returns a non-string.
pub async fn monthly_narrative(
    backend: &dyn GenerationBackend,
    month: &str,
    reviews: &[Review],
) -> ReportNarrative {
    // JSON mode at the provider's default temperature.
    let request = GenerateRequest::json(narrative_prompt(month, &excerpt(reviews)));

    let raw = match backend.generate(&request).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                subsystem = "inference",
                op = "monthly_narrative",
                month,
                error = %e,
                "narrative generation failed, using placeholder copy"
            );
            return placeholder();
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => {
            let field = |name: &str| {
                value
                    .get(name)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            ReportNarrative {
                summary: field("summary"),
                complaints: field("complaints"),
                highlights: field("highlights"),
                actions: field("actions"),
            }
        }
        Err(e) => {
            warn!(
                subsystem = "inference",
                op = "monthly_narrative",
                month,
                error = %e,
                "narrative reply was not JSON, using placeholder copy"
            );
            placeholder()
        }
    }
}

//! Week-over-week insight comparison.
//!
//! Flattens two review windows into bullet lists, caps each side at a
//! fixed character budget, and asks the backend for a short comparative
//! summary. Like enrichment, this never fails: both the unconfigured and
//! the broken-backend cases collapse into fixed fallback copy.

use tracing::warn;

use reverb_core::{defaults, Error, GenerateRequest, GenerationBackend, Review, WeeklyInsight};

/// Flatten one window into `- {rating}/5: {content}` bullet lines.
fn window_bullets(reviews: &[Review]) -> String {
    reviews
        .iter()
        .map(|r| format!("- {}/5: {}", r.rating, r.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain character cut. Not sentence-aware: a window that exceeds the
/// budget loses its tail mid-line.
fn cut(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn insight_prompt(current: &str, previous: &str) -> String {
    format!(
        r#"Analyze these two weeks of reviews for a business.

Current Week:
{current}

Previous Week:
{previous}

Generate a short 2-sentence summary comparing performance.
Highlight: New complaints, repeated issues, or improvements.
Style: "This week customers complained mostly about..., while...""#
    )
}

/// Generate the week-over-week comparison for two review windows.
///
/// The summary is the provider text verbatim; no length cap or format
/// validation is applied to the reply.
pub async fn compare_windows(
    backend: &dyn GenerationBackend,
    current: &[Review],
    previous: &[Review],
) -> WeeklyInsight {
    let prompt = insight_prompt(
        &cut(&window_bullets(current), defaults::INSIGHT_WINDOW_CHARS),
        &cut(&window_bullets(previous), defaults::INSIGHT_WINDOW_CHARS),
    );
    let request = GenerateRequest::text(prompt).with_temperature(defaults::GEN_TEMPERATURE);

    match backend.generate(&request).await {
        Ok(summary) => WeeklyInsight { summary },
        Err(Error::InferenceUnavailable(reason)) => {
            warn!(
                subsystem = "inference",
                op = "weekly_insight",
                %reason,
                "backend unconfigured, returning missing-key fallback"
            );
            WeeklyInsight {
                summary: defaults::FALLBACK_INSIGHT_MISSING_KEY.to_string(),
            }
        }
        Err(e) => {
            warn!(
                subsystem = "inference",
                op = "weekly_insight",
                error = %e,
                "insight call failed, returning failure fallback"
            );
            WeeklyInsight {
                summary: defaults::FALLBACK_INSIGHT_FAILURE.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use chrono::Utc;

    fn review(rating: i32, content: &str) -> Review {
        Review {
            id: reverb_core::new_v7(),
            rating,
            content: content.to_string(),
            created_at: Utc::now(),
            summary: None,
            suggested_action: None,
            response: None,
            sentiment: None,
            aspects: None,
        }
    }

    /// Extract the current-week block from a captured prompt.
    fn current_block(prompt: &str) -> &str {
        prompt
            .split("Current Week:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\nPrevious Week:").next())
            .unwrap()
    }

    #[tokio::test]
    async fn test_insight_returns_provider_text_verbatim() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("This week customers complained mostly about wait times.");

        let insight = compare_windows(&backend, &[review(4, "Fine")], &[review(2, "Slow")]).await;
        assert_eq!(
            insight.summary,
            "This week customers complained mostly about wait times."
        );
    }

    #[tokio::test]
    async fn test_insight_prompt_contains_both_windows_as_bullets() {
        let backend = MockGenerationBackend::new();

        compare_windows(
            &backend,
            &[review(5, "Great pasta"), review(3, "Average visit")],
            &[review(1, "Cold food")],
        )
        .await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let prompt = &calls[0].prompt;
        assert!(prompt.contains("- 5/5: Great pasta\n- 3/5: Average visit"));
        assert!(prompt.contains("- 1/5: Cold food"));
        assert!(prompt.contains("Current Week:"));
        assert!(prompt.contains("Previous Week:"));
        assert!(!calls[0].json_response);
        assert_eq!(calls[0].temperature, Some(defaults::GEN_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_insight_cuts_each_window_independently() {
        let backend = MockGenerationBackend::new();

        let long = "x".repeat(5000);
        compare_windows(&backend, &[review(5, &long)], &[review(1, "short")]).await;

        let calls = backend.calls();
        let block = current_block(&calls[0].prompt);
        assert_eq!(block.chars().count(), defaults::INSIGHT_WINDOW_CHARS);
        // The untruncated side is untouched.
        assert!(calls[0].prompt.contains("- 1/5: short"));
    }

    #[tokio::test]
    async fn test_insight_empty_windows_still_prompt() {
        let backend = MockGenerationBackend::new().with_fixed_response("Quiet fortnight.");

        let insight = compare_windows(&backend, &[], &[]).await;
        assert_eq!(insight.summary, "Quiet fortnight.");

        let calls = backend.calls();
        assert!(calls[0].prompt.contains("Current Week:"));
    }

    #[tokio::test]
    async fn test_insight_unconfigured_fallback() {
        let backend = MockGenerationBackend::unconfigured();

        let insight = compare_windows(&backend, &[review(4, "ok")], &[]).await;
        assert_eq!(insight.summary, defaults::FALLBACK_INSIGHT_MISSING_KEY);
    }

    #[tokio::test]
    async fn test_insight_failure_fallback() {
        let backend = MockGenerationBackend::new().with_failure();

        let insight = compare_windows(&backend, &[review(4, "ok")], &[]).await;
        assert_eq!(insight.summary, defaults::FALLBACK_INSIGHT_FAILURE);
    }
}

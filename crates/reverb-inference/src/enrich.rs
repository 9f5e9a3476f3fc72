//! Review enrichment.
//!
//! Sends one review through the generation backend and maps whatever
//! happens onto an [`EnrichmentOutcome`]. This function never fails:
//! review intake must not depend on the AI provider being up, so every
//! error path collapses into a fallback result the caller can store.

use tracing::warn;

use reverb_core::{
    defaults, EnrichmentOutcome, EnrichmentResult, Error, GenerateRequest, GenerationBackend,
};

/// Build the enrichment prompt for one review.
fn enrichment_prompt(rating: i32, content: &str) -> String {
    format!(
        r#"You are a helpful assistant for a business.
A user has left a review with rating {rating}/5 and text: "{content}".

Please generate a valid JSON object with the following fields:
1. "summary": A concise summary of the review (max 15 words).
2. "suggestedAction": A recommended short action for the admin (max 10 words).
3. "response": A polite, professional response to the user.
4. "sentiment": One of "Positive", "Neutral", "Negative".
5. "aspects": A JSON list of relevant aspects mentioned (e.g., ["Service", "Food", "Ambience", "Time", "Price"]). return [] if none.

Return ONLY the valid JSON, no markdown formatting."#
    )
}

/// Enrich one review through the backend.
///
/// The three outcomes map one-to-one onto the fallback families:
/// - backend unconfigured: `Unavailable` carrying the missing-key copy
/// - call or parse failure: `Failed` carrying the failure copy
/// - valid reply: `Enriched` carrying the provider fields verbatim
pub async fn enrich_review(
    backend: &dyn GenerationBackend,
    rating: i32,
    content: &str,
) -> EnrichmentOutcome {
    let request = GenerateRequest::json(enrichment_prompt(rating, content))
        .with_temperature(defaults::GEN_TEMPERATURE);

    let raw = match backend.generate(&request).await {
        Ok(raw) => raw,
        Err(Error::InferenceUnavailable(reason)) => {
            warn!(
                subsystem = "inference",
                op = "enrich",
                %reason,
                "backend unconfigured, storing missing-key fallback"
            );
            return EnrichmentOutcome::Unavailable(EnrichmentResult::missing_key());
        }
        Err(e) => {
            warn!(
                subsystem = "inference",
                op = "enrich",
                error = %e,
                "enrichment call failed, storing failure fallback"
            );
            return EnrichmentOutcome::Failed(EnrichmentResult::failure());
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .as_ref()
        .and_then(EnrichmentResult::from_value)
    {
        Some(result) => EnrichmentOutcome::Enriched(result),
        None => {
            warn!(
                subsystem = "inference",
                op = "enrich",
                response_len = raw.len(),
                "enrichment reply was not the expected JSON shape, storing failure fallback"
            );
            EnrichmentOutcome::Failed(EnrichmentResult::failure())
        }
    }
}

//! Typed enrichment results and the outcome state machine.
//!
//! Provider output is parsed into [`EnrichmentResult`] and validated as a
//! whole before anything is stored: either every required field is present
//! and the result is trusted, or the entire payload is discarded in favor of
//! the failure fallback. There is no partial merge of half-parsed output.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::defaults;

/// The five enrichment fields produced for a review.
///
/// `summary`, `suggested_action`, and `response` are always present (real
/// provider output or fallback copy). `sentiment` and `aspects` are absent
/// on the fallback paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub summary: String,
    pub suggested_action: String,
    pub response: String,
    pub sentiment: Option<String>,
    pub aspects: Option<Vec<String>>,
}

impl EnrichmentResult {
    /// Fixed result stored when no API key is configured.
    pub fn missing_key() -> Self {
        Self {
            summary: defaults::FALLBACK_SUMMARY_MISSING_KEY.to_string(),
            suggested_action: defaults::FALLBACK_ACTION_MISSING_KEY.to_string(),
            response: defaults::FALLBACK_RESPONSE_MISSING_KEY.to_string(),
            sentiment: None,
            aspects: None,
        }
    }

    /// Fixed result stored when the provider call or parse fails.
    pub fn failure() -> Self {
        Self {
            summary: defaults::FALLBACK_SUMMARY_FAILURE.to_string(),
            suggested_action: defaults::FALLBACK_ACTION_FAILURE.to_string(),
            response: defaults::FALLBACK_RESPONSE_FAILURE.to_string(),
            sentiment: None,
            aspects: None,
        }
    }

    /// Validate a parsed provider payload into a typed result.
    ///
    /// Returns `None` when any of the three required string fields is
    /// missing or not a string; the caller then falls back to
    /// [`EnrichmentResult::failure`]. An `aspects` value that is present
    /// but not a list (or missing entirely) coerces to an empty list;
    /// non-string elements are dropped.
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        let summary = value.get("summary")?.as_str()?.to_string();
        let suggested_action = value.get("suggestedAction")?.as_str()?.to_string();
        let response = value.get("response")?.as_str()?.to_string();

        let sentiment = value
            .get("sentiment")
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        let aspects = match value.get("aspects") {
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Some(Self {
            summary,
            suggested_action,
            response,
            sentiment,
            aspects: Some(aspects),
        })
    }
}

/// How an enrichment attempt concluded.
///
/// Every variant carries the result to merge into the review, so the
/// pipeline handles all three the same way and only the logged state
/// differs.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// The provider returned a valid payload.
    Enriched(EnrichmentResult),
    /// No API key is configured; the missing-key fallback applies.
    Unavailable(EnrichmentResult),
    /// The call, timeout, or parse failed; the failure fallback applies.
    Failed(EnrichmentResult),
}

impl EnrichmentOutcome {
    /// The result to merge, regardless of how the attempt concluded.
    pub fn result(&self) -> &EnrichmentResult {
        match self {
            Self::Enriched(r) | Self::Unavailable(r) | Self::Failed(r) => r,
        }
    }

    /// Consume the outcome, yielding the result to merge.
    pub fn into_result(self) -> EnrichmentResult {
        match self {
            Self::Enriched(r) | Self::Unavailable(r) | Self::Failed(r) => r,
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched(_))
    }

    /// Label for structured logs.
    pub fn state(&self) -> &'static str {
        match self {
            Self::Enriched(_) => "enriched",
            Self::Unavailable(_) => "unavailable",
            Self::Failed(_) => "failed",
        }
    }
}

//! Centralized default constants for the reverb system.
//!
//! **This module is the single source of truth** for all shared default values
//! and for the fixed fallback copy the enrichment pipeline emits when the AI
//! backend is unconfigured or fails. All crates should reference these
//! constants instead of defining their own magic values.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for the review list endpoint.
pub const PAGE_LIMIT: i64 = 20;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Seconds between database pool utilization snapshots in the API server.
pub const POOL_METRICS_INTERVAL_SECS: u64 = 60;

// =============================================================================
// AUTH
// =============================================================================

/// Prefix for opaque bearer tokens (identifies the token family in logs
/// and support tickets without revealing the secret).
pub const TOKEN_PREFIX: &str = "rv_";

/// Random characters in a bearer token after the prefix.
pub const TOKEN_LENGTH: usize = 48;

/// Default access token lifetime in minutes.
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Username of the bootstrap admin created on first start.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Password of the bootstrap admin created on first start. Deployments are
/// expected to rotate this immediately; startup logs a warning when it is
/// created.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "password123";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Groq (OpenAI-compatible) API base URL.
pub const GROQ_URL: &str = "https://api.groq.com/openai/v1";

/// Default generation model name.
pub const GEN_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature for all generation calls.
pub const GEN_TEMPERATURE: f32 = 0.5;

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// PROMPT WINDOWS
// =============================================================================

/// Days covered by each weekly insight window.
pub const INSIGHT_WINDOW_DAYS: i64 = 7;

/// Hard character cap for each flattened review window in the weekly
/// insight prompt. A plain character cut, not sentence-aware.
pub const INSIGHT_WINDOW_CHARS: usize = 2000;

/// Reviews included in the monthly report excerpt.
pub const REPORT_EXCERPT_REVIEWS: usize = 30;

/// Hard character cap for the flattened monthly report excerpt.
pub const REPORT_EXCERPT_CHARS: usize = 3000;

// =============================================================================
// FALLBACK COPY
// =============================================================================
// The exact strings stored or returned when enrichment cannot run. These are
// contractual output, not placeholders: dashboards and downstream tooling
// match on them, so changing one is a breaking change.

/// Review summary when no API key is configured.
pub const FALLBACK_SUMMARY_MISSING_KEY: &str = "AI Summary Unavailable (Missing Key)";

/// Suggested action when no API key is configured.
pub const FALLBACK_ACTION_MISSING_KEY: &str = "Check manually";

/// Customer response when no API key is configured.
pub const FALLBACK_RESPONSE_MISSING_KEY: &str = "Thank you for your feedback.";

/// Review summary when the enrichment call or parse fails.
pub const FALLBACK_SUMMARY_FAILURE: &str = "Error processing review";

/// Suggested action when the enrichment call or parse fails.
pub const FALLBACK_ACTION_FAILURE: &str = "Manual review required";

/// Customer response when the enrichment call or parse fails.
pub const FALLBACK_RESPONSE_FAILURE: &str = "Thank you for your review (System Error).";

/// Weekly insight body when no API key is configured.
pub const FALLBACK_INSIGHT_MISSING_KEY: &str = "AI Insights unavailable (key missing).";

/// Weekly insight body when the generation call fails.
pub const FALLBACK_INSIGHT_FAILURE: &str = "Could not generate insight.";

/// Monthly report executive summary when narrative generation cannot run.
pub const FALLBACK_REPORT_SUMMARY: &str = "AI Summary unavailable";

/// Monthly report section body when narrative generation cannot run.
pub const FALLBACK_REPORT_SECTION: &str = "N/A";

/// Error message for a report month with no reviews.
pub const NO_DATA_MESSAGE: &str = "No data for this month";

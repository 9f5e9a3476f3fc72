//! Canonical structured-log field names.
//!
//! Log queries only stay useful when every crate spells a field the same
//! way. The canonical spellings are recorded here; call sites must match
//! them by hand because `tracing` field names are bare identifiers at the
//! macro site.
//!
//! Level contract for the workspace:
//!
//! * `ERROR` - the service degraded and an operator should look
//! * `WARN`  - something failed but a fallback covered it
//! * `INFO`  - lifecycle events and per-operation completions
//! * `DEBUG` - inputs, decisions, and sizing detail
//! * `TRACE` - per-row noise, enabled only for local debugging

// --- Correlation ------------------------------------------------------------

/// Request correlation ID, a UUIDv7 minted at the HTTP edge.
pub const REQUEST_ID: &str = "request_id";

/// Crate-level origin: "api", "pipeline", "analytics", "inference", "db".
pub const SUBSYSTEM: &str = "subsystem";

/// Named unit inside a subsystem, e.g. "pool" or "groq".
pub const COMPONENT: &str = "component";

/// Operation underway, e.g. "ingest" or "monthly_report".
pub const OPERATION: &str = "op";

// --- Entities ---------------------------------------------------------------

/// UUID of the review in flight.
pub const REVIEW_ID: &str = "review_id";

/// Admin username on auth events. Never the secret itself.
pub const USERNAME: &str = "username";

/// Month key in `YYYY-MM` form.
pub const MONTH: &str = "month";

/// Submitted star rating.
pub const RATING: &str = "rating";

// --- Measurements -----------------------------------------------------------

/// Elapsed wall-clock milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Rows returned or considered by the operation.
pub const RESULT_COUNT: &str = "result_count";

/// Prompt size in bytes.
pub const PROMPT_LEN: &str = "prompt_len";

/// Completion size in bytes.
pub const RESPONSE_LEN: &str = "response_len";

/// Open connections in the database pool.
pub const POOL_SIZE: &str = "pool_size";

/// Idle connections in the database pool.
pub const POOL_IDLE: &str = "pool_idle";

// --- Inference --------------------------------------------------------------

/// Model identifier sent to the provider.
pub const MODEL: &str = "model";

/// Terminal state of an enrichment attempt: "enriched", "unavailable",
/// or "failed".
pub const ENRICHMENT_STATE: &str = "enrichment_state";

// --- Failures ---------------------------------------------------------------

/// Human-readable error rendering attached to WARN and ERROR events.
pub const ERROR_MSG: &str = "error";

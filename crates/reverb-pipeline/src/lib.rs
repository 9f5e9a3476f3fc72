//! Review pipeline services.
//!
//! Ties storage and inference together behind three small services:
//!
//! - [`ReviewIngestor`] stores a review, then enriches it best-effort
//! - [`InsightGenerator`] compares the last two seven-day windows
//! - [`ReportAssembler`] builds the monthly report document
//!
//! All three take `Arc<dyn ReviewRepository>` and
//! `Arc<dyn GenerationBackend>`, so the HTTP layer and tests wire them
//! identically against Postgres or in-memory fakes.

pub mod ingest;
pub mod insight;
pub mod report;

#[cfg(test)]
pub mod testing;

// Re-export commonly used types from core
pub use reverb_core::*;

pub use ingest::ReviewIngestor;
pub use insight::InsightGenerator;
pub use report::ReportAssembler;

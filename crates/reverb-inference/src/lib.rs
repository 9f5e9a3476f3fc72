//! # reverb-inference
//!
//! LLM generation backend and prompt units for reverb.
//!
//! This crate provides:
//! - Groq-compatible chat completion backend (works against any
//!   OpenAI-style endpoint)
//! - Review enrichment: summary, suggested action, reply draft,
//!   sentiment, aspects
//! - Week-over-week insight comparison
//! - Monthly report narrative generation
//! - Mock backend for deterministic tests (feature `mock`)
//!
//! All three prompt units are total functions over backend behavior:
//! an unconfigured backend, a dead endpoint, and garbage output each map
//! to fixed fallback copy instead of an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use reverb_inference::{enrich_review, GroqBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = GroqBackend::from_env().unwrap();
//!     let outcome = enrich_review(&backend, 2, "The soup was cold.").await;
//!     println!("{}", outcome.result().summary);
//! }
//! ```

pub mod enrich;
pub mod groq;
pub mod insight;
pub mod narrative;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use reverb_core::*;

pub use enrich::enrich_review;
pub use groq::{GroqBackend, GroqConfig};
pub use insight::compare_windows;
pub use narrative::monthly_narrative;

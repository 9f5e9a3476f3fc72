//! # reverb-analytics
//!
//! Dashboard aggregation for reverb.
//!
//! This crate provides:
//! - Dashboard metrics (total, mean rating, star distribution, monthly
//!   trend) over a filtered review set
//! - Rating-derived sentiment banding shared by the trend, the monthly
//!   report, and the seed tooling
//!
//! Everything here is a pure function over `&[Review]`. Filtering and
//! storage stay in `reverb-db`; report assembly stays in
//! `reverb-pipeline`.

pub mod dashboard;

// Re-export core types
pub use reverb_core::*;

pub use dashboard::{aggregate, sentiment_label, sentiment_tallies};

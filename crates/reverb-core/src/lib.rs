//! # reverb-core
//!
//! Core types, traits, and abstractions for the reverb review platform.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other reverb crates depend on.

pub mod defaults;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use enrichment::{EnrichmentOutcome, EnrichmentResult};
pub use error::{Error, Result};
pub use filter::{month_key, ReviewFilter};
pub use models::*;
pub use traits::*;
pub use uuid_utils::{is_v7, new_v7};

//! Core traits for reverb abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enrichment::EnrichmentResult;
use crate::error::Result;
use crate::filter::ReviewFilter;
use crate::models::*;

// =============================================================================
// REVIEW REPOSITORY TRAITS
// =============================================================================

/// Request for creating a new review.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    /// Star rating, 1-5 inclusive.
    pub rating: i32,
    pub content: String,
    /// Override for the creation instant; defaults to now (UTC).
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request for listing reviews.
#[derive(Debug, Clone, Default)]
pub struct ListReviewsRequest {
    /// Constraints applied before pagination.
    pub filter: ReviewFilter,
    /// Maximum results
    pub limit: Option<i64>,
    /// Pagination offset
    pub offset: Option<i64>,
}

/// Response for listing reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReviewsResponse {
    pub reviews: Vec<Review>,
    /// Total matching reviews before pagination.
    pub total: i64,
}

/// Repository for review storage.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a raw review. Enrichment fields start absent.
    async fn insert(&self, req: CreateReviewRequest) -> Result<Review>;

    /// Fetch a review by ID.
    async fn get(&self, id: Uuid) -> Result<Review>;

    /// Merge an enrichment result into a review, leaving the raw fields
    /// untouched. Returns the updated review.
    async fn apply_enrichment(&self, id: Uuid, result: &EnrichmentResult) -> Result<Review>;

    /// All reviews matching the filter, in creation order.
    async fn scan(&self, filter: &ReviewFilter) -> Result<Vec<Review>>;

    /// One filtered page, newest first.
    async fn list(&self, req: ListReviewsRequest) -> Result<ListReviewsResponse>;

    /// Reviews created in `[start, end)`, in creation order.
    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>)
        -> Result<Vec<Review>>;

    /// Check if a review exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// ADMIN NOTE REPOSITORY TRAITS
// =============================================================================

/// Request for attaching an internal note to a review.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateAdminNoteRequest {
    pub content: String,
    /// Author, when known.
    #[serde(default)]
    pub admin_id: Option<Uuid>,
}

/// Repository for internal notes on reviews.
#[async_trait]
pub trait AdminNoteRepository: Send + Sync {
    /// Attach a note to a review. Fails with `Error::ReviewNotFound` when
    /// the review does not exist.
    async fn insert(&self, review_id: Uuid, req: CreateAdminNoteRequest) -> Result<AdminNote>;

    /// Notes for a review, newest first.
    async fn list_for_review(&self, review_id: Uuid) -> Result<Vec<AdminNote>>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// A single text-generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Sampling temperature; provider default when absent.
    pub temperature: Option<f32>,
    /// Ask the provider to return a single JSON object.
    pub json_response: bool,
}

impl GenerateRequest {
    /// Plain-text generation.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            json_response: false,
        }
    }

    /// JSON-object generation.
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            json_response: true,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for the given request.
    ///
    /// Fails with `Error::InferenceUnavailable` when no credential is
    /// configured; callers translate that into their fixed fallbacks.
    async fn generate(&self, req: &GenerateRequest) -> Result<String>;

    /// Whether a credential is configured.
    fn is_configured(&self) -> bool;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

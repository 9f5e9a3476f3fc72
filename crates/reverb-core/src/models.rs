//! Core data models for reverb.
//!
//! These types are shared across all reverb crates and represent the core
//! domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// =============================================================================
// REVIEW TYPES
// =============================================================================

/// A customer review with its optional AI enrichment.
///
/// The raw fields (`rating`, `content`, `created_at`) are immutable after
/// insert. The enrichment fields are `None` until the enrichment phase has
/// run and are written at most once; readers may observe the review in its
/// un-enriched state between the two phases.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Review {
    pub id: Uuid,
    /// Star rating, 1-5 inclusive.
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// AI summary of the review (max ~15 words when generated).
    pub summary: Option<String>,
    /// AI-suggested operational follow-up.
    pub suggested_action: Option<String>,
    /// AI-drafted reply to the customer.
    pub response: Option<String>,
    /// Provider sentiment label ("Positive", "Neutral", "Negative").
    pub sentiment: Option<String>,
    /// Business aspects mentioned (e.g. "Service", "Food").
    pub aspects: Option<Vec<String>>,
}

impl Review {
    /// Whether the enrichment phase has written this review.
    pub fn is_enriched(&self) -> bool {
        self.summary.is_some()
    }
}

// =============================================================================
// ADMIN TYPES
// =============================================================================

/// An operator account. Only the password hash is stored; it never
/// serializes into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    #[schema(write_only)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An internal note an operator attached to a review. Never shown to the
/// review author.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct AdminNote {
    pub id: Uuid,
    pub review_id: Uuid,
    pub admin_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// ANALYTICS TYPES
// =============================================================================

/// Rating and sentiment aggregates for one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MonthlyTrendPoint {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub count: i64,
    /// Mean rating for the month, rounded to 2 decimals.
    pub avg_rating: f64,
    /// Reviews rated 4 or 5.
    pub positive: i64,
    /// Reviews rated exactly 3.
    pub neutral: i64,
    /// Reviews rated 1 or 2.
    pub negative: i64,
}

/// Aggregate metrics over a set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DashboardMetrics {
    pub total_reviews: i64,
    /// Mean rating rounded to 2 decimals; 0.0 when there are no reviews.
    pub average_rating: f64,
    /// Count per star rating. All five keys 1-5 are always present.
    pub rating_distribution: BTreeMap<i32, i64>,
    /// Per-month aggregates in ascending month order.
    pub monthly_trend: Vec<MonthlyTrendPoint>,
}

/// Sentiment counts banded from ratings (>=4 positive, ==3 neutral,
/// <=2 negative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SentimentTallies {
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

// =============================================================================
// INSIGHT AND REPORT TYPES
// =============================================================================

/// Narrative comparison of the last two seven-day review windows.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WeeklyInsight {
    pub summary: String,
}

/// The four narrative fields of a monthly report, produced by the AI
/// backend or filled with fixed placeholders when it cannot run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReportNarrative {
    pub summary: String,
    pub complaints: String,
    pub highlights: String,
    pub actions: String,
}

/// One titled section of a monthly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
}

/// A fully assembled monthly report, ready for rendering by a client.
///
/// Section order is fixed: AI Executive Summary, Top Complaints, Positive
/// Highlights, Recommended Actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReportDocument {
    /// `Monthly Report: {month}`
    pub title: String,
    /// `Total Reviews: {n}   |   Average Rating: {avg} / 5`
    pub summary_line: String,
    /// `Sentiment: {p} Positive, {n} Neutral, {m} Negative`
    pub sentiment_line: String,
    pub sections: Vec<ReportSection>,
}

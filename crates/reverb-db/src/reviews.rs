//! Review repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use reverb_core::{
    new_v7, CreateReviewRequest, EnrichmentResult, Error, ListReviewsRequest, ListReviewsResponse,
    Result, Review, ReviewFilter, ReviewRepository,
};

/// Request for inserting a pre-labeled review, used by fixture loaders.
///
/// Unlike [`CreateReviewRequest`] this may carry sentiment, aspects, and a
/// canned response up front, standing in for the enrichment phase.
#[derive(Debug, Clone)]
pub struct SeedReviewRequest {
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sentiment: Option<String>,
    pub aspects: Option<Vec<String>>,
    pub response: Option<String>,
}

/// PostgreSQL implementation of ReviewRepository.
///
/// Filter semantics live entirely in [`ReviewFilter::matches`]; `scan`
/// fetches candidate rows in creation order and applies the predicate
/// in-process, so SQL and the pure predicate can never disagree.
pub struct PgReviewRepository {
    pool: Pool<Postgres>,
}

impl PgReviewRepository {
    /// Create a new PgReviewRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Total stored reviews, unfiltered.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }

    /// Insert a review that already carries labels, bypassing enrichment.
    pub async fn insert_seeded(&self, req: SeedReviewRequest) -> Result<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"INSERT INTO review (id, rating, content, created_at, response, sentiment, aspects)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, rating, content, created_at,
                         summary, suggested_action, response, sentiment, aspects"#,
        )
        .bind(new_v7())
        .bind(req.rating)
        .bind(&req.content)
        .bind(req.created_at)
        .bind(&req.response)
        .bind(&req.sentiment)
        .bind(&req.aspects)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(review)
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn insert(&self, req: CreateReviewRequest) -> Result<Review> {
        let created_at = req.created_at.unwrap_or_else(Utc::now);

        let review = sqlx::query_as::<_, Review>(
            r#"INSERT INTO review (id, rating, content, created_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, rating, content, created_at,
                         summary, suggested_action, response, sentiment, aspects"#,
        )
        .bind(new_v7())
        .bind(req.rating)
        .bind(&req.content)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(review)
    }

    async fn get(&self, id: Uuid) -> Result<Review> {
        sqlx::query_as::<_, Review>(
            r#"SELECT id, rating, content, created_at,
                      summary, suggested_action, response, sentiment, aspects
               FROM review WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::ReviewNotFound(id))
    }

    async fn apply_enrichment(&self, id: Uuid, result: &EnrichmentResult) -> Result<Review> {
        sqlx::query_as::<_, Review>(
            r#"UPDATE review
               SET summary = $2, suggested_action = $3, response = $4,
                   sentiment = $5, aspects = $6
               WHERE id = $1
               RETURNING id, rating, content, created_at,
                         summary, suggested_action, response, sentiment, aspects"#,
        )
        .bind(id)
        .bind(&result.summary)
        .bind(&result.suggested_action)
        .bind(&result.response)
        .bind(&result.sentiment)
        .bind(&result.aspects)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::ReviewNotFound(id))
    }

    async fn scan(&self, filter: &ReviewFilter) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            r#"SELECT id, rating, content, created_at,
                      summary, suggested_action, response, sentiment, aspects
               FROM review ORDER BY id ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn list(&self, req: ListReviewsRequest) -> Result<ListReviewsResponse> {
        let limit = req.limit.unwrap_or(reverb_core::defaults::PAGE_LIMIT).max(0) as usize;
        let offset = req.offset.unwrap_or(reverb_core::defaults::PAGE_OFFSET).max(0) as usize;

        let mut matching = self.scan(&req.filter).await?;
        matching.reverse(); // newest first
        let total = matching.len() as i64;

        let reviews = matching.into_iter().skip(offset).take(limit).collect();
        Ok(ListReviewsResponse { reviews, total })
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            r#"SELECT id, rating, content, created_at,
                      summary, suggested_action, response, sentiment, aspects
               FROM review
               WHERE created_at >= $1 AND created_at < $2
               ORDER BY id ASC"#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM review WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }
}

//! In-memory repository for pipeline tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use reverb_core::{
    defaults, new_v7, CreateReviewRequest, EnrichmentResult, Error, ListReviewsRequest,
    ListReviewsResponse, Result, Review, ReviewFilter, ReviewRepository,
};

/// In-memory `ReviewRepository` with failure injection.
///
/// Rows live in insertion order, which doubles as creation order for
/// the scan contract.
#[derive(Default)]
pub struct InMemoryReviewRepository {
    rows: Mutex<Vec<Review>>,
    fail_inserts: AtomicBool,
    fail_enrichment_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent inserts fail with a storage error.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    /// Make subsequent enrichment merges fail with a storage error.
    pub fn fail_enrichment_writes(&self) {
        self.fail_enrichment_writes.store(true, Ordering::SeqCst);
    }

    /// Make subsequent reads fail with a storage error.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Internal("injected read failure".to_string()));
        }
        Ok(())
    }

    /// Seed a row directly, bypassing the insert path.
    pub fn push(&self, review: Review) {
        self.rows.lock().unwrap().push(review);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, req: CreateReviewRequest) -> Result<Review> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Error::Internal("injected insert failure".to_string()));
        }
        let review = Review {
            id: new_v7(),
            rating: req.rating,
            content: req.content,
            created_at: req.created_at.unwrap_or_else(Utc::now),
            summary: None,
            suggested_action: None,
            response: None,
            sentiment: None,
            aspects: None,
        };
        self.rows.lock().unwrap().push(review.clone());
        Ok(review)
    }

    async fn get(&self, id: Uuid) -> Result<Review> {
        self.check_reads()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(Error::ReviewNotFound(id))
    }

    async fn apply_enrichment(&self, id: Uuid, result: &EnrichmentResult) -> Result<Review> {
        if self.fail_enrichment_writes.load(Ordering::SeqCst) {
            return Err(Error::Internal(
                "injected enrichment write failure".to_string(),
            ));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::ReviewNotFound(id))?;
        row.summary = Some(result.summary.clone());
        row.suggested_action = Some(result.suggested_action.clone());
        row.response = Some(result.response.clone());
        row.sentiment = result.sentiment.clone();
        row.aspects = result.aspects.clone();
        Ok(row.clone())
    }

    async fn scan(&self, filter: &ReviewFilter) -> Result<Vec<Review>> {
        self.check_reads()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn list(&self, req: ListReviewsRequest) -> Result<ListReviewsResponse> {
        let mut matching = self.scan(&req.filter).await?;
        let total = matching.len() as i64;
        matching.reverse();
        let offset = req.offset.unwrap_or(defaults::PAGE_OFFSET).max(0) as usize;
        let limit = req.limit.unwrap_or(defaults::PAGE_LIMIT).max(0) as usize;
        let reviews = matching.into_iter().skip(offset).take(limit).collect();
        Ok(ListReviewsResponse { reviews, total })
    }

    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Review>> {
        self.check_reads()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.created_at >= start && r.created_at < end)
            .cloned()
            .collect())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|r| r.id == id))
    }
}

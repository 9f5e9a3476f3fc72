//! Two-phase review ingest.
//!
//! Phase one persists the raw review and must succeed for the request
//! to succeed. Phase two enriches and merges, and nothing in it can
//! fail the request: a review is durable the moment phase one commits,
//! with the enrichment fields catching up (or falling back) afterwards.

use std::sync::Arc;

use tracing::{info, warn};

use reverb_core::{
    CreateReviewRequest, Error, GenerationBackend, Result, Review, ReviewRepository,
};
use reverb_inference::enrich_review;

/// Ingests one review: durable insert, then best-effort enrichment.
pub struct ReviewIngestor {
    reviews: Arc<dyn ReviewRepository>,
    backend: Arc<dyn GenerationBackend>,
}

impl ReviewIngestor {
    pub fn new(reviews: Arc<dyn ReviewRepository>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { reviews, backend }
    }

    /// Ingest one review.
    ///
    /// Returns the enriched review when the merge lands, otherwise the
    /// raw phase-one review. The only error paths are input validation
    /// and the phase-one insert itself.
    pub async fn ingest(&self, req: CreateReviewRequest) -> Result<Review> {
        if !(1..=5).contains(&req.rating) {
            return Err(Error::InvalidInput(format!(
                "rating must be between 1 and 5, got {}",
                req.rating
            )));
        }

        // Phase one: durable insert. Errors propagate.
        let review = self.reviews.insert(req).await?;
        info!(
            subsystem = "pipeline",
            op = "ingest",
            review_id = %review.id,
            rating = review.rating,
            "review stored"
        );

        // Phase two: enrichment always concludes with a result; only
        // the merge write can fail, and that must not lose the review
        // already stored.
        let outcome = enrich_review(self.backend.as_ref(), review.rating, &review.content).await;
        match self
            .reviews
            .apply_enrichment(review.id, outcome.result())
            .await
        {
            Ok(enriched) => {
                info!(
                    subsystem = "pipeline",
                    op = "ingest",
                    review_id = %enriched.id,
                    enrichment_state = outcome.state(),
                    "enrichment merged"
                );
                Ok(enriched)
            }
            Err(e) => {
                warn!(
                    subsystem = "pipeline",
                    op = "ingest",
                    review_id = %review.id,
                    enrichment_state = outcome.state(),
                    error = %e,
                    "enrichment merge failed, returning raw review"
                );
                Ok(review)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryReviewRepository;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use reverb_core::{defaults, logging};
    use reverb_inference::mock::MockGenerationBackend;
    use tracing_subscriber::layer::SubscriberExt;

    /// Records the field names of every event emitted while installed.
    #[derive(Clone, Default)]
    struct FieldNameRecorder {
        names: Arc<Mutex<Vec<String>>>,
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FieldNameRecorder {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut names = self.names.lock().unwrap();
            for field in event.metadata().fields() {
                names.push(field.name().to_string());
            }
        }
    }

    const VALID_REPLY: &str = r#"{
        "summary": "Loved the pasta",
        "suggestedAction": "Share with kitchen",
        "response": "Thank you for visiting!",
        "sentiment": "Positive",
        "aspects": ["Food"]
    }"#;

    fn request(rating: i32, content: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            rating,
            content: content.to_string(),
            created_at: None,
        }
    }

    fn ingestor(
        repo: Arc<InMemoryReviewRepository>,
        backend: MockGenerationBackend,
    ) -> ReviewIngestor {
        ReviewIngestor::new(repo, Arc::new(backend))
    }

    #[tokio::test]
    async fn test_ingest_enriches_and_returns_merged_review() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(
            repo.clone(),
            MockGenerationBackend::new().with_fixed_response(VALID_REPLY),
        );

        let review = service.ingest(request(5, "Best pasta in town")).await.unwrap();

        assert!(review.is_enriched());
        assert_eq!(review.summary.as_deref(), Some("Loved the pasta"));
        assert_eq!(review.sentiment.as_deref(), Some("Positive"));
        assert_eq!(review.aspects, Some(vec!["Food".to_string()]));
        // Rating and content are untouched by the merge.
        assert_eq!(review.rating, 5);
        assert_eq!(review.content, "Best pasta in town");

        let stored = repo.get(review.id).await.unwrap();
        assert!(stored.is_enriched());
    }

    #[tokio::test]
    async fn test_ingest_rejects_out_of_range_ratings() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(repo.clone(), MockGenerationBackend::new());

        for rating in [0, 6, -1] {
            let err = service.ingest(request(rating, "whatever")).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "rating {rating}");
        }
        // Nothing reached storage.
        assert_eq!(repo.row_count(), 0);
    }

    #[tokio::test]
    async fn test_ingest_insert_failure_propagates() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        repo.fail_inserts();
        let backend = MockGenerationBackend::new();
        let service = ingestor(repo.clone(), backend.clone());

        let result = service.ingest(request(4, "fine")).await;

        assert!(result.is_err());
        // Phase two never runs when phase one fails.
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ingest_unconfigured_backend_stores_missing_key_copy() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(repo.clone(), MockGenerationBackend::unconfigured());

        let review = service.ingest(request(3, "It was okay")).await.unwrap();

        assert_eq!(
            review.summary.as_deref(),
            Some(defaults::FALLBACK_SUMMARY_MISSING_KEY)
        );
        assert_eq!(
            review.suggested_action.as_deref(),
            Some(defaults::FALLBACK_ACTION_MISSING_KEY)
        );
        assert_eq!(
            review.response.as_deref(),
            Some(defaults::FALLBACK_RESPONSE_MISSING_KEY)
        );
        assert!(review.sentiment.is_none());
        assert!(review.aspects.is_none());
    }

    #[tokio::test]
    async fn test_ingest_backend_failure_stores_failure_copy() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(repo.clone(), MockGenerationBackend::new().with_failure());

        let review = service.ingest(request(1, "Awful")).await.unwrap();

        assert_eq!(
            review.summary.as_deref(),
            Some(defaults::FALLBACK_SUMMARY_FAILURE)
        );
        assert_eq!(
            review.response.as_deref(),
            Some(defaults::FALLBACK_RESPONSE_FAILURE)
        );
    }

    #[tokio::test]
    async fn test_ingest_unparseable_reply_stores_failure_copy() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(
            repo.clone(),
            MockGenerationBackend::new().with_fixed_response("not json at all"),
        );

        let review = service.ingest(request(2, "Slow service")).await.unwrap();
        assert_eq!(
            review.summary.as_deref(),
            Some(defaults::FALLBACK_SUMMARY_FAILURE)
        );
    }

    #[tokio::test]
    async fn test_ingest_merge_failure_keeps_phase_one_review() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        repo.fail_enrichment_writes();
        let service = ingestor(
            repo.clone(),
            MockGenerationBackend::new().with_fixed_response(VALID_REPLY),
        );

        let review = service.ingest(request(5, "Great")).await.unwrap();

        // The request still succeeds, returning the raw review.
        assert!(!review.is_enriched());
        assert_eq!(review.rating, 5);
        // And the stored row is the durable phase-one row.
        let stored = repo.get(review.id).await.unwrap();
        assert!(!stored.is_enriched());
    }

    #[tokio::test]
    async fn test_ingest_events_use_canonical_field_names() {
        // Field names are bare identifiers at the macro site, so nothing
        // forces them to match `logging`. Capture the fields of a real
        // ingest run and check the spellings against the canon.
        let recorder = FieldNameRecorder::default();
        let seen = recorder.names.clone();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(recorder));

        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(
            repo,
            MockGenerationBackend::new().with_fixed_response(VALID_REPLY),
        );
        service.ingest(request(4, "Solid brunch")).await.unwrap();

        let seen = seen.lock().unwrap();
        for expected in [
            logging::SUBSYSTEM,
            logging::OPERATION,
            logging::REVIEW_ID,
            logging::RATING,
            logging::ENRICHMENT_STATE,
        ] {
            assert!(
                seen.iter().any(|name| name == expected),
                "no event carried field {expected:?}, saw {seen:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_ingest_honors_created_at_override() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let service = ingestor(
            repo.clone(),
            MockGenerationBackend::new().with_fixed_response(VALID_REPLY),
        );

        let backdated = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let review = service
            .ingest(CreateReviewRequest {
                rating: 4,
                content: "March visit".to_string(),
                created_at: Some(backdated),
            })
            .await
            .unwrap();

        assert_eq!(review.created_at, backdated);
    }
}

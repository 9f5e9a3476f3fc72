//! Weekly insight generation over the trailing fourteen days.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use reverb_core::{defaults, GenerationBackend, Result, ReviewRepository, WeeklyInsight};
use reverb_inference::compare_windows;

/// Compares the last seven days of reviews against the seven before.
pub struct InsightGenerator {
    reviews: Arc<dyn ReviewRepository>,
    backend: Arc<dyn GenerationBackend>,
}

impl InsightGenerator {
    pub fn new(reviews: Arc<dyn ReviewRepository>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { reviews, backend }
    }

    /// Generate the insight for the two windows ending at `now`.
    ///
    /// Windows are half-open, `[now-7d, now)` and `[now-14d, now-7d)`,
    /// so every review lands in at most one of them. Storage errors
    /// propagate; generation problems collapse into fallback copy.
    pub async fn weekly_insight(&self, now: DateTime<Utc>) -> Result<WeeklyInsight> {
        let window = Duration::days(defaults::INSIGHT_WINDOW_DAYS);
        let split = now - window;
        let start = split - window;

        let (current, previous) = futures::try_join!(
            self.reviews.list_between(split, now),
            self.reviews.list_between(start, split),
        )?;

        info!(
            subsystem = "pipeline",
            op = "weekly_insight",
            current_count = current.len(),
            previous_count = previous.len(),
            "comparing review windows"
        );

        Ok(compare_windows(self.backend.as_ref(), &current, &previous).await)
    }
}

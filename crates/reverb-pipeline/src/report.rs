//! Monthly report assembly.
//!
//! Pulls one month of reviews, aggregates the statistics, asks the
//! backend for the narrative, and lays everything out as a structured
//! document. Statistics never depend on the backend: a dead provider
//! still produces a complete report with placeholder narrative copy.

use std::sync::Arc;

use tracing::info;

use reverb_core::{
    defaults, Error, GenerationBackend, ReportDocument, ReportSection, Result, ReviewFilter,
    ReviewRepository,
};
use reverb_inference::monthly_narrative;

/// Assembles the monthly report document.
pub struct ReportAssembler {
    reviews: Arc<dyn ReviewRepository>,
    backend: Arc<dyn GenerationBackend>,
}

impl ReportAssembler {
    pub fn new(reviews: Arc<dyn ReviewRepository>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { reviews, backend }
    }

    /// Assemble the report for `month` (`YYYY-MM`), with optional extra
    /// filter constraints.
    ///
    /// The requested month always overrides any month already in the
    /// filter. A month with no matching reviews is `Error::NoData`.
    pub async fn assemble(&self, month: &str, filter: &ReviewFilter) -> Result<ReportDocument> {
        let mut filter = filter.clone();
        filter.month = Some(month.to_string());

        let reviews = self.reviews.scan(&filter).await?;
        if reviews.is_empty() {
            return Err(Error::NoData(defaults::NO_DATA_MESSAGE.to_string()));
        }

        let metrics = reverb_analytics::aggregate(&reviews);
        let tallies = reverb_analytics::sentiment_tallies(&reviews);
        let narrative = monthly_narrative(self.backend.as_ref(), month, &reviews).await;

        info!(
            subsystem = "pipeline",
            op = "monthly_report",
            month,
            result_count = metrics.total_reviews,
            "assembled monthly report"
        );

        Ok(ReportDocument {
            title: format!("Monthly Report: {month}"),
            summary_line: format!(
                "Total Reviews: {}   |   Average Rating: {:.2} / 5",
                metrics.total_reviews, metrics.average_rating
            ),
            sentiment_line: format!(
                "Sentiment: {} Positive, {} Neutral, {} Negative",
                tallies.positive, tallies.neutral, tallies.negative
            ),
            sections: vec![
                ReportSection {
                    title: "AI Executive Summary".to_string(),
                    body: narrative.summary,
                },
                ReportSection {
                    title: "Top Complaints".to_string(),
                    body: narrative.complaints,
                },
                ReportSection {
                    title: "Positive Highlights".to_string(),
                    body: narrative.highlights,
                },
                ReportSection {
                    title: "Recommended Actions".to_string(),
                    body: narrative.actions,
                },
            ],
        })
    }
}

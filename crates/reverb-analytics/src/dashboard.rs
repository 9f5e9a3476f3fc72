//! Dashboard aggregation.
//!
//! Pure functions over an already-filtered review slice. Callers apply
//! [`reverb_core::ReviewFilter`] first; everything here just counts, so
//! the same functions back the dashboard endpoint, the monthly report
//! statistics, and the seed tooling.

use std::collections::BTreeMap;

use tracing::debug;

use reverb_core::{month_key, DashboardMetrics, MonthlyTrendPoint, Review, SentimentTallies};

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Band a star rating into its sentiment label.
///
/// 4-5 is positive, exactly 3 is neutral, 1-2 is negative.
pub fn sentiment_label(rating: i32) -> &'static str {
    if rating >= 4 {
        "Positive"
    } else if rating == 3 {
        "Neutral"
    } else {
        "Negative"
    }
}

/// Count sentiment bands over a review set.
///
/// Bands come from ratings, not the stored `sentiment` strings, so the
/// three tallies partition the set even when enrichment never ran.
pub fn sentiment_tallies(reviews: &[Review]) -> SentimentTallies {
    let mut tallies = SentimentTallies::default();
    for review in reviews {
        if review.rating >= 4 {
            tallies.positive += 1;
        } else if review.rating == 3 {
            tallies.neutral += 1;
        } else {
            tallies.negative += 1;
        }
    }
    tallies
}

#[derive(Default)]
struct TrendBucket {
    count: i64,
    rating_sum: i64,
    positive: i64,
    neutral: i64,
    negative: i64,
}

/// Aggregate dashboard metrics over a review set.
///
/// An empty set yields zero totals, a 0.0 average, an all-zero
/// distribution, and an empty trend.
pub fn aggregate(reviews: &[Review]) -> DashboardMetrics {
    let total_reviews = reviews.len() as i64;

    let average_rating = if reviews.is_empty() {
        0.0
    } else {
        round2(reviews.iter().map(|r| r.rating as f64).sum::<f64>() / total_reviews as f64)
    };

    // All five star keys are always present so clients can chart the
    // distribution without back-filling gaps. Out-of-range ratings
    // (impossible for validated rows) are ignored rather than growing
    // the key set.
    let mut rating_distribution: BTreeMap<i32, i64> = (1..=5).map(|star| (star, 0)).collect();
    for review in reviews {
        if let Some(slot) = rating_distribution.get_mut(&review.rating) {
            *slot += 1;
        }
    }

    let mut buckets: BTreeMap<String, TrendBucket> = BTreeMap::new();
    for review in reviews {
        let bucket = buckets.entry(month_key(&review.created_at)).or_default();
        bucket.count += 1;
        bucket.rating_sum += review.rating as i64;
        if review.rating >= 4 {
            bucket.positive += 1;
        } else if review.rating == 3 {
            bucket.neutral += 1;
        } else {
            bucket.negative += 1;
        }
    }

    // BTreeMap iterates in key order, and YYYY-MM keys sort
    // chronologically, so the trend comes out ascending.
    let monthly_trend: Vec<MonthlyTrendPoint> = buckets
        .into_iter()
        .map(|(month, bucket)| MonthlyTrendPoint {
            month,
            count: bucket.count,
            avg_rating: round2(bucket.rating_sum as f64 / bucket.count as f64),
            positive: bucket.positive,
            neutral: bucket.neutral,
            negative: bucket.negative,
        })
        .collect();

    debug!(
        subsystem = "analytics",
        op = "dashboard_aggregate",
        result_count = total_reviews,
        months = monthly_trend.len(),
        "aggregated dashboard metrics"
    );

    DashboardMetrics {
        total_reviews,
        average_rating,
        rating_distribution,
        monthly_trend,
    }
}

//! Pure review filtering.
//!
//! [`ReviewFilter`] is the single definition of filter semantics for the
//! list endpoint, the dashboard, and the monthly report. The repository
//! applies it in-process over fetched rows, so there is exactly one
//! implementation to reason about and test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Review;

/// Format a timestamp as its UTC month key (`YYYY-MM`).
pub fn month_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m").to_string()
}

/// Optional review constraints, AND-composed. An absent field imposes no
/// constraint; the default filter matches every review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewFilter {
    /// Matches reviews whose rating **equals** this value. Despite the
    /// name, this is exact equality, not a floor; the name is kept for
    /// wire compatibility with existing clients.
    pub min_rating: Option<i32>,
    /// Case-sensitive substring match against the review content.
    pub search: Option<String>,
    /// UTC month key (`YYYY-MM`) the review was created in.
    pub month: Option<String>,
    /// Exact match against the stored sentiment label. Reviews without a
    /// sentiment never match.
    pub sentiment: Option<String>,
    /// Membership test against the aspect list. Reviews without aspects
    /// never match.
    pub aspect: Option<String>,
}

impl ReviewFilter {
    /// Whether no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.min_rating.is_none()
            && self.search.is_none()
            && self.month.is_none()
            && self.sentiment.is_none()
            && self.aspect.is_none()
    }

    /// Evaluate all set constraints against one review.
    pub fn matches(&self, review: &Review) -> bool {
        if let Some(rating) = self.min_rating {
            if review.rating != rating {
                return false;
            }
        }

        if let Some(search) = &self.search {
            if !review.content.contains(search.as_str()) {
                return false;
            }
        }

        if let Some(month) = &self.month {
            if month_key(&review.created_at) != *month {
                return false;
            }
        }

        if let Some(sentiment) = &self.sentiment {
            if review.sentiment.as_deref() != Some(sentiment.as_str()) {
                return false;
            }
        }

        if let Some(aspect) = &self.aspect {
            let found = review
                .aspects
                .as_ref()
                .is_some_and(|aspects| aspects.iter().any(|a| a == aspect));
            if !found {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn review_at(rating: i32, content: &str, created_at: DateTime<Utc>) -> Review {
        Review {
            id: Uuid::new_v4(),
            rating,
            content: content.to_string(),
            created_at,
            summary: None,
            suggested_action: None,
            response: None,
            sentiment: None,
            aspects: None,
        }
    }

    fn review(rating: i32, content: &str) -> Review {
        review_at(rating, content, Utc::now())
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ReviewFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&review(1, "terrible")));
        assert!(filter.matches(&review(5, "")));
    }

    #[test]
    fn test_min_rating_is_exact_equality_not_floor() {
        let filter = ReviewFilter {
            min_rating: Some(3),
            ..Default::default()
        };
        assert!(filter.matches(&review(3, "ok")));
        assert!(!filter.matches(&review(4, "good")));
        assert!(!filter.matches(&review(5, "great")));
        assert!(!filter.matches(&review(2, "meh")));
    }

    #[test]
    fn test_search_is_case_sensitive_substring() {
        let filter = ReviewFilter {
            search: Some("Service".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&review(4, "Great Service here")));
        assert!(!filter.matches(&review(4, "great service here")));
        assert!(!filter.matches(&review(4, "nothing relevant")));
    }

    #[test]
    fn test_month_selects_exact_utc_month() {
        let filter = ReviewFilter {
            month: Some("2024-03".to_string()),
            ..Default::default()
        };

        let feb_28 = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
        let mar_1 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mar_31 = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let apr_1 = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        assert!(!filter.matches(&review_at(4, "x", feb_28)));
        assert!(filter.matches(&review_at(4, "x", mar_1)));
        assert!(filter.matches(&review_at(4, "x", mar_31)));
        assert!(!filter.matches(&review_at(4, "x", apr_1)));
    }

    #[test]
    fn test_sentiment_requires_stored_label() {
        let filter = ReviewFilter {
            sentiment: Some("Positive".to_string()),
            ..Default::default()
        };

        let mut labeled = review(5, "great");
        labeled.sentiment = Some("Positive".to_string());
        assert!(filter.matches(&labeled));

        labeled.sentiment = Some("Negative".to_string());
        assert!(!filter.matches(&labeled));

        // Raw reviews (no sentiment yet) never match a sentiment filter.
        assert!(!filter.matches(&review(5, "great")));
    }

    #[test]
    fn test_aspect_is_membership_not_substring() {
        let filter = ReviewFilter {
            aspect: Some("Price".to_string()),
            ..Default::default()
        };

        let mut r = review(3, "ok");
        r.aspects = Some(vec!["Price".to_string(), "Food".to_string()]);
        assert!(filter.matches(&r));

        // A list element that merely contains the term is not a match.
        r.aspects = Some(vec!["Price/Value".to_string()]);
        assert!(!filter.matches(&r));

        r.aspects = Some(vec![]);
        assert!(!filter.matches(&r));

        r.aspects = None;
        assert!(!filter.matches(&r));
    }

    #[test]
    fn test_constraints_compose_with_and() {
        let filter = ReviewFilter {
            min_rating: Some(5),
            search: Some("pasta".to_string()),
            sentiment: Some("Positive".to_string()),
            ..Default::default()
        };

        let mut r = review(5, "the pasta was perfect");
        r.sentiment = Some("Positive".to_string());
        assert!(filter.matches(&r));

        // Any single failing constraint rejects the review.
        r.rating = 4;
        assert!(!filter.matches(&r));
        r.rating = 5;
        r.content = "the pizza was perfect".to_string();
        assert!(!filter.matches(&r));
    }

    #[test]
    fn test_month_key_zero_pads() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap();
        assert_eq!(month_key(&ts), "2024-03");
    }
}

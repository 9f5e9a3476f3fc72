//! Reverb Fixture Loader
//!
//! Seeds the database with a built-in sample set of reviews for local
//! development and demos. Seeded reviews carry rating-derived sentiment and
//! random aspects up front, standing in for the enrichment phase.
//!
//! Usage:
//!   cargo run --bin reverb-seed
//!   cargo run --bin reverb-seed -- --force

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use reverb_analytics::sentiment_label;
use reverb_db::{Database, SeedReviewRequest};

/// Aspects assigned to seeded reviews, 1-3 per review.
const ASPECT_POOL: [&str; 6] = [
    "Food",
    "Service",
    "Ambience",
    "Price",
    "Cleanliness",
    "Location",
];

/// Built-in sample set: (rating, content).
const SAMPLE_REVIEWS: [(i32, &str); 24] = [
    (
        5,
        "Absolutely loved the tasting menu. Every course was a surprise and the staff walked us through each one.",
    ),
    (
        5,
        "Best brunch spot in the neighborhood. The shakshuka is perfect and the coffee is strong.",
    ),
    (
        5,
        "Celebrated our anniversary here. The candlelit patio and the live guitar made the night.",
    ),
    (
        5,
        "The new chef has transformed the menu. The lamb was cooked perfectly and the wine pairing was spot on.",
    ),
    (
        5,
        "Quick lunch turned into a two-hour stay. Great playlist, friendly servers, and the burrata is unreal.",
    ),
    (
        5,
        "The bakery counter alone is worth the visit. Warm sourdough and a flat white, perfect morning.",
    ),
    (
        4,
        "Solid dinner overall. The pasta was excellent, though we waited a bit for the table despite booking.",
    ),
    (
        4,
        "Great value lunch menu. Portions are generous; the dining room gets loud at peak hours.",
    ),
    (
        4,
        "Really enjoyed the ramen. Would love more vegetarian options on the menu.",
    ),
    (
        4,
        "Friendly staff and fast service. Parking nearby is tricky on weekends.",
    ),
    (
        4,
        "Tasty food and a nice view from the terrace. Dessert list is a little short.",
    ),
    (
        4,
        "The seasonal specials keep things interesting. Prices crept up since last year though.",
    ),
    (3, "Average experience. The food was fine but nothing stood out."),
    (
        3,
        "Decent portions, slow kitchen. Our mains arrived twenty minutes apart.",
    ),
    (3, "Nice interior, mediocre food. The soup was lukewarm."),
    (3, "Okay for a quick bite. Wouldn't make a special trip."),
    (
        2,
        "Waited forty minutes for cold fries. The server was apologetic but the kitchen seemed overwhelmed.",
    ),
    (
        2,
        "Overpriced for what you get. My steak was ordered medium and arrived well done.",
    ),
    (
        2,
        "The table was sticky and the restroom needed attention. Food was passable.",
    ),
    (
        2,
        "Loud music made conversation impossible, and the order came out wrong twice.",
    ),
    (
        1,
        "Terrible experience. Reservation lost, hour-long wait, and the pizza arrived burnt.",
    ),
    (
        1,
        "Found a hair in my salad and the manager shrugged it off. Not coming back.",
    ),
    (
        1,
        "Card machine was down, the waiter was rude about it, and the soup tasted like salt water.",
    ),
    (
        1,
        "Cold food, warm beer, and a bill with items we never ordered.",
    ),
];

fn print_help() {
    println!(
        r#"
Reverb Fixture Loader

Usage: cargo run --bin reverb-seed -- [OPTIONS]

Options:
  --force     Seed even when reviews already exist
  -h, --help  Print help

Environment Variables:
  DATABASE_URL  Postgres connection string (default: postgres://localhost/reverb)
"#
    );
}

/// Build one seed request with randomized date and aspects.
fn sample_request(rating: i32, content: &str, rng: &mut impl Rng) -> SeedReviewRequest {
    // Spread creation dates over the trailing 365 days
    let minutes_back = rng.gen_range(0..365 * 24 * 60);
    let created_at = Utc::now() - Duration::minutes(minutes_back);

    let aspect_count = rng.gen_range(1..=3);
    let aspects: Vec<String> = ASPECT_POOL
        .choose_multiple(rng, aspect_count)
        .map(|a| a.to_string())
        .collect();

    SeedReviewRequest {
        rating,
        content: content.chars().take(1000).collect(),
        created_at,
        sentiment: Some(sentiment_label(rating).to_string()),
        aspects: Some(aspects),
        response: Some(format!(
            "Thank you for your {}-star review! (Auto-generated reply)",
            rating
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    if std::env::args().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }
    let force = std::env::args().any(|a| a == "--force");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/reverb".to_string());

    println!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let existing = db.reviews.count().await?;
    if existing > 0 && !force {
        println!(
            "Database already holds {} reviews; skipping. Use --force to seed anyway.",
            existing
        );
        return Ok(());
    }

    let mut rng = rand::thread_rng();
    let mut seeded = 0;
    for (rating, content) in SAMPLE_REVIEWS {
        db.reviews
            .insert_seeded(sample_request(rating, content, &mut rng))
            .await?;
        seeded += 1;
    }

    println!("Seeded {} reviews across the trailing year.", seeded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_reviews_are_valid() {
        for (rating, content) in SAMPLE_REVIEWS {
            assert!((1..=5).contains(&rating));
            assert!(!content.trim().is_empty());
        }
    }

    #[test]
    fn test_sample_requests_carry_labels() {
        let mut rng = rand::thread_rng();
        let req = sample_request(5, "Wonderful dinner", &mut rng);

        assert_eq!(req.sentiment.as_deref(), Some("Positive"));
        assert_eq!(
            req.response.as_deref(),
            Some("Thank you for your 5-star review! (Auto-generated reply)")
        );

        let aspects = req.aspects.unwrap();
        assert!((1..=3).contains(&aspects.len()));
        assert!(aspects.iter().all(|a| ASPECT_POOL.contains(&a.as_str())));
    }

    #[test]
    fn test_sample_requests_band_sentiment_by_rating() {
        let mut rng = rand::thread_rng();
        assert_eq!(
            sample_request(4, "good", &mut rng).sentiment.as_deref(),
            Some("Positive")
        );
        assert_eq!(
            sample_request(3, "ok", &mut rng).sentiment.as_deref(),
            Some("Neutral")
        );
        assert_eq!(
            sample_request(2, "bad", &mut rng).sentiment.as_deref(),
            Some("Negative")
        );
    }

    #[test]
    fn test_sample_request_dates_within_trailing_year() {
        let mut rng = rand::thread_rng();
        let now = Utc::now();
        for _ in 0..50 {
            let req = sample_request(3, "ok", &mut rng);
            assert!(req.created_at <= now + Duration::minutes(1));
            assert!(req.created_at >= now - Duration::days(366));
        }
    }

    #[test]
    fn test_sample_request_truncates_long_content() {
        let mut rng = rand::thread_rng();
        let long = "x".repeat(2000);
        let req = sample_request(4, &long, &mut rng);
        assert_eq!(req.content.chars().count(), 1000);
    }
}

//! Postgres persistence for reverb.
//!
//! Each entity gets a `Pg*Repository` over a shared [`sqlx`] pool, and
//! [`Database`] bundles them for handler code. Access tokens are stored
//! hashed; plaintext secrets never touch a table.
//!
//! ```rust,ignore
//! use reverb_db::{CreateReviewRequest, Database, ReviewRepository};
//!
//! let db = Database::connect("postgres://localhost/reverb").await?;
//! let review = db
//!     .reviews
//!     .insert(CreateReviewRequest {
//!         rating: 4,
//!         content: "Quick delivery, scuffed box.".to_string(),
//!         created_at: None,
//!     })
//!     .await?;
//! ```

pub mod admins;
pub mod notes;
pub mod pool;
pub mod reviews;

pub use reverb_core::*;

pub use admins::PgAdminRepository;
pub use notes::PgAdminNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig, PoolMetrics};
pub use reviews::{PgReviewRepository, SeedReviewRequest};

/// Every repository over one shared pool.
pub struct Database {
    /// Shared connection pool; repositories hold clones of it.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Customer reviews and their enrichment columns.
    pub reviews: PgReviewRepository,
    /// Admin notes attached to reviews.
    pub notes: PgAdminNoteRepository,
    /// Admin accounts plus bearer token issue and validation.
    pub admins: PgAdminRepository,
}

impl Database {
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            reviews: PgReviewRepository::new(pool.clone()),
            notes: PgAdminNoteRepository::new(pool.clone()),
            admins: PgAdminRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a pool on `url` with default sizing and wrap it.
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(create_pool(url).await?))
    }

    /// Open a pool on `url` with explicit sizing and wrap it.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        Ok(Self::new(create_pool_with_config(url, config).await?))
    }

    /// Apply any migrations not yet recorded in `_sqlx_migrations`.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|err| Error::Database(sqlx::Error::Migrate(Box::new(err))))?;
        Ok(())
    }

    /// Borrow the underlying pool, e.g. to build a standalone repository.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

//! Admin note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use reverb_core::{
    new_v7, AdminNote, AdminNoteRepository, CreateAdminNoteRequest, Error, Result,
};

/// PostgreSQL implementation of AdminNoteRepository.
pub struct PgAdminNoteRepository {
    pool: Pool<Postgres>,
}

impl PgAdminNoteRepository {
    /// Create a new PgAdminNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminNoteRepository for PgAdminNoteRepository {
    async fn insert(&self, review_id: Uuid, req: CreateAdminNoteRequest) -> Result<AdminNote> {
        // Check the review first so a missing one surfaces as a domain
        // not-found rather than a foreign key violation.
        let review_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM review WHERE id = $1)")
                .bind(review_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        if !review_exists {
            return Err(Error::ReviewNotFound(review_id));
        }

        let note = sqlx::query_as::<_, AdminNote>(
            r#"INSERT INTO admin_note (id, review_id, admin_id, content, created_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, review_id, admin_id, content, created_at"#,
        )
        .bind(new_v7())
        .bind(review_id)
        .bind(req.admin_id)
        .bind(&req.content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(note)
    }

    async fn list_for_review(&self, review_id: Uuid) -> Result<Vec<AdminNote>> {
        let notes = sqlx::query_as::<_, AdminNote>(
            r#"SELECT id, review_id, admin_id, content, created_at
               FROM admin_note
               WHERE review_id = $1
               ORDER BY created_at DESC"#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(notes)
    }
}

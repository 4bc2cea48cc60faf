//! Repository for the `reviews` table.

use ausverity_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, RatingSummary, Review};

/// Column list for `reviews` SELECT queries.
const COLUMNS: &str = "\
    id, lawyer_id, client_user_id, rating, comment, status, admin_notes, \
    response, response_at, created_at, processed_at";

/// Provides submission, moderation, and aggregation for client reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review awaiting moderation.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (lawyer_id, client_user_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.lawyer_id)
            .bind(input.client_user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Find a review by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a lawyer's approved reviews, newest first.
    pub async fn list_approved_for_lawyer(
        pool: &PgPool,
        lawyer_id: DbId,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE lawyer_id = $1 AND status = 'approved'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(lawyer_id)
            .fetch_all(pool)
            .await
    }

    /// List reviews awaiting moderation, oldest first.
    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE status = 'pending'
             ORDER BY created_at ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(limit.min(200))
            .fetch_all(pool)
            .await
    }

    /// Settle a pending review as approved or rejected.
    ///
    /// Guarded on `status = 'pending'`; returns `None` when the review was
    /// already settled.
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
        notes: Option<&str>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews
             SET status = $2, processed_at = now(), admin_notes = $3
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(new_status)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Attach the lawyer's one-off response to an approved review.
    ///
    /// Returns `None` when the review is not approved or already carries a
    /// response.
    pub async fn set_response(
        pool: &PgPool,
        id: DbId,
        response: &str,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews
             SET response = $2, response_at = now()
             WHERE id = $1 AND status = 'approved' AND response IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(response)
            .fetch_optional(pool)
            .await
    }

    /// Average rating over approved reviews for a lawyer's public page.
    pub async fn rating_summary(
        pool: &PgPool,
        lawyer_id: DbId,
    ) -> Result<RatingSummary, sqlx::Error> {
        let row: (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::FLOAT8, COUNT(*)::BIGINT
             FROM reviews
             WHERE lawyer_id = $1 AND status = 'approved'",
        )
        .bind(lawyer_id)
        .fetch_one(pool)
        .await?;

        Ok(RatingSummary {
            average: row.0,
            count: row.1,
        })
    }
}

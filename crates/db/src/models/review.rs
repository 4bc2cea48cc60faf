//! Client review entity model and DTOs.

use ausverity_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full review row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub lawyer_id: DbId,
    pub client_user_id: DbId,
    pub rating: i32,
    pub comment: String,
    pub status: String,
    pub admin_notes: Option<String>,
    /// The lawyer's one-off public reply, set after approval.
    pub response: Option<String>,
    pub response_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

/// DTO for submitting a review.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub lawyer_id: DbId,
    pub client_user_id: DbId,
    pub rating: i32,
    pub comment: String,
}

/// Aggregated rating for a lawyer's public page.
#[derive(Debug, Clone, Serialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: i64,
}

//! Law firm profile entity model and DTOs.

use ausverity_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// An office location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmLocation {
    pub suburb: String,
    pub state: String,
    pub postcode: String,
}

/// Full firm profile row from the `firm_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FirmProfile {
    pub id: DbId,
    pub owner_user_id: DbId,
    pub slug: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub practice_areas: Json<Vec<String>>,
    pub locations: Json<Vec<FirmLocation>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new firm profile (registration time).
#[derive(Debug, Deserialize)]
pub struct CreateFirmProfile {
    pub owner_user_id: DbId,
    pub name: String,
}

/// Search filters for the public firm directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirmSearch {
    /// Case-insensitive substring match on the firm name.
    pub name: Option<String>,
    /// Exact match against any element of `practice_areas`.
    pub practice_area: Option<String>,
    /// Exact match against any location's `state` field.
    pub state: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

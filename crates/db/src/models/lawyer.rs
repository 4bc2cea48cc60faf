//! Lawyer profile entity model and DTOs.
//!
//! List-valued collections (practice areas, court appearances, languages,
//! certifications) are typed JSONB columns. Under patch application they are
//! replaced wholesale, never merged element-by-element.

use ausverity_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A court the lawyer has appeared before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtAppearance {
    pub court: String,
    pub jurisdiction: String,
}

/// A professional certification or accreditation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub year: Option<i32>,
}

/// Full lawyer profile row from the `lawyer_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LawyerProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub slug: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub status: String,
    /// Current firm affiliation; `None` when the lawyer practises
    /// independently.
    pub firm_id: Option<DbId>,
    /// When the current affiliation began. Null for rows affiliated before
    /// this column existed; history closure falls back to `updated_at`.
    pub joined_firm_at: Option<Timestamp>,
    pub practice_areas: Json<Vec<String>>,
    pub court_appearances: Json<Vec<CourtAppearance>>,
    pub languages: Json<Vec<String>>,
    pub certifications: Json<Vec<Certification>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new lawyer profile (registration time).
///
/// Everything beyond the display name arrives later through the moderation
/// workflow.
#[derive(Debug, Deserialize)]
pub struct CreateLawyerProfile {
    pub user_id: DbId,
    pub display_name: String,
}

/// Search filters for the public lawyer directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LawyerSearch {
    /// Case-insensitive substring match on the display name.
    pub name: Option<String>,
    /// Exact match against any element of `practice_areas`.
    pub practice_area: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

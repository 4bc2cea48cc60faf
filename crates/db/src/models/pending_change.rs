//! Pending profile change entity and the typed sparse patch it stores.
//!
//! A patch carries only the fields the owner wants to change. The merge rule
//! is uniform: an absent key keeps the live value; a present key overwrites
//! it, and list-valued keys replace the whole stored list.

use ausverity_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::firm::{FirmLocation, FirmProfile};
use crate::models::lawyer::{Certification, CourtAppearance, LawyerProfile};

// ---------------------------------------------------------------------------
// PendingChange entity
// ---------------------------------------------------------------------------

/// A proposed edit held for admin review.
///
/// Exactly one of `lawyer_id` / `firm_id` is set, matching `entity_type`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingChange {
    pub id: DbId,
    pub entity_type: String,
    pub lawyer_id: Option<DbId>,
    pub firm_id: Option<DbId>,
    pub changes: Json<ProfilePatch>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Sparse patches
// ---------------------------------------------------------------------------

/// A sparse patch against a profile, tagged by the entity kind it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity_type", rename_all = "snake_case")]
pub enum ProfilePatch {
    Lawyer(LawyerPatch),
    Firm(FirmPatch),
}

impl ProfilePatch {
    /// The entity-type string this patch targets, matching the
    /// `pending_changes.entity_type` column.
    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Lawyer(_) => ausverity_core::moderation::ENTITY_LAWYER,
            Self::Firm(_) => ausverity_core::moderation::ENTITY_FIRM,
        }
    }
}

/// Proposed edits to a lawyer profile. Absent fields keep the live value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LawyerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<i32>,
    /// Full-replacement list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_areas: Option<Vec<String>>,
    /// Full-replacement list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court_appearances: Option<Vec<CourtAppearance>>,
    /// Full-replacement list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    /// Full-replacement list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
}

impl LawyerPatch {
    /// Whether the patch proposes no edits at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The new display name, when the patch proposes one that differs from
    /// `current`. Drives slug regeneration on approval.
    pub fn renamed_from<'a>(&'a self, current: &str) -> Option<&'a str> {
        match self.display_name.as_deref() {
            Some(name) if name != current => Some(name),
            _ => None,
        }
    }

    /// Merge this patch into a live profile, field-by-field overwrite.
    ///
    /// Used both for the owner-facing preview and for the approval merge.
    pub fn apply_to(&self, profile: &mut LawyerProfile) {
        if let Some(v) = &self.display_name {
            profile.display_name = v.clone();
        }
        if let Some(v) = &self.email {
            profile.email = v.clone();
        }
        if let Some(v) = &self.phone {
            profile.phone = v.clone();
        }
        if let Some(v) = &self.bio {
            profile.bio = Some(v.clone());
        }
        if let Some(v) = self.years_experience {
            profile.years_experience = Some(v);
        }
        if let Some(v) = &self.practice_areas {
            profile.practice_areas = Json(v.clone());
        }
        if let Some(v) = &self.court_appearances {
            profile.court_appearances = Json(v.clone());
        }
        if let Some(v) = &self.languages {
            profile.languages = Json(v.clone());
        }
        if let Some(v) = &self.certifications {
            profile.certifications = Json(v.clone());
        }
    }
}

/// Proposed edits to a firm profile. Absent fields keep the live value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirmPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Full-replacement list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_areas: Option<Vec<String>>,
    /// Full-replacement list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<FirmLocation>>,
}

impl FirmPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The new firm name, when the patch proposes one that differs from
    /// `current`.
    pub fn renamed_from<'a>(&'a self, current: &str) -> Option<&'a str> {
        match self.name.as_deref() {
            Some(name) if name != current => Some(name),
            _ => None,
        }
    }

    /// Merge this patch into a live profile, field-by-field overwrite.
    pub fn apply_to(&self, profile: &mut FirmProfile) {
        if let Some(v) = &self.name {
            profile.name = v.clone();
        }
        if let Some(v) = &self.email {
            profile.email = v.clone();
        }
        if let Some(v) = &self.phone {
            profile.phone = v.clone();
        }
        if let Some(v) = &self.website {
            profile.website = Some(v.clone());
        }
        if let Some(v) = &self.description {
            profile.description = Some(v.clone());
        }
        if let Some(v) = &self.practice_areas {
            profile.practice_areas = Json(v.clone());
        }
        if let Some(v) = &self.locations {
            profile.locations = Json(v.clone());
        }
    }

    /// Check the fields a firm must carry before its first publication.
    ///
    /// Applies to the merged view: a field may come from the patch or
    /// already be present on the live row.
    pub fn validate_first_submission(&self, live: &FirmProfile) -> Result<(), String> {
        let mut missing = Vec::new();

        if self.name.as_deref().unwrap_or(&live.name).trim().is_empty() {
            missing.push("name");
        }
        if self
            .email
            .as_deref()
            .unwrap_or(&live.email)
            .trim()
            .is_empty()
        {
            missing.push("email");
        }
        if self
            .phone
            .as_deref()
            .unwrap_or(&live.phone)
            .trim()
            .is_empty()
        {
            missing.push("phone");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "First submission requires: {}",
                missing.join(", ")
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Admin queue view
// ---------------------------------------------------------------------------

/// Filter parameters for the admin moderation queue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingChangeQuery {
    pub entity_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

//! Firm invitation entity model and DTOs.

use ausverity_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full invitation row from the `firm_invitations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FirmInvitation {
    pub id: DbId,
    pub firm_id: DbId,
    pub lawyer_id: DbId,
    pub invited_by: DbId,
    /// Opaque credential reserved for email confirmation links.
    pub token: String,
    pub status: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

/// DTO for issuing an invitation.
#[derive(Debug, Deserialize)]
pub struct CreateInvitation {
    pub firm_id: DbId,
    pub lawyer_id: DbId,
    pub invited_by: DbId,
    pub token: String,
    pub expires_at: Timestamp,
}

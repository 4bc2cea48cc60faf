//! Repository for the `firm_invitations` table.
//!
//! The open-invitation invariant (at most one `pending` row per firm/lawyer
//! pair) is backed by the partial unique index `uq_firm_invitations_open`;
//! callers pre-check with [`InvitationRepo::exists_open`] and the index
//! catches the remaining race as a unique violation.

use ausverity_core::types::DbId;
use sqlx::PgPool;

use crate::models::invitation::{CreateInvitation, FirmInvitation};
use crate::models::lawyer::LawyerProfile;

/// Column list for `firm_invitations` SELECT queries.
const COLUMNS: &str = "\
    id, firm_id, lawyer_id, invited_by, token, status, expires_at, \
    created_at, responded_at";

/// Column list for `lawyer_profiles` RETURNING clauses.
const LAWYER_COLUMNS: &str = "\
    id, user_id, slug, display_name, email, phone, bio, years_experience, \
    status, firm_id, joined_firm_at, practice_areas, court_appearances, \
    languages, certifications, created_at, updated_at";

/// Provides issue/respond operations for firm invitations.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Insert a new pending invitation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInvitation,
    ) -> Result<FirmInvitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO firm_invitations (firm_id, lawyer_id, invited_by, token, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FirmInvitation>(&query)
            .bind(input.firm_id)
            .bind(input.lawyer_id)
            .bind(input.invited_by)
            .bind(&input.token)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an invitation by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FirmInvitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firm_invitations WHERE id = $1");
        sqlx::query_as::<_, FirmInvitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an open invitation already exists for the pair.
    pub async fn exists_open(
        pool: &PgPool,
        firm_id: DbId,
        lawyer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM firm_invitations
                WHERE firm_id = $1 AND lawyer_id = $2 AND status = 'pending'
             )",
        )
        .bind(firm_id)
        .bind(lawyer_id)
        .fetch_one(pool)
        .await
    }

    /// List a firm's invitations, newest first.
    pub async fn list_for_firm(
        pool: &PgPool,
        firm_id: DbId,
    ) -> Result<Vec<FirmInvitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM firm_invitations
             WHERE firm_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, FirmInvitation>(&query)
            .bind(firm_id)
            .fetch_all(pool)
            .await
    }

    /// List a lawyer's invitations, newest first.
    pub async fn list_for_lawyer(
        pool: &PgPool,
        lawyer_id: DbId,
    ) -> Result<Vec<FirmInvitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM firm_invitations
             WHERE lawyer_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, FirmInvitation>(&query)
            .bind(lawyer_id)
            .fetch_all(pool)
            .await
    }

    /// Lazily flip a stale invitation to `expired`.
    ///
    /// Guarded on `status = 'pending'`; returns `None` when the row already
    /// settled (a concurrent response won).
    pub async fn mark_expired(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FirmInvitation>, sqlx::Error> {
        let query = format!(
            "UPDATE firm_invitations
             SET status = 'expired'
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FirmInvitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Decline an invitation. No membership change.
    pub async fn decline(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FirmInvitation>, sqlx::Error> {
        let query = format!(
            "UPDATE firm_invitations
             SET status = 'declined', responded_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FirmInvitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Accept an invitation: close any prior affiliation interval, move the
    /// membership pointer, and settle the invitation, atomically.
    ///
    /// The history insert runs before the pointer mutation so the closed
    /// interval always reflects the affiliation the live row held when the
    /// transition started. Returns `None` when the invitation was no longer
    /// pending.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(FirmInvitation, LawyerProfile)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let settle = format!(
            "UPDATE firm_invitations
             SET status = 'accepted', responded_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let invitation = sqlx::query_as::<_, FirmInvitation>(&settle)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(invitation) = invitation else {
            return Ok(None);
        };

        // Close the interval for a different prior firm. The SELECT guard
        // keeps this a no-op for unaffiliated lawyers and same-firm accepts.
        sqlx::query(
            "INSERT INTO relationship_history (lawyer_id, firm_id, start_date, end_date)
             SELECT id, firm_id, COALESCE(joined_firm_at, updated_at), now()
             FROM lawyer_profiles
             WHERE id = $1 AND firm_id IS NOT NULL AND firm_id <> $2",
        )
        .bind(invitation.lawyer_id)
        .bind(invitation.firm_id)
        .execute(&mut *tx)
        .await?;

        let point = format!(
            "UPDATE lawyer_profiles
             SET firm_id = $2,
                 joined_firm_at = CASE
                     WHEN firm_id IS DISTINCT FROM $2 THEN now()
                     ELSE joined_firm_at
                 END
             WHERE id = $1
             RETURNING {LAWYER_COLUMNS}"
        );
        let lawyer = sqlx::query_as::<_, LawyerProfile>(&point)
            .bind(invitation.lawyer_id)
            .bind(invitation.firm_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((invitation, lawyer)))
    }
}

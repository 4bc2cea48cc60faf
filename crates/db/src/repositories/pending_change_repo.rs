//! Repository for the `pending_changes` table and the approval workflow.
//!
//! The open-change invariant (at most one `pending` row per profile) is
//! enforced by the partial unique index `uq_pending_changes_open`; submission
//! runs `ON CONFLICT ... DO UPDATE` against it so two near-simultaneous
//! submissions both land on the same row instead of creating a duplicate.
//!
//! Approval merges the patch into the live profile and flips the change to
//! `approved` inside one transaction; a crash or a concurrent decision can
//! never leave one write applied without the other.

use ausverity_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::firm::FirmProfile;
use crate::models::lawyer::LawyerProfile;
use crate::models::pending_change::{
    FirmPatch, LawyerPatch, PendingChange, PendingChangeQuery, ProfilePatch,
};

/// Column list for `pending_changes` SELECT queries.
const COLUMNS: &str = "\
    id, entity_type, lawyer_id, firm_id, changes, status, admin_notes, \
    created_at, processed_at";

/// Column list for `lawyer_profiles` RETURNING clauses.
const LAWYER_COLUMNS: &str = "\
    id, user_id, slug, display_name, email, phone, bio, years_experience, \
    status, firm_id, joined_firm_at, practice_areas, court_appearances, \
    languages, certifications, created_at, updated_at";

/// Column list for `firm_profiles` RETURNING clauses.
const FIRM_COLUMNS: &str = "\
    id, owner_user_id, slug, name, email, phone, website, description, \
    status, practice_areas, locations, created_at, updated_at";

/// Provides submission and decision operations for pending profile changes.
pub struct PendingChangeRepo;

impl PendingChangeRepo {
    /// Store a proposed edit, replacing any open change for the same profile.
    ///
    /// Returns the stored row and whether it was freshly created (`true`) or
    /// replaced an existing open change (`false`); callers pick the audit
    /// verb from the flag. If a concurrent submission wins the insert race,
    /// the conflict clause falls back to the in-place update, so the
    /// invariant holds either way.
    pub async fn submit(
        pool: &PgPool,
        patch: &ProfilePatch,
        lawyer_id: Option<DbId>,
        firm_id: Option<DbId>,
    ) -> Result<(PendingChange, bool), sqlx::Error> {
        let entity_type = patch.entity_type();

        // Replace the open change in place when one exists: draft autosave,
        // not a new review cycle.
        let update = format!(
            "UPDATE pending_changes
             SET changes = $1, created_at = now()
             WHERE entity_type = $2
               AND lawyer_id IS NOT DISTINCT FROM $3
               AND firm_id IS NOT DISTINCT FROM $4
               AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let existing = sqlx::query_as::<_, PendingChange>(&update)
            .bind(Json(patch))
            .bind(entity_type)
            .bind(lawyer_id)
            .bind(firm_id)
            .fetch_optional(pool)
            .await?;
        if let Some(change) = existing {
            return Ok((change, false));
        }

        let insert = format!(
            "INSERT INTO pending_changes (entity_type, lawyer_id, firm_id, changes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (entity_type, COALESCE(lawyer_id, 0), COALESCE(firm_id, 0))
                WHERE status = 'pending'
             DO UPDATE SET changes = EXCLUDED.changes, created_at = now()
             RETURNING {COLUMNS}"
        );
        let change = sqlx::query_as::<_, PendingChange>(&insert)
            .bind(entity_type)
            .bind(lawyer_id)
            .bind(firm_id)
            .bind(Json(patch))
            .fetch_one(pool)
            .await?;
        Ok((change, true))
    }

    /// Find a change by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PendingChange>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pending_changes WHERE id = $1");
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the open change for a profile, if any.
    pub async fn find_open(
        pool: &PgPool,
        entity_type: &str,
        lawyer_id: Option<DbId>,
        firm_id: Option<DbId>,
    ) -> Result<Option<PendingChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_changes
             WHERE entity_type = $1
               AND lawyer_id IS NOT DISTINCT FROM $2
               AND firm_id IS NOT DISTINCT FROM $3
               AND status = 'pending'"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(entity_type)
            .bind(lawyer_id)
            .bind(firm_id)
            .fetch_optional(pool)
            .await
    }

    /// Query changes for the admin moderation queue, oldest first.
    pub async fn query(
        pool: &PgPool,
        params: &PendingChangeQuery,
    ) -> Result<Vec<PendingChange>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).min(200);
        let offset = params.offset.unwrap_or(0);
        let status = params.status.as_deref().unwrap_or("pending");

        let (entity_filter, has_entity) = match params.entity_type {
            Some(_) => ("AND entity_type = $2", true),
            None => ("", false),
        };

        let query = format!(
            "SELECT {COLUMNS} FROM pending_changes
             WHERE status = $1 {entity_filter}
             ORDER BY created_at ASC
             LIMIT ${} OFFSET ${}",
            if has_entity { 3 } else { 2 },
            if has_entity { 4 } else { 3 },
        );

        let mut q = sqlx::query_as::<_, PendingChange>(&query).bind(status);
        if let Some(ref entity_type) = params.entity_type {
            q = q.bind(entity_type);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Approve a lawyer change: merge the patch into the live profile and
    /// mark the change processed, atomically.
    ///
    /// `new_slug` is supplied when the patch renames the profile; the caller
    /// resolves collisions before the transaction starts. Returns the merged
    /// profile, or `None` when the change was no longer pending (a
    /// concurrent decision already settled it).
    pub async fn approve_lawyer(
        pool: &PgPool,
        change_id: DbId,
        patch: &LawyerPatch,
        new_slug: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<LawyerProfile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Optimistic status check: only the first decision to observe
        // 'pending' proceeds past this statement.
        let lawyer_id = sqlx::query_scalar::<_, Option<DbId>>(
            "UPDATE pending_changes
             SET status = 'approved', processed_at = now(), admin_notes = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING lawyer_id",
        )
        .bind(change_id)
        .bind(notes)
        .fetch_optional(&mut *tx)
        .await?
        .flatten();

        let Some(lawyer_id) = lawyer_id else {
            return Ok(None);
        };

        let merge = format!(
            "UPDATE lawyer_profiles SET
                display_name = COALESCE($1, display_name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                bio = COALESCE($4, bio),
                years_experience = COALESCE($5, years_experience),
                practice_areas = COALESCE($6, practice_areas),
                court_appearances = COALESCE($7, court_appearances),
                languages = COALESCE($8, languages),
                certifications = COALESCE($9, certifications),
                slug = COALESCE($10, slug),
                status = 'published'
             WHERE id = $11
             RETURNING {LAWYER_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, LawyerProfile>(&merge)
            .bind(&patch.display_name)
            .bind(&patch.email)
            .bind(&patch.phone)
            .bind(&patch.bio)
            .bind(patch.years_experience)
            .bind(patch.practice_areas.as_ref().map(Json))
            .bind(patch.court_appearances.as_ref().map(Json))
            .bind(patch.languages.as_ref().map(Json))
            .bind(patch.certifications.as_ref().map(Json))
            .bind(new_slug)
            .bind(lawyer_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(profile))
    }

    /// Approve a firm change. Same shape as [`Self::approve_lawyer`].
    pub async fn approve_firm(
        pool: &PgPool,
        change_id: DbId,
        patch: &FirmPatch,
        new_slug: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<FirmProfile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let firm_id = sqlx::query_scalar::<_, Option<DbId>>(
            "UPDATE pending_changes
             SET status = 'approved', processed_at = now(), admin_notes = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING firm_id",
        )
        .bind(change_id)
        .bind(notes)
        .fetch_optional(&mut *tx)
        .await?
        .flatten();

        let Some(firm_id) = firm_id else {
            return Ok(None);
        };

        let merge = format!(
            "UPDATE firm_profiles SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                website = COALESCE($4, website),
                description = COALESCE($5, description),
                practice_areas = COALESCE($6, practice_areas),
                locations = COALESCE($7, locations),
                slug = COALESCE($8, slug),
                status = 'published'
             WHERE id = $9
             RETURNING {FIRM_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, FirmProfile>(&merge)
            .bind(&patch.name)
            .bind(&patch.email)
            .bind(&patch.phone)
            .bind(&patch.website)
            .bind(&patch.description)
            .bind(patch.practice_areas.as_ref().map(Json))
            .bind(patch.locations.as_ref().map(Json))
            .bind(new_slug)
            .bind(firm_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(profile))
    }

    /// Reject a change. The live profile is untouched.
    ///
    /// Returns the settled row, or `None` when the change was no longer
    /// pending.
    pub async fn reject(
        pool: &PgPool,
        change_id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<PendingChange>, sqlx::Error> {
        let query = format!(
            "UPDATE pending_changes
             SET status = 'rejected', processed_at = now(), admin_notes = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(change_id)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }
}

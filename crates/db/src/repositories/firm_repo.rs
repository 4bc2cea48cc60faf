//! Repository for the `firm_profiles` table.

use ausverity_core::slug::{
    numbered_candidate, slugify, timestamp_candidate, MAX_NUMBERED_CANDIDATES,
};
use ausverity_core::types::DbId;
use chrono::Utc;
use sqlx::PgPool;

use crate::models::firm::{CreateFirmProfile, FirmProfile, FirmSearch};

/// Column list for `firm_profiles` SELECT queries.
const COLUMNS: &str = "\
    id, owner_user_id, slug, name, email, phone, website, description, \
    status, practice_areas, locations, created_at, updated_at";

/// Provides CRUD and directory-search operations for firm profiles.
pub struct FirmRepo;

impl FirmRepo {
    /// Insert a new draft firm, deriving a unique slug from the name.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFirmProfile,
    ) -> Result<FirmProfile, sqlx::Error> {
        let slug = Self::find_available_slug(pool, &slugify(&input.name), None).await?;
        let query = format!(
            "INSERT INTO firm_profiles (owner_user_id, slug, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FirmProfile>(&query)
            .bind(input.owner_user_id)
            .bind(&slug)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a firm by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FirmProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firm_profiles WHERE id = $1");
        sqlx::query_as::<_, FirmProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the firm owned by a user account.
    pub async fn find_by_owner(
        pool: &PgPool,
        owner_user_id: DbId,
    ) -> Result<Option<FirmProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firm_profiles WHERE owner_user_id = $1");
        sqlx::query_as::<_, FirmProfile>(&query)
            .bind(owner_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a firm by its public slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<FirmProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM firm_profiles WHERE slug = $1");
        sqlx::query_as::<_, FirmProfile>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Search published firms for the public directory.
    pub async fn search_published(
        pool: &PgPool,
        params: &FirmSearch,
    ) -> Result<Vec<FirmProfile>, sqlx::Error> {
        let limit = params.limit.unwrap_or(20).min(100);
        let offset = params.offset.unwrap_or(0);

        let mut conditions = vec!["status = 'published'".to_string()];
        let mut bind_idx = 1u32;
        let mut text_binds: Vec<String> = Vec::new();

        if let Some(ref name) = params.name {
            conditions.push(format!("name ILIKE ${bind_idx}"));
            bind_idx += 1;
            text_binds.push(format!("%{name}%"));
        }

        if let Some(ref area) = params.practice_area {
            conditions.push(format!("practice_areas ? ${bind_idx}"));
            bind_idx += 1;
            text_binds.push(area.clone());
        }

        if let Some(ref state) = params.state {
            conditions.push(format!(
                "EXISTS (
                    SELECT 1 FROM jsonb_array_elements(locations) AS loc
                    WHERE loc->>'state' = ${bind_idx}
                 )"
            ));
            bind_idx += 1;
            text_binds.push(state.clone());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM firm_profiles
             WHERE {}
             ORDER BY name ASC
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, FirmProfile>(&query);
        for value in &text_binds {
            q = q.bind(value);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Pick the first free slug for a base form.
    ///
    /// Same candidate walk as the lawyer variant: `base`, `base-2` ..,
    /// then a timestamp suffix.
    pub async fn find_available_slug(
        pool: &PgPool,
        base: &str,
        exclude_id: Option<DbId>,
    ) -> Result<String, sqlx::Error> {
        if !Self::slug_taken(pool, base, exclude_id).await? {
            return Ok(base.to_string());
        }
        for n in 2..=MAX_NUMBERED_CANDIDATES {
            let candidate = numbered_candidate(base, n);
            if !Self::slug_taken(pool, &candidate, exclude_id).await? {
                return Ok(candidate);
            }
        }
        Ok(timestamp_candidate(base, Utc::now()))
    }

    async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM firm_profiles
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }
}

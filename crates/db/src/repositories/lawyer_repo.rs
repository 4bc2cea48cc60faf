//! Repository for the `lawyer_profiles` table.

use ausverity_core::slug::{
    numbered_candidate, slugify, timestamp_candidate, MAX_NUMBERED_CANDIDATES,
};
use ausverity_core::types::DbId;
use chrono::Utc;
use sqlx::PgPool;

use crate::models::lawyer::{CreateLawyerProfile, LawyerProfile, LawyerSearch};

/// Column list for `lawyer_profiles` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, slug, display_name, email, phone, bio, years_experience, \
    status, firm_id, joined_firm_at, practice_areas, court_appearances, \
    languages, certifications, created_at, updated_at";

/// Provides CRUD and directory-search operations for lawyer profiles.
pub struct LawyerRepo;

impl LawyerRepo {
    /// Insert a new draft profile, deriving a unique slug from the display
    /// name.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLawyerProfile,
    ) -> Result<LawyerProfile, sqlx::Error> {
        let slug = Self::find_available_slug(pool, &slugify(&input.display_name), None).await?;
        let query = format!(
            "INSERT INTO lawyer_profiles (user_id, slug, display_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LawyerProfile>(&query)
            .bind(input.user_id)
            .bind(&slug)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LawyerProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lawyer_profiles WHERE id = $1");
        sqlx::query_as::<_, LawyerProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the profile owned by a user account.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<LawyerProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lawyer_profiles WHERE user_id = $1");
        sqlx::query_as::<_, LawyerProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by its public slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<LawyerProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lawyer_profiles WHERE slug = $1");
        sqlx::query_as::<_, LawyerProfile>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List current members of a firm, alphabetically.
    pub async fn list_for_firm(
        pool: &PgPool,
        firm_id: DbId,
    ) -> Result<Vec<LawyerProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lawyer_profiles
             WHERE firm_id = $1
             ORDER BY display_name ASC"
        );
        sqlx::query_as::<_, LawyerProfile>(&query)
            .bind(firm_id)
            .fetch_all(pool)
            .await
    }

    /// Search published profiles for the public directory.
    pub async fn search_published(
        pool: &PgPool,
        params: &LawyerSearch,
    ) -> Result<Vec<LawyerProfile>, sqlx::Error> {
        let limit = params.limit.unwrap_or(20).min(100);
        let offset = params.offset.unwrap_or(0);

        let mut conditions = vec!["status = 'published'".to_string()];
        let mut bind_idx = 1u32;
        let mut text_binds: Vec<String> = Vec::new();

        if let Some(ref name) = params.name {
            conditions.push(format!("display_name ILIKE ${bind_idx}"));
            bind_idx += 1;
            text_binds.push(format!("%{name}%"));
        }

        if let Some(ref area) = params.practice_area {
            conditions.push(format!("practice_areas ? ${bind_idx}"));
            bind_idx += 1;
            text_binds.push(area.clone());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM lawyer_profiles
             WHERE {}
             ORDER BY display_name ASC
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, LawyerProfile>(&query);
        for value in &text_binds {
            q = q.bind(value);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Pick the first free slug for a base form.
    ///
    /// Tries `base`, then `base-2` .. `base-{n}`, then a timestamp suffix as
    /// the last resort. `exclude_id` skips the entity being renamed so its
    /// own current slug counts as free.
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
                SELECT 1 FROM lawyer_profiles
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }
}

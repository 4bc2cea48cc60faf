//! Affiliation-ending operations and relationship history reads.
//!
//! Leaving and removal share one transition: insert the closing history row,
//! then null the membership pointer, in a single transaction. The two
//! operations differ only in who may call them and the audit verb recorded,
//! both of which are handler concerns.

use ausverity_core::types::DbId;
use sqlx::PgPool;

use crate::models::lawyer::LawyerProfile;
use crate::models::relationship::RelationshipHistory;

/// Column list for `relationship_history` SELECT queries.
const HISTORY_COLUMNS: &str = "id, lawyer_id, firm_id, start_date, end_date, created_at";

/// Column list for `lawyer_profiles` RETURNING clauses.
const LAWYER_COLUMNS: &str = "\
    id, user_id, slug, display_name, email, phone, bio, years_experience, \
    status, firm_id, joined_firm_at, practice_areas, court_appearances, \
    languages, certifications, created_at, updated_at";

/// Ends a lawyer's current firm affiliation.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Close the lawyer's current affiliation: history row first, pointer
    /// null second, one transaction.
    ///
    /// Returns the closed interval and the detached profile, or `None` when
    /// the lawyer had no affiliation to end.
    pub async fn end_affiliation(
        pool: &PgPool,
        lawyer_id: DbId,
    ) -> Result<Option<(RelationshipHistory, LawyerProfile)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let close = format!(
            "INSERT INTO relationship_history (lawyer_id, firm_id, start_date, end_date)
             SELECT id, firm_id, COALESCE(joined_firm_at, updated_at), now()
             FROM lawyer_profiles
             WHERE id = $1 AND firm_id IS NOT NULL
             RETURNING {HISTORY_COLUMNS}"
        );
        let history = sqlx::query_as::<_, RelationshipHistory>(&close)
            .bind(lawyer_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(history) = history else {
            return Ok(None);
        };

        let detach = format!(
            "UPDATE lawyer_profiles
             SET firm_id = NULL, joined_firm_at = NULL
             WHERE id = $1
             RETURNING {LAWYER_COLUMNS}"
        );
        let lawyer = sqlx::query_as::<_, LawyerProfile>(&detach)
            .bind(lawyer_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((history, lawyer)))
    }
}

/// Read access to closed affiliation intervals.
pub struct RelationshipHistoryRepo;

impl RelationshipHistoryRepo {
    /// List a lawyer's closed intervals, most recently ended first.
    pub async fn list_for_lawyer(
        pool: &PgPool,
        lawyer_id: DbId,
    ) -> Result<Vec<RelationshipHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM relationship_history
             WHERE lawyer_id = $1
             ORDER BY end_date DESC"
        );
        sqlx::query_as::<_, RelationshipHistory>(&query)
            .bind(lawyer_id)
            .fetch_all(pool)
            .await
    }

    /// List a firm's closed intervals, most recently ended first.
    pub async fn list_for_firm(
        pool: &PgPool,
        firm_id: DbId,
    ) -> Result<Vec<RelationshipHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM relationship_history
             WHERE firm_id = $1
             ORDER BY end_date DESC"
        );
        sqlx::query_as::<_, RelationshipHistory>(&query)
            .bind(firm_id)
            .fetch_all(pool)
            .await
    }
}

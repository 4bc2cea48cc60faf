//! Closed lawyer/firm affiliation intervals.

use ausverity_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One closed affiliation interval. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RelationshipHistory {
    pub id: DbId,
    pub lawyer_id: DbId,
    pub firm_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
}

//! Audit log entity model and DTOs.
//!
//! Models for the append-only audit trail. Audit logs have no `updated_at`
//! field (immutable records).

use ausverity_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
}

impl CreateAuditLog {
    /// Entry for an actor acting on a specific entity.
    pub fn for_entity(
        user_id: DbId,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: DbId,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            action: action.into(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id),
            metadata: None,
        }
    }

    /// Attach free-form metadata to the entry.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for audit log queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
}

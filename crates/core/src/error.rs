use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by a natural key (e.g. an email address) found nothing.
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The target exists but is not in a state that permits the action,
    /// e.g. deciding an already-processed change or leaving a firm while
    /// unaffiliated.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An invitation whose expiry window has lapsed. Raised before the
    /// requested accept/decline is honoured.
    #[error("Expired: {0}")]
    Expired(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

//! Pending-change status and decision constants.
//!
//! A profile edit is held as a pending change until an administrator decides
//! it. `pending` is the only state that accepts further mutation; `approved`
//! and `rejected` are terminal.

/// Change awaits an admin decision. New submissions replace its content.
pub const CHANGE_PENDING: &str = "pending";

/// Change was merged into the live profile. Terminal.
pub const CHANGE_APPROVED: &str = "approved";

/// Change was discarded without touching the live profile. Terminal.
pub const CHANGE_REJECTED: &str = "rejected";

/// Entity kind a change targets.
pub const ENTITY_LAWYER: &str = "lawyer";
pub const ENTITY_FIRM: &str = "firm";

/// Admin decision verbs accepted by the decide endpoint.
pub const DECISION_APPROVE: &str = "approve";
pub const DECISION_REJECT: &str = "reject";

pub const VALID_DECISIONS: &[&str] = &[DECISION_APPROVE, DECISION_REJECT];

/// Validate that a decision string is one of the accepted values.
pub fn validate_decision(decision: &str) -> Result<(), String> {
    if VALID_DECISIONS.contains(&decision) {
        Ok(())
    } else {
        Err(format!(
            "Invalid decision '{decision}'. Must be one of: {}",
            VALID_DECISIONS.join(", ")
        ))
    }
}

/// Validate that an entity type string is one of the accepted values.
pub fn validate_entity_type(entity_type: &str) -> Result<(), String> {
    if entity_type == ENTITY_LAWYER || entity_type == ENTITY_FIRM {
        Ok(())
    } else {
        Err(format!(
            "Invalid entity type '{entity_type}'. Must be '{ENTITY_LAWYER}' or '{ENTITY_FIRM}'"
        ))
    }
}

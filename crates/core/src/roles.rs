//! Well-known role name constants.
//!
//! These must match the CHECK constraint seeded in
//! `20260115000001_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_LAWYER: &str = "lawyer";
pub const ROLE_FIRM_OWNER: &str = "firm_owner";
pub const ROLE_LAWYER_FIRM_OWNER: &str = "lawyer_firm_owner";
pub const ROLE_CLIENT: &str = "client";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_LAWYER,
    ROLE_FIRM_OWNER,
    ROLE_LAWYER_FIRM_OWNER,
    ROLE_CLIENT,
];

/// Whether a role carries a lawyer profile.
pub fn is_lawyer_role(role: &str) -> bool {
    role == ROLE_LAWYER || role == ROLE_LAWYER_FIRM_OWNER
}

/// Whether a role can own a firm.
pub fn is_firm_owner_role(role: &str) -> bool {
    role == ROLE_FIRM_OWNER || role == ROLE_LAWYER_FIRM_OWNER
}

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_roles_validate() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let result = validate_role("superuser");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid role"));
    }

    #[test]
    fn dual_role_is_both_lawyer_and_owner() {
        assert!(is_lawyer_role(ROLE_LAWYER_FIRM_OWNER));
        assert!(is_firm_owner_role(ROLE_LAWYER_FIRM_OWNER));
    }

    #[test]
    fn client_is_neither() {
        assert!(!is_lawyer_role(ROLE_CLIENT));
        assert!(!is_firm_owner_role(ROLE_CLIENT));
    }
}

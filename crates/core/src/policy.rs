//! Declarative authorization policy.
//!
//! Each workflow operation maps to one [`Action`] variant carrying the
//! ownership facts the handler has already fetched. [`authorize`] is the
//! single place those facts meet role requirements; handlers call it once
//! per operation instead of repeating inline role comparisons.

use crate::error::CoreError;
use crate::roles::{is_firm_owner_role, ROLE_ADMIN};
use crate::types::DbId;

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// A capability request: what the actor wants to do, with the ownership
/// facts needed to judge it.
#[derive(Debug, Clone)]
pub enum Action {
    /// Propose or replace a pending edit to a lawyer profile owned by
    /// `profile_owner`.
    SubmitLawyerChange { profile_owner: DbId },
    /// Propose or replace a pending edit to a firm owned by `firm_owner`.
    SubmitFirmChange { firm_owner: DbId },
    /// Approve or reject a pending change. Admin only.
    DecideChange,
    /// Invite a lawyer to a firm owned by `firm_owner`.
    InviteToFirm { firm_owner: DbId },
    /// Accept or decline an invitation addressed to the lawyer profile
    /// owned by `invitee_owner`.
    RespondToInvitation { invitee_owner: DbId },
    /// Leave the current firm; `profile_owner` owns the lawyer profile.
    LeaveFirm { profile_owner: DbId },
    /// Remove a lawyer from a firm owned by `firm_owner`.
    RemoveFromFirm { firm_owner: DbId },
    /// Approve or reject a client review. Admin only.
    ModerateReview,
    /// Publish a response to a review on the lawyer profile owned by
    /// `profile_owner`.
    RespondToReview { profile_owner: DbId },
    /// Query the audit log. Admin only.
    QueryAudit,
    /// Manage user accounts and roles. Admin only.
    ManageUsers,
}

/// Evaluate an action against an actor. Admins pass every check.
pub fn authorize(actor: &Actor, action: &Action) -> Result<(), CoreError> {
    if actor.is_admin() {
        return Ok(());
    }

    match action {
        Action::SubmitLawyerChange { profile_owner }
        | Action::LeaveFirm { profile_owner }
        | Action::RespondToReview { profile_owner } => {
            owns(actor, *profile_owner, "You do not own this lawyer profile")
        }

        Action::SubmitFirmChange { firm_owner } => {
            owns(actor, *firm_owner, "You do not own this firm")
        }

        Action::InviteToFirm { firm_owner } | Action::RemoveFromFirm { firm_owner } => {
            if !is_firm_owner_role(&actor.role) {
                return Err(CoreError::Forbidden("Firm owner role required".into()));
            }
            owns(actor, *firm_owner, "You do not own this firm")
        }

        Action::RespondToInvitation { invitee_owner } => owns(
            actor,
            *invitee_owner,
            "This invitation is addressed to another lawyer",
        ),

        Action::DecideChange => Err(CoreError::Forbidden("Admin role required".into())),
        Action::ModerateReview => Err(CoreError::Forbidden("Admin role required".into())),
        Action::QueryAudit => Err(CoreError::Forbidden("Admin role required".into())),
        Action::ManageUsers => Err(CoreError::Forbidden("Admin role required".into())),
    }
}

fn owns(actor: &Actor, owner: DbId, denial: &str) -> Result<(), CoreError> {
    if actor.user_id == owner {
        Ok(())
    } else {
        Err(CoreError::Forbidden(denial.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_CLIENT, ROLE_FIRM_OWNER, ROLE_LAWYER, ROLE_LAWYER_FIRM_OWNER};

    fn assert_forbidden(result: Result<(), CoreError>) {
        match result {
            Err(CoreError::Forbidden(_)) => {}
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    fn admin() -> Actor {
        Actor::new(1, crate::roles::ROLE_ADMIN)
    }

    #[test]
    fn admin_passes_everything() {
        let a = admin();
        assert!(authorize(&a, &Action::DecideChange).is_ok());
        assert!(authorize(&a, &Action::ModerateReview).is_ok());
        assert!(authorize(&a, &Action::SubmitLawyerChange { profile_owner: 99 }).is_ok());
        assert!(authorize(&a, &Action::RemoveFromFirm { firm_owner: 99 }).is_ok());
    }

    #[test]
    fn owner_may_submit_own_profile_change() {
        let a = Actor::new(7, ROLE_LAWYER);
        assert!(authorize(&a, &Action::SubmitLawyerChange { profile_owner: 7 }).is_ok());
    }

    #[test]
    fn non_owner_may_not_submit() {
        let a = Actor::new(7, ROLE_LAWYER);
        assert_forbidden(authorize(&a, &Action::SubmitLawyerChange { profile_owner: 8 }));
    }

    #[test]
    fn lawyer_cannot_decide_changes() {
        let a = Actor::new(7, ROLE_LAWYER);
        assert_forbidden(authorize(&a, &Action::DecideChange));
    }

    #[test]
    fn firm_owner_invites_for_own_firm_only() {
        let a = Actor::new(3, ROLE_FIRM_OWNER);
        assert!(authorize(&a, &Action::InviteToFirm { firm_owner: 3 }).is_ok());
        assert_forbidden(authorize(&a, &Action::InviteToFirm { firm_owner: 4 }));
    }

    #[test]
    fn client_cannot_invite_even_as_nominal_owner() {
        // Role gate applies before the ownership comparison.
        let a = Actor::new(3, ROLE_CLIENT);
        assert_forbidden(authorize(&a, &Action::InviteToFirm { firm_owner: 3 }));
    }

    #[test]
    fn dual_role_owner_can_invite_and_respond() {
        let a = Actor::new(5, ROLE_LAWYER_FIRM_OWNER);
        assert!(authorize(&a, &Action::InviteToFirm { firm_owner: 5 }).is_ok());
        assert!(authorize(&a, &Action::RespondToInvitation { invitee_owner: 5 }).is_ok());
    }

    #[test]
    fn invitation_response_restricted_to_invitee() {
        let a = Actor::new(5, ROLE_LAWYER);
        assert_forbidden(authorize(&a, &Action::RespondToInvitation { invitee_owner: 6 }));
    }

    #[test]
    fn audit_query_is_admin_only() {
        let a = Actor::new(2, ROLE_FIRM_OWNER);
        assert_forbidden(authorize(&a, &Action::QueryAudit));
    }
}

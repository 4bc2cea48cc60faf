//! Audit action verb constants.
//!
//! Every state-changing operation records exactly one audit entry using one
//! of these verbs. Free-text extensions are allowed at the storage layer but
//! the workflows stick to this list.

pub const ACTION_SUBMIT_PROFILE_CHANGE: &str = "SUBMIT_PROFILE_CHANGE";
pub const ACTION_UPDATE_PROFILE_CHANGE: &str = "UPDATE_PROFILE_CHANGE";
pub const ACTION_APPROVE_PROFILE_CHANGE: &str = "APPROVE_PROFILE_CHANGE";
pub const ACTION_REJECT_PROFILE_CHANGE: &str = "REJECT_PROFILE_CHANGE";

pub const ACTION_INVITE_LAWYER_TO_FIRM: &str = "INVITE_LAWYER_TO_FIRM";
pub const ACTION_ACCEPT_FIRM_INVITATION: &str = "ACCEPT_FIRM_INVITATION";
pub const ACTION_DECLINE_FIRM_INVITATION: &str = "DECLINE_FIRM_INVITATION";
pub const ACTION_LEAVE_FIRM: &str = "LEAVE_FIRM";
pub const ACTION_REMOVE_LAWYER_FROM_FIRM: &str = "REMOVE_LAWYER_FROM_FIRM";

pub const ACTION_SUBMIT_REVIEW: &str = "SUBMIT_REVIEW";
pub const ACTION_APPROVE_REVIEW: &str = "APPROVE_REVIEW";
pub const ACTION_REJECT_REVIEW: &str = "REJECT_REVIEW";
pub const ACTION_RESPOND_TO_REVIEW: &str = "RESPOND_TO_REVIEW";

pub const ACTION_CHANGE_USER_ROLE: &str = "CHANGE_USER_ROLE";

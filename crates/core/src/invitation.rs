//! Firm invitation status constants, expiry arithmetic, and token generation.
//!
//! Invitations expire lazily: there is no background sweep, the transition to
//! `expired` happens on the first read after the window lapses.

use chrono::Duration;
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::types::Timestamp;

/// Invitation awaits a response from the lawyer.
pub const INVITATION_PENDING: &str = "pending";

/// Lawyer accepted and is now a member of the firm. Terminal.
pub const INVITATION_ACCEPTED: &str = "accepted";

/// Lawyer declined. Terminal.
pub const INVITATION_DECLINED: &str = "declined";

/// The response window lapsed before a response arrived. Terminal.
pub const INVITATION_EXPIRED: &str = "expired";

/// Response verbs accepted by the respond endpoint.
pub const RESPONSE_ACCEPT: &str = "accept";
pub const RESPONSE_DECLINE: &str = "decline";

pub const VALID_RESPONSES: &[&str] = &[RESPONSE_ACCEPT, RESPONSE_DECLINE];

/// How long an invitation stays open.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Length of the generated confirmation token.
pub const TOKEN_LENGTH: usize = 32;

/// Compute the expiry instant for an invitation created at `created_at`.
pub fn expiry_for(created_at: Timestamp) -> Timestamp {
    created_at + Duration::days(INVITATION_TTL_DAYS)
}

/// Whether an invitation with the given expiry has lapsed at `now`.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now > expires_at
}

/// Generate an opaque confirmation token.
///
/// Stored with the invitation and reserved for email confirmation links; no
/// flow here validates it.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Validate that a response string is one of the accepted values.
pub fn validate_response(response: &str) -> Result<(), String> {
    if VALID_RESPONSES.contains(&response) {
        Ok(())
    } else {
        Err(format!(
            "Invalid response '{response}'. Must be one of: {}",
            VALID_RESPONSES.join(", ")
        ))
    }
}

//! Profile publication status constants.

/// Profile exists but has never been approved for public display.
pub const PROFILE_DRAFT: &str = "draft";

/// First submission is with the moderation queue.
pub const PROFILE_PENDING: &str = "pending";

/// Profile is publicly visible.
pub const PROFILE_PUBLISHED: &str = "published";

pub const VALID_PROFILE_STATUSES: &[&str] = &[PROFILE_DRAFT, PROFILE_PENDING, PROFILE_PUBLISHED];

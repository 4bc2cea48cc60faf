//! Client review validation rules and moderation status constants.

/// Review awaits moderation. Not publicly visible.
pub const REVIEW_PENDING: &str = "pending";

/// Review passed moderation and counts toward the lawyer's rating.
pub const REVIEW_APPROVED: &str = "approved";

/// Review failed moderation. Terminal, never shown.
pub const REVIEW_REJECTED: &str = "rejected";

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

/// Minimum length for a review comment.
pub const MIN_COMMENT_LENGTH: usize = 10;

/// Minimum length for a lawyer's public response to a review.
pub const MIN_RESPONSE_LENGTH: usize = 10;

/// Validate a star rating.
pub fn validate_rating(rating: i32) -> Result<(), String> {
    if (RATING_MIN..=RATING_MAX).contains(&rating) {
        Ok(())
    } else {
        Err(format!(
            "Rating must be between {RATING_MIN} and {RATING_MAX}, got {rating}"
        ))
    }
}

/// Validate a review comment body.
pub fn validate_comment(comment: &str) -> Result<(), String> {
    if comment.trim().len() < MIN_COMMENT_LENGTH {
        Err(format!(
            "Comment must be at least {MIN_COMMENT_LENGTH} characters"
        ))
    } else {
        Ok(())
    }
}

/// Validate a lawyer's response to a review.
pub fn validate_response_text(response: &str) -> Result<(), String> {
    if response.trim().len() < MIN_RESPONSE_LENGTH {
        Err(format!(
            "Response must be at least {MIN_RESPONSE_LENGTH} characters"
        ))
    } else {
        Ok(())
    }
}

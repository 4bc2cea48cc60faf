//! URL slug generation for public profile pages.
//!
//! `slugify` produces the base form; callers that need uniqueness walk the
//! numbered candidates and fall back to a timestamp suffix when the sequence
//! is exhausted.

use crate::types::Timestamp;

/// Highest numeric suffix tried before falling back to a timestamp.
pub const MAX_NUMBERED_CANDIDATES: u32 = 50;

/// Convert a display name into a URL-safe slug.
///
/// Lowercases, keeps ASCII alphanumerics, collapses every run of other
/// characters into a single hyphen, and trims leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use ausverity_core::slug::slugify;
///
/// assert_eq!(slugify("Hartley & Associates"), "hartley-associates");
/// assert_eq!(slugify("  Jane  O'Brien  "), "jane-o-brien");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// The `n`-th disambiguation candidate for a base slug: `{base}-{n}`.
pub fn numbered_candidate(base: &str, n: u32) -> String {
    format!("{base}-{n}")
}

/// Last-resort candidate when every numbered slug is taken.
pub fn timestamp_candidate(base: &str, now: Timestamp) -> String {
    format!("{base}-{}", now.timestamp())
}

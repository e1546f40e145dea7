//! URL-safe slug generation for scrapbooks and posts.
//!
//! A slug is derived from the entity title once at creation and never
//! regenerated. When the base slug is already taken, an 8-hex-character
//! random suffix is appended. The suffix entropy makes a second collision
//! astronomically unlikely; the database unique constraint on the slug
//! column is the authoritative backstop, and inserts retry once on the
//! residual conflict.

use uuid::Uuid;

/// Number of random hex characters appended on collision.
const SUFFIX_LEN: usize = 8;

/// Derive a URL-safe slug from a title.
///
/// Lowercases the trimmed title and collapses every run of
/// non-alphanumeric characters into a single hyphen. Leading and trailing
/// hyphens are dropped.
///
/// ```
/// use keepsake_core::slug::slugify;
///
/// assert_eq!(slugify("Test Scrapbook"), "test-scrapbook");
/// assert_eq!(slugify("  Rock & Roll!  "), "rock-roll");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Generate an 8-character lowercase-hex suffix from a UUID v4.
pub fn random_suffix() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..SUFFIX_LEN].to_string()
}

/// Append a fresh random suffix to a base slug.
pub fn with_suffix(base: &str) -> String {
    format!("{base}-{}", random_suffix())
}

//! URL slug generation.
//!
//! Slugs are lower-case ASCII alphanumerics separated by single hyphens.

/// Convert arbitrary text into a URL-safe slug.
///
/// Lower-cases the input, collapses every run of characters outside
/// `[a-z0-9]` into one `-`, and trims hyphens from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Decide the slug after a rename.
///
/// The slug follows the name until the user diverges from it. An empty slug
/// counts as still following.
pub fn follow_rename(current_slug: &str, previous_name: &str, new_name: &str) -> Option<String> {
    if current_slug.is_empty() || current_slug == slugify(previous_name) {
        Some(slugify(new_name))
    } else {
        None
    }
}

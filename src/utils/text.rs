//! Text normalization shared by filtering and embedding.

use unicode_normalization::UnicodeNormalization;

/// Fold text for case-insensitive comparison (NFKC, then lowercase).
#[must_use]
pub fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Returns true when the value is absent for filtering purposes.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Split a stored tag string (e.g. `"strict, project-based"`) into labels.
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

//! Output formatting utilities

/// Truncate a string to a maximum length
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return "...".to_string();
    }
    let trimmed = s.chars().take(max_len - 3).collect::<String>();
    format!("{trimmed}...")
}

/// Format a ranking score for tables: similarities keep three decimals,
/// quality scores two.
#[must_use]
pub fn format_score(score: f64, semantic: bool) -> String {
    if semantic {
        format!("{score:.3}")
    } else {
        format!("{score:.2}")
    }
}

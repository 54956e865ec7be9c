//! String utilities for the domain layer.

/// Truncate to at most `max_chars` characters, marking the cut with `...`.
///
/// Counts characters rather than bytes, so multi-byte text is never split.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("22°C and sunny", 7), "22°C...");
        assert_eq!(truncate("→→→→→", 4), "→...");
    }
}

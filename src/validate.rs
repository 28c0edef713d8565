//! Predicates used to reject malformed global or per-surface settings.

/// True when the string has at least one non-whitespace character.
pub fn non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// True when every entry is non-blank. An empty list passes.
pub fn all_non_blank<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().all(|v| non_blank(v.as_ref()))
}

/// True when the string holds no control characters such as line breaks.
///
/// Palette letters and words are written straight into frame rows, so a
/// line break inside one would split a row.
pub fn single_line(value: &str) -> bool {
    !value.chars().any(char::is_control)
}

/// True for finite numbers >= 0.
pub fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert!(non_blank("a"));
        assert!(non_blank("  a "));
        assert!(!non_blank(""));
        assert!(!non_blank(" \t\n"));
    }

    #[test]
    fn test_all_non_blank() {
        assert!(all_non_blank::<&str>(&[]));
        assert!(all_non_blank(&["one", "two"]));
        assert!(!all_non_blank(&["one", " "]));
        assert!(all_non_blank(&vec!["x".to_string()]));
    }

    #[test]
    fn test_single_line() {
        assert!(single_line("HELLO world"));
        assert!(single_line(""));
        assert!(!single_line("a\nb"));
        assert!(!single_line("tab\there"));
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(0.0));
        assert!(non_negative(12.5));
        assert!(!non_negative(-0.1));
        assert!(!non_negative(f64::NAN));
        assert!(!non_negative(f64::INFINITY));
    }
}

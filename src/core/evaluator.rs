//! Guess evaluator
//!
//! Deliberately strict: case-insensitive exact match after trimming, nothing
//! fuzzier. Any added leniency would change the observable game difficulty.

/// Does a submitted guess name the album?
pub fn evaluate(submitted: &str, album_title: &str) -> bool {
    submitted.trim().to_lowercase() == album_title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        assert!(evaluate("Abbey Road", "abbey road"));
        assert!(evaluate("ABBEY ROAD", "Abbey Road"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert!(evaluate(" Abbey Road ", "Abbey Road"));
        assert!(evaluate("Abbey Road", "  Abbey Road\n"));
    }

    #[test]
    fn test_no_partial_credit() {
        assert!(!evaluate("Abbey", "Abbey Road"));
        assert!(!evaluate("Abbey Roads", "Abbey Road"));
        assert!(!evaluate("", "Abbey Road"));
    }

    #[test]
    fn test_unicode_titles() {
        assert!(evaluate("björk", "BJÖRK"));
    }
}

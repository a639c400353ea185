//! Identifier checks.
//!
//! Every piece of caller-supplied text that ends up verbatim in the query
//! (identifiers, function names, cast types, aliases, value names) passes
//! through [`check_word`], or [`check_column`] for column references.
//! [`RawDangerous`](crate::RawDangerous) is the only way around them.

use crate::error::UnsafeError;

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.')
}

/// Checks that `s` is non-empty and contains only `[A-Za-z0-9_.]`.
///
/// # Errors
///
/// Returns [`UnsafeError`] naming the rejected text otherwise.
pub fn check_word(s: &str) -> Result<(), UnsafeError> {
    if s.is_empty() || !s.chars().all(is_word_char) {
        return Err(UnsafeError::new(s));
    }
    Ok(())
}

/// Checks every item of `words`, stopping at the first failure.
///
/// # Errors
///
/// Returns the [`UnsafeError`] of the first rejected item.
pub fn check_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Result<(), UnsafeError> {
    words.into_iter().try_for_each(check_word)
}

/// Checks a column reference: a word, `*` or `qualifier.*`.
///
/// # Errors
///
/// Returns [`UnsafeError`] naming the rejected text otherwise.
pub fn check_column(s: &str) -> Result<(), UnsafeError> {
    if s == "*" {
        return Ok(());
    }
    let word = s.strip_suffix(".*").unwrap_or(s);
    check_word(word).map_err(|_| UnsafeError::new(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers_pass() {
        assert!(check_word("first_name").is_ok());
        assert!(check_word("users.id").is_ok());
    }

    #[test]
    fn test_injection_attempts_fail() {
        for s in ["\"y\"", "a;b", "name'--", "a b", "x)", ";foobar", "ü"] {
            let err = check_word(s).unwrap_err();
            assert_eq!(err.value(), s);
        }
    }

    #[test]
    fn test_empty_fails() {
        assert!(check_word("").is_err());
        assert!(check_column("").is_err());
    }

    #[test]
    fn test_star_only_in_columns() {
        assert!(check_word("*").is_err());
        assert!(check_word("t1.*").is_err());

        assert!(check_column("*").is_ok());
        assert!(check_column("t1.*").is_ok());
        assert!(check_column("users.id").is_ok());
        for s in ["a*b", "**", ".*", "*.a", "x;.*"] {
            let err = check_column(s).unwrap_err();
            assert_eq!(err.value(), s);
        }
    }

    #[test]
    fn test_check_words_reports_first_failure() {
        assert!(check_words(["a", "b"]).is_ok());
        let err = check_words(["a", "b;", "c'"]).unwrap_err();
        assert_eq!(err.value(), "b;");
    }
}

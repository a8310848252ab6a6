//! The single definition of a "blank" input value.
//!
//! Form and search input arrives as optional text. A value is blank when it
//! is absent or empty. Validation additionally ignores surrounding
//! whitespace, while search tokens are matched verbatim.

/// Return `true` when `value` is absent or the empty string.
///
/// # Examples
/// ```
/// use scorebook::domain::is_blank;
///
/// assert!(is_blank(None));
/// assert!(is_blank(Some("")));
/// assert!(!is_blank(Some(" ")));
/// ```
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// Return `true` when `value` is absent, empty, or only whitespace.
pub fn is_blank_trimmed(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

/// Collapse blank values to `None`, keeping present values untouched.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, true)]
    #[case(Some(""), true)]
    #[case(Some("  "), false)]
    #[case(Some("Jo"), false)]
    fn blank_means_absent_or_empty(#[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_blank(value), expected);
    }

    #[rstest]
    #[case(Some("  "), true)]
    #[case(Some(" a "), false)]
    fn trimmed_blank_ignores_whitespace(#[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_blank_trimmed(value), expected);
    }

    #[rstest]
    fn present_drops_empty_strings() {
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("x".to_owned())), Some("x".to_owned()));
        assert_eq!(present(None), None);
    }
}

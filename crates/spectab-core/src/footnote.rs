//! Footnote name helpers.
//!
//! Footnote names look like `5.149` (ITU Radio Regulations), `US246`
//! (US table) or `(Not allocated)`. Bands injected from footnote rules
//! carry a trailing `#` on the footnote that generated them.

/// Strip the trailing `#` marker a footnote-derived band carries.
pub fn sanitize_footnote_name(footnote: &str) -> &str {
    footnote.strip_suffix('#').unwrap_or(footnote)
}

/// True if the footnote comes from the national (US) table rather than
/// the ITU Radio Regulations.
pub fn is_national_footnote(footnote: &str) -> bool {
    match footnote.chars().next() {
        Some(c) => c != '5' && c != '(',
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_one_marker() {
        assert_eq!(sanitize_footnote_name("5.149#"), "5.149");
        assert_eq!(sanitize_footnote_name("US246"), "US246");
    }

    #[test]
    fn national_footnotes() {
        assert!(is_national_footnote("US246"));
        assert!(is_national_footnote("NG338A"));
        assert!(!is_national_footnote("5.340"));
        assert!(!is_national_footnote("(Not allocated)"));
        assert!(!is_national_footnote(""));
    }
}

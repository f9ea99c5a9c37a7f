//! Field checks shared by the registration and application forms.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub const MOBILE_DIGITS: usize = 10;

/// Exactly ten ASCII digits, nothing else.
pub fn is_valid_mobile(value: &str) -> bool {
    value.len() == MOBILE_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld` with no whitespace and a single `@` separating the parts.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Returns the trimmed value, or `None` when missing or blank.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_requires_exactly_ten_ascii_digits() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("98765432101"));
        assert!(!is_valid_mobile("98765-4321"));
        assert!(!is_valid_mobile("+919876543"));
        assert!(!is_valid_mobile("٩٨٧٦٥٤٣٢١٠"));
    }

    #[test]
    fn email_shape_requires_local_domain_and_tld() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("JANE.DOE+jobs@mail.example.org"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("jane.x.com"));
        assert!(!is_valid_email("jane doe@x.com"));
        assert!(!is_valid_email("jane@@x.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("  JANE@X.com "), "jane@x.com");
    }

    #[test]
    fn present_filters_blank_values() {
        assert_eq!(present(Some("  hi ")), Some("hi"));
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(None), None);
    }
}

//! Smart content classification for clipboard text
//!
//! Categorizes copied text as URL, email or phone number so the UI can show
//! the right badge and actions. Classification is deterministic, has no side
//! effects and cannot fail: anything unrecognized is plain text.

use crate::interface::SmartContentType;
use once_cell::sync::Lazy;
use regex::Regex;

/// Email detection regex (whole-string match)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").unwrap()
});

/// Phone number detection regex: digits, spaces, hyphens, parentheses
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s\-()]{8,15}$").unwrap());

fn is_email(trimmed: &str) -> bool {
    EMAIL_REGEX.is_match(trimmed)
}

fn is_phone(trimmed: &str) -> bool {
    PHONE_REGEX.is_match(trimmed)
}

fn is_url(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Classify a text payload.
///
/// Input is trimmed of leading/trailing whitespace before every test; no
/// other normalization is applied (case folding only for the URL check).
/// First match wins, in the order email, phone number, URL.
pub fn classify(text: &str) -> SmartContentType {
    let trimmed = text.trim();

    if is_email(trimmed) {
        SmartContentType::Email
    } else if is_phone(trimmed) {
        SmartContentType::PhoneNumber
    } else if is_url(trimmed) {
        SmartContentType::Url
    } else {
        SmartContentType::Plain
    }
}

/// Classify a text payload (exported for the host UI)
#[uniffi::export]
pub fn classify_text(text: String) -> SmartContentType {
    classify(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_detection() {
        assert_eq!(classify("user@example.com"), SmartContentType::Email);
        assert_eq!(
            classify("user.name+tag@example.co.uk"),
            SmartContentType::Email
        );
        assert_eq!(classify("  test@example.com\n"), SmartContentType::Email);
        assert_eq!(classify("@example.com"), SmartContentType::Plain);
        assert_eq!(classify("not an email"), SmartContentType::Plain);
        // TLD must be 2-64 alpha characters
        assert_eq!(classify("user@example.c"), SmartContentType::Plain);
        assert_eq!(classify("user@example.c0m"), SmartContentType::Plain);
    }

    #[test]
    fn test_email_is_whole_match_not_substring() {
        assert_eq!(
            classify("contact me at user@example.com please"),
            SmartContentType::Plain
        );
    }

    #[test]
    fn test_phone_detection() {
        assert_eq!(classify("555-123-4567"), SmartContentType::PhoneNumber);
        assert_eq!(classify("(02) 1234 5678"), SmartContentType::PhoneNumber);
        assert_eq!(classify("01012345678"), SmartContentType::PhoneNumber);
        // Length bounds: 8-15 characters
        assert_eq!(classify("12345678"), SmartContentType::PhoneNumber);
        assert_eq!(classify("1234567"), SmartContentType::Plain);
        assert_eq!(classify("123456789012345"), SmartContentType::PhoneNumber);
        assert_eq!(classify("1234567890123456"), SmartContentType::Plain);
        // '+' is not in the allowed character set
        assert_eq!(classify("+1 555 123 4567"), SmartContentType::Plain);
    }

    #[test]
    fn test_url_detection() {
        assert_eq!(classify("https://example.com"), SmartContentType::Url);
        assert_eq!(
            classify("http://example.com/path?query=1"),
            SmartContentType::Url
        );
        assert_eq!(classify("HTTPS://EXAMPLE.COM"), SmartContentType::Url);
        assert_eq!(classify("  https://example.com  "), SmartContentType::Url);
        // No scheme, no match
        assert_eq!(classify("www.example.com"), SmartContentType::Plain);
        assert_eq!(classify("example.com"), SmartContentType::Plain);
        assert_eq!(classify("ftp://example.com"), SmartContentType::Plain);
    }

    #[test]
    fn test_precedence_order() {
        // An email never falls through to the phone or URL checks
        assert_eq!(classify("user@example.com"), SmartContentType::Email);
        // A URL containing an '@' is not a whole-string email match
        assert_eq!(
            classify("https://user@example.com/path"),
            SmartContentType::Url
        );
    }

    #[test]
    fn test_plain_fallback() {
        assert_eq!(classify(""), SmartContentType::Plain);
        assert_eq!(classify("   \n\t"), SmartContentType::Plain);
        assert_eq!(classify("Hello World"), SmartContentType::Plain);
    }
}

//! Country code type.

use std::fmt;

/// Error returned when parsing an invalid country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code: {reason}")]
pub struct InvalidCountryCode {
    reason: &'static str,
}

/// A valid ISO 3166-1 alpha-2 country code.
///
/// Country codes are always 2 uppercase ASCII letters. This type guarantees
/// that any `CountryCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use servicepoint_directory::domain::CountryCode;
///
/// let no = CountryCode::parse("NO").unwrap();
/// assert_eq!(no.as_str(), "NO");
///
/// // Lowercase is rejected
/// assert!(CountryCode::parse("no").is_err());
///
/// // Wrong length is rejected
/// assert!(CountryCode::parse("N").is_err());
/// assert!(CountryCode::parse("NOR").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a country code from a string.
    ///
    /// The input must be exactly 2 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCountryCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidCountryCode {
                reason: "must be exactly 2 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidCountryCode {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(CountryCode([bytes[0], bytes[1]]))
    }

    /// Returns the country code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating valid country codes: 2 uppercase ASCII letters
    fn valid_country_string() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Z]{2}").unwrap()
    }

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in valid_country_string()) {
            let code = CountryCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase strings are always rejected
        #[test]
        fn lowercase_rejected(s in "[a-z]{2}") {
            prop_assert!(CountryCode::parse(&s).is_err());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,1}|[A-Z]{3,8}") {
            prop_assert!(CountryCode::parse(&s).is_err());
        }
    }
}

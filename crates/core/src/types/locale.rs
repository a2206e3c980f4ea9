//! Buyer locale (language + country).
//!
//! Storefront URLs may start with a `/<language>-<country>` segment such as
//! `/en-ca` or `/fr-ca`. The pair is forwarded to the Storefront API through
//! the `@inContext(country:, language:)` directive so prices, availability
//! and translations match the buyer's market.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Locale`] path segment.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The segment is not of the form `xx-yy`.
    #[error("locale segment must look like `en-us`, got {0:?}")]
    Malformed(String),
}

/// A language/country pair, stored as uppercase ISO codes (`EN`, `US`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// ISO 639-1 language code, uppercase.
    pub language: String,
    /// ISO 3166-1 alpha-2 country code, uppercase.
    pub country: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "EN".to_string(),
            country: "US".to_string(),
        }
    }
}

impl Locale {
    /// Create a locale from language and country codes (any case).
    #[must_use]
    pub fn new(language: &str, country: &str) -> Self {
        Self {
            language: language.to_ascii_uppercase(),
            country: country.to_ascii_uppercase(),
        }
    }

    /// Parse a path segment such as `en-ca` (case-insensitive).
    ///
    /// ```
    /// use demo_store_core::Locale;
    ///
    /// let locale = Locale::parse_segment("fr-CA").unwrap();
    /// assert_eq!(locale.language, "FR");
    /// assert_eq!(locale.country, "CA");
    /// assert_eq!(locale.segment(), "fr-ca");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Malformed`] unless the segment is two ASCII
    /// letters, a dash, and two ASCII letters.
    pub fn parse_segment(segment: &str) -> Result<Self, LocaleError> {
        let malformed = || LocaleError::Malformed(segment.to_string());
        let (language, country) = segment.split_once('-').ok_or_else(malformed)?;
        let is_code = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic());
        if !is_code(language) || !is_code(country) {
            return Err(malformed());
        }
        Ok(Self::new(language, country))
    }

    /// The lowercase `xx-yy` path segment for this locale.
    #[must_use]
    pub fn segment(&self) -> String {
        format!(
            "{}-{}",
            self.language.to_ascii_lowercase(),
            self.country.to_ascii_lowercase()
        )
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language.to_ascii_lowercase(), self.country)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_en_us() {
        let locale = Locale::default();
        assert_eq!(locale.language, "EN");
        assert_eq!(locale.country, "US");
        assert_eq!(locale.to_string(), "en-US");
    }

    #[test]
    fn test_parse_segment_case_insensitive() {
        assert_eq!(
            Locale::parse_segment("EN-gb").unwrap(),
            Locale::new("en", "GB")
        );
    }

    #[test]
    fn test_parse_segment_rejects_malformed() {
        for bad in ["en", "english-us", "e1-us", "en_us", "", "-", "en-usa"] {
            assert!(Locale::parse_segment(bad).is_err(), "{bad} should fail");
        }
    }
}

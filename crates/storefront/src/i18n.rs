//! Localization: supported countries and the per-request locale.
//!
//! A request path may start with a `/<language>-<country>` segment. The
//! [`locale_middleware`] strips a supported prefix before routing and inserts
//! a [`RequestLocale`] into the request extensions; handlers extract it to
//! build `@inContext` variables and locale-prefixed links.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{Uri, request::Parts},
    middleware::Next,
    response::Response,
};
use demo_store_core::{CurrencyCode, Locale};
use serde::Serialize;

use crate::shopify::InContext;

/// A storefront market: language, country and display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub language: &'static str,
    pub country: &'static str,
    pub label: &'static str,
    pub currency: CurrencyCode,
}

/// The default market, served without a path prefix.
pub const DEFAULT_COUNTRY: Country = Country {
    language: "EN",
    country: "US",
    label: "United States (USD $)",
    currency: CurrencyCode::USD,
};

/// Markets reachable through a path prefix, keyed by that prefix.
pub const COUNTRIES: &[(&str, Country)] = &[
    (
        "/en-ca",
        Country {
            language: "EN",
            country: "CA",
            label: "Canada (CAD $)",
            currency: CurrencyCode::CAD,
        },
    ),
    (
        "/fr-ca",
        Country {
            language: "FR",
            country: "CA",
            label: "Canada (Français) (CAD $)",
            currency: CurrencyCode::CAD,
        },
    ),
    (
        "/en-gb",
        Country {
            language: "EN",
            country: "GB",
            label: "United Kingdom (GBP £)",
            currency: CurrencyCode::GBP,
        },
    ),
    (
        "/fr-fr",
        Country {
            language: "FR",
            country: "FR",
            label: "France (EUR €)",
            currency: CurrencyCode::EUR,
        },
    ),
    (
        "/de-de",
        Country {
            language: "DE",
            country: "DE",
            label: "Deutschland (EUR €)",
            currency: CurrencyCode::EUR,
        },
    ),
    (
        "/en-jp",
        Country {
            language: "EN",
            country: "JP",
            label: "Japan (JPY ¥)",
            currency: CurrencyCode::JPY,
        },
    ),
    (
        "/en-au",
        Country {
            language: "EN",
            country: "AU",
            label: "Australia (AUD $)",
            currency: CurrencyCode::AUD,
        },
    ),
    (
        "/es-es",
        Country {
            language: "ES",
            country: "ES",
            label: "España (EUR €)",
            currency: CurrencyCode::EUR,
        },
    ),
];

/// Look up a supported market by its first path segment (`en-ca`, any case).
#[must_use]
pub fn lookup_segment(segment: &str) -> Option<(&'static str, Country)> {
    let locale = Locale::parse_segment(segment).ok()?;
    COUNTRIES
        .iter()
        .find(|(_, c)| c.language == locale.language && c.country == locale.country)
        .copied()
}

/// Look up a market by country code, preferring the entry whose language
/// matches `language`.
#[must_use]
pub fn lookup_country(country: &str, language: &str) -> Option<(&'static str, Country)> {
    let country = country.to_ascii_uppercase();
    if country == DEFAULT_COUNTRY.country {
        return Some(("", DEFAULT_COUNTRY));
    }
    let language = language.to_ascii_uppercase();
    let mut matches = COUNTRIES.iter().filter(|(_, c)| c.country == country);
    let first = matches.clone().next().copied();
    matches
        .find(|(_, c)| c.language == language)
        .copied()
        .or(first)
}

/// The locale selected for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale {
    pub locale: Locale,
    pub label: &'static str,
    pub currency: CurrencyCode,
    /// `""` for the default market, otherwise e.g. `"/en-ca"`.
    pub path_prefix: &'static str,
}

impl Default for RequestLocale {
    fn default() -> Self {
        Self::from_country("", DEFAULT_COUNTRY)
    }
}

impl RequestLocale {
    fn from_country(path_prefix: &'static str, country: Country) -> Self {
        Self {
            locale: Locale::new(country.language, country.country),
            label: country.label,
            currency: country.currency,
            path_prefix,
        }
    }

    /// Prefix an internal path with this locale (`/products` → `/en-ca/products`).
    #[must_use]
    pub fn path(&self, path: &str) -> String {
        if self.path_prefix.is_empty() {
            return path.to_string();
        }
        if path == "/" || path.is_empty() {
            return self.path_prefix.to_string();
        }
        format!("{}{path}", self.path_prefix)
    }

    /// `@inContext` variables for this locale.
    #[must_use]
    pub fn in_context(&self) -> InContext {
        InContext::from(&self.locale)
    }
}

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}

/// Split a supported locale prefix off `path`.
///
/// Returns the locale and the remaining path (`/` when nothing remains), or
/// `None` when the first segment is not a supported market.
#[must_use]
pub fn strip_locale_prefix(path: &str) -> Option<(RequestLocale, String)> {
    let rest = path.strip_prefix('/')?;
    let (segment, remainder) = rest.split_once('/').map_or((rest, ""), |(s, r)| (s, r));
    let (prefix, country) = lookup_segment(segment)?;
    let remaining = format!("/{remainder}");
    Some((RequestLocale::from_country(prefix, country), remaining))
}

/// Middleware that resolves the request locale and strips its path prefix.
///
/// Must wrap the router (not be added with `Router::layer`) so the rewritten
/// URI is what gets routed.
pub async fn locale_middleware(mut request: Request, next: Next) -> Response {
    let stripped = strip_locale_prefix(request.uri().path());

    let locale = match stripped {
        Some((locale, path)) => {
            if let Some(uri) = rewrite_path(request.uri(), &path) {
                *request.uri_mut() = uri;
            }
            locale
        }
        None => RequestLocale::default(),
    };

    tracing::Span::current().record("locale", tracing::field::display(&locale.locale));
    request.extensions_mut().insert(locale);
    next.run(request).await
}

fn rewrite_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

/// A market as returned by `/api/countries`.
#[derive(Debug, Serialize)]
pub struct CountryJson {
    pub language: &'static str,
    pub country: &'static str,
    pub label: &'static str,
    pub currency: String,
}

impl From<Country> for CountryJson {
    fn from(c: Country) -> Self {
        Self {
            language: c.language,
            country: c.country,
            label: c.label,
            currency: c.currency.to_string(),
        }
    }
}

/// All supported markets keyed by path prefix (`default` for the root).
#[must_use]
pub fn countries_json() -> BTreeMap<&'static str, CountryJson> {
    std::iter::once(("default", DEFAULT_COUNTRY))
        .chain(COUNTRIES.iter().copied())
        .map(|(prefix, country)| (prefix, CountryJson::from(country)))
        .collect()
}

/// `GET /api/countries`
pub async fn countries() -> Json<BTreeMap<&'static str, CountryJson>> {
    Json(countries_json())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_locale_prefix() {
        let (locale, path) = strip_locale_prefix("/EN-ca/products/board").unwrap();
        assert_eq!(locale.locale, Locale::new("en", "ca"));
        assert_eq!(locale.path_prefix, "/en-ca");
        assert_eq!(locale.currency, CurrencyCode::CAD);
        assert_eq!(path, "/products/board");

        let (_, path) = strip_locale_prefix("/fr-ca").unwrap();
        assert_eq!(path, "/");
    }

    #[test]
    fn test_unknown_prefix_left_alone() {
        assert!(strip_locale_prefix("/xx-yy/products").is_none());
        assert!(strip_locale_prefix("/products").is_none());
        assert!(strip_locale_prefix("/en-us/products").is_none());
        assert!(strip_locale_prefix("/").is_none());
    }

    #[test]
    fn test_locale_path() {
        let default = RequestLocale::default();
        assert_eq!(default.path("/cart"), "/cart");

        let (ca, _) = strip_locale_prefix("/en-ca").unwrap();
        assert_eq!(ca.path("/cart"), "/en-ca/cart");
        assert_eq!(ca.path("/"), "/en-ca");
    }

    #[test]
    fn test_in_context() {
        let (fr, _) = strip_locale_prefix("/fr-ca/").unwrap();
        let ctx = fr.in_context();
        assert_eq!(ctx.country, "CA");
        assert_eq!(ctx.language, "FR");
    }

    #[test]
    fn test_lookup_country_prefers_language() {
        assert_eq!(lookup_country("ca", "fr").unwrap().0, "/fr-ca");
        assert_eq!(lookup_country("CA", "de").unwrap().0, "/en-ca");
        assert_eq!(lookup_country("US", "EN").unwrap().0, "");
        assert!(lookup_country("ZZ", "EN").is_none());
    }

    #[test]
    fn test_rewrite_keeps_query() {
        let uri: Uri = "/en-ca/search?q=snow".parse().unwrap();
        let (_, path) = strip_locale_prefix(uri.path()).unwrap();
        let rewritten = rewrite_path(&uri, &path).unwrap();
        assert_eq!(rewritten.to_string(), "/search?q=snow");
    }

    #[test]
    fn test_countries_json_keys() {
        let json = countries_json();
        assert_eq!(json.len(), COUNTRIES.len() + 1);
        assert_eq!(json["default"].currency, "USD");
        assert_eq!(json["/en-gb"].label, "United Kingdom (GBP £)");
    }
}

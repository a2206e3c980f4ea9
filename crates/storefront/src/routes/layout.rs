//! The page shell every full page renders inside: shop name, header menu,
//! SEO tags and the country selector.
//!
//! Handlers load the `Layout` query alongside their own data:
//!
//! ```rust,ignore
//! let (layout, product) = tokio::try_join!(
//!     page.layout(&state),
//!     state.storefront().product(&handle, &options, page.ctx()),
//! )?;
//! let shell = page.shell(&state, &layout, seo);
//! ```

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    response::IntoResponse,
};
use tracing::instrument;

use super::is_local_path;
use crate::catalog::QueryParams;
use crate::error::Result;
use crate::i18n::{COUNTRIES, DEFAULT_COUNTRY, RequestLocale};
use crate::menu::{MenuContext, MenuLink, parse_menu};
use crate::middleware::CspNonce;
use crate::seo::{PageSeo, canonical_url};
use crate::shopify::queries::LayoutData;
use crate::shopify::{InContext, Menu, ShopifyError};
use crate::state::AppState;

/// Everything a full-page handler needs from the request besides its own
/// parameters.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub locale: RequestLocale,
    ctx: InContext,
    pub nonce: String,
    /// Path and query with the locale prefix already stripped.
    pub path: String,
}

impl<S> FromRequestParts<S> for PageRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let locale = RequestLocale::from_request_parts(parts, state).await?;
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, state).await?;
        let path = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);
        Ok(Self {
            ctx: locale.in_context(),
            locale,
            nonce,
            path,
        })
    }
}

impl PageRequest {
    /// `@inContext` variables for this request.
    #[must_use]
    pub const fn ctx(&self) -> &InContext {
        &self.ctx
    }

    /// Locale-prefixed internal link.
    #[must_use]
    pub fn link(&self, path: &str) -> String {
        self.locale.path(path)
    }

    /// Absolute URL of an (unprefixed) storefront path in this locale.
    #[must_use]
    pub fn canonical(&self, state: &AppState, path: &str) -> String {
        canonical_url(&state.config().base_url, &self.locale.path(path))
    }

    /// The layout query (cached long).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn layout(&self, state: &AppState) -> std::result::Result<LayoutData, ShopifyError> {
        state.storefront().layout(&self.ctx).await
    }

    /// Assemble the shell for a page.
    #[must_use]
    pub fn shell(&self, state: &AppState, layout: &LayoutData, seo: PageSeo) -> Shell {
        let shop_name = layout.shop.name.clone();
        Shell {
            prefix: self.locale.path_prefix.to_string(),
            lang: self.locale.locale.language.to_ascii_lowercase(),
            title: seo.title_tag(&shop_name),
            description: seo.description,
            canonical: seo.canonical,
            json_ld: seo.json_ld,
            header_menu: menu_links(state, layout, layout.header_menu.as_ref(), &self.locale),
            shop_name,
            nonce: self.nonce.clone(),
            locale_label: self.locale.label,
            countries: country_options(&self.locale, &self.path),
            footer_src: format!(
                "{}/fragments/footer?from={}",
                self.locale.path_prefix,
                urlencoding::encode(&self.path)
            ),
        }
    }
}

fn menu_links(
    state: &AppState,
    layout: &LayoutData,
    menu: Option<&Menu>,
    locale: &RequestLocale,
) -> Vec<MenuLink> {
    menu.map(|menu| {
        parse_menu(
            &menu.items,
            &MenuContext {
                store_domain: &state.config().storefront_api.store_domain,
                primary_domain_url: &layout.shop.primary_domain.url,
                locale,
            },
        )
    })
    .unwrap_or_default()
}

/// One entry in the country selector; each posts its own buyer identity
/// update.
#[derive(Debug, Clone)]
pub struct CountryOption {
    pub label: &'static str,
    pub country_code: &'static str,
    /// The current page under this country's prefix.
    pub redirect_to: String,
    pub selected: bool,
}

fn country_options(current: &RequestLocale, path: &str) -> Vec<CountryOption> {
    let path = if path.is_empty() { "/" } else { path };
    std::iter::once(("", DEFAULT_COUNTRY))
        .chain(COUNTRIES.iter().copied())
        .map(|(prefix, country)| CountryOption {
            label: country.label,
            country_code: country.country,
            redirect_to: if prefix.is_empty() {
                path.to_string()
            } else if path == "/" {
                prefix.to_string()
            } else {
                format!("{prefix}{path}")
            },
            selected: prefix == current.path_prefix,
        })
        .collect()
}

/// Shared data rendered by `base.html`.
#[derive(Debug, Clone)]
pub struct Shell {
    /// Locale path prefix (`""` or `/en-ca`).
    pub prefix: String,
    /// `<html lang>`.
    pub lang: String,
    pub shop_name: String,
    /// Full `<title>` text.
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub json_ld: Vec<String>,
    pub header_menu: Vec<MenuLink>,
    pub nonce: String,
    pub locale_label: &'static str,
    pub countries: Vec<CountryOption>,
    /// URL of the deferred footer fragment.
    pub footer_src: String,
}

// =============================================================================
// Footer fragment
// =============================================================================

/// Deferred footer: the footer menu plus the country selector.
#[derive(Template, WebTemplate)]
#[template(path = "partials/footer.html")]
pub struct FooterTemplate {
    pub shop_name: String,
    pub menu: Vec<MenuLink>,
    pub prefix: String,
    pub locale_label: &'static str,
    pub countries: Vec<CountryOption>,
}

/// `GET /fragments/footer`
///
/// The `from` query parameter carries the page path so the country selector
/// can return there.
#[instrument(skip(state, page))]
pub async fn footer(
    State(state): State<AppState>,
    page: PageRequest,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let layout = page.layout(&state).await?;
    let from = params
        .get("from")
        .filter(|from| is_local_path(from))
        .unwrap_or("/");
    Ok(FooterTemplate {
        menu: menu_links(&state, &layout, layout.footer_menu.as_ref(), &page.locale),
        shop_name: layout.shop.name,
        prefix: page.locale.path_prefix.to_string(),
        locale_label: page.locale.label,
        countries: country_options(&page.locale, from),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::i18n::strip_locale_prefix;

    #[test]
    fn test_country_options_keep_path() {
        let options = country_options(&RequestLocale::default(), "/products/board?Size=154");
        assert!(options[0].selected);
        assert_eq!(options[0].redirect_to, "/products/board?Size=154");
        let fr = options.iter().find(|o| o.redirect_to.starts_with("/fr-ca")).unwrap();
        assert_eq!(fr.redirect_to, "/fr-ca/products/board?Size=154");
        assert_eq!(fr.country_code, "CA");
    }

    #[test]
    fn test_country_options_root() {
        let (gb, _) = strip_locale_prefix("/en-gb").unwrap();
        let options = country_options(&gb, "/");
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].redirect_to, "/en-gb");
        assert_eq!(options[0].redirect_to, "/");
    }
}

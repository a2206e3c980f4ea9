//! Home page and its deferred fragments.
//!
//! The primary hero and featured products render with the page. The
//! secondary and tertiary heroes and the featured collections arrive as
//! fragments after load.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use super::views::{CollectionCard, ImageView, ProductCard};
use crate::error::Result;
use crate::filters;
use crate::i18n::RequestLocale;
use crate::seo::{PageSeo, organization_json_ld};
use crate::shopify::{HeroCollection, Metafield};
use crate::state::AppState;

/// Collection shown as the primary hero.
pub const PRIMARY_HERO_HANDLE: &str = "freestyle";
/// Collection shown as the secondary hero.
pub const SECONDARY_HERO_HANDLE: &str = "backcountry";
/// Collection shown as the tertiary hero.
pub const TERTIARY_HERO_HANDLE: &str = "winter-2022";

/// A hero banner built from a collection's `hero.*` metafields.
#[derive(Debug, Clone)]
pub struct HeroView {
    pub href: String,
    pub heading: String,
    pub byline: Option<String>,
    pub cta: Option<String>,
    pub spread: Option<ImageView>,
    pub spread_secondary: Option<ImageView>,
    /// The primary hero is above the fold and loads eagerly.
    pub eager: bool,
}

fn metafield_text(field: Option<&Metafield>) -> Option<String> {
    field
        .map(|f| f.value.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn metafield_image(field: Option<&Metafield>, alt: &str) -> Option<ImageView> {
    field
        .and_then(|f| f.reference.as_ref())
        .and_then(|r| r.image.as_ref())
        .map(|image| ImageView::hero(image, alt))
}

impl HeroView {
    #[must_use]
    pub fn new(hero: &HeroCollection, locale: &RequestLocale, eager: bool) -> Self {
        let heading = metafield_text(hero.heading.as_ref()).unwrap_or_else(|| hero.title.clone());
        Self {
            href: locale.path(&format!("/collections/{}", hero.handle)),
            byline: metafield_text(hero.byline.as_ref()),
            cta: metafield_text(hero.cta.as_ref()),
            spread: metafield_image(hero.spread.as_ref(), &heading),
            spread_secondary: metafield_image(hero.spread_secondary.as_ref(), &heading),
            heading,
            eager,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: Shell,
    pub hero: Option<HeroView>,
    pub featured_products: Vec<ProductCard>,
    pub secondary_hero_src: String,
    pub tertiary_hero_src: String,
    pub featured_collections_src: String,
}

/// Deferred hero fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/hero.html")]
pub struct HeroTemplate {
    pub hero: Option<HeroView>,
}

/// Deferred featured collections fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/featured_collections.html")]
pub struct FeaturedCollectionsTemplate {
    pub title: &'static str,
    pub collections: Vec<CollectionCard>,
}

/// Featured collections and products (`/featured-products`), used wherever
/// a page has nothing else to show.
#[derive(Template, WebTemplate)]
#[template(path = "partials/featured_items.html")]
pub struct FeaturedItemsTemplate {
    pub collections: Vec<CollectionCard>,
    pub products: Vec<ProductCard>,
}

/// `GET /`
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageRequest) -> Result<impl IntoResponse> {
    let ctx = page.ctx();
    let storefront = state.storefront();
    let (layout, seo_data, products) = tokio::try_join!(
        page.layout(&state),
        storefront.homepage_seo(PRIMARY_HERO_HANDLE, ctx),
        storefront.featured_products(ctx),
    )?;

    let shop = &seo_data.shop;
    let seo = PageSeo::new(
        shop.name.clone(),
        shop.description.as_deref().unwrap_or_default(),
        page.canonical(&state, "/"),
    )
    .with_json_ld(&organization_json_ld(&shop.name, &state.config().base_url));

    let hero_src = |handle: &str| page.link(&format!("/fragments/home/hero/{handle}"));
    Ok(HomeTemplate {
        hero: seo_data
            .hero
            .as_ref()
            .map(|hero| HeroView::new(hero, &page.locale, true)),
        featured_products: ProductCard::list(&products, &page.locale),
        secondary_hero_src: hero_src(SECONDARY_HERO_HANDLE),
        tertiary_hero_src: hero_src(TERTIARY_HERO_HANDLE),
        featured_collections_src: page.link("/fragments/home/featured-collections"),
        shell: page.shell(&state, &layout, seo),
    })
}

/// `GET /fragments/home/hero/{handle}`
#[instrument(skip(state, locale))]
pub async fn hero(
    State(state): State<AppState>,
    locale: RequestLocale,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let hero = state
        .storefront()
        .hero_collection(&handle, &locale.in_context())
        .await?;
    Ok(HeroTemplate {
        hero: hero.as_ref().map(|h| HeroView::new(h, &locale, false)),
    })
}

/// `GET /fragments/home/featured-collections`
#[instrument(skip(state, locale))]
pub async fn featured_collections(
    State(state): State<AppState>,
    locale: RequestLocale,
) -> Result<impl IntoResponse> {
    let collections = state
        .storefront()
        .featured_collections(&locale.in_context())
        .await?;
    Ok(FeaturedCollectionsTemplate {
        title: "Collections",
        collections: CollectionCard::list(&collections, &locale),
    })
}

/// `GET /featured-products`
#[instrument(skip(state, locale))]
pub async fn featured_items(
    State(state): State<AppState>,
    locale: RequestLocale,
) -> Result<impl IntoResponse> {
    let data = state.storefront().featured_items(&locale.in_context()).await?;
    Ok(FeaturedItemsTemplate {
        collections: CollectionCard::list(&data.featured_collections.nodes, &locale),
        products: ProductCard::list(&data.featured_products.nodes, &locale),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_hero_view_from_metafields() {
        let hero: HeroCollection = serde_json::from_value(json!({
            "id": "gid://shopify/Collection/1",
            "handle": "freestyle",
            "title": "Freestyle",
            "heading": {"value": "All Mountain All Season"},
            "byline": {"value": "  "},
            "cta": {"value": "Shop now"},
            "spread": {"reference": {"image": {"url": "https://cdn.shopify.com/hero.jpg"}}},
            "spreadSecondary": null
        }))
        .unwrap();
        let view = HeroView::new(&hero, &RequestLocale::default(), true);
        assert_eq!(view.href, "/collections/freestyle");
        assert_eq!(view.heading, "All Mountain All Season");
        assert_eq!(view.byline, None);
        assert_eq!(view.cta.as_deref(), Some("Shop now"));
        assert_eq!(view.spread.unwrap().alt, "All Mountain All Season");
        assert!(view.spread_secondary.is_none());
    }

    #[test]
    fn test_hero_heading_falls_back_to_title() {
        let hero: HeroCollection = serde_json::from_value(json!({
            "id": "gid://shopify/Collection/2",
            "handle": "backcountry",
            "title": "Backcountry"
        }))
        .unwrap();
        assert_eq!(HeroView::new(&hero, &RequestLocale::default(), false).heading, "Backcountry");
    }
}

//! View models shared by several pages.
//!
//! Templates receive plain structs with preformatted strings; nothing in a
//! template formats money or builds URLs.

use chrono::{DateTime, Duration, Utc};
use url::Url;

use crate::i18n::RequestLocale;
use crate::shopify::{Collection, Image, Money, Product, ProductVariant};

/// Widths offered in `srcset` for product and collection cards.
const CARD_WIDTHS: [u32; 4] = [320, 460, 640, 920];
/// Widths offered in `srcset` for full-bleed hero images.
const HERO_WIDTHS: [u32; 5] = [640, 960, 1280, 1600, 2000];
/// Products published within this many days are labelled "New".
const NEW_ARRIVAL_DAYS: i64 = 30;

/// A CDN image with responsive sources.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    pub srcset: String,
    pub width: i64,
    pub height: i64,
}

impl ImageView {
    fn with_widths(image: &Image, widths: &[u32], fallback_alt: &str) -> Self {
        let srcset = widths
            .iter()
            .map(|w| format!("{} {w}w", sized_url(&image.url, *w)))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            url: sized_url(&image.url, widths.first().copied().unwrap_or(640)),
            alt: image
                .alt_text
                .clone()
                .filter(|alt| !alt.is_empty())
                .unwrap_or_else(|| fallback_alt.to_string()),
            srcset,
            width: image.width.unwrap_or_default(),
            height: image.height.unwrap_or_default(),
        }
    }

    /// Card-sized sources.
    #[must_use]
    pub fn card(image: &Image, fallback_alt: &str) -> Self {
        Self::with_widths(image, &CARD_WIDTHS, fallback_alt)
    }

    /// Full-width sources.
    #[must_use]
    pub fn hero(image: &Image, fallback_alt: &str) -> Self {
        Self::with_widths(image, &HERO_WIDTHS, fallback_alt)
    }
}

/// The CDN URL resized to `width` via the `width` query parameter.
#[must_use]
pub fn sized_url(url: &str, width: u32) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != "width")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("width", &width.to_string());
    parsed.to_string()
}

/// Compare-at price when it is higher than the price.
fn compare_at(price: &Money, compare: Option<&Money>) -> Option<String> {
    let compare = compare?;
    let (Ok(p), Ok(c)) = (
        price.amount.parse::<f64>(),
        compare.amount.parse::<f64>(),
    ) else {
        return None;
    };
    (c > p).then(|| compare.display())
}

/// Card label: "Sale", "Sold out", "New" or nothing.
fn card_label(variant: Option<&ProductVariant>, published_at: Option<&str>, now: DateTime<Utc>) -> Option<&'static str> {
    if let Some(variant) = variant {
        if variant.is_on_sale() {
            return Some("Sale");
        }
        if !variant.available_for_sale {
            return Some("Sold out");
        }
    }
    let published = DateTime::parse_from_rfc3339(published_at?).ok()?;
    (now - published.with_timezone(&Utc) < Duration::days(NEW_ARRIVAL_DAYS)).then_some("New")
}

/// A product in a grid.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub href: String,
    pub title: String,
    pub image: Option<ImageView>,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub label: Option<&'static str>,
    /// First variant, for quick add.
    pub variant_id: Option<String>,
    pub available: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, locale: &RequestLocale) -> Self {
        let variant = product.display_variant();
        Self {
            href: locale.path(&format!("/products/{}", product.handle)),
            title: product.title.clone(),
            image: product
                .card_image()
                .map(|image| ImageView::card(image, &product.title)),
            price: variant.map(|v| v.price.display()).unwrap_or_default(),
            compare_at_price: variant
                .and_then(|v| compare_at(&v.price, v.compare_at_price.as_ref())),
            label: card_label(variant, product.published_at.as_deref(), Utc::now()),
            variant_id: variant.map(|v| v.id.clone()),
            available: variant.is_some_and(|v| v.available_for_sale),
        }
    }

    /// Cards for a list of products.
    #[must_use]
    pub fn list(products: &[Product], locale: &RequestLocale) -> Vec<Self> {
        products.iter().map(|p| Self::new(p, locale)).collect()
    }
}

/// A collection in a grid.
#[derive(Debug, Clone)]
pub struct CollectionCard {
    pub href: String,
    pub title: String,
    pub image: Option<ImageView>,
}

impl CollectionCard {
    #[must_use]
    pub fn new(collection: &Collection, locale: &RequestLocale) -> Self {
        Self {
            href: locale.path(&format!("/collections/{}", collection.handle)),
            title: collection.title.clone(),
            image: collection
                .image
                .as_ref()
                .map(|image| ImageView::card(image, &collection.title)),
        }
    }

    #[must_use]
    pub fn list(collections: &[Collection], locale: &RequestLocale) -> Vec<Self> {
        collections.iter().map(|c| Self::new(c, locale)).collect()
    }
}

/// "March 3, 2023" from an ISO 8601 timestamp; the raw value if unparseable.
#[must_use]
pub fn format_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |date| date.format("%B %-d, %Y").to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(published_at: &str, price: &str, compare: Option<&str>, available: bool) -> Product {
        serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "handle": "board",
            "title": "Board",
            "publishedAt": published_at,
            "featuredImage": {"url": "https://cdn.shopify.com/board.jpg?v=1", "altText": ""},
            "variants": {"nodes": [{
                "id": "gid://shopify/ProductVariant/1",
                "title": "154cm",
                "availableForSale": available,
                "price": {"amount": price, "currencyCode": "USD"},
                "compareAtPrice": compare.map(|c| json!({"amount": c, "currencyCode": "USD"}))
            }]}
        }))
        .unwrap()
    }

    #[test]
    fn test_sized_url_replaces_width() {
        assert_eq!(
            sized_url("https://cdn.shopify.com/a.jpg?v=1&width=100", 640),
            "https://cdn.shopify.com/a.jpg?v=1&width=640"
        );
        assert_eq!(sized_url("not a url", 640), "not a url");
    }

    #[test]
    fn test_product_card_sale() {
        let (ca, _) = crate::i18n::strip_locale_prefix("/en-ca").unwrap();
        let card = ProductCard::new(&product("2020-01-01T00:00:00Z", "80.0", Some("100.0"), true), &ca);
        assert_eq!(card.href, "/en-ca/products/board");
        assert_eq!(card.price, "$80.00");
        assert_eq!(card.compare_at_price.as_deref(), Some("$100.00"));
        assert_eq!(card.label, Some("Sale"));
        let image = card.image.unwrap();
        assert_eq!(image.alt, "Board");
        assert!(image.srcset.contains("width=920 920w"));
    }

    #[test]
    fn test_card_labels() {
        let now = Utc::now();
        let recent = (now - Duration::days(2)).to_rfc3339();
        let p = product(&recent, "10.0", None, true);
        assert_eq!(card_label(p.display_variant(), p.published_at.as_deref(), now), Some("New"));

        let p = product("2020-01-01T00:00:00Z", "10.0", None, false);
        assert_eq!(card_label(p.display_variant(), p.published_at.as_deref(), now), Some("Sold out"));

        let p = product("2020-01-01T00:00:00Z", "10.0", None, true);
        assert_eq!(card_label(p.display_variant(), p.published_at.as_deref(), now), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2023-03-03T12:00:00Z"), "March 3, 2023");
        assert_eq!(format_date("soon"), "soon");
    }
}

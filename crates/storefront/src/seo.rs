//! Page SEO: titles, meta descriptions, canonical URLs and JSON-LD.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use crate::shopify::{Article, Collection, Product};

/// Maximum meta description length.
pub const DESCRIPTION_MAX_CHARS: usize = 155;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// SEO metadata for one rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageSeo {
    /// Page title without the shop suffix.
    pub title: String,
    /// Meta description, already truncated.
    pub description: String,
    /// Absolute canonical URL.
    pub canonical: String,
    /// Serialized JSON-LD documents.
    pub json_ld: Vec<String>,
}

impl PageSeo {
    #[must_use]
    pub fn new(title: impl Into<String>, description: &str, canonical: String) -> Self {
        Self {
            title: title.into(),
            description: meta_description(description),
            canonical,
            json_ld: Vec::new(),
        }
    }

    /// Attach a JSON-LD document.
    #[must_use]
    pub fn with_json_ld(mut self, value: &Value) -> Self {
        self.json_ld.push(json_ld_script(value));
        self
    }

    /// The `<title>` text: `{title} | {shop}`, or just the shop name.
    #[must_use]
    pub fn title_tag(&self, shop_name: &str) -> String {
        if self.title.is_empty() || self.title == shop_name {
            shop_name.to_string()
        } else {
            format!("{} | {shop_name}", self.title)
        }
    }
}

/// Strip tags and collapse whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let text = TAG_RE.replace_all(html, " ");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// A meta description from plain text or HTML, cut on a word boundary.
#[must_use]
pub fn meta_description(text: &str) -> String {
    truncate_words(&strip_html(text), DESCRIPTION_MAX_CHARS)
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    trimmed.trim_end_matches([',', '.', ';', ':']).to_string()
}

/// Absolute URL for a storefront path.
#[must_use]
pub fn canonical_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Serialize JSON-LD for an inline `<script>`, so a `</script>` inside a
/// string value cannot close the element.
#[must_use]
pub fn json_ld_script(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// `Product` with an `Offer` for the displayed variant.
#[must_use]
pub fn product_json_ld(product: &Product, url: &str) -> Value {
    let variant = product.display_variant();
    let image: Vec<&str> = product
        .card_image()
        .map(|image| image.url.as_str())
        .into_iter()
        .collect();
    let offers: Vec<Value> = variant
        .map(|variant| {
            json!({
                "@type": "Offer",
                "availability": if variant.available_for_sale {
                    "https://schema.org/InStock"
                } else {
                    "https://schema.org/OutOfStock"
                },
                "price": variant.price.amount.parse::<f64>().unwrap_or_default(),
                "priceCurrency": variant.price.currency_code,
                "sku": variant.sku.clone().unwrap_or_default(),
                "url": url,
            })
        })
        .into_iter()
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "Product",
        "brand": {"@type": "Brand", "name": product.vendor},
        "description": meta_description(&product.description),
        "image": image,
        "name": product.title,
        "offers": offers,
        "sku": variant.and_then(|v| v.sku.clone()).unwrap_or_default(),
        "url": url,
    })
}

/// `CollectionPage` with an `ItemList` of the listed products.
#[must_use]
pub fn collection_json_ld(
    collection: &Collection,
    url: &str,
    product_url: impl Fn(&Product) -> String,
) -> Value {
    let items: Vec<Value> = collection
        .products
        .nodes
        .iter()
        .enumerate()
        .map(|(i, product)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "url": product_url(product),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "CollectionPage",
        "name": collection.title,
        "description": meta_description(&collection.description),
        "image": collection.image.as_ref().map(|image| image.url.as_str()),
        "url": url,
        "mainEntity": {"@type": "ItemList", "itemListElement": items},
    })
}

/// `BlogPosting` for a journal article.
#[must_use]
pub fn article_json_ld(article: &Article, url: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": article.title,
        "articleBody": strip_html(&article.content_html),
        "datePublished": article.published_at,
        "description": meta_description(&article.content_html),
        "author": article.author.as_ref().map(|author| json!({"@type": "Person", "name": author.name})),
        "image": article.image.as_ref().map(|image| image.url.as_str()),
        "url": url,
    })
}

/// `BreadcrumbList` from `(name, absolute url)` pairs.
#[must_use]
pub fn breadcrumbs_json_ld(crumbs: &[(&str, String)]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(i, (name, item))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": item,
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// `Organization` with a site search action, for the home page.
#[must_use]
pub fn organization_json_ld(shop_name: &str, base_url: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": shop_name,
        "url": canonical_url(base_url, "/"),
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{}?q={{search_term}}", canonical_url(base_url, "/search")),
            "query": "required name='search_term'",
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_title_tag() {
        let seo = PageSeo::new("Snowboards", "", String::new());
        assert_eq!(seo.title_tag("Hydrogen"), "Snowboards | Hydrogen");
        assert_eq!(PageSeo::default().title_tag("Hydrogen"), "Hydrogen");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Fresh <strong>powder</strong></p>\n<p>all day</p>"),
            "Fresh powder all day"
        );
    }

    #[test]
    fn test_description_truncates_on_word_boundary() {
        let text = "word ".repeat(60);
        let description = meta_description(&text);
        assert!(description.chars().count() <= DESCRIPTION_MAX_CHARS);
        assert!(description.ends_with("word"));

        assert_eq!(meta_description("Short one."), "Short one.");
    }

    #[test]
    fn test_canonical_url() {
        assert_eq!(
            canonical_url("https://shop.example.com/", "/en-ca/products"),
            "https://shop.example.com/en-ca/products"
        );
        assert_eq!(canonical_url("https://shop.example.com", "pages/about"), "https://shop.example.com/pages/about");
    }

    #[test]
    fn test_json_ld_script_escapes_closing_tags() {
        let script = json_ld_script(&json!({"name": "</script><script>alert(1)"}));
        assert!(!script.contains("</script>"));
    }

    #[test]
    fn test_product_json_ld() {
        let product: Product = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "handle": "board",
            "title": "Board",
            "vendor": "Snowdevil",
            "description": "A board.",
            "variants": {"nodes": [{
                "id": "gid://shopify/ProductVariant/1",
                "title": "154cm",
                "availableForSale": true,
                "sku": "B-154",
                "price": {"amount": "629.95", "currencyCode": "USD"}
            }]}
        }))
        .unwrap();
        let value = product_json_ld(&product, "https://shop.example.com/products/board");
        assert_eq!(value["@type"], "Product");
        assert_eq!(value["brand"]["name"], "Snowdevil");
        assert_eq!(value["offers"][0]["availability"], "https://schema.org/InStock");
        assert_eq!(value["offers"][0]["price"], 629.95);
        assert_eq!(value["sku"], "B-154");
    }

    #[test]
    fn test_breadcrumbs_positions() {
        let value = breadcrumbs_json_ld(&[
            ("Products", "https://s/products".to_string()),
            ("Board", "https://s/products/board".to_string()),
        ]);
        assert_eq!(value["itemListElement"][1]["position"], 2);
        assert_eq!(value["itemListElement"][1]["name"], "Board");
    }

    #[test]
    fn test_organization_search_action() {
        let value = organization_json_ld("Hydrogen", "https://shop.example.com");
        assert_eq!(value["url"], "https://shop.example.com/");
        assert_eq!(
            value["potentialAction"]["target"],
            "https://shop.example.com/search?q={search_term}"
        );
    }
}

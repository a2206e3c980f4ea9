//! Domain types for the Shopify Storefront API.
//!
//! Response types deserialize straight from the GraphQL JSON (camelCase
//! fields, `nodes` connections). Input types serialize into mutation
//! variables.

use demo_store_core::{FinancialStatus, FulfillmentStatus, Price};
use serde::{Deserialize, Serialize};

// =============================================================================
// Shared Types
// =============================================================================

/// Monetary amount with currency code (`MoneyV2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Format for display, falling back to the raw amount if it cannot be
    /// parsed.
    #[must_use]
    pub fn display(&self) -> String {
        Price::parse(&self.amount, &self.currency_code).map_or_else(
            |_| format!("{} {}", self.amount, self.currency_code),
            |price| price.display(),
        )
    }

    /// Whether the amount parses as zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        Price::parse(&self.amount, &self.currency_code).is_ok_and(|p| p.is_zero())
    }
}

/// Product, variant, collection or article image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image ID.
    #[serde(default)]
    pub id: Option<String>,
    /// CDN URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<i64>,
    /// Height in pixels.
    #[serde(default)]
    pub height: Option<i64>,
}

/// SEO metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

/// Pagination information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor for the first item.
    #[serde(default)]
    pub start_cursor: Option<String>,
    /// Cursor for the last item.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// A GraphQL connection selected with `nodes` (and optionally `pageInfo`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Items in this page.
    pub nodes: Vec<T>,
    /// Pagination info.
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

/// A mutation user error (`UserError`, `CartUserError`, `CustomerUserError`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable code, when the error type has one.
    #[serde(default)]
    pub code: Option<String>,
}

// =============================================================================
// Shop and Menu Types
// =============================================================================

/// Shop domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// Full URL (`https://shop.example.com`).
    pub url: String,
}

/// The shop itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Shop ID.
    pub id: String,
    /// Shop name.
    pub name: String,
    /// Shop description.
    #[serde(default)]
    pub description: Option<String>,
    /// Primary domain.
    pub primary_domain: Domain,
}

/// A navigation menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    /// Menu ID.
    pub id: String,
    /// Top-level items.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A navigation menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Item ID.
    pub id: String,
    /// Linked resource ID, if any.
    #[serde(default)]
    pub resource_id: Option<String>,
    /// Display title.
    pub title: String,
    /// Item type (`FRONTPAGE`, `COLLECTION`, `HTTP`, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Absolute URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Child items.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "Large").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Parent product reference on a variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantProduct {
    /// Product handle.
    pub handle: String,
    /// Product title.
    pub title: String,
}

/// A product variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// SKU code.
    #[serde(default)]
    pub sku: Option<String>,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    /// Selected options for this variant.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    #[serde(default)]
    pub image: Option<Image>,
    /// Parent product.
    #[serde(default)]
    pub product: Option<VariantProduct>,
}

impl ProductVariant {
    /// Whether the variant is discounted against its compare-at price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        let Some(compare) = &self.compare_at_price else {
            return false;
        };
        match (
            Price::parse(&self.price.amount, &self.price.currency_code),
            Price::parse(&compare.amount, &compare.currency_code),
        ) {
            (Ok(price), Ok(compare)) => compare.amount > price.amount,
            _ => false,
        }
    }
}

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Vendor name.
    #[serde(default)]
    pub vendor: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// HTML description.
    #[serde(default)]
    pub description_html: String,
    /// Publication timestamp.
    #[serde(default)]
    pub published_at: Option<String>,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
    /// Featured image.
    #[serde(default)]
    pub featured_image: Option<Image>,
    /// Product options.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Variant matching the requested selected options.
    #[serde(default)]
    pub selected_variant: Option<ProductVariant>,
    /// Variants (cards select only the first).
    #[serde(default)]
    pub variants: Connection<ProductVariant>,
}

impl Product {
    /// The variant to display: the selected one, else the first.
    #[must_use]
    pub fn display_variant(&self) -> Option<&ProductVariant> {
        self.selected_variant
            .as_ref()
            .or_else(|| self.variants.nodes.first())
    }

    /// The image to display on a card.
    #[must_use]
    pub fn card_image(&self) -> Option<&Image> {
        self.display_variant()
            .and_then(|v| v.image.as_ref())
            .or(self.featured_image.as_ref())
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// Filter kind in a collection or search facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    /// Discrete values (vendor, type, tags, options).
    List,
    /// Min/max price range.
    PriceRange,
    /// True/false (availability).
    Boolean,
}

/// A selectable value in a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterValue {
    /// Value ID (e.g., `filter.p.vendor.acme`).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Number of matching products.
    #[serde(default)]
    pub count: i64,
    /// JSON-encoded `ProductFilter` input.
    pub input: String,
}

/// A facet available on a product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    /// Filter ID (e.g., `filter.v.price`).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Filter kind.
    #[serde(rename = "type")]
    pub kind: FilterType,
    /// Selectable values.
    #[serde(default)]
    pub values: Vec<FilterValue>,
}

/// A product listing with its facets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredProducts {
    /// Available facets.
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Products in this page.
    #[serde(default)]
    pub nodes: Vec<Product>,
    /// Pagination info.
    #[serde(default)]
    pub page_info: PageInfo,
}

/// Sort keys for products within a collection (`ProductCollectionSortKeys`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCollectionSortKeys {
    /// Merchant-defined order.
    Manual,
    /// Best sellers first.
    BestSelling,
    /// Creation date.
    Created,
    /// Price.
    Price,
    /// Search relevance (the API default).
    #[default]
    Relevance,
}

/// A collection of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Collection ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
    /// Collection image.
    #[serde(default)]
    pub image: Option<Image>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Products (only selected by the collection page query).
    #[serde(default)]
    pub products: FilteredProducts,
}

/// A metafield reference to a media image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaImageReference {
    /// The image.
    pub image: Option<Image>,
}

/// A metafield value (text or media reference).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metafield {
    /// Raw value (not selected for file references).
    #[serde(default)]
    pub value: String,
    /// Referenced media, for file metafields.
    #[serde(default)]
    pub reference: Option<MediaImageReference>,
}

/// A collection used as a homepage hero, with its `hero.*` metafields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCollection {
    /// Collection ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Description text.
    #[serde(default)]
    pub description_html: String,
    /// Hero heading.
    #[serde(default)]
    pub heading: Option<Metafield>,
    /// Hero byline.
    #[serde(default)]
    pub byline: Option<Metafield>,
    /// Call-to-action text.
    #[serde(default)]
    pub cta: Option<Metafield>,
    /// Primary hero image.
    #[serde(default)]
    pub spread: Option<Metafield>,
    /// Secondary hero image.
    #[serde(default)]
    pub spread_secondary: Option<Metafield>,
}

// =============================================================================
// Content Types
// =============================================================================

/// An online store page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// HTML body.
    pub body: String,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A shop policy (privacy, refund, shipping, terms, subscription).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopPolicy {
    /// Policy ID (null for a defaulted subscription policy).
    #[serde(default)]
    pub id: Option<String>,
    /// Policy title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// HTML body (omitted in listings).
    #[serde(default)]
    pub body: String,
}

/// An article author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleAuthor {
    /// Author name.
    pub name: String,
}

/// A blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article ID.
    pub id: String,
    /// Article title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// HTML content (omitted in listings).
    #[serde(default)]
    pub content_html: String,
    /// Publication timestamp (ISO 8601).
    pub published_at: String,
    /// Author.
    #[serde(rename = "authorV2", default)]
    pub author: Option<ArticleAuthor>,
    /// Featured image.
    #[serde(default)]
    pub image: Option<Image>,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
}

/// A blog with a page of articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Blog title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// SEO metadata.
    #[serde(default)]
    pub seo: Option<Seo>,
    /// Articles in this page.
    #[serde(default)]
    pub articles: Connection<Article>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Merchandise in a cart line (a product variant).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Whether available for sale.
    #[serde(default)]
    pub available_for_sale: bool,
    /// Selected options.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    #[serde(default)]
    pub image: Option<Image>,
    /// Parent product.
    pub product: VariantProduct,
}

/// Cost of a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    /// Total for the line.
    pub total_amount: Money,
    /// Price per unit.
    pub amount_per_quantity: Money,
    /// Compare-at price per unit.
    #[serde(default)]
    pub compare_at_amount_per_quantity: Option<Money>,
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Line ID.
    pub id: String,
    /// Quantity.
    pub quantity: i64,
    /// Line cost.
    pub cost: CartLineCost,
    /// Purchased variant.
    pub merchandise: CartMerchandise,
}

/// Cart totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Subtotal before taxes and shipping.
    pub subtotal_amount: Money,
    /// Total.
    pub total_amount: Money,
    /// Estimated tax.
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

/// A discount code applied to the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDiscountCode {
    /// The code.
    pub code: String,
    /// Whether the code applies to the cart contents.
    pub applicable: bool,
}

/// Buyer identity on the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBuyerIdentity {
    /// Country used for pricing.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Buyer email.
    #[serde(default)]
    pub email: Option<String>,
}

/// A cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID.
    pub id: String,
    /// Hosted checkout URL.
    pub checkout_url: String,
    /// Total quantity of all lines.
    pub total_quantity: i64,
    /// Buyer identity.
    #[serde(default)]
    pub buyer_identity: CartBuyerIdentity,
    /// Lines.
    #[serde(default)]
    pub lines: Connection<CartLine>,
    /// Totals.
    pub cost: CartCost,
    /// Discount codes.
    #[serde(default)]
    pub discount_codes: Vec<CartDiscountCode>,
    /// Note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant ID to add.
    pub merchandise_id: String,
    /// Quantity (defaults to 1 when absent in form JSON).
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Input for updating a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Line ID.
    pub id: String,
    /// New quantity.
    pub quantity: i64,
}

/// Input for the cart's buyer identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBuyerIdentityInput {
    /// Country code for pricing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Customer access token, linking the cart to the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_access_token: Option<String>,
}

// =============================================================================
// Customer Types
// =============================================================================

/// A customer access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccessToken {
    /// Token value.
    pub access_token: String,
    /// Expiry timestamp (ISO 8601).
    pub expires_at: String,
}

/// A mailing address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
    /// Address ID.
    pub id: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Company.
    #[serde(default)]
    pub company: Option<String>,
    /// Street line 1.
    #[serde(default)]
    pub address1: Option<String>,
    /// Street line 2.
    #[serde(default)]
    pub address2: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Province or state.
    #[serde(default)]
    pub province: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub zip: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Pre-formatted lines.
    #[serde(default)]
    pub formatted: Vec<String>,
}

/// Input for creating or updating an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddressInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

/// Variant reference on an order line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Variant image.
    #[serde(default)]
    pub image: Option<Image>,
    /// Unit price.
    pub price: Money,
    /// Parent product.
    #[serde(default)]
    pub product: Option<VariantProduct>,
}

/// A line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Item title.
    pub title: String,
    /// Quantity.
    pub quantity: i64,
    /// Total before discounts.
    pub original_total_price: Money,
    /// Total after discounts.
    pub discounted_total_price: Money,
    /// Variant, if it still exists.
    #[serde(default)]
    pub variant: Option<OrderLineVariant>,
}

/// Value of a discount application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PricingValue {
    /// Fixed amount off.
    Amount(Money),
    /// Percentage off.
    Percentage {
        /// Percentage (e.g., 15.0).
        percentage: f64,
    },
}

/// A discount applied to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountApplication {
    /// Discount value.
    pub value: PricingValue,
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: String,
    /// Order name (e.g., `#1001`).
    pub name: String,
    /// Order number.
    pub order_number: i64,
    /// Processing timestamp.
    pub processed_at: String,
    /// Financial status.
    #[serde(default)]
    pub financial_status: Option<FinancialStatus>,
    /// Fulfillment status.
    pub fulfillment_status: FulfillmentStatus,
    /// Current total.
    pub current_total_price: Money,
    /// Subtotal.
    #[serde(default)]
    pub subtotal_price: Option<Money>,
    /// Tax.
    #[serde(default)]
    pub total_tax: Option<Money>,
    /// Shipping.
    #[serde(default)]
    pub total_shipping_price: Option<Money>,
    /// Order status page URL.
    #[serde(default)]
    pub status_url: Option<String>,
    /// Shipping address.
    #[serde(default)]
    pub shipping_address: Option<MailingAddress>,
    /// Discounts.
    #[serde(default)]
    pub discount_applications: Connection<DiscountApplication>,
    /// Line items.
    #[serde(default)]
    pub line_items: Connection<OrderLineItem>,
}

/// A customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer ID.
    pub id: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Default address.
    #[serde(default)]
    pub default_address: Option<MailingAddress>,
    /// Addresses.
    #[serde(default)]
    pub addresses: Connection<MailingAddress>,
    /// Orders, newest first.
    #[serde(default)]
    pub orders: Connection<Order>,
}

/// Input for `customerCreate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateInput {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Input for `customerUpdate`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// =============================================================================
// Sitemap Types
// =============================================================================

/// A resource listed in the sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    /// URL handle.
    pub handle: String,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Title (for image captions).
    #[serde(default)]
    pub title: Option<String>,
    /// Featured image.
    #[serde(default)]
    pub featured_image: Option<Image>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        let money = Money {
            amount: "1049.5".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(money.display(), "$1,049.50");
        assert!(!money.is_zero());
    }

    #[test]
    fn test_money_display_fallback() {
        let money = Money {
            amount: "n/a".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(money.display(), "n/a USD");
    }

    #[test]
    fn test_variant_on_sale() {
        let variant: ProductVariant = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/ProductVariant/1",
            "title": "Default Title",
            "availableForSale": true,
            "price": {"amount": "80.0", "currencyCode": "USD"},
            "compareAtPrice": {"amount": "100.0", "currencyCode": "USD"},
            "selectedOptions": [{"name": "Title", "value": "Default Title"}]
        }))
        .unwrap();
        assert!(variant.is_on_sale());
    }

    #[test]
    fn test_product_deserializes_nodes_connection() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/1",
            "handle": "board",
            "title": "Board",
            "variants": {
                "nodes": [{
                    "id": "gid://shopify/ProductVariant/1",
                    "title": "154cm",
                    "availableForSale": false,
                    "price": {"amount": "600.0", "currencyCode": "CAD"},
                    "image": {"url": "https://cdn.shopify.com/a.jpg", "altText": null}
                }]
            }
        }))
        .unwrap();
        let variant = product.display_variant().unwrap();
        assert_eq!(variant.title, "154cm");
        assert_eq!(product.card_image().unwrap().url, "https://cdn.shopify.com/a.jpg");
        assert!(!product.variants.page_info.has_next_page);
    }

    #[test]
    fn test_pricing_value_untagged() {
        let amount: PricingValue =
            serde_json::from_str(r#"{"amount":"5.0","currencyCode":"USD"}"#).unwrap();
        assert!(matches!(amount, PricingValue::Amount(_)));
        let pct: PricingValue = serde_json::from_str(r#"{"percentage":15.0}"#).unwrap();
        assert!(matches!(pct, PricingValue::Percentage { percentage } if (percentage - 15.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_cart_line_input_defaults_quantity() {
        let lines: Vec<CartLineInput> =
            serde_json::from_str(r#"[{"merchandiseId":"gid://shopify/ProductVariant/1"}]"#)
                .unwrap();
        assert_eq!(lines[0].quantity, 1);
    }

    #[test]
    fn test_customer_update_input_skips_absent_fields() {
        let input = CustomerUpdateInput {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"firstName": "Ada"})
        );
    }
}

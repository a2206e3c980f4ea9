//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`] with a static
//! document, a serde variables type and a serde response type. Documents are
//! assembled with `concat!` from the fragment macros below; a document must
//! include exactly the fragments it spreads.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use super::InContext;
use crate::shopify::types::{
    Article, Blog, Cart, CartBuyerIdentityInput, CartLineInput, CartLineUpdateInput, Collection,
    Connection, Customer, CustomerAccessToken, CustomerCreateInput, CustomerUpdateInput,
    HeroCollection, MailingAddressInput, Menu, Order, Product, ProductCollectionSortKeys,
    ProductVariant, SelectedOption, Shop, ShopPolicy, SitemapEntry, UserError,
};

// =============================================================================
// Fragments
// =============================================================================

macro_rules! money_fragment {
    () => {
        "fragment MoneyFields on MoneyV2 { amount currencyCode }\n"
    };
}

macro_rules! image_fragment {
    () => {
        "fragment ImageFields on Image { id url altText width height }\n"
    };
}

macro_rules! variant_fragment {
    () => {
        "fragment ProductVariantFields on ProductVariant {
  id title availableForSale sku
  price { ...MoneyFields }
  compareAtPrice { ...MoneyFields }
  selectedOptions { name value }
  image { ...ImageFields }
  product { handle title }
}
"
    };
}

macro_rules! product_card_fragment {
    () => {
        "fragment ProductCard on Product {
  id handle title vendor publishedAt
  featuredImage { ...ImageFields }
  variants(first: 1) { nodes { ...ProductVariantFields } }
}
"
    };
}

macro_rules! collection_card_fragment {
    () => {
        "fragment CollectionCard on Collection {
  id handle title description updatedAt
  seo { title description }
  image { ...ImageFields }
}
"
    };
}

macro_rules! menu_fragment {
    () => {
        "fragment MenuItemFields on MenuItem { id resourceId title type url }
fragment MenuFields on Menu {
  id
  items {
    ...MenuItemFields
    items { ...MenuItemFields items { ...MenuItemFields } }
  }
}
"
    };
}

macro_rules! hero_fragment {
    () => {
        "fragment HeroFields on Collection {
  id handle title descriptionHtml
  heading: metafield(namespace: \"hero\", key: \"title\") { value }
  byline: metafield(namespace: \"hero\", key: \"byline\") { value }
  cta: metafield(namespace: \"hero\", key: \"cta\") { value }
  spread: metafield(namespace: \"hero\", key: \"spread\") {
    reference { ... on MediaImage { image { ...ImageFields } } }
  }
  spreadSecondary: metafield(namespace: \"hero\", key: \"spread_secondary\") {
    reference { ... on MediaImage { image { ...ImageFields } } }
  }
}
"
    };
}

macro_rules! cart_fragment {
    () => {
        "fragment CartFields on Cart {
  id checkoutUrl totalQuantity note
  buyerIdentity { countryCode email }
  lines(first: 100) {
    nodes {
      id quantity
      cost {
        totalAmount { ...MoneyFields }
        amountPerQuantity { ...MoneyFields }
        compareAtAmountPerQuantity { ...MoneyFields }
      }
      merchandise {
        ... on ProductVariant {
          id title availableForSale
          selectedOptions { name value }
          image { ...ImageFields }
          product { handle title }
        }
      }
    }
  }
  cost {
    subtotalAmount { ...MoneyFields }
    totalAmount { ...MoneyFields }
    totalTaxAmount { ...MoneyFields }
  }
  discountCodes { code applicable }
}
"
    };
}

macro_rules! address_fragment {
    () => {
        "fragment AddressFields on MailingAddress {
  id formatted firstName lastName company address1 address2 country province city zip phone
}
"
    };
}

macro_rules! order_card_fragment {
    () => {
        "fragment OrderCard on Order {
  id name orderNumber processedAt financialStatus fulfillmentStatus
  currentTotalPrice { ...MoneyFields }
  lineItems(first: 2) {
    nodes {
      title quantity
      originalTotalPrice { ...MoneyFields }
      discountedTotalPrice { ...MoneyFields }
      variant { id title image { ...ImageFields } price { ...MoneyFields } product { handle title } }
    }
  }
}
"
    };
}

macro_rules! user_errors {
    () => {
        "userErrors: customerUserErrors { field message code }"
    };
}

// =============================================================================
// Operation Macro
// =============================================================================

macro_rules! operation {
    ($(#[$meta:meta])* $name:ident: $operation_name:literal, $vars:ty => $data:ty, $document:expr $(,)?) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $vars;
            type ResponseData = $data;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: $operation_name,
                }
            }
        }
    };
}

// =============================================================================
// Shared Variables
// =============================================================================

/// Variables for operations that only need the buyer context.
#[derive(Debug, Clone, Serialize)]
pub struct ContextVariables {
    #[serde(flatten)]
    pub ctx: InContext,
}

/// Variables for operations keyed by a handle.
#[derive(Debug, Clone, Serialize)]
pub struct HandleVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub handle: String,
}

/// Cursor pagination arguments (`first`/`after` or `last`/`before`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationVariables {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Variables for paginated listings.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    #[serde(flatten)]
    pub page: PaginationVariables,
}

// =============================================================================
// Layout
// =============================================================================

/// Variables for [`Layout`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub header_menu_handle: String,
    pub footer_menu_handle: String,
}

/// Response for [`Layout`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutData {
    pub shop: Shop,
    pub header_menu: Option<Menu>,
    pub footer_menu: Option<Menu>,
}

operation!(
    /// Shop identity plus header and footer menus.
    Layout: "Layout", LayoutVariables => LayoutData,
    concat!(
        "query Layout($country: CountryCode, $language: LanguageCode, $headerMenuHandle: String!, $footerMenuHandle: String!) @inContext(country: $country, language: $language) {
  shop { id name description primaryDomain { url } }
  headerMenu: menu(handle: $headerMenuHandle) { ...MenuFields }
  footerMenu: menu(handle: $footerMenuHandle) { ...MenuFields }
}
",
        menu_fragment!()
    )
);

// =============================================================================
// Homepage
// =============================================================================

/// Response for [`HomepageSeo`].
#[derive(Debug, Clone, Deserialize)]
pub struct HomepageSeoData {
    pub hero: Option<HeroCollection>,
    pub shop: Shop,
}

operation!(
    /// Primary hero collection and shop SEO.
    HomepageSeo: "HomepageSeo", HandleVariables => HomepageSeoData,
    concat!(
        "query HomepageSeo($country: CountryCode, $language: LanguageCode, $handle: String!) @inContext(country: $country, language: $language) {
  hero: collection(handle: $handle) { ...HeroFields }
  shop { id name description primaryDomain { url } }
}
",
        hero_fragment!(),
        image_fragment!()
    )
);

/// Response for [`HeroCollectionQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct HeroCollectionData {
    pub hero: Option<HeroCollection>,
}

operation!(
    /// A collection rendered as a homepage hero.
    HeroCollectionQuery: "HeroCollection", HandleVariables => HeroCollectionData,
    concat!(
        "query HeroCollection($country: CountryCode, $language: LanguageCode, $handle: String!) @inContext(country: $country, language: $language) {
  hero: collection(handle: $handle) { ...HeroFields }
}
",
        hero_fragment!(),
        image_fragment!()
    )
);

/// Response for [`HomepageFeaturedCollections`].
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsData {
    pub collections: Connection<Collection>,
}

operation!(
    /// The four most recently updated collections.
    HomepageFeaturedCollections: "HomepageFeaturedCollections", ContextVariables => CollectionsData,
    concat!(
        "query HomepageFeaturedCollections($country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  collections(first: 4, sortKey: UPDATED_AT) { nodes { ...CollectionCard } }
}
",
        collection_card_fragment!(),
        image_fragment!()
    )
);

/// Response for product listings without facets.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsData {
    pub products: Connection<Product>,
}

operation!(
    /// Eight featured products.
    HomepageFeaturedProducts: "HomepageFeaturedProducts", ContextVariables => ProductsData,
    concat!(
        "query HomepageFeaturedProducts($country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  products(first: 8) { nodes { ...ProductCard } }
}
",
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

// =============================================================================
// Products
// =============================================================================

/// Variables for [`ProductQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub handle: String,
    pub selected_options: Vec<SelectedOption>,
}

/// Shop fields selected alongside a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductShop {
    pub name: String,
    pub primary_domain: crate::shopify::types::Domain,
    pub shipping_policy: Option<ShopPolicy>,
    pub refund_policy: Option<ShopPolicy>,
}

/// Response for [`ProductQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub product: Option<Product>,
    pub shop: ProductShop,
}

operation!(
    /// A product by handle with the variant matching the selected options.
    ProductQuery: "Product", ProductVariables => ProductData,
    concat!(
        "query Product($country: CountryCode, $language: LanguageCode, $handle: String!, $selectedOptions: [SelectedOptionInput!]!) @inContext(country: $country, language: $language) {
  product(handle: $handle) {
    id title vendor handle descriptionHtml description publishedAt
    options { name values }
    selectedVariant: variantBySelectedOptions(selectedOptions: $selectedOptions) { ...ProductVariantFields }
    featuredImage { ...ImageFields }
    variants(first: 1) { nodes { ...ProductVariantFields } }
    seo { description title }
  }
  shop {
    name
    primaryDomain { url }
    shippingPolicy { id title handle body }
    refundPolicy { id title handle body }
  }
}
",
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variants of a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariantsNode {
    pub variants: Connection<ProductVariant>,
}

/// Response for [`ProductVariants`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariantsData {
    pub product: Option<ProductVariantsNode>,
}

operation!(
    /// Every variant of a product, for the option selector.
    ProductVariants: "ProductVariants", HandleVariables => ProductVariantsData,
    concat!(
        "query ProductVariants($country: CountryCode, $language: LanguageCode, $handle: String!) @inContext(country: $country, language: $language) {
  product(handle: $handle) { variants(first: 250) { nodes { ...ProductVariantFields } } }
}
",
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`ProductRecommendations`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub product_id: String,
    pub count: i64,
}

/// Response for [`ProductRecommendations`].
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsData {
    pub recommended: Option<Vec<Product>>,
    pub additional: Connection<Product>,
}

operation!(
    /// Recommended products plus a page of additional products to pad the list.
    ProductRecommendations: "ProductRecommendations", RecommendationsVariables => RecommendationsData,
    concat!(
        "query ProductRecommendations($country: CountryCode, $language: LanguageCode, $productId: ID!, $count: Int) @inContext(country: $country, language: $language) {
  recommended: productRecommendations(productId: $productId) { ...ProductCard }
  additional: products(first: $count, sortKey: BEST_SELLING) { nodes { ...ProductCard } }
}
",
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

operation!(
    /// All products, paginated.
    AllProducts: "AllProducts", PaginatedVariables => ProductsData,
    concat!(
        "query AllProducts($country: CountryCode, $language: LanguageCode, $first: Int, $last: Int, $startCursor: String, $endCursor: String) @inContext(country: $country, language: $language) {
  products(first: $first, last: $last, before: $startCursor, after: $endCursor) {
    nodes { ...ProductCard }
    pageInfo { hasPreviousPage hasNextPage startCursor endCursor }
  }
}
",
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`ApiProducts`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProductsVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub query: Option<String>,
    pub count: i64,
    pub sort_key: Option<String>,
    pub reverse: bool,
}

operation!(
    /// Product cards for the `/api/products` fragment.
    ApiProducts: "ApiAllProducts", ApiProductsVariables => ProductsData,
    concat!(
        "query ApiAllProducts($country: CountryCode, $language: LanguageCode, $query: String, $count: Int, $sortKey: ProductSortKeys, $reverse: Boolean) @inContext(country: $country, language: $language) {
  products(first: $count, query: $query, sortKey: $sortKey, reverse: $reverse) { nodes { ...ProductCard } }
}
",
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

// =============================================================================
// Collections
// =============================================================================

operation!(
    /// Collections, paginated.
    Collections: "Collections", PaginatedVariables => CollectionsData,
    concat!(
        "query Collections($country: CountryCode, $language: LanguageCode, $first: Int, $last: Int, $startCursor: String, $endCursor: String) @inContext(country: $country, language: $language) {
  collections(first: $first, last: $last, before: $startCursor, after: $endCursor) {
    nodes { ...CollectionCard }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
",
        collection_card_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CollectionQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub handle: String,
    /// `ProductFilter` objects, passed through as JSON.
    pub filters: Vec<serde_json::Value>,
    pub sort_key: ProductCollectionSortKeys,
    pub reverse: bool,
    #[serde(flatten)]
    pub page: PaginationVariables,
}

/// Response for [`CollectionQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionData {
    pub collection: Option<Collection>,
}

operation!(
    /// A collection with filtered, sorted, paginated products and its facets.
    CollectionQuery: "CollectionDetails", CollectionVariables => CollectionData,
    concat!(
        "query CollectionDetails($country: CountryCode, $language: LanguageCode, $handle: String!, $filters: [ProductFilter!], $sortKey: ProductCollectionSortKeys!, $reverse: Boolean, $first: Int, $last: Int, $startCursor: String, $endCursor: String) @inContext(country: $country, language: $language) {
  collection(handle: $handle) {
    id handle title description updatedAt
    seo { description title }
    image { ...ImageFields }
    products(first: $first, last: $last, before: $startCursor, after: $endCursor, filters: $filters, sortKey: $sortKey, reverse: $reverse) {
      filters { id label type values { id label count input } }
      nodes { ...ProductCard }
      pageInfo { hasPreviousPage hasNextPage endCursor startCursor }
    }
  }
}
",
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

// =============================================================================
// Search
// =============================================================================

/// Variables for [`Search`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub search_term: String,
    #[serde(flatten)]
    pub page: PaginationVariables,
}

operation!(
    /// Products matching a search term.
    Search: "PaginatedProductsSearch", SearchVariables => ProductsData,
    concat!(
        "query PaginatedProductsSearch($country: CountryCode, $language: LanguageCode, $searchTerm: String, $first: Int, $last: Int, $startCursor: String, $endCursor: String) @inContext(country: $country, language: $language) {
  products(first: $first, last: $last, before: $startCursor, after: $endCursor, sortKey: RELEVANCE, query: $searchTerm) {
    nodes { ...ProductCard }
    pageInfo { startCursor endCursor hasNextPage hasPreviousPage }
  }
}
",
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Response for [`FeaturedItems`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedItemsData {
    pub featured_collections: Connection<Collection>,
    pub featured_products: Connection<Product>,
}

operation!(
    /// Featured collections and products (empty-state fallback).
    FeaturedItems: "FeaturedItems", ContextVariables => FeaturedItemsData,
    concat!(
        "query FeaturedItems($country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  featuredCollections: collections(first: 3, sortKey: UPDATED_AT) { nodes { ...CollectionCard } }
  featuredProducts: products(first: 12) { nodes { ...ProductCard } }
}
",
        collection_card_fragment!(),
        product_card_fragment!(),
        variant_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

// =============================================================================
// Content
// =============================================================================

/// Response for [`PageQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct PageData {
    pub page: Option<crate::shopify::types::Page>,
}

operation!(
    /// An online store page by handle.
    PageQuery: "PageDetails", HandleVariables => PageData,
    "query PageDetails($country: CountryCode, $language: LanguageCode, $handle: String!) @inContext(country: $country, language: $language) {
  page(handle: $handle) { id title handle body updatedAt seo { description title } }
}
"
);

/// Shop policies; each is null when unset or not requested.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliciesShop {
    #[serde(default)]
    pub privacy_policy: Option<ShopPolicy>,
    #[serde(default)]
    pub shipping_policy: Option<ShopPolicy>,
    #[serde(default)]
    pub terms_of_service: Option<ShopPolicy>,
    #[serde(default)]
    pub refund_policy: Option<ShopPolicy>,
    #[serde(default)]
    pub subscription_policy: Option<ShopPolicy>,
}

impl PoliciesShop {
    /// The set policies, in display order.
    #[must_use]
    pub fn into_vec(self) -> Vec<ShopPolicy> {
        [
            self.privacy_policy,
            self.shipping_policy,
            self.terms_of_service,
            self.refund_policy,
            self.subscription_policy,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Response for [`Policies`] and [`PolicyQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct PoliciesData {
    pub shop: PoliciesShop,
}

operation!(
    /// Titles and handles of every shop policy.
    Policies: "PoliciesIndex", ContextVariables => PoliciesData,
    "query PoliciesIndex($country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  shop {
    privacyPolicy { id title handle }
    shippingPolicy { id title handle }
    termsOfService { id title handle }
    refundPolicy { id title handle }
    subscriptionPolicy { id title handle }
  }
}
"
);

/// Variables for [`PolicyQuery`]; exactly one flag should be set.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub privacy_policy: bool,
    pub shipping_policy: bool,
    pub terms_of_service: bool,
    pub refund_policy: bool,
    pub subscription_policy: bool,
}

operation!(
    /// A single policy body, selected with `@include` flags.
    PolicyQuery: "Policy", PolicyVariables => PoliciesData,
    "query Policy($country: CountryCode, $language: LanguageCode, $privacyPolicy: Boolean!, $shippingPolicy: Boolean!, $termsOfService: Boolean!, $refundPolicy: Boolean!, $subscriptionPolicy: Boolean!) @inContext(country: $country, language: $language) {
  shop {
    privacyPolicy @include(if: $privacyPolicy) { id title handle body }
    shippingPolicy @include(if: $shippingPolicy) { id title handle body }
    termsOfService @include(if: $termsOfService) { id title handle body }
    refundPolicy @include(if: $refundPolicy) { id title handle body }
    subscriptionPolicy @include(if: $subscriptionPolicy) { id title handle body }
  }
}
"
);

/// Variables for [`BlogQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub blog_handle: String,
    #[serde(flatten)]
    pub page: PaginationVariables,
}

/// Response for [`BlogQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct BlogData {
    pub blog: Option<Blog>,
}

operation!(
    /// A blog with a page of articles, newest first.
    BlogQuery: "Blog", BlogVariables => BlogData,
    concat!(
        "query Blog($country: CountryCode, $language: LanguageCode, $blogHandle: String!, $first: Int, $last: Int, $startCursor: String, $endCursor: String) @inContext(country: $country, language: $language) {
  blog(handle: $blogHandle) {
    title handle
    seo { title description }
    articles(first: $first, last: $last, before: $startCursor, after: $endCursor, sortKey: PUBLISHED_AT, reverse: true) {
      nodes {
        id title handle publishedAt
        authorV2 { name }
        image { ...ImageFields }
      }
      pageInfo { hasPreviousPage hasNextPage startCursor endCursor }
    }
  }
}
",
        image_fragment!()
    )
);

/// Variables for [`ArticleQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub blog_handle: String,
    pub article_handle: String,
}

/// Blog wrapper around a single article.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBlog {
    pub title: String,
    pub article_by_handle: Option<Article>,
}

/// Response for [`ArticleQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleData {
    pub blog: Option<ArticleBlog>,
}

operation!(
    /// A single article within a blog.
    ArticleQuery: "ArticleDetails", ArticleVariables => ArticleData,
    concat!(
        "query ArticleDetails($country: CountryCode, $language: LanguageCode, $blogHandle: String!, $articleHandle: String!) @inContext(country: $country, language: $language) {
  blog(handle: $blogHandle) {
    title
    articleByHandle(handle: $articleHandle) {
      id title handle contentHtml publishedAt
      authorV2 { name }
      image { ...ImageFields }
      seo { description title }
    }
  }
}
",
        image_fragment!()
    )
);

/// Response for [`SitemapResources`].
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapData {
    pub products: Connection<SitemapEntry>,
    pub collections: Connection<SitemapEntry>,
    pub pages: Connection<SitemapEntry>,
}

operation!(
    /// Handles and update times for the sitemap.
    SitemapResources: "SitemapResources", ContextVariables => SitemapData,
    concat!(
        "query SitemapResources($country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  products(first: 250) { nodes { handle updatedAt title featuredImage { ...ImageFields } } }
  collections(first: 250) { nodes { handle updatedAt } }
  pages(first: 250) { nodes { handle updatedAt } }
}
",
        image_fragment!()
    )
);

// =============================================================================
// Cart
// =============================================================================

/// Variables for [`CartQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub cart_id: String,
}

/// Response for [`CartQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct CartData {
    pub cart: Option<Cart>,
}

operation!(
    /// A cart by id.
    CartQuery: "CartQuery", CartVariables => CartData,
    concat!(
        "query CartQuery($country: CountryCode, $language: LanguageCode, $cartId: ID!) @inContext(country: $country, language: $language) {
  cart(id: $cartId) { ...CartFields }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Payload shared by every cart mutation (root field aliased to `result`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<Cart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// Response for cart mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct CartMutationData {
    pub result: Option<CartPayload>,
}

/// `CartInput` for [`CartCreate`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    pub lines: Vec<CartLineInput>,
    pub buyer_identity: CartBuyerIdentityInput,
}

/// Variables for [`CartCreate`].
#[derive(Debug, Clone, Serialize)]
pub struct CartCreateVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub input: CartInput,
}

operation!(
    /// Create a cart.
    CartCreate: "cartCreate", CartCreateVariables => CartMutationData,
    concat!(
        "mutation cartCreate($input: CartInput!, $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  result: cartCreate(input: $input) { cart { ...CartFields } userErrors { field message code } }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CartLinesAdd`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub cart_id: String,
    pub lines: Vec<CartLineInput>,
}

operation!(
    /// Add lines to a cart.
    CartLinesAdd: "cartLinesAdd", CartLinesAddVariables => CartMutationData,
    concat!(
        "mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!, $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  result: cartLinesAdd(cartId: $cartId, lines: $lines) { cart { ...CartFields } userErrors { field message code } }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CartLinesUpdate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesUpdateVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub cart_id: String,
    pub lines: Vec<CartLineUpdateInput>,
}

operation!(
    /// Change line quantities.
    CartLinesUpdate: "cartLinesUpdate", CartLinesUpdateVariables => CartMutationData,
    concat!(
        "mutation cartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!, $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  result: cartLinesUpdate(cartId: $cartId, lines: $lines) { cart { ...CartFields } userErrors { field message code } }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CartLinesRemove`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub cart_id: String,
    pub line_ids: Vec<String>,
}

operation!(
    /// Remove lines from a cart.
    CartLinesRemove: "cartLinesRemove", CartLinesRemoveVariables => CartMutationData,
    concat!(
        "mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!, $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  result: cartLinesRemove(cartId: $cartId, lineIds: $lineIds) { cart { ...CartFields } userErrors { field message code } }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CartDiscountCodesUpdate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDiscountCodesVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub cart_id: String,
    pub discount_codes: Vec<String>,
}

operation!(
    /// Replace the cart's discount codes.
    CartDiscountCodesUpdate: "cartDiscountCodesUpdate", CartDiscountCodesVariables => CartMutationData,
    concat!(
        "mutation cartDiscountCodesUpdate($cartId: ID!, $discountCodes: [String!], $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  result: cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes) { cart { ...CartFields } userErrors { field message code } }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CartBuyerIdentityUpdate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBuyerIdentityVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub cart_id: String,
    pub buyer_identity: CartBuyerIdentityInput,
}

operation!(
    /// Update the cart's buyer identity (country, customer).
    CartBuyerIdentityUpdate: "cartBuyerIdentityUpdate", CartBuyerIdentityVariables => CartMutationData,
    concat!(
        "mutation cartBuyerIdentityUpdate($cartId: ID!, $buyerIdentity: CartBuyerIdentityInput!, $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  result: cartBuyerIdentityUpdate(cartId: $cartId, buyerIdentity: $buyerIdentity) { cart { ...CartFields } userErrors { field message code } }
}
",
        cart_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

// =============================================================================
// Customer
// =============================================================================

/// Reference to a node returned by a mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRef {
    pub id: String,
}

/// Payload shared by every customer mutation (root field aliased to
/// `result`, `customerUserErrors` aliased to `userErrors`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(default)]
    pub customer_access_token: Option<CustomerAccessToken>,
    #[serde(default)]
    pub customer: Option<NodeRef>,
    #[serde(default)]
    pub customer_address: Option<NodeRef>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// Response for customer mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerMutationData {
    pub result: Option<CustomerPayload>,
}

/// Email and password credentials.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerAccessTokenCreateInput {
    pub email: String,
    pub password: String,
}

/// Variables for [`CustomerAccessTokenCreate`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerAccessTokenCreateVariables {
    pub input: CustomerAccessTokenCreateInput,
}

operation!(
    /// Exchange credentials for a customer access token.
    CustomerAccessTokenCreate: "customerAccessTokenCreate", CustomerAccessTokenCreateVariables => CustomerMutationData,
    concat!(
        "mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
  result: customerAccessTokenCreate(input: $input) { customerAccessToken { accessToken expiresAt } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerAccessTokenDelete`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccessTokenDeleteVariables {
    pub customer_access_token: String,
}

/// Payload for [`CustomerAccessTokenDelete`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDeletePayload {
    #[serde(default)]
    pub deleted_access_token: Option<String>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// Response for [`CustomerAccessTokenDelete`].
#[derive(Debug, Clone, Deserialize)]
pub struct TokenDeleteData {
    pub result: Option<TokenDeletePayload>,
}

operation!(
    /// Revoke a customer access token.
    CustomerAccessTokenDelete: "customerAccessTokenDelete", CustomerAccessTokenDeleteVariables => TokenDeleteData,
    "mutation customerAccessTokenDelete($customerAccessToken: String!) {
  result: customerAccessTokenDelete(customerAccessToken: $customerAccessToken) { deletedAccessToken userErrors { field message } }
}
"
);

/// Variables for [`CustomerCreate`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerCreateVariables {
    pub input: CustomerCreateInput,
}

operation!(
    /// Register a customer.
    CustomerCreate: "customerCreate", CustomerCreateVariables => CustomerMutationData,
    concat!(
        "mutation customerCreate($input: CustomerCreateInput!) {
  result: customerCreate(input: $input) { customer { id } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerRecover`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecoverVariables {
    pub email: String,
}

operation!(
    /// Send a password reset email.
    CustomerRecover: "customerRecover", CustomerRecoverVariables => CustomerMutationData,
    concat!(
        "mutation customerRecover($email: String!) {
  result: customerRecover(email: $email) { ",
        user_errors!(),
        " }\n}\n"
    )
);

/// `CustomerResetInput`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResetInput {
    pub reset_token: String,
    pub password: String,
}

/// Variables for [`CustomerReset`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResetVariables {
    pub id: String,
    pub input: CustomerResetInput,
}

operation!(
    /// Reset a password with the token from the recovery email.
    CustomerReset: "customerReset", CustomerResetVariables => CustomerMutationData,
    concat!(
        "mutation customerReset($id: ID!, $input: CustomerResetInput!) {
  result: customerReset(id: $id, input: $input) { customerAccessToken { accessToken expiresAt } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// `CustomerActivateInput`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerActivateInput {
    pub activation_token: String,
    pub password: String,
}

/// Variables for [`CustomerActivate`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerActivateVariables {
    pub id: String,
    pub input: CustomerActivateInput,
}

operation!(
    /// Activate an account with the token from the invitation email.
    CustomerActivate: "customerActivate", CustomerActivateVariables => CustomerMutationData,
    concat!(
        "mutation customerActivate($id: ID!, $input: CustomerActivateInput!) {
  result: customerActivate(id: $id, input: $input) { customerAccessToken { accessToken expiresAt } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerUpdate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateVariables {
    pub customer_access_token: String,
    pub customer: CustomerUpdateInput,
}

operation!(
    /// Update profile fields and optionally the password.
    CustomerUpdate: "customerUpdate", CustomerUpdateVariables => CustomerMutationData,
    concat!(
        "mutation customerUpdate($customerAccessToken: String!, $customer: CustomerUpdateInput!) {
  result: customerUpdate(customerAccessToken: $customerAccessToken, customer: $customer) { customer { id } customerAccessToken { accessToken expiresAt } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerQuery`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub customer_access_token: String,
}

/// Response for [`CustomerQuery`].
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerData {
    pub customer: Option<Customer>,
}

operation!(
    /// The signed-in customer with addresses and orders.
    CustomerQuery: "CustomerDetails", CustomerVariables => CustomerData,
    concat!(
        "query CustomerDetails($customerAccessToken: String!, $country: CountryCode, $language: LanguageCode) @inContext(country: $country, language: $language) {
  customer(customerAccessToken: $customerAccessToken) {
    id firstName lastName phone email
    defaultAddress { ...AddressFields }
    addresses(first: 6) { nodes { ...AddressFields } }
    orders(first: 250, sortKey: PROCESSED_AT, reverse: true) { nodes { ...OrderCard } }
  }
}
",
        address_fragment!(),
        order_card_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CustomerOrder`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrderVariables {
    #[serde(flatten)]
    pub ctx: InContext,
    pub order_id: String,
}

/// Response for [`CustomerOrder`].
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerOrderData {
    pub node: Option<Order>,
}

operation!(
    /// An order by global id (with its `?key=` access query).
    CustomerOrder: "CustomerOrder", CustomerOrderVariables => CustomerOrderData,
    concat!(
        "query CustomerOrder($country: CountryCode, $language: LanguageCode, $orderId: ID!) @inContext(country: $country, language: $language) {
  node(id: $orderId) {
    ... on Order {
      id name orderNumber processedAt financialStatus fulfillmentStatus statusUrl
      currentTotalPrice { ...MoneyFields }
      subtotalPrice { ...MoneyFields }
      totalTax { ...MoneyFields }
      totalShippingPrice { ...MoneyFields }
      shippingAddress { ...AddressFields }
      discountApplications(first: 100) {
        nodes { value { ... on MoneyV2 { amount currencyCode } ... on PricingPercentageValue { percentage } } }
      }
      lineItems(first: 100) {
        nodes {
          title quantity
          originalTotalPrice { ...MoneyFields }
          discountedTotalPrice { ...MoneyFields }
          variant { id title image { ...ImageFields } price { ...MoneyFields } product { handle title } }
        }
      }
    }
  }
}
",
        address_fragment!(),
        money_fragment!(),
        image_fragment!()
    )
);

/// Variables for [`CustomerAddressCreate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddressCreateVariables {
    pub customer_access_token: String,
    pub address: MailingAddressInput,
}

operation!(
    /// Add an address to the customer.
    CustomerAddressCreate: "customerAddressCreate", CustomerAddressCreateVariables => CustomerMutationData,
    concat!(
        "mutation customerAddressCreate($address: MailingAddressInput!, $customerAccessToken: String!) {
  result: customerAddressCreate(address: $address, customerAccessToken: $customerAccessToken) { customerAddress { id } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerAddressUpdate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddressUpdateVariables {
    pub customer_access_token: String,
    pub id: String,
    pub address: MailingAddressInput,
}

operation!(
    /// Replace an existing address.
    CustomerAddressUpdate: "customerAddressUpdate", CustomerAddressUpdateVariables => CustomerMutationData,
    concat!(
        "mutation customerAddressUpdate($address: MailingAddressInput!, $customerAccessToken: String!, $id: ID!) {
  result: customerAddressUpdate(address: $address, customerAccessToken: $customerAccessToken, id: $id) { customerAddress { id } ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerAddressDelete`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddressDeleteVariables {
    pub customer_access_token: String,
    pub id: String,
}

operation!(
    /// Delete an address.
    CustomerAddressDelete: "customerAddressDelete", CustomerAddressDeleteVariables => CustomerMutationData,
    concat!(
        "mutation customerAddressDelete($customerAccessToken: String!, $id: ID!) {
  result: customerAddressDelete(customerAccessToken: $customerAccessToken, id: $id) { deletedCustomerAddressId ",
        user_errors!(),
        " }\n}\n"
    )
);

/// Variables for [`CustomerDefaultAddressUpdate`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDefaultAddressUpdateVariables {
    pub customer_access_token: String,
    pub address_id: String,
}

operation!(
    /// Make an address the default.
    CustomerDefaultAddressUpdate: "customerDefaultAddressUpdate", CustomerDefaultAddressUpdateVariables => CustomerMutationData,
    concat!(
        "mutation customerDefaultAddressUpdate($addressId: ID!, $customerAccessToken: String!) {
  result: customerDefaultAddressUpdate(addressId: $addressId, customerAccessToken: $customerAccessToken) { customer { id } ",
        user_errors!(),
        " }\n}\n"
    )
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ctx() -> InContext {
        InContext {
            country: "CA".to_string(),
            language: "FR".to_string(),
        }
    }

    #[test]
    fn test_operation_name_matches_document() {
        let body = ProductQuery::build_query(ProductVariables {
            ctx: ctx(),
            handle: "snowboard".to_string(),
            selected_options: vec![],
        });
        assert_eq!(body.operation_name, "Product");
        assert!(body.query.starts_with("query Product("));
        assert!(body.query.contains("fragment ProductVariantFields"));
        assert!(body.query.contains("fragment MoneyFields"));
        assert!(body.query.contains("fragment ImageFields"));
    }

    #[test]
    fn test_query_body_serializes_operation_name() {
        let body = Layout::build_query(LayoutVariables {
            ctx: ctx(),
            header_menu_handle: "main-menu".to_string(),
            footer_menu_handle: "footer".to_string(),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "Layout");
        assert_eq!(json["variables"]["country"], "CA");
        assert_eq!(json["variables"]["language"], "FR");
        assert_eq!(json["variables"]["headerMenuHandle"], "main-menu");
    }

    #[test]
    fn test_pagination_variables_flatten() {
        let vars = PaginatedVariables {
            ctx: ctx(),
            page: PaginationVariables {
                last: Some(8),
                start_cursor: Some("abc".to_string()),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["last"], 8);
        assert_eq!(json["startCursor"], "abc");
        assert!(json["first"].is_null());
    }

    #[test]
    fn test_collection_variables_sort_key() {
        let vars = CollectionVariables {
            ctx: ctx(),
            handle: "freestyle".to_string(),
            filters: vec![serde_json::json!({"available": true})],
            sort_key: ProductCollectionSortKeys::BestSelling,
            reverse: false,
            page: PaginationVariables::default(),
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["sortKey"], "BEST_SELLING");
        assert_eq!(json["filters"][0]["available"], true);
    }

    #[test]
    fn test_customer_mutations_alias_user_errors() {
        let body = CustomerCreate::build_query(CustomerCreateVariables {
            input: CustomerCreateInput {
                email: "a@example.com".to_string(),
                password: "hunter22".to_string(),
                first_name: None,
                last_name: None,
            },
        });
        assert!(body.query.contains("userErrors: customerUserErrors"));
        assert!(body.query.contains("result: customerCreate"));
    }

    #[test]
    fn test_customer_payload_decodes_aliases() {
        let data: CustomerMutationData = serde_json::from_value(serde_json::json!({
            "result": {
                "customerAccessToken": {"accessToken": "tok", "expiresAt": "2030-01-01T00:00:00Z"},
                "userErrors": []
            }
        }))
        .unwrap();
        let payload = data.result.unwrap();
        assert_eq!(payload.customer_access_token.unwrap().access_token, "tok");
        assert!(payload.user_errors.is_empty());
    }

    #[test]
    fn test_policies_into_vec_skips_unset() {
        let shop: PoliciesShop = serde_json::from_value(serde_json::json!({
            "privacyPolicy": {"id": "1", "title": "Privacy", "handle": "privacy-policy"},
            "shippingPolicy": null,
            "subscriptionPolicy": {"id": null, "title": "Subscriptions", "handle": "subscription-policy"}
        }))
        .unwrap();
        let titles: Vec<_> = shop.into_vec().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Privacy", "Subscriptions"]);
    }
}

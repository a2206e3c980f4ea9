//! Read-only catalog and content operations.

use tracing::instrument;

use super::queries::{
    AllProducts, ApiProducts, ApiProductsVariables, ArticleData, ArticleQuery, ArticleVariables,
    BlogQuery, BlogVariables, CollectionQuery, CollectionVariables, Collections, ContextVariables,
    FeaturedItems, FeaturedItemsData, HandleVariables, HeroCollectionQuery, HomepageFeaturedCollections,
    HomepageFeaturedProducts, HomepageSeo, HomepageSeoData, Layout, LayoutData, LayoutVariables,
    PageQuery, PaginatedVariables, PaginationVariables, Policies, PolicyQuery, PolicyVariables,
    ProductData, ProductQuery, ProductRecommendations, ProductVariables, ProductVariants,
    RecommendationsData, RecommendationsVariables, Search, SearchVariables, SitemapData,
    SitemapResources,
};
use super::{CachePolicy, InContext, StorefrontClient};
use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Blog, Collection, Connection, HeroCollection, Page, Product, ProductCollectionSortKeys,
    ProductVariant, SelectedOption, ShopPolicy,
};

/// Handle of the header menu.
pub const HEADER_MENU_HANDLE: &str = "main-menu";
/// Handle of the footer menu.
pub const FOOTER_MENU_HANDLE: &str = "footer";

/// Which single policy to load in [`StorefrontClient::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Privacy,
    Shipping,
    TermsOfService,
    Refund,
    Subscription,
}

/// Arguments for a filtered, sorted collection page.
#[derive(Debug, Clone, Default)]
pub struct CollectionArgs {
    pub filters: Vec<serde_json::Value>,
    pub sort_key: ProductCollectionSortKeys,
    pub reverse: bool,
    pub page: PaginationVariables,
}

impl StorefrontClient {
    // =========================================================================
    // Layout and Homepage
    // =========================================================================

    /// Shop identity plus header and footer menus.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn layout(&self, ctx: &InContext) -> Result<LayoutData, ShopifyError> {
        self.execute::<Layout>(
            LayoutVariables {
                ctx: ctx.clone(),
                header_menu_handle: HEADER_MENU_HANDLE.to_string(),
                footer_menu_handle: FOOTER_MENU_HANDLE.to_string(),
            },
            CachePolicy::Long,
        )
        .await
    }

    /// Shop SEO and the primary hero collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn homepage_seo(
        &self,
        hero_handle: &str,
        ctx: &InContext,
    ) -> Result<HomepageSeoData, ShopifyError> {
        self.execute::<HomepageSeo>(
            HandleVariables {
                ctx: ctx.clone(),
                handle: hero_handle.to_string(),
            },
            CachePolicy::Short,
        )
        .await
    }

    /// A hero collection by handle; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn hero_collection(
        &self,
        handle: &str,
        ctx: &InContext,
    ) -> Result<Option<HeroCollection>, ShopifyError> {
        let data = self
            .execute::<HeroCollectionQuery>(
                HandleVariables {
                    ctx: ctx.clone(),
                    handle: handle.to_string(),
                },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.hero)
    }

    /// The most recently updated collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_collections(
        &self,
        ctx: &InContext,
    ) -> Result<Vec<Collection>, ShopifyError> {
        let data = self
            .execute::<HomepageFeaturedCollections>(
                ContextVariables { ctx: ctx.clone() },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.collections.nodes)
    }

    /// Featured products for the homepage.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self, ctx: &InContext) -> Result<Vec<Product>, ShopifyError> {
        let data = self
            .execute::<HomepageFeaturedProducts>(
                ContextVariables { ctx: ctx.clone() },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.products.nodes)
    }

    /// Featured collections and products shown when a listing is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_items(&self, ctx: &InContext) -> Result<FeaturedItemsData, ShopifyError> {
        self.execute::<FeaturedItems>(ContextVariables { ctx: ctx.clone() }, CachePolicy::Short)
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// A product by handle, with the variant matching `selected_options`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self, selected_options), fields(handle = %handle))]
    pub async fn product(
        &self,
        handle: &str,
        selected_options: &[SelectedOption],
        ctx: &InContext,
    ) -> Result<ProductData, ShopifyError> {
        let data = self
            .execute::<ProductQuery>(
                ProductVariables {
                    ctx: ctx.clone(),
                    handle: handle.to_string(),
                    selected_options: selected_options.to_vec(),
                },
                CachePolicy::Short,
            )
            .await?;

        if data.product.is_none() {
            return Err(ShopifyError::NotFound(format!("Product not found: {handle}")));
        }
        Ok(data)
    }

    /// Every variant of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_variants(
        &self,
        handle: &str,
        ctx: &InContext,
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        let data = self
            .execute::<ProductVariants>(
                HandleVariables {
                    ctx: ctx.clone(),
                    handle: handle.to_string(),
                },
                CachePolicy::Short,
            )
            .await?;

        data.product
            .map(|p| p.variants.nodes)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))
    }

    /// Recommended products plus `count` additional products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_recommendations(
        &self,
        product_id: &str,
        count: i64,
        ctx: &InContext,
    ) -> Result<RecommendationsData, ShopifyError> {
        self.execute::<ProductRecommendations>(
            RecommendationsVariables {
                ctx: ctx.clone(),
                product_id: product_id.to_string(),
                count,
            },
            CachePolicy::Short,
        )
        .await
    }

    /// All products, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_products(
        &self,
        page: PaginationVariables,
        ctx: &InContext,
    ) -> Result<Connection<Product>, ShopifyError> {
        let data = self
            .execute::<AllProducts>(
                PaginatedVariables {
                    ctx: ctx.clone(),
                    page,
                },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.products)
    }

    /// Product cards matching an optional query, for the `/api/products`
    /// fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn api_products(
        &self,
        query: Option<String>,
        count: i64,
        sort_key: Option<String>,
        reverse: bool,
        ctx: &InContext,
    ) -> Result<Vec<Product>, ShopifyError> {
        let data = self
            .execute::<ApiProducts>(
                ApiProductsVariables {
                    ctx: ctx.clone(),
                    query,
                    count,
                    sort_key,
                    reverse,
                },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.products.nodes)
    }

    /// Products matching a search term, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        page: PaginationVariables,
        ctx: &InContext,
    ) -> Result<Connection<Product>, ShopifyError> {
        let data = self
            .execute::<Search>(
                SearchVariables {
                    ctx: ctx.clone(),
                    search_term: term.to_string(),
                    page,
                },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.products)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Collections, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn collections(
        &self,
        page: PaginationVariables,
        ctx: &InContext,
    ) -> Result<Connection<Collection>, ShopifyError> {
        let data = self
            .execute::<Collections>(
                PaginatedVariables {
                    ctx: ctx.clone(),
                    page,
                },
                CachePolicy::Short,
            )
            .await?;
        Ok(data.collections)
    }

    /// A collection with filtered, sorted and paginated products.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the collection does not exist, or
    /// an error if the API request fails.
    #[instrument(skip(self, args), fields(handle = %handle))]
    pub async fn collection(
        &self,
        handle: &str,
        args: CollectionArgs,
        ctx: &InContext,
    ) -> Result<Collection, ShopifyError> {
        let data = self
            .execute::<CollectionQuery>(
                CollectionVariables {
                    ctx: ctx.clone(),
                    handle: handle.to_string(),
                    filters: args.filters,
                    sort_key: args.sort_key,
                    reverse: args.reverse,
                    page: args.page,
                },
                CachePolicy::Short,
            )
            .await?;

        data.collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// An online store page by handle.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the page does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn page(&self, handle: &str, ctx: &InContext) -> Result<Page, ShopifyError> {
        let data = self
            .execute::<PageQuery>(
                HandleVariables {
                    ctx: ctx.clone(),
                    handle: handle.to_string(),
                },
                CachePolicy::Short,
            )
            .await?;

        data.page
            .ok_or_else(|| ShopifyError::NotFound(format!("Page not found: {handle}")))
    }

    /// Titles and handles of every configured shop policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn policies(&self, ctx: &InContext) -> Result<Vec<ShopPolicy>, ShopifyError> {
        let data = self
            .execute::<Policies>(ContextVariables { ctx: ctx.clone() }, CachePolicy::Long)
            .await?;
        Ok(data.shop.into_vec())
    }

    /// A single policy with its body; `None` when the shop has not set it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn policy(
        &self,
        kind: PolicyKind,
        ctx: &InContext,
    ) -> Result<Option<ShopPolicy>, ShopifyError> {
        let variables = PolicyVariables {
            ctx: ctx.clone(),
            privacy_policy: kind == PolicyKind::Privacy,
            shipping_policy: kind == PolicyKind::Shipping,
            terms_of_service: kind == PolicyKind::TermsOfService,
            refund_policy: kind == PolicyKind::Refund,
            subscription_policy: kind == PolicyKind::Subscription,
        };
        let data = self
            .execute::<PolicyQuery>(variables, CachePolicy::Long)
            .await?;
        Ok(data.shop.into_vec().into_iter().next())
    }

    /// A blog with a page of articles.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the blog does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self))]
    pub async fn blog(
        &self,
        blog_handle: &str,
        page: PaginationVariables,
        ctx: &InContext,
    ) -> Result<Blog, ShopifyError> {
        let data = self
            .execute::<BlogQuery>(
                BlogVariables {
                    ctx: ctx.clone(),
                    blog_handle: blog_handle.to_string(),
                    page,
                },
                CachePolicy::Short,
            )
            .await?;

        data.blog
            .ok_or_else(|| ShopifyError::NotFound(format!("Blog not found: {blog_handle}")))
    }

    /// An article within a blog.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the blog or article does not
    /// exist, or an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn article(
        &self,
        blog_handle: &str,
        article_handle: &str,
        ctx: &InContext,
    ) -> Result<ArticleData, ShopifyError> {
        let data = self
            .execute::<ArticleQuery>(
                ArticleVariables {
                    ctx: ctx.clone(),
                    blog_handle: blog_handle.to_string(),
                    article_handle: article_handle.to_string(),
                },
                CachePolicy::Short,
            )
            .await?;

        let found = data
            .blog
            .as_ref()
            .is_some_and(|b| b.article_by_handle.is_some());
        if !found {
            return Err(ShopifyError::NotFound(format!(
                "Article not found: {blog_handle}/{article_handle}"
            )));
        }
        Ok(data)
    }

    /// Products, collections and pages for the sitemap.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sitemap_resources(&self, ctx: &InContext) -> Result<SitemapData, ShopifyError> {
        self.execute::<SitemapResources>(ContextVariables { ctx: ctx.clone() }, CachePolicy::Long)
            .await
    }
}

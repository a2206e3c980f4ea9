//! Journal (blog) route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use super::views::{ImageView, format_date};
use crate::catalog::pagination::ARTICLES_PAGE_SIZE;
use crate::catalog::{PageLinks, QueryParams, pagination_variables};
use crate::error::{AppError, Result};
use crate::filters;
use crate::i18n::RequestLocale;
use crate::seo::{PageSeo, article_json_ld, breadcrumbs_json_ld};
use crate::shopify::Article;
use crate::state::AppState;

/// The blog served under `/journal`.
pub const BLOG_HANDLE: &str = "Journal";

/// An article in the journal grid.
#[derive(Debug, Clone)]
pub struct ArticleCard {
    pub href: String,
    pub title: String,
    pub published: String,
    pub image: Option<ImageView>,
}

impl ArticleCard {
    fn new(article: &Article, locale: &RequestLocale) -> Self {
        Self {
            href: locale.path(&format!("/journal/{}", article.handle)),
            title: article.title.clone(),
            published: format_date(&article.published_at),
            image: article
                .image
                .as_ref()
                .map(|image| ImageView::card(image, &article.title)),
        }
    }
}

/// Journal index template.
#[derive(Template, WebTemplate)]
#[template(path = "journal/index.html")]
pub struct JournalTemplate {
    pub shell: Shell,
    pub title: String,
    pub articles: Vec<ArticleCard>,
    pub pages: PageLinks,
}

/// Article data for templates.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub title: String,
    pub author: Option<String>,
    pub published: String,
    pub content_html: String,
    pub image: Option<ImageView>,
}

/// Article template.
#[derive(Template, WebTemplate)]
#[template(path = "journal/article.html")]
pub struct ArticleTemplate {
    pub shell: Shell,
    pub blog_title: String,
    pub blog_href: String,
    pub article: ArticleView,
}

/// `GET /journal`
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageRequest,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let variables = pagination_variables(&params, ARTICLES_PAGE_SIZE);
    let (layout, blog) = tokio::try_join!(
        page.layout(&state),
        state.storefront().blog(BLOG_HANDLE, variables, page.ctx()),
    )?;

    let seo_meta = blog.seo.clone().unwrap_or_default();
    let seo = PageSeo::new(
        seo_meta.title.unwrap_or_else(|| blog.title.clone()),
        seo_meta.description.as_deref().unwrap_or_default(),
        page.canonical(&state, "/journal"),
    );
    Ok(JournalTemplate {
        articles: blog
            .articles
            .nodes
            .iter()
            .map(|a| ArticleCard::new(a, &page.locale))
            .collect(),
        pages: PageLinks::new(&blog.articles.page_info, &params, &page.link("/journal")),
        title: blog.title,
        shell: page.shell(&state, &layout, seo),
    })
}

/// `GET /journal/{handle}`
#[instrument(skip(state, page))]
pub async fn article(
    State(state): State<AppState>,
    page: PageRequest,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let (layout, data) = tokio::try_join!(
        page.layout(&state),
        state.storefront().article(BLOG_HANDLE, &handle, page.ctx()),
    )?;
    let blog = data
        .blog
        .ok_or_else(|| AppError::NotFound(format!("Blog not found: {BLOG_HANDLE}")))?;
    let article = blog
        .article_by_handle
        .ok_or_else(|| AppError::NotFound(format!("Article not found: {handle}")))?;

    let canonical = page.canonical(&state, &format!("/journal/{handle}"));
    let seo_meta = article.seo.clone().unwrap_or_default();
    let seo = PageSeo::new(
        seo_meta.title.unwrap_or_else(|| article.title.clone()),
        seo_meta
            .description
            .as_deref()
            .unwrap_or(&article.content_html),
        canonical.clone(),
    )
    .with_json_ld(&article_json_ld(&article, &canonical))
    .with_json_ld(&breadcrumbs_json_ld(&[
        (blog.title.as_str(), page.canonical(&state, "/journal")),
        (article.title.as_str(), canonical.clone()),
    ]));

    Ok(ArticleTemplate {
        article: ArticleView {
            image: article
                .image
                .as_ref()
                .map(|image| ImageView::hero(image, &article.title)),
            author: article.author.as_ref().map(|a| a.name.clone()),
            published: format_date(&article.published_at),
            title: article.title,
            content_html: article.content_html,
        },
        blog_title: blog.title,
        blog_href: page.link("/journal"),
        shell: page.shell(&state, &layout, seo),
    })
}

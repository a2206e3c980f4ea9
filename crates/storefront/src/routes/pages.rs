//! Online store pages and shop policies.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use crate::error::{AppError, Result};
use crate::filters;
use crate::seo::PageSeo;
use crate::shopify::PolicyKind;
use crate::state::AppState;

/// A page or policy body.
#[derive(Template, WebTemplate)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub shell: Shell,
    pub title: String,
    pub body: String,
    /// Link back to the policy list, on policy pages.
    pub back_href: Option<String>,
}

/// A link in the policy list.
#[derive(Debug, Clone)]
pub struct PolicyLink {
    pub title: String,
    pub href: String,
}

/// Policy list template.
#[derive(Template, WebTemplate)]
#[template(path = "policies.html")]
pub struct PoliciesTemplate {
    pub shell: Shell,
    pub policies: Vec<PolicyLink>,
}

/// Map a URL handle to the shop policy it names.
///
/// The handle is converted from kebab case to the API's camel-case field
/// name (`privacy-policy` → `privacyPolicy`); only the known fields match.
#[must_use]
pub fn policy_kind(handle: &str) -> Option<PolicyKind> {
    let mut field = String::with_capacity(handle.len());
    let mut upper = false;
    for c in handle.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            field.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            field.push(c);
        }
    }

    match field.as_str() {
        "privacyPolicy" => Some(PolicyKind::Privacy),
        "shippingPolicy" => Some(PolicyKind::Shipping),
        "termsOfService" => Some(PolicyKind::TermsOfService),
        "refundPolicy" => Some(PolicyKind::Refund),
        "subscriptionPolicy" => Some(PolicyKind::Subscription),
        _ => None,
    }
}

/// `GET /pages/{handle}`
#[instrument(skip(state, page))]
pub async fn page(
    State(state): State<AppState>,
    page: PageRequest,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let (layout, content) = tokio::try_join!(
        page.layout(&state),
        state.storefront().page(&handle, page.ctx()),
    )?;

    let seo_meta = content.seo.clone().unwrap_or_default();
    let seo = PageSeo::new(
        seo_meta.title.unwrap_or_else(|| content.title.clone()),
        seo_meta.description.as_deref().unwrap_or(&content.body),
        page.canonical(&state, &format!("/pages/{handle}")),
    );
    Ok(PageTemplate {
        title: content.title,
        body: content.body,
        back_href: None,
        shell: page.shell(&state, &layout, seo),
    })
}

/// `GET /policies`
#[instrument(skip(state, page))]
pub async fn policies(State(state): State<AppState>, page: PageRequest) -> Result<impl IntoResponse> {
    let (layout, policies) = tokio::try_join!(
        page.layout(&state),
        state.storefront().policies(page.ctx()),
    )?;
    if policies.is_empty() {
        return Err(AppError::NotFound("No policies found".to_string()));
    }

    let seo = PageSeo::new("Policies", "", page.canonical(&state, "/policies"));
    Ok(PoliciesTemplate {
        policies: policies
            .into_iter()
            .map(|p| PolicyLink {
                href: page.link(&format!("/policies/{}", p.handle)),
                title: p.title,
            })
            .collect(),
        shell: page.shell(&state, &layout, seo),
    })
}

/// `GET /policies/{handle}`
#[instrument(skip(state, page))]
pub async fn policy(
    State(state): State<AppState>,
    page: PageRequest,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let kind = policy_kind(&handle)
        .ok_or_else(|| AppError::NotFound(format!("Unknown policy: {handle}")))?;
    let (layout, policy) = tokio::try_join!(
        page.layout(&state),
        state.storefront().policy(kind, page.ctx()),
    )?;
    let policy = policy.ok_or_else(|| AppError::NotFound(format!("Policy not set: {handle}")))?;

    let seo = PageSeo::new(
        policy.title.clone(),
        &policy.body,
        page.canonical(&state, &format!("/policies/{handle}")),
    );
    Ok(PageTemplate {
        title: policy.title,
        body: policy.body,
        back_href: Some(page.link("/policies")),
        shell: page.shell(&state, &layout, seo),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kind_from_handle() {
        assert_eq!(policy_kind("privacy-policy"), Some(PolicyKind::Privacy));
        assert_eq!(policy_kind("shipping-policy"), Some(PolicyKind::Shipping));
        assert_eq!(policy_kind("terms-of-service"), Some(PolicyKind::TermsOfService));
        assert_eq!(policy_kind("refund-policy"), Some(PolicyKind::Refund));
        assert_eq!(policy_kind("subscription-policy"), Some(PolicyKind::Subscription));
    }

    #[test]
    fn test_unknown_policy_handles() {
        assert_eq!(policy_kind("privacyPolicy"), Some(PolicyKind::Privacy));
        assert_eq!(policy_kind("cookie-policy"), None);
        assert_eq!(policy_kind("privacy"), None);
        assert_eq!(policy_kind(""), None);
    }
}

//! Cart route handlers.
//!
//! Every cart change is a `POST /cart` with a `cartAction` field. The cart id
//! lives in the session; the cart itself lives in the Storefront API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::is_local_path;
use super::layout::{PageRequest, Shell};
use super::views::ImageView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::i18n::{RequestLocale, lookup_country};
use crate::middleware::OptionalCustomer;
use crate::models::session_keys;
use crate::seo::PageSeo;
use crate::shopify::queries::CartInput;
use crate::shopify::{
    Cart, CartBuyerIdentityInput, CartLine, CartLineInput, CartLineUpdateInput, InContext,
    ShopifyError,
};
use crate::state::AppState;

/// The `cartAction` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    LinesAdd,
    LinesUpdate,
    LinesRemove,
    DiscountCodesUpdate,
    BuyerIdentityUpdate,
}

impl CartAction {
    /// Parse the form value; `None` for anything unsupported.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LinesAdd" => Some(Self::LinesAdd),
            "LinesUpdate" => Some(Self::LinesUpdate),
            "LinesRemove" => Some(Self::LinesRemove),
            "DiscountCodesUpdate" => Some(Self::DiscountCodesUpdate),
            "BuyerIdentityUpdate" => Some(Self::BuyerIdentityUpdate),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::LinesAdd => "LinesAdd",
            Self::LinesUpdate => "LinesUpdate",
            Self::LinesRemove => "LinesRemove",
            Self::DiscountCodesUpdate => "DiscountCodesUpdate",
            Self::BuyerIdentityUpdate => "BuyerIdentityUpdate",
        }
    }
}

/// Fields accepted by `POST /cart`; which ones matter depends on the action.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartForm {
    pub cart_action: Option<String>,
    /// JSON array of `{merchandiseId, quantity}`.
    pub lines: Option<String>,
    pub variant_id: Option<String>,
    pub quantity: Option<String>,
    pub line_id: Option<String>,
    pub discount_code: Option<String>,
    pub country_code: Option<String>,
    pub redirect_to: Option<String>,
}

impl CartForm {
    fn quantity(&self, min: i64) -> Result<i64> {
        match self.quantity.as_deref().map(str::trim) {
            None | Some("") => Ok(1.max(min)),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|q| *q >= min)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid quantity: {raw}"))),
        }
    }

    fn line_id(&self) -> Result<String> {
        self.line_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .ok_or_else(|| AppError::BadRequest("Missing line id".to_string()))
    }

    /// Lines to add, from `lines` JSON or a single `variantId`.
    fn lines_to_add(&self) -> Result<Vec<CartLineInput>> {
        if let Some(raw) = self.lines.as_deref().filter(|l| !l.trim().is_empty()) {
            let lines: Vec<CartLineInput> = serde_json::from_str(raw)
                .map_err(|e| AppError::BadRequest(format!("Invalid cart lines: {e}")))?;
            if lines.is_empty() || lines.iter().any(|l| l.quantity < 1) {
                return Err(AppError::BadRequest("Invalid cart lines".to_string()));
            }
            return Ok(lines);
        }

        let merchandise_id = self
            .variant_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing variant id".to_string()))?;
        Ok(vec![CartLineInput {
            merchandise_id: merchandise_id.to_string(),
            quantity: self.quantity(1)?,
        }])
    }

    /// The post-action redirect, when it is a local path.
    fn redirect_to(&self) -> Option<&str> {
        self.redirect_to
            .as_deref()
            .filter(|target| is_local_path(target))
    }
}

async fn cart_id(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// The session's cart, or `None` when there is none or it has expired.
async fn current_cart(
    state: &AppState,
    session: &Session,
    ctx: &InContext,
) -> std::result::Result<Option<Cart>, ShopifyError> {
    let Some(id) = cart_id(session).await else {
        return Ok(None);
    };
    state.storefront().cart(&id, ctx).await
}

// =============================================================================
// Views
// =============================================================================

/// A cart line for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub href: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: i64,
    pub price: String,
    pub line_price: String,
    pub image: Option<ImageView>,
}

impl CartLineView {
    fn new(line: &CartLine, locale: &RequestLocale) -> Self {
        let merchandise = &line.merchandise;
        let query = merchandise
            .selected_options
            .iter()
            .map(|o| format!("{}={}", urlencoding::encode(&o.name), urlencoding::encode(&o.value)))
            .collect::<Vec<_>>()
            .join("&");
        let path = format!("/products/{}", merchandise.product.handle);
        Self {
            id: line.id.clone(),
            href: locale.path(&if query.is_empty() { path.clone() } else { format!("{path}?{query}") }),
            title: merchandise.product.title.clone(),
            variant_title: (merchandise.title != "Default Title").then(|| merchandise.title.clone()),
            quantity: line.quantity,
            price: line.cost.amount_per_quantity.display(),
            line_price: line.cost.total_amount.display(),
            image: merchandise
                .image
                .as_ref()
                .map(|image| ImageView::card(image, &merchandise.product.title)),
        }
    }

    /// Quantity after pressing "-" (zero removes the line).
    #[must_use]
    pub const fn decrease_quantity(&self) -> i64 {
        if self.quantity > 0 { self.quantity - 1 } else { 0 }
    }

    #[must_use]
    pub const fn increase_quantity(&self) -> i64 {
        self.quantity + 1
    }
}

/// A cart for templates.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub tax: Option<String>,
    pub total: String,
    pub discount_codes: Vec<String>,
    pub total_quantity: i64,
}

impl CartView {
    fn new(cart: &Cart, locale: &RequestLocale) -> Self {
        Self {
            lines: cart
                .lines
                .nodes
                .iter()
                .map(|line| CartLineView::new(line, locale))
                .collect(),
            subtotal: cart.cost.subtotal_amount.display(),
            tax: cart.cost.total_tax_amount.as_ref().map(|t| t.display()),
            total: cart.cost.total_amount.display(),
            discount_codes: cart
                .discount_codes
                .iter()
                .filter(|d| d.applicable)
                .map(|d| d.code.clone())
                .collect(),
            total_quantity: cart.total_quantity,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub shell: Shell,
    pub cart: CartView,
    pub action: String,
    pub checkout_href: String,
    pub continue_href: String,
}

/// Cart badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: i64,
    pub href: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /cart`
#[instrument(skip(state, page, session))]
pub async fn show(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
) -> Result<impl IntoResponse> {
    let ctx = page.ctx();
    let (layout, cart) = tokio::try_join!(
        page.layout(&state),
        current_cart(&state, &session, ctx),
    )?;

    let seo = PageSeo::new("Cart", "", page.canonical(&state, "/cart"));
    Ok(CartTemplate {
        cart: cart
            .as_ref()
            .map(|cart| CartView::new(cart, &page.locale))
            .unwrap_or_default(),
        action: page.link("/cart"),
        checkout_href: page.link("/cart/checkout"),
        continue_href: page.link("/products"),
        shell: page.shell(&state, &layout, seo),
    })
}

/// `POST /cart`
#[instrument(skip(state, locale, session, customer, form), fields(action = ?form.cart_action))]
pub async fn update(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    let action = form
        .cart_action
        .as_deref()
        .and_then(CartAction::parse)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "{} cart action is not defined",
                form.cart_action.as_deref().unwrap_or("Missing")
            ))
        })?;

    let ctx = locale.in_context();
    let storefront = state.storefront();
    let existing = cart_id(&session).await;
    let mut fallback = locale.path("/cart");

    let cart = match action {
        CartAction::LinesAdd => {
            let lines = form.lines_to_add()?;
            match existing.as_deref() {
                Some(id) => Some(storefront.cart_lines_add(id, lines, &ctx).await?),
                None => {
                    let input = CartInput {
                        lines,
                        buyer_identity: CartBuyerIdentityInput {
                            country_code: Some(locale.locale.country.clone()),
                            customer_access_token: customer.map(|c| c.access_token),
                        },
                    };
                    Some(storefront.cart_create(input, &ctx).await?)
                }
            }
        }
        CartAction::LinesUpdate => {
            let line = CartLineUpdateInput {
                id: form.line_id()?,
                quantity: form.quantity(0)?,
            };
            match existing.as_deref() {
                Some(id) => Some(storefront.cart_lines_update(id, vec![line], &ctx).await?),
                None => None,
            }
        }
        CartAction::LinesRemove => {
            let line_id = form.line_id()?;
            match existing.as_deref() {
                Some(id) => Some(storefront.cart_lines_remove(id, vec![line_id], &ctx).await?),
                None => None,
            }
        }
        CartAction::DiscountCodesUpdate => {
            let codes: Vec<String> = form
                .discount_code
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(String::from)
                .into_iter()
                .collect();
            match existing.as_deref() {
                Some(id) => Some(storefront.cart_discount_codes_update(id, codes, &ctx).await?),
                None => None,
            }
        }
        CartAction::BuyerIdentityUpdate => {
            let country_code = form
                .country_code
                .as_deref()
                .map(|c| c.trim().to_ascii_uppercase())
                .filter(|c| c.len() == 2)
                .ok_or_else(|| AppError::BadRequest("Missing country code".to_string()))?;
            if let Some((prefix, _)) = lookup_country(&country_code, &locale.locale.language) {
                fallback = format!("{prefix}/cart");
            }
            match existing.as_deref() {
                Some(id) => {
                    let identity = CartBuyerIdentityInput {
                        country_code: Some(country_code),
                        customer_access_token: customer.map(|c| c.access_token),
                    };
                    Some(storefront.cart_buyer_identity_update(id, identity, &ctx).await?)
                }
                None => None,
            }
        }
    };

    if let Some(cart) = &cart {
        session.insert(session_keys::CART_ID, &cart.id).await?;
        add_breadcrumb("cart", action.name(), &[("cart_id", &cart.id)]);
    }

    let target = form.redirect_to().map_or(fallback, String::from);
    Ok(Redirect::to(&target).into_response())
}

/// `GET /cart/count`
#[instrument(skip(state, locale, session))]
pub async fn count(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
) -> Result<impl IntoResponse> {
    let cart = current_cart(&state, &session, &locale.in_context()).await?;
    Ok(CartCountTemplate {
        count: cart.map_or(0, |c| c.total_quantity),
        href: locale.path("/cart"),
    })
}

/// `GET /cart/checkout`
#[instrument(skip(state, locale, session))]
pub async fn checkout(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
) -> Result<Response> {
    let cart = current_cart(&state, &session, &locale.in_context()).await?;
    let target = cart.map_or_else(|| locale.path("/cart"), |c| c.checkout_url);
    Ok(Redirect::to(&target).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> CartForm {
        let fields: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::from(*v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(fields)).unwrap()
    }

    #[test]
    fn test_cart_action_parse() {
        assert_eq!(CartAction::parse("LinesAdd"), Some(CartAction::LinesAdd));
        assert_eq!(
            CartAction::parse("BuyerIdentityUpdate"),
            Some(CartAction::BuyerIdentityUpdate)
        );
        assert_eq!(CartAction::parse("NoteUpdate"), None);
        assert_eq!(CartAction::parse("linesadd"), None);
    }

    #[test]
    fn test_lines_from_json() {
        let f = form(&[(
            "lines",
            r#"[{"merchandiseId":"gid://shopify/ProductVariant/1","quantity":2},{"merchandiseId":"gid://shopify/ProductVariant/2"}]"#,
        )]);
        let lines = f.lines_to_add().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 1);
    }

    #[test]
    fn test_lines_from_variant_field() {
        let f = form(&[("variantId", "gid://shopify/ProductVariant/9"), ("quantity", "3")]);
        let lines = f.lines_to_add().unwrap();
        assert_eq!(lines[0].merchandise_id, "gid://shopify/ProductVariant/9");
        assert_eq!(lines[0].quantity, 3);

        assert!(form(&[("quantity", "1")]).lines_to_add().is_err());
        assert!(form(&[("variantId", "x"), ("quantity", "0")]).lines_to_add().is_err());
        assert!(form(&[("lines", "not json")]).lines_to_add().is_err());
    }

    #[test]
    fn test_update_allows_zero_quantity() {
        let f = form(&[("lineId", "gid://shopify/CartLine/1"), ("quantity", "0")]);
        assert_eq!(f.quantity(0).unwrap(), 0);
        assert!(f.quantity(1).is_err());
        assert!(form(&[("lineId", " ")]).line_id().is_err());
    }

    #[test]
    fn test_redirect_to_must_be_local() {
        assert_eq!(form(&[("redirectTo", "/en-ca/products")]).redirect_to(), Some("/en-ca/products"));
        assert_eq!(form(&[("redirectTo", "//evil.example")]).redirect_to(), None);
        assert_eq!(form(&[("redirectTo", "https://evil.example")]).redirect_to(), None);
        assert_eq!(CartForm::default().redirect_to(), None);
    }
}

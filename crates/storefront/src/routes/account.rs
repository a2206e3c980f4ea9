//! Customer account route handlers.
//!
//! Every route here requires a signed-in customer ([`RequireCustomer`]). A
//! token the API no longer recognizes clears the session and sends the
//! visitor back to login.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use demo_store_core::{ResourceType, ShopifyGid, legacy_id};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use super::views::{ImageView, format_date};
use crate::catalog::QueryParams;
use crate::error::{AppError, Result, add_breadcrumb, set_sentry_user};
use crate::filters;
use crate::i18n::RequestLocale;
use crate::middleware::{RequireCustomer, clear_customer_session, set_customer_session};
use crate::models::CustomerSession;
use crate::seo::PageSeo;
use crate::shopify::queries::LayoutData;
use crate::shopify::{
    Customer, CustomerUpdateInput, MailingAddress, MailingAddressInput, Order, PricingValue,
    ShopifyError,
};
use crate::state::AppState;

/// Path segment for a new address.
const NEW_ADDRESS: &str = "add";

// =============================================================================
// Views
// =============================================================================

/// A past order in the account overview.
#[derive(Debug, Clone)]
pub struct OrderCard {
    pub href: String,
    pub name: String,
    pub date: String,
    pub status: &'static str,
    pub total: String,
    pub image: Option<ImageView>,
}

/// `/account/orders/{id}` with the order's access key, if it has one.
fn order_href(order_id: &str, locale: &RequestLocale) -> String {
    let path = format!("/account/orders/{}", legacy_id(order_id));
    let key = order_id
        .split_once('?')
        .map(|(_, query)| QueryParams::parse(query))
        .and_then(|params| params.get("key").map(String::from));
    match key {
        Some(key) => locale.path(&format!("{path}?key={}", urlencoding::encode(&key))),
        None => locale.path(&path),
    }
}

impl OrderCard {
    fn new(order: &Order, locale: &RequestLocale) -> Self {
        Self {
            href: order_href(&order.id, locale),
            name: order.name.clone(),
            date: format_date(&order.processed_at),
            status: order.fulfillment_status.label(),
            total: order.current_total_price.display(),
            image: order
                .line_items
                .nodes
                .first()
                .and_then(|item| item.variant.as_ref())
                .and_then(|variant| variant.image.as_ref())
                .map(|image| ImageView::card(image, &order.name)),
        }
    }
}

/// A saved address.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub lines: Vec<String>,
    pub is_default: bool,
    pub edit_href: String,
    pub delete_action: String,
}

impl AddressView {
    fn new(address: &MailingAddress, default_id: Option<&str>, locale: &RequestLocale) -> Self {
        let path = locale.path(&format!("/account/address/{}", legacy_id(&address.id)));
        let name = [address.first_name.as_deref(), address.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let lines = std::iter::once(name)
            .chain(address.formatted.iter().cloned())
            .filter(|line| !line.trim().is_empty())
            .collect();
        Self {
            lines,
            is_default: default_id.is_some_and(|id| legacy_id(id) == legacy_id(&address.id)),
            edit_href: path.clone(),
            delete_action: path,
        }
    }
}

/// Profile fields shown on the overview and edit form.
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ProfileView {
    fn new(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone().unwrap_or_default(),
            last_name: customer.last_name.clone().unwrap_or_default(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Load the customer, clearing the session when the token is no longer
/// accepted.
///
/// `Err(response)` is the redirect to login.
async fn load_customer(
    state: &AppState,
    page: &PageRequest,
    session: &Session,
    customer: &CustomerSession,
) -> Result<std::result::Result<(LayoutData, Customer), Response>> {
    let (layout, found) = tokio::try_join!(
        page.layout(state),
        state.storefront().customer(&customer.access_token, page.ctx()),
    )?;
    match found {
        Some(found) => {
            if let Some(email) = &found.email {
                set_sentry_user(email);
            }
            Ok(Ok((layout, found)))
        }
        None => {
            tracing::info!("Customer token rejected, signing out");
            clear_customer_session(session).await?;
            Ok(Err(Redirect::to(&page.link("/account/login")).into_response()))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn mutation_message(err: &AppError) -> String {
    match err {
        AppError::BadRequest(message) => message.clone(),
        _ => "Something went wrong. Please try again later.".to_string(),
    }
}

// =============================================================================
// Overview
// =============================================================================

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub shell: Shell,
    pub profile: ProfileView,
    pub orders: Vec<OrderCard>,
    pub addresses: Vec<AddressView>,
    pub default_address: Option<AddressView>,
    pub edit_href: String,
    pub add_address_href: String,
    pub logout_action: String,
    /// Shown in place of an order history.
    pub featured_src: String,
}

/// `GET /account`
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Response> {
    let (layout, customer) = match load_customer(&state, &page, &session, &customer).await? {
        Ok(loaded) => loaded,
        Err(redirect) => return Ok(redirect),
    };

    let default_id = customer.default_address.as_ref().map(|a| a.id.as_str());
    let addresses = customer
        .addresses
        .nodes
        .iter()
        .map(|a| AddressView::new(a, default_id, &page.locale))
        .collect();
    let default_address = customer
        .default_address
        .as_ref()
        .map(|a| AddressView::new(a, default_id, &page.locale));
    let profile = ProfileView::new(&customer);

    let heading = match profile.first_name.as_str() {
        "" => "Account Details".to_string(),
        name => format!("Welcome, {name}."),
    };
    let seo = PageSeo::new(heading, "", page.canonical(&state, "/account"));
    Ok(AccountTemplate {
        orders: customer
            .orders
            .nodes
            .iter()
            .map(|o| OrderCard::new(o, &page.locale))
            .collect(),
        addresses,
        default_address,
        profile,
        edit_href: page.link("/account/edit"),
        add_address_href: page.link(&format!("/account/address/{NEW_ADDRESS}")),
        logout_action: page.link("/account/logout"),
        featured_src: page.link("/featured-products"),
        shell: page.shell(&state, &layout, seo),
    }
    .into_response())
}

// =============================================================================
// Profile
// =============================================================================

/// Profile form data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub new_password2: Option<String>,
}

impl ProfileForm {
    /// The requested new password, or an error message when the
    /// confirmation differs.
    fn new_password(&self) -> std::result::Result<Option<&str>, &'static str> {
        let new = self.new_password.as_deref().filter(|p| !p.is_empty());
        let confirm = self.new_password2.as_deref().filter(|p| !p.is_empty());
        match (new, confirm) {
            (None, None) => Ok(None),
            (Some(new), Some(confirm)) if new == confirm => Ok(Some(new)),
            _ => Err("New passwords must match."),
        }
    }

    fn into_view(self) -> ProfileView {
        ProfileView {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
        }
    }
}

/// Profile form template.
#[derive(Template, WebTemplate)]
#[template(path = "account/edit.html")]
pub struct EditTemplate {
    pub shell: Shell,
    pub profile: ProfileView,
    pub action: String,
    pub cancel_href: String,
    pub error: Option<String>,
}

impl EditTemplate {
    fn new(state: &AppState, page: &PageRequest, layout: &LayoutData, profile: ProfileView) -> Self {
        let seo = PageSeo::new("Edit Account", "", page.canonical(state, "/account/edit"));
        Self {
            shell: page.shell(state, layout, seo),
            profile,
            action: page.link("/account/edit"),
            cancel_href: page.link("/account"),
            error: None,
        }
    }
}

/// `GET /account/edit`
#[instrument(skip_all)]
pub async fn edit_page(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Response> {
    let (layout, customer) = match load_customer(&state, &page, &session, &customer).await? {
        Ok(loaded) => loaded,
        Err(redirect) => return Ok(redirect),
    };
    Ok(EditTemplate::new(&state, &page, &layout, ProfileView::new(&customer)).into_response())
}

/// `POST /account/edit`
///
/// A password change re-authenticates with the current password first.
#[instrument(skip_all)]
pub async fn edit(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let (layout, current) = match load_customer(&state, &page, &session, &customer).await? {
        Ok(loaded) => loaded,
        Err(redirect) => return Ok(redirect),
    };
    let storefront = state.storefront();

    let failure = match form.new_password() {
        Err(message) => Some(message.to_string()),
        Ok(Some(_)) => {
            let email = current.email.clone().unwrap_or_default();
            let password = SecretString::from(form.current_password.clone().unwrap_or_default());
            match storefront.customer_access_token_create(&email, &password).await {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "Current password check failed");
                    Some("Incorrect password.".to_string())
                }
            }
        }
        Ok(None) => None,
    };

    let failure = match failure {
        Some(message) => Some(message),
        None => {
            let input = CustomerUpdateInput {
                first_name: non_empty(form.first_name.as_deref()),
                last_name: non_empty(form.last_name.as_deref()),
                email: non_empty(form.email.as_deref()),
                phone: non_empty(form.phone.as_deref()),
                password: form.new_password().ok().flatten().map(String::from),
            };
            match storefront.customer_update(&customer.access_token, input).await {
                Ok(rotated) => {
                    if let Some(token) = rotated {
                        set_customer_session(&session, &CustomerSession::from(token)).await?;
                    }
                    add_breadcrumb("account", "Profile updated", &[]);
                    return Ok(Redirect::to(&page.link("/account")).into_response());
                }
                Err(e) => Some(mutation_message(&AppError::from(e))),
            }
        }
    };

    let mut template = EditTemplate::new(&state, &page, &layout, form.into_view());
    template.error = failure;
    Ok((StatusCode::BAD_REQUEST, template).into_response())
}

// =============================================================================
// Addresses
// =============================================================================

/// Address form data.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[serde(rename = "_action")]
    pub action: Option<String>,
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
    pub default_address: Option<String>,
}

impl AddressForm {
    fn is_delete(&self) -> bool {
        self.action.as_deref() == Some("delete")
    }

    fn make_default(&self) -> bool {
        self.default_address.as_deref() == Some("on")
    }

    fn to_input(&self) -> MailingAddressInput {
        MailingAddressInput {
            first_name: non_empty(self.first_name.as_deref()),
            last_name: non_empty(self.last_name.as_deref()),
            company: non_empty(self.company.as_deref()),
            address1: non_empty(self.address1.as_deref()),
            address2: non_empty(self.address2.as_deref()),
            city: non_empty(self.city.as_deref()),
            province: non_empty(self.province.as_deref()),
            country: non_empty(self.country.as_deref()),
            zip: non_empty(self.zip.as_deref()),
            phone: non_empty(self.phone.as_deref()),
        }
    }

    fn from_address(address: &MailingAddress, is_default: bool) -> Self {
        Self {
            action: None,
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            company: address.company.clone(),
            address1: address.address1.clone(),
            address2: address.address2.clone(),
            city: address.city.clone(),
            province: address.province.clone(),
            country: address.country.clone(),
            zip: address.zip.clone(),
            phone: address.phone.clone(),
            default_address: is_default.then(|| "on".to_string()),
        }
    }
}

/// Which address a route addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AddressTarget {
    New,
    /// Numeric id from the URL.
    Existing(String),
}

impl AddressTarget {
    fn parse(id: &str) -> Result<Self> {
        if id == NEW_ADDRESS {
            return Ok(Self::New);
        }
        ShopifyGid::new(ResourceType::MailingAddress, id)
            .map(|gid| Self::Existing(gid.id().to_string()))
            .map_err(|_| AppError::NotFound(format!("Address not found: {id}")))
    }

    /// The customer's address with this id (its full API id).
    fn find<'a>(&self, customer: &'a Customer) -> Result<Option<&'a MailingAddress>> {
        match self {
            Self::New => Ok(None),
            Self::Existing(id) => customer
                .addresses
                .nodes
                .iter()
                .find(|a| legacy_id(&a.id) == id)
                .map(Some)
                .ok_or_else(|| AppError::NotFound(format!("Address not found: {id}"))),
        }
    }
}

/// Address form template.
#[derive(Template, WebTemplate)]
#[template(path = "account/address.html")]
pub struct AddressTemplate {
    pub shell: Shell,
    pub heading: &'static str,
    pub address: AddressForm,
    pub action: String,
    pub cancel_href: String,
    pub error: Option<String>,
}

impl AddressTemplate {
    fn new(
        state: &AppState,
        page: &PageRequest,
        layout: &LayoutData,
        id: &str,
        target: &AddressTarget,
        address: AddressForm,
    ) -> Self {
        let path = format!("/account/address/{id}");
        let heading = match target {
            AddressTarget::New => "Add address",
            AddressTarget::Existing(_) => "Edit address",
        };
        let seo = PageSeo::new(heading, "", page.canonical(state, &path));
        Self {
            shell: page.shell(state, layout, seo),
            heading,
            address,
            action: page.link(&path),
            cancel_href: page.link("/account"),
            error: None,
        }
    }
}

/// `GET /account/address/{id}`
#[instrument(skip(state, page, session, customer))]
pub async fn address_page(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<String>,
) -> Result<Response> {
    let target = AddressTarget::parse(&id)?;
    let (layout, customer) = match load_customer(&state, &page, &session, &customer).await? {
        Ok(loaded) => loaded,
        Err(redirect) => return Ok(redirect),
    };

    let default_id = customer.default_address.as_ref().map(|a| legacy_id(&a.id));
    let form = target.find(&customer)?.map_or_else(AddressForm::default, |address| {
        AddressForm::from_address(address, default_id == Some(legacy_id(&address.id)))
    });
    Ok(AddressTemplate::new(&state, &page, &layout, &id, &target, form).into_response())
}

/// `POST /account/address/{id}`
///
/// `_action=delete` removes the address; otherwise it is created (`add`) or
/// updated, and `defaultAddress=on` makes it the default.
#[instrument(skip(state, page, session, customer, form))]
pub async fn address(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<String>,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let target = AddressTarget::parse(&id)?;
    let (layout, current) = match load_customer(&state, &page, &session, &customer).await? {
        Ok(loaded) => loaded,
        Err(redirect) => return Ok(redirect),
    };
    let existing = target.find(&current)?.map(|a| a.id.clone());
    let token = customer.access_token.as_str();
    let storefront = state.storefront();

    let result: std::result::Result<(), ShopifyError> = async {
        match (&existing, form.is_delete()) {
            (Some(address_id), true) => {
                return storefront.customer_address_delete(token, address_id).await;
            }
            (None, true) => {
                return Err(ShopifyError::UserError("Nothing to delete".to_string()));
            }
            _ => {}
        }

        let address_id = match &existing {
            Some(address_id) => {
                storefront
                    .customer_address_update(token, address_id, form.to_input())
                    .await?;
                address_id.clone()
            }
            None => storefront.customer_address_create(token, form.to_input()).await?,
        };
        if form.make_default() {
            storefront
                .customer_default_address_update(token, &address_id)
                .await?;
        }
        Ok(())
    }
    .await;

    match result {
        Ok(()) => {
            add_breadcrumb("account", "Address saved", &[("address", &id)]);
            Ok(Redirect::to(&page.link("/account")).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Address update failed");
            let mut template = AddressTemplate::new(&state, &page, &layout, &id, &target, form);
            template.error = Some(mutation_message(&AppError::from(e)));
            Ok((StatusCode::BAD_REQUEST, template).into_response())
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order line for templates.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub title: String,
    pub variant_title: Option<String>,
    pub href: Option<String>,
    pub quantity: i64,
    pub price: String,
    pub total: String,
    pub image: Option<ImageView>,
}

/// Order detail for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub name: String,
    pub date: String,
    pub fulfillment_status: &'static str,
    pub financial_status: Option<&'static str>,
    pub lines: Vec<OrderLineView>,
    pub discount: Option<String>,
    pub subtotal: Option<String>,
    pub tax: Option<String>,
    pub shipping: Option<String>,
    pub total: String,
    pub shipping_address: Vec<String>,
    pub status_url: Option<String>,
}

/// The first discount, as shown in the totals ("-$10.00" or "-15%").
fn discount_label(order: &Order) -> Option<String> {
    let discount = order.discount_applications.nodes.first()?;
    Some(match &discount.value {
        PricingValue::Amount(money) => format!("-{}", money.display()),
        PricingValue::Percentage { percentage } => format!("-{percentage}%"),
    })
}

impl OrderView {
    fn new(order: &Order, locale: &RequestLocale) -> Self {
        Self {
            name: order.name.clone(),
            date: format_date(&order.processed_at),
            fulfillment_status: order.fulfillment_status.label(),
            financial_status: order.financial_status.map(|s| s.label()),
            lines: order
                .line_items
                .nodes
                .iter()
                .map(|item| {
                    let variant = item.variant.as_ref();
                    OrderLineView {
                        title: item.title.clone(),
                        variant_title: variant
                            .map(|v| v.title.clone())
                            .filter(|t| t != "Default Title"),
                        href: variant
                            .and_then(|v| v.product.as_ref())
                            .map(|p| locale.path(&format!("/products/{}", p.handle))),
                        quantity: item.quantity,
                        price: variant.map(|v| v.price.display()).unwrap_or_default(),
                        total: item.discounted_total_price.display(),
                        image: variant
                            .and_then(|v| v.image.as_ref())
                            .map(|image| ImageView::card(image, &item.title)),
                    }
                })
                .collect(),
            discount: discount_label(order),
            subtotal: order.subtotal_price.as_ref().map(|m| m.display()),
            tax: order.total_tax.as_ref().map(|m| m.display()),
            shipping: order.total_shipping_price.as_ref().map(|m| m.display()),
            total: order.current_total_price.display(),
            shipping_address: order
                .shipping_address
                .as_ref()
                .map(|a| a.formatted.clone())
                .unwrap_or_default(),
            status_url: order.status_url.clone(),
        }
    }
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "account/order.html")]
pub struct OrderTemplate {
    pub shell: Shell,
    pub order: OrderView,
    pub back_href: String,
}

/// The order id queried for `/account/orders/{id}?key=`.
fn order_gid(id: &str, key: Option<&str>) -> Result<ShopifyGid> {
    let gid = ShopifyGid::new(ResourceType::Order, id)
        .map_err(|_| AppError::NotFound(format!("Order not found: {id}")))?;
    Ok(match key {
        Some(key) => gid.with_query(format!("key={}", urlencoding::encode(key))),
        None => gid,
    })
}

/// `GET /account/orders/{id}?key=`
#[instrument(skip(state, page, _customer, params))]
pub async fn order(
    State(state): State<AppState>,
    page: PageRequest,
    RequireCustomer(_customer): RequireCustomer,
    Path(id): Path<String>,
    params: QueryParams,
) -> Result<impl IntoResponse> {
    let gid = order_gid(&id, params.get_trimmed("key"))?;

    let (layout, order) = tokio::try_join!(
        page.layout(&state),
        state.storefront().customer_order(&gid, page.ctx()),
    )?;

    let seo = PageSeo::new(
        format!("Order {}", order.name),
        "",
        page.canonical(&state, &format!("/account/orders/{id}")),
    );
    Ok(OrderTemplate {
        order: OrderView::new(&order, &page.locale),
        back_href: page.link("/account"),
        shell: page.shell(&state, &layout, seo),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_href_keeps_key() {
        let locale = RequestLocale::default();
        assert_eq!(
            order_href("gid://shopify/Order/42?key=abc123", &locale),
            "/account/orders/42?key=abc123"
        );
        assert_eq!(order_href("gid://shopify/Order/42", &locale), "/account/orders/42");
    }

    #[test]
    fn test_order_gid_encodes_key() {
        assert_eq!(
            order_gid("42", Some("abc123")).unwrap().to_string(),
            "gid://shopify/Order/42?key=abc123"
        );
        assert_eq!(
            order_gid("42", Some("a&id=7=x")).unwrap().to_string(),
            "gid://shopify/Order/42?key=a%26id%3D7%3Dx"
        );
        assert_eq!(order_gid("42", None).unwrap().to_string(), "gid://shopify/Order/42");
        assert!(matches!(order_gid("x1", None), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_profile_password_rules() {
        let form = ProfileForm {
            new_password: Some("new-pass".into()),
            new_password2: Some("other".into()),
            ..ProfileForm::default()
        };
        assert_eq!(form.new_password(), Err("New passwords must match."));

        let form = ProfileForm {
            new_password: Some("new-pass".into()),
            new_password2: Some("new-pass".into()),
            ..ProfileForm::default()
        };
        assert_eq!(form.new_password(), Ok(Some("new-pass")));

        let form = ProfileForm {
            new_password: Some(String::new()),
            ..ProfileForm::default()
        };
        assert_eq!(form.new_password(), Ok(None));
    }

    #[test]
    fn test_address_target() {
        assert_eq!(AddressTarget::parse("add").unwrap(), AddressTarget::New);
        assert_eq!(
            AddressTarget::parse("123").unwrap(),
            AddressTarget::Existing("123".into())
        );
        assert!(matches!(AddressTarget::parse("x1"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_address_form_flags() {
        let form = AddressForm {
            action: Some("delete".into()),
            default_address: Some("on".into()),
            city: Some("  ".into()),
            zip: Some(" 10001 ".into()),
            ..AddressForm::default()
        };
        assert!(form.is_delete());
        assert!(form.make_default());
        let input = form.to_input();
        assert_eq!(input.city, None);
        assert_eq!(input.zip.as_deref(), Some("10001"));
    }

    #[test]
    fn test_discount_label() {
        let order: Order = serde_json::from_value(json!({
            "id": "gid://shopify/Order/1",
            "name": "#1001",
            "orderNumber": 1001,
            "processedAt": "2023-03-03T12:00:00Z",
            "fulfillmentStatus": "FULFILLED",
            "currentTotalPrice": {"amount": "90.0", "currencyCode": "USD"},
            "discountApplications": {"nodes": [{"value": {"percentage": 10.0}}]}
        }))
        .unwrap();
        assert_eq!(discount_label(&order).as_deref(), Some("-10%"));

        let view = OrderView::new(&order, &RequestLocale::default());
        assert_eq!(view.date, "March 3, 2023");
        assert_eq!(view.fulfillment_status, "Fulfilled");
        assert_eq!(view.total, "$90.00");
    }
}

//! Customer authentication route handlers.
//!
//! Login, registration, password recovery, reset, activation and logout,
//! all through the Storefront API's customer mutations. The resulting access
//! token is kept in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use demo_store_core::{Email, ResourceType, ShopifyGid};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{PageRequest, Shell};
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::i18n::RequestLocale;
use crate::middleware::{OptionalCustomer, clear_customer_session, set_customer_session};
use crate::models::CustomerSession;
use crate::seo::PageSeo;
use crate::shopify::queries::LayoutData;
use crate::shopify::{CustomerAccessToken, CustomerCreateInput, ShopifyError};
use crate::state::AppState;

const MISSING_CREDENTIALS: &str = "Please provide both an email and a password.";
const BAD_CREDENTIALS: &str = "Sorry. We did not recognize either your email or password.";
const REGISTER_FAILED: &str =
    "Sorry. We could not create an account with this email. User might already exist, try to login instead.";
const TRY_AGAIN: &str = "Something went wrong. Please try again later.";
const PASSWORDS_MISMATCH: &str = "Please provide matching passwords";

// =============================================================================
// Form Types
// =============================================================================

/// Login and registration form data.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    /// Both fields, trimmed of surrounding whitespace (the email only).
    fn fields(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// Password recovery form data.
#[derive(Debug, Default, Deserialize)]
pub struct RecoverForm {
    pub email: Option<String>,
}

/// Reset and activation form data.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordForm {
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl NewPasswordForm {
    /// The new password, when both fields are present and equal.
    fn password(&self) -> Option<SecretString> {
        match (self.password.as_deref(), self.password_confirm.as_deref()) {
            (Some(password), Some(confirm)) if !password.is_empty() && password == confirm => {
                Some(SecretString::from(password.to_string()))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/login.html")]
pub struct LoginTemplate {
    pub shell: Shell,
    pub action: String,
    pub error: Option<String>,
    pub email: String,
    pub register_href: String,
    pub recover_href: String,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/register.html")]
pub struct RegisterTemplate {
    pub shell: Shell,
    pub action: String,
    pub error: Option<String>,
    pub email: String,
    pub login_href: String,
}

/// Password recovery page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/recover.html")]
pub struct RecoverTemplate {
    pub shell: Shell,
    pub action: String,
    pub error: Option<String>,
    /// The request was sent; the same message shows whether or not the
    /// email belongs to a customer.
    pub requested: bool,
    pub login_href: String,
}

/// New password page template (reset and activation).
#[derive(Template, WebTemplate)]
#[template(path = "account/password.html")]
pub struct PasswordTemplate {
    pub shell: Shell,
    pub heading: &'static str,
    pub intro: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub error: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Render a form page with a status (400 for rejected submissions).
fn with_status(status: StatusCode, page: impl IntoResponse) -> Response {
    (status, page).into_response()
}

/// Store the token and send the customer to their account.
async fn sign_in(
    session: &Session,
    locale: &RequestLocale,
    token: CustomerAccessToken,
) -> Result<Response> {
    set_customer_session(session, &CustomerSession::from(token)).await?;
    Ok(Redirect::to(&locale.path("/account")).into_response())
}

/// The visitor-facing message for a failed customer mutation.
fn mutation_message(err: &ShopifyError) -> String {
    match err {
        ShopifyError::UserError(message) => message.clone(),
        _ => TRY_AGAIN.to_string(),
    }
}

fn customer_gid(id: &str) -> Result<ShopifyGid> {
    ShopifyGid::new(ResourceType::Customer, id)
        .map_err(|_| AppError::NotFound(format!("Customer not found: {id}")))
}

// =============================================================================
// Login
// =============================================================================

impl LoginTemplate {
    fn new(state: &AppState, page: &PageRequest, layout: &LayoutData) -> Self {
        let seo = PageSeo::new("Login", "", page.canonical(state, "/account/login"));
        Self {
            shell: page.shell(state, layout, seo),
            action: page.link("/account/login"),
            error: None,
            email: String::new(),
            register_href: page.link("/account/register"),
            recover_href: page.link("/account/recover"),
        }
    }
}

/// `GET /account/login`
#[instrument(skip(state, page, customer))]
pub async fn login_page(
    State(state): State<AppState>,
    page: PageRequest,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<Response> {
    if customer.is_some() {
        return Ok(Redirect::to(&page.link("/account")).into_response());
    }
    let layout = page.layout(&state).await?;
    Ok(LoginTemplate::new(&state, &page, &layout).into_response())
}

/// `POST /account/login`
#[instrument(skip(state, page, session, form))]
pub async fn login(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let reject = |message: &str, layout: LayoutData| {
        let mut template = LoginTemplate::new(&state, &page, &layout);
        template.error = Some(message.to_string());
        template.email = form.email.clone().unwrap_or_default();
        with_status(StatusCode::BAD_REQUEST, template)
    };

    let Some((email, password)) = form.fields() else {
        return Ok(reject(MISSING_CREDENTIALS, page.layout(&state).await?));
    };

    let password = SecretString::from(password.to_string());
    match state
        .storefront()
        .customer_access_token_create(email, &password)
        .await
    {
        Ok(token) => {
            set_sentry_user(email);
            add_breadcrumb("auth", "Customer logged in", &[]);
            sign_in(&session, &page.locale, token).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Customer login failed");
            Ok(reject(BAD_CREDENTIALS, page.layout(&state).await?))
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

impl RegisterTemplate {
    fn new(state: &AppState, page: &PageRequest, layout: &LayoutData) -> Self {
        let seo = PageSeo::new("Register", "", page.canonical(state, "/account/register"));
        Self {
            shell: page.shell(state, layout, seo),
            action: page.link("/account/register"),
            error: None,
            email: String::new(),
            login_href: page.link("/account/login"),
        }
    }
}

/// `GET /account/register`
#[instrument(skip(state, page, customer))]
pub async fn register_page(
    State(state): State<AppState>,
    page: PageRequest,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<Response> {
    if customer.is_some() {
        return Ok(Redirect::to(&page.link("/account")).into_response());
    }
    let layout = page.layout(&state).await?;
    Ok(RegisterTemplate::new(&state, &page, &layout).into_response())
}

/// `POST /account/register`
///
/// Creates the customer, then signs them in with the same credentials.
#[instrument(skip(state, page, session, form))]
pub async fn register(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let reject = |message: &str, layout: LayoutData| {
        let mut template = RegisterTemplate::new(&state, &page, &layout);
        template.error = Some(message.to_string());
        template.email = form.email.clone().unwrap_or_default();
        with_status(StatusCode::BAD_REQUEST, template)
    };

    let Some((email, password)) = form.fields() else {
        return Ok(reject(MISSING_CREDENTIALS, page.layout(&state).await?));
    };
    let Ok(email) = Email::parse(email) else {
        return Ok(reject("Please provide a valid email address.", page.layout(&state).await?));
    };

    let storefront = state.storefront();
    let input = CustomerCreateInput {
        email: email.to_string(),
        password: password.to_string(),
        first_name: None,
        last_name: None,
    };
    if let Err(e) = storefront.customer_create(input).await {
        tracing::warn!(error = %e, "Customer registration failed");
        return Ok(reject(REGISTER_FAILED, page.layout(&state).await?));
    }

    let password = SecretString::from(password.to_string());
    match storefront
        .customer_access_token_create(email.as_str(), &password)
        .await
    {
        Ok(token) => {
            set_sentry_user(email.as_str());
            add_breadcrumb("auth", "Customer registered", &[]);
            sign_in(&session, &page.locale, token).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login after registration failed");
            Ok(reject(REGISTER_FAILED, page.layout(&state).await?))
        }
    }
}

// =============================================================================
// Password recovery
// =============================================================================

impl RecoverTemplate {
    fn new(state: &AppState, page: &PageRequest, layout: &LayoutData) -> Self {
        let seo = PageSeo::new("Recover password", "", page.canonical(state, "/account/recover"));
        Self {
            shell: page.shell(state, layout, seo),
            action: page.link("/account/recover"),
            error: None,
            requested: false,
            login_href: page.link("/account/login"),
        }
    }
}

/// `GET /account/recover`
#[instrument(skip(state, page, customer))]
pub async fn recover_page(
    State(state): State<AppState>,
    page: PageRequest,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<Response> {
    if customer.is_some() {
        return Ok(Redirect::to(&page.link("/account")).into_response());
    }
    let layout = page.layout(&state).await?;
    Ok(RecoverTemplate::new(&state, &page, &layout).into_response())
}

/// `POST /account/recover`
#[instrument(skip(state, page, form))]
pub async fn recover(
    State(state): State<AppState>,
    page: PageRequest,
    Form(form): Form<RecoverForm>,
) -> Result<Response> {
    let layout = page.layout(&state).await?;
    let mut template = RecoverTemplate::new(&state, &page, &layout);

    let Some(email) = form.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
        template.error = Some("Please provide an email.".to_string());
        return Ok(with_status(StatusCode::BAD_REQUEST, template));
    };

    if let Err(e) = state.storefront().customer_recover(email).await {
        tracing::warn!(error = %e, "Password recovery request failed");
        template.error = Some(TRY_AGAIN.to_string());
        return Ok(with_status(StatusCode::BAD_REQUEST, template));
    }

    template.requested = true;
    Ok(template.into_response())
}

// =============================================================================
// Reset and activation
// =============================================================================

/// Which emailed link a new-password form completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordFlow {
    Reset,
    Activate,
}

impl PasswordFlow {
    const fn segment(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Activate => "activate",
        }
    }

    fn template(
        self,
        state: &AppState,
        page: &PageRequest,
        layout: &LayoutData,
        id: &str,
        token: &str,
    ) -> PasswordTemplate {
        let path = format!("/account/{}/{id}/{token}", self.segment());
        let (heading, intro, submit_label) = match self {
            Self::Reset => ("Reset Password", "Enter a new password for your account.", "Save"),
            Self::Activate => (
                "Activate Account",
                "Create your password to activate your account.",
                "Save",
            ),
        };
        let seo = PageSeo::new(heading, "", page.canonical(state, &path));
        PasswordTemplate {
            shell: page.shell(state, layout, seo),
            heading,
            intro,
            submit_label,
            action: page.link(&path),
            error: None,
        }
    }

    async fn submit(
        self,
        state: &AppState,
        page: &PageRequest,
        session: &Session,
        (id, token): (String, String),
        form: &NewPasswordForm,
    ) -> Result<Response> {
        let customer_id = customer_gid(&id)?;
        let reject = |message: String, layout: LayoutData| {
            let mut template = self.template(state, page, &layout, &id, &token);
            template.error = Some(message);
            with_status(StatusCode::BAD_REQUEST, template)
        };

        let Some(password) = form.password() else {
            return Ok(reject(PASSWORDS_MISMATCH.to_string(), page.layout(state).await?));
        };

        let storefront = state.storefront();
        let result = match self {
            Self::Reset => storefront.customer_reset(&customer_id, &token, &password).await,
            Self::Activate => storefront.customer_activate(&customer_id, &token, &password).await,
        };
        match result {
            Ok(access) => {
                add_breadcrumb("auth", self.segment(), &[("customer_id", customer_id.id())]);
                sign_in(session, &page.locale, access).await
            }
            Err(e) => {
                tracing::warn!(error = %e, flow = self.segment(), "Customer password update failed");
                Ok(reject(mutation_message(&e), page.layout(state).await?))
            }
        }
    }
}

/// `GET /account/reset/{id}/{token}`
#[instrument(skip(state, page, token))]
pub async fn reset_page(
    State(state): State<AppState>,
    page: PageRequest,
    Path((id, token)): Path<(String, String)>,
) -> Result<Response> {
    customer_gid(&id)?;
    let layout = page.layout(&state).await?;
    Ok(PasswordFlow::Reset
        .template(&state, &page, &layout, &id, &token)
        .into_response())
}

/// `POST /account/reset/{id}/{token}`
#[instrument(skip(state, page, session, params, form))]
pub async fn reset(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    Path(params): Path<(String, String)>,
    Form(form): Form<NewPasswordForm>,
) -> Result<Response> {
    PasswordFlow::Reset
        .submit(&state, &page, &session, params, &form)
        .await
}

/// `GET /account/activate/{id}/{token}`
#[instrument(skip(state, page, token))]
pub async fn activate_page(
    State(state): State<AppState>,
    page: PageRequest,
    Path((id, token)): Path<(String, String)>,
) -> Result<Response> {
    customer_gid(&id)?;
    let layout = page.layout(&state).await?;
    Ok(PasswordFlow::Activate
        .template(&state, &page, &layout, &id, &token)
        .into_response())
}

/// `POST /account/activate/{id}/{token}`
#[instrument(skip(state, page, session, params, form))]
pub async fn activate(
    State(state): State<AppState>,
    page: PageRequest,
    session: Session,
    Path(params): Path<(String, String)>,
    Form(form): Form<NewPasswordForm>,
) -> Result<Response> {
    PasswordFlow::Activate
        .submit(&state, &page, &session, params, &form)
        .await
}

// =============================================================================
// Logout
// =============================================================================

/// `GET|POST /account/logout`
///
/// Revoking the token is best effort; the session is cleared regardless.
#[instrument(skip(state, locale, session, customer))]
pub async fn logout(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<Response> {
    if let Some(customer) = customer {
        if let Err(e) = state
            .storefront()
            .customer_access_token_delete(&customer.access_token)
            .await
        {
            tracing::warn!(error = %e, "Failed to revoke customer access token");
        }
    }

    clear_customer_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(&locale.path("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_fields() {
        let form = CredentialsForm {
            email: Some("  ada@example.com ".into()),
            password: Some("hunter22".into()),
        };
        assert_eq!(form.fields(), Some(("ada@example.com", "hunter22")));

        let form = CredentialsForm {
            email: Some("ada@example.com".into()),
            password: Some(String::new()),
        };
        assert_eq!(form.fields(), None);
        assert_eq!(CredentialsForm::default().fields(), None);
    }

    #[test]
    fn test_new_password_must_match() {
        let form = NewPasswordForm {
            password: Some("secret-1".into()),
            password_confirm: Some("secret-1".into()),
        };
        assert!(form.password().is_some());

        let form = NewPasswordForm {
            password: Some("secret-1".into()),
            password_confirm: Some("secret-2".into()),
        };
        assert!(form.password().is_none());

        let form = NewPasswordForm {
            password: Some("secret-1".into()),
            password_confirm: None,
        };
        assert!(form.password().is_none());
    }

    #[test]
    fn test_mutation_message() {
        let err = ShopifyError::UserError("Reset token is invalid".into());
        assert_eq!(mutation_message(&err), "Reset token is invalid");
        assert_eq!(mutation_message(&ShopifyError::RateLimited(1)), TRY_AGAIN);
    }

    #[test]
    fn test_customer_gid_rejects_non_numeric() {
        assert!(customer_gid("123").is_ok());
        assert!(matches!(customer_gid("abc"), Err(AppError::NotFound(_))));
    }
}

//! Customer authentication extractors.
//!
//! A signed-in customer is a [`CustomerSession`] stored in the session under
//! `customer_access_token`. Expired tokens count as signed out.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::i18n::RequestLocale;
use crate::models::{CustomerSession, session_keys};

/// Extractor that requires a signed-in customer.
///
/// HTML requests without a valid token are redirected to the (locale
/// prefixed) login page; requests under `/api/` get a 401.
///
/// ```rust,ignore
/// async fn account(RequireCustomer(customer): RequireCustomer) -> impl IntoResponse {
///     state.storefront().customer(&customer.access_token, &ctx).await
/// }
/// ```
pub struct RequireCustomer(pub CustomerSession);

/// Rejection when a customer is required but not present.
#[derive(Debug)]
pub enum CustomerRejection {
    /// Redirect to the login page at this path.
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for CustomerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(path) => Redirect::to(&path).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Read the customer session, ignoring expired tokens.
async fn current_customer(session: &Session) -> Option<CustomerSession> {
    let customer = session
        .get::<CustomerSession>(session_keys::CUSTOMER_ACCESS_TOKEN)
        .await
        .ok()
        .flatten()?;

    if customer.is_expired() {
        tracing::debug!(expires_at = %customer.expires_at, "Customer access token expired");
        return None;
    }
    Some(customer)
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = CustomerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let reject = || {
            if parts.uri.path().starts_with("/api/") {
                CustomerRejection::Unauthorized
            } else {
                let locale = parts
                    .extensions
                    .get::<RequestLocale>()
                    .cloned()
                    .unwrap_or_default();
                CustomerRejection::RedirectToLogin(locale.path("/account/login"))
            }
        };

        let session = parts.extensions.get::<Session>().ok_or_else(reject)?;
        current_customer(session).await.map(Self).ok_or_else(reject)
    }
}

/// Extractor that optionally gets the signed-in customer.
pub struct OptionalCustomer(pub Option<CustomerSession>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let customer = match parts.extensions.get::<Session>() {
            Some(session) => current_customer(session).await,
            None => None,
        };
        Ok(Self(customer))
    }
}

/// Store the customer's access token in the session.
///
/// The session id is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_customer_session(
    session: &Session,
    customer: &CustomerSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CUSTOMER_ACCESS_TOKEN, customer)
        .await
}

/// Remove every trace of the customer (and their cart) from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_customer_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

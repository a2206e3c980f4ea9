//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` and `locale` fields)
//! 3. Request ID (recorded on the span, echoed on the response)
//! 4. Locale (strips `/<lang>-<country>` before routing, see [`crate::i18n`])
//! 5. Trailing-slash normalization
//! 6. CSP nonce (per-request nonce for inline JSON-LD)
//! 7. Security headers (CSP with the nonce, framing, isolation)
//! 8. Session layer (tower-sessions, in-memory store, signed cookie)
//! 9. Rate limiting (governor, customer-auth posts only)

pub mod csp;
pub mod customer;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use customer::{
    CustomerRejection, OptionalCustomer, RequireCustomer, clear_customer_session,
    set_customer_session,
};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;

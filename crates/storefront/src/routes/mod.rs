//! HTTP route handlers for the storefront.
//!
//! Handlers return JSON envelopes; `message` is the toast the thin browser
//! layer shows, `errors` carries inline field-level messages. Failures are
//! caught at the call site and folded into the envelope - a failed commerce
//! call never takes the page down.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Catalog
//! GET  /products                   - Product listing (page/category/search)
//! GET  /products/{id}              - Product detail
//! GET  /products/{id}/reviews      - Reviews for a product
//! POST /products/{id}/reviews      - Submit a review
//! GET  /categories                 - Category listing
//!
//! # Cart
//! GET    /cart                     - Cart contents (reconciles the mirror)
//! POST   /cart/add                 - Add a variant
//! POST   /cart/update              - Set a line quantity (qty 0 is a no-op)
//! POST   /cart/remove              - Remove a line
//!
//! # Wishlist
//! GET    /wishlist                 - Wishlist contents (reconciles the mirror)
//! POST   /wishlist/add             - Add a product
//! POST   /wishlist/remove          - Remove a product
//!
//! # Checkout
//! GET  /checkout                   - Prefilled address + fresh cart rows
//! POST /checkout                   - Place the order (COD or Razorpay)
//! POST /checkout/verify            - Razorpay widget success callback
//! POST /checkout/payment-failed    - Razorpay widget failure callback
//!
//! # Orders (requires auth)
//! GET  /orders                     - Open orders
//! GET  /orders/history             - Full history
//! GET  /orders/{id}                - Order detail
//! POST /orders/{id}/cancel         - Cancel (Pending/Confirmed only)
//! POST /orders/{id}/return         - Request return (Delivered only)
//! POST /orders/{id}/exchange       - Request exchange (Delivered only)
//! GET  /orders/{id}/track          - Carrier tracking (absence is normal)
//! GET  /order-confirmation/{id}    - Confirmation view data
//!
//! # Account
//! GET  /account                    - Profile
//! POST /account                    - Update profile
//!
//! # Auth (rate limited)
//! POST /auth/login                 - Login
//! POST /auth/register              - Register
//! POST /auth/logout                - Logout
//!
//! # Blog
//! GET  /blog                       - Published posts
//! GET  /blog/{slug}                - One post
//! ```

pub mod account;
pub mod auth;
pub mod blog;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::checkout::FieldError;
use crate::mirror::MembershipMirror;
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Response Envelope
// =============================================================================

/// The JSON envelope every handler responds with.
#[derive(Debug, Serialize)]
pub struct Notify<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> Notify<T> {
    /// Success with payload, no toast.
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        })
    }

    /// Success with payload and a toast.
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        })
    }

    /// Success with a toast only.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data: None,
            errors: None,
        })
    }

    /// Failure with a toast.
    pub fn fail(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: None,
        })
    }

    /// Validation failure with inline field errors.
    pub fn invalid(message: impl Into<String>, errors: Vec<FieldError>) -> Json<Self> {
        Json(Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: Some(errors),
        })
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the membership mirror from the session, defaulting to empty.
pub(crate) async fn load_mirror(session: &Session) -> MembershipMirror {
    session
        .get::<MembershipMirror>(session_keys::MEMBERSHIP_MIRROR)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the membership mirror back into the session.
pub(crate) async fn save_mirror(session: &Session, mirror: &MembershipMirror) {
    if let Err(e) = session
        .insert(session_keys::MEMBERSHIP_MIRROR, mirror)
        .await
    {
        tracing::error!("Failed to save membership mirror to session: {e}");
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route(
            "/{id}/reviews",
            get(products::reviews).post(products::submit_review),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/verify", post(checkout::verify))
        .route("/payment-failed", post(checkout::payment_failed))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/history", get(orders::history))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/return", post(orders::request_return))
        .route("/{id}/exchange", post(orders::request_exchange))
        .route("/{id}/track", get(orders::track))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
///
/// Auth gets the strict rate limiter; the cart/wishlist/checkout surface
/// shares the relaxed one.
pub fn routes() -> Router<AppState> {
    use crate::middleware::{api_rate_limiter, auth_rate_limiter};

    Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(categories::index))
        .nest("/cart", cart_routes().layer(api_rate_limiter()))
        .nest("/wishlist", wishlist_routes().layer(api_rate_limiter()))
        .nest("/checkout", checkout_routes().layer(api_rate_limiter()))
        .nest("/orders", order_routes())
        .route("/order-confirmation/{id}", get(orders::confirmation))
        .route("/account", get(account::show).post(account::update))
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        .route("/blog", get(blog::index))
        .route("/blog/{slug}", get(blog::show))
}

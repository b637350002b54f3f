//! Session-related types.
//!
//! Everything the shopper's session holds: their identity, the bearer token
//! the commerce API issued, the membership mirror, and the transient
//! checkout/order view state.

use serde::{Deserialize, Serialize};

use saffron_core::UserId;

/// Session-stored shopper identity.
///
/// Minimal data stored in the session to identify the logged-in shopper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentShopper {
    /// Commerce API user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in shopper.
    pub const CURRENT_SHOPPER: &str = "current_shopper";

    /// Key for the commerce API bearer token.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Key for the cart/wishlist membership mirror.
    pub const MEMBERSHIP_MIRROR: &str = "membership_mirror";

    /// Key for the checkout double-submission guard.
    pub const CHECKOUT_IN_FLIGHT: &str = "checkout_in_flight";

    /// Key for the last-fetched order list (the "local" list that lifecycle
    /// actions update optimistically).
    pub const ORDERS_VIEW: &str = "orders_view";
}

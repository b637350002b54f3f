//! Saffron commerce API client and resource gateways.
//!
//! # Architecture
//!
//! - JSON-over-HTTPS against the remote commerce API; the API is the source
//!   of truth for every business entity - NO local sync, direct calls only
//! - One [`CommerceClient`] wraps `reqwest` with the fixed timeout, bearer
//!   attachment, and uniform error surfacing
//! - One gateway method per remote operation, grouped per resource
//!   (`catalog`, `cart`, `wishlist`, `orders`, `payments`, `profile`,
//!   `auth`, `reviews`, `blog`)
//! - Gateways never retry, never cache, never validate semantics - every
//!   call is a fresh round trip, and form validation happens upstream
//! - [`conversions`] maps wire payloads into view-models so route handlers
//!   are insulated from server schema drift
//!
//! # Example
//!
//! ```rust,ignore
//! use saffron_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce)?;
//!
//! // List the wishlist (token comes from the shopper's session)
//! let wishlist = client.wishlist_list(Some(&token)).await?;
//!
//! // Add a product; the server message feeds the shopper notification
//! let ok = client.wishlist_add(Some(&token), &product_id).await?;
//! println!("{}", ok.message.unwrap_or_default());
//! ```

mod auth;
mod blog;
mod cart;
mod catalog;
mod client;
pub mod conversions;
mod orders;
mod payments;
mod profile;
mod reviews;
pub mod types;
mod wishlist;

pub use catalog::ProductQuery;
pub use client::{ApiOk, CommerceClient};

use thiserror::Error;

/// Fallback shown when the server gives no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Network failure or the fixed request timeout elapsed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the generic fallback.
        message: String,
    },

    /// The server answered 2xx but the envelope carried `success: false`.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// HTTP 401. Flagged for the caller; never retried here. Redirecting to
    /// login is a caller decision.
    #[error("Unauthorized")]
    Unauthorized,

    /// The response body did not parse.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// 2xx + `success: true` but the expected payload was absent.
    #[error("No data in response from {0}")]
    MissingData(String),
}

impl CommerceError {
    /// The notification text to surface to the shopper.
    ///
    /// Transport failures get a generic transient-failure string; rejections
    /// keep the server's own words.
    #[must_use]
    pub fn notification(&self) -> String {
        match self {
            Self::Http(_) | Self::Parse(_) | Self::MissingData(_) => GENERIC_FAILURE.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Rejected(message) => message.clone(),
            Self::Unauthorized => "Please sign in to continue.".to_string(),
        }
    }

    /// Whether the caller should treat this as a missing/expired login.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = CommerceError::Api {
            status: 404,
            message: "Item not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Item not found");
        assert_eq!(err.notification(), "Item not found");
    }

    #[test]
    fn test_rejection_keeps_server_message() {
        let err = CommerceError::Rejected("Out of stock".to_string());
        assert_eq!(err.notification(), "Out of stock");
    }

    #[test]
    fn test_missing_data_is_generic_to_shoppers() {
        let err = CommerceError::MissingData("/orders".to_string());
        assert_eq!(err.notification(), GENERIC_FAILURE);
    }

    #[test]
    fn test_unauthorized_flag() {
        assert!(CommerceError::Unauthorized.is_unauthorized());
        assert!(!CommerceError::Rejected(String::new()).is_unauthorized());
    }
}

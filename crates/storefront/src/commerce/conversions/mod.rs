//! Wire-to-view-model mapping.
//!
//! Route handlers consume only the view types defined here; the raw wire
//! shapes in [`types`] never cross this boundary. That keeps the UI surface
//! stable when the server schema drifts.
//!
//! [`types`]: super::types

mod cart;
mod content;
mod orders;
mod products;

pub use cart::{CartRowView, CartSummaryView, convert_cart};
pub use content::{
    BlogPostView, CategoryView, ReviewView, convert_blog_post, convert_blog_posts,
    convert_categories, convert_reviews,
};
pub use orders::{OrderLineView, OrderView, convert_order, convert_orders};
pub use products::{ProductView, VariantView, convert_product, convert_products};

use saffron_core::Money;

/// Parse a wire price, warning and falling back to zero on garbage.
///
/// A malformed price from the server must not take a page down; the UI
/// stays interactive through any single bad value.
fn parse_money_or_zero(value: &str, context: &str) -> Money {
    Money::parse(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, context = %context, "Unparseable price from commerce API");
        Money::ZERO
    })
}

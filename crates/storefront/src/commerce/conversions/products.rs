//! Product type conversion functions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use saffron_core::{Money, ProductId, VariantId};

use super::super::types::{Discount, Product, Variant};
use super::parse_money_or_zero;

/// A product ready for display, with membership flags for the mirror.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Image URLs ordered by the wire `sequence` field.
    pub images: Vec<String>,
    pub variants: Vec<VariantView>,
    /// Index into `variants` of the variant to lead with.
    pub primary_variant: usize,
    /// Reflects server truth via the membership mirror, never assumed.
    pub in_cart: bool,
    /// Reflects server truth via the membership mirror, never assumed.
    pub in_wishlist: bool,
}

impl ProductView {
    /// The variant selected for display.
    #[must_use]
    pub fn primary(&self) -> Option<&VariantView> {
        self.variants.get(self.primary_variant)
    }
}

/// A purchasable variant ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: VariantId,
    /// List price.
    pub price: Money,
    /// Price after any active discount; equals `price` when none applies.
    pub effective_price: Money,
    /// Percentage off while the discount window is open.
    pub discount_percent: Option<Decimal>,
    pub stock: i64,
    pub weight: Option<String>,
    pub sku: Option<String>,
}

impl VariantView {
    /// Whether a discount is currently applied.
    #[must_use]
    pub fn discounted(&self) -> bool {
        self.discount_percent.is_some()
    }
}

/// Whether a discount window is open at `now`.
///
/// `active` is the merchant switch; the dates bound it when present.
fn discount_in_window(discount: &Discount, now: DateTime<Utc>) -> bool {
    if !discount.active {
        return false;
    }
    if let Some(start) = discount.start_date
        && now < start
    {
        return false;
    }
    if let Some(end) = discount.end_date
        && now > end
    {
        return false;
    }
    true
}

/// Selection rule for the variant to lead with: first variant with an
/// active discount, else the first variant in list order.
fn primary_variant_index(variants: &[Variant], now: DateTime<Utc>) -> usize {
    variants
        .iter()
        .position(|v| v.discount.as_ref().is_some_and(|d| discount_in_window(d, now)))
        .unwrap_or(0)
}

fn convert_variant(variant: Variant, now: DateTime<Utc>) -> VariantView {
    let price = parse_money_or_zero(&variant.price, "variant.price");

    let discount_percent = variant
        .discount
        .as_ref()
        .filter(|d| discount_in_window(d, now))
        .map(|d| {
            d.value.trim().parse::<Decimal>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unparseable discount value from commerce API");
                Decimal::ZERO
            })
        });

    let effective_price =
        discount_percent.map_or(price, |percent| price.less_percent(percent));

    VariantView {
        id: variant.id,
        price,
        effective_price,
        discount_percent,
        stock: variant.stock,
        weight: variant.weight,
        sku: variant.sku,
    }
}

/// Convert one wire product into its view-model.
///
/// Membership flags start `false`; the route layer fills them from the
/// session's mirror.
#[must_use]
pub fn convert_product(product: Product, now: DateTime<Utc>) -> ProductView {
    let primary_variant = primary_variant_index(&product.variants, now);

    let mut images = product.images;
    images.sort_by_key(|image| image.sequence);

    ProductView {
        id: product.id,
        name: product.name,
        description: product.description,
        images: images.into_iter().map(|image| image.url).collect(),
        variants: product
            .variants
            .into_iter()
            .map(|v| convert_variant(v, now))
            .collect(),
        primary_variant,
        in_cart: false,
        in_wishlist: false,
    }
}

/// Convert a product listing.
#[must_use]
pub fn convert_products(products: Vec<Product>, now: DateTime<Utc>) -> Vec<ProductView> {
    products
        .into_iter()
        .map(|p| convert_product(p, now))
        .collect()
}

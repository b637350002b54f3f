//! Cart type conversion functions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use saffron_core::{Money, ProductId, VariantId};

use super::super::types::CartEntry;
use super::products::convert_product;

/// One display row of the cart: id, image, title, unit price, quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartRowView {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub title: String,
    pub image: Option<String>,
    /// Unit price after any active discount on the entry's variant.
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

/// The whole cart ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct CartSummaryView {
    pub rows: Vec<CartRowView>,
    pub subtotal: Money,
    pub item_count: u32,
}

impl CartSummaryView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            subtotal: Money::ZERO,
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn convert_entry(entry: CartEntry, now: DateTime<Utc>) -> CartRowView {
    let quantity = entry.quantity.max(1);
    let variant_id = entry.variant_id;
    let product = convert_product(entry.product, now);

    // Price the row with the entry's own variant; fall back to the primary
    // variant if the server sent a variant id the product no longer carries.
    let priced = product
        .variants
        .iter()
        .find(|v| v.id == variant_id)
        .or_else(|| product.primary());
    let unit_price = priced.map_or(Money::ZERO, |v| v.effective_price);

    CartRowView {
        product_id: product.id,
        variant_id,
        title: product.name,
        image: product.images.first().cloned(),
        unit_price,
        quantity,
        line_total: unit_price.times(quantity),
    }
}

/// Convert the server's cart list into the display summary.
#[must_use]
pub fn convert_cart(entries: Vec<CartEntry>, now: DateTime<Utc>) -> CartSummaryView {
    let rows: Vec<CartRowView> = entries
        .into_iter()
        .map(|entry| convert_entry(entry, now))
        .collect();

    let subtotal = rows
        .iter()
        .fold(Money::ZERO, |acc, row| acc.plus(row.line_total));
    let item_count = rows.iter().map(|row| row.quantity).sum();

    CartSummaryView {
        rows,
        subtotal,
        item_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commerce::types::{Product, ProductImage, Variant};
    use chrono::TimeZone;

    fn entry(quantity: u32) -> CartEntry {
        CartEntry {
            product: Product {
                id: ProductId::new("p1"),
                name: "Masala Chai".to_string(),
                description: String::new(),
                images: vec![ProductImage {
                    url: "https://img/1.jpg".to_string(),
                    sequence: 1,
                }],
                variants: vec![Variant {
                    id: VariantId::new("v1"),
                    price: "100.00".to_string(),
                    stock: 5,
                    weight: None,
                    sku: None,
                    discount: None,
                }],
                category: None,
            },
            variant_id: VariantId::new("v1"),
            quantity,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid")
    }

    #[test]
    fn test_cart_rows_and_subtotal() {
        let summary = convert_cart(vec![entry(2)], now());
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal.minor_units(), 20000);
        let row = summary.rows.first().expect("row");
        assert_eq!(row.title, "Masala Chai");
        assert_eq!(row.image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(row.unit_price.minor_units(), 10000);
        assert_eq!(row.line_total.minor_units(), 20000);
    }

    #[test]
    fn test_empty_cart() {
        let summary = convert_cart(Vec::new(), now());
        assert!(summary.is_empty());
        assert_eq!(summary.subtotal, Money::ZERO);
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn test_zero_quantity_clamped_to_one() {
        // The server should never send 0, but the quantity invariant says
        // a cart entry is always at least 1.
        let summary = convert_cart(vec![entry(0)], now());
        assert_eq!(summary.item_count, 1);
    }
}

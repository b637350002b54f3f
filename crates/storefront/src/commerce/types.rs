//! Wire types for the Saffron commerce API.
//!
//! Everything the API sends is `camelCase` JSON with Mongo-style `_id`
//! identifiers and decimal-as-string prices. These structs mirror the wire
//! exactly; route handlers never see them - the [`conversions`] layer maps
//! them into view-models first.
//!
//! [`conversions`]: super::conversions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use saffron_core::{
    CategoryId, OrderId, OrderStatus, PaymentMethod, ProductId, ReviewId, ShippingStatus, UserId,
    VariantId,
};

// =============================================================================
// Response Envelope
// =============================================================================

/// The commerce API wraps every response body in this envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded; `false` carries a `message`.
    #[serde(default)]
    pub success: bool,
    /// Human-readable outcome message, shown to the shopper as a toast.
    pub message: Option<String>,
    /// The payload, present on success.
    pub data: Option<T>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub category: Option<CategoryId>,
}

/// A product image; display order comes from `sequence`, not list order.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub sequence: i64,
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(rename = "_id")]
    pub id: VariantId,
    /// Unit price in major units, decimal-as-string (e.g. `"499.00"`).
    pub price: String,
    #[serde(default)]
    pub stock: i64,
    pub weight: Option<String>,
    pub sku: Option<String>,
    pub discount: Option<Discount>,
}

/// A variant's discount window.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(default)]
    pub active: bool,
    /// Percentage off, decimal-as-string.
    pub value: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A product category.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
}

// =============================================================================
// Cart & Wishlist
// =============================================================================

/// One cart entry as the server returns it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product: Product,
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// One wishlist entry as the server returns it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product: Product,
    pub variant_id: Option<VariantId>,
}

// =============================================================================
// Orders
// =============================================================================

/// One order line; quantities and prices are frozen at creation time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: Option<String>,
    pub image: Option<String>,
    pub quantity: u32,
    /// Unit price, decimal-as-string.
    pub price: Option<String>,
    /// Per-line discount amount, decimal-as-string; zero when absent.
    pub discount: Option<String>,
    /// Per-line tax amount, decimal-as-string; zero when absent.
    pub tax: Option<String>,
}

/// Shipping address, also the shape stored on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Shopper contact details snapshotted onto an order at creation.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// An order as the server returns it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub user_details: UserDetails,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    /// Order total, decimal-as-string.
    pub total: Option<String>,
    /// Present when the order was created for gateway payment.
    pub razorpay_order_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for order creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub products: Vec<CreateOrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub user_details: UserDetails,
}

/// One line of an order-creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
    /// Decimal-as-string; `"0"` when not separately computed.
    pub discount: String,
    /// Decimal-as-string; `"0"` when not separately computed.
    pub tax: String,
}

/// One line of a return/exchange request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Carrier tracking data; an empty or failed response means
/// "not yet available", never an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub carrier: Option<String>,
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub checkpoints: Vec<TrackingCheckpoint>,
}

/// One scan event along the carrier route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCheckpoint {
    pub location: String,
    pub status: String,
    pub time: Option<DateTime<Utc>>,
}

// =============================================================================
// Payments
// =============================================================================

/// Request body for payment verification after the gateway widget succeeds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: OrderId,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_snapshot: Option<ShippingAddress>,
}

// =============================================================================
// Profile & Auth
// =============================================================================

/// The shopper's profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub shopping_address: Option<ShippingAddress>,
}

/// Profile fields accepted by the update call; `None` leaves a field as-is.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_address: Option<ShippingAddress>,
}

/// Successful login/registration payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

// =============================================================================
// Reviews & Blog
// =============================================================================

/// A product review.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A marketing blog post.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_failure_without_data() {
        let body = r#"{"success": false, "message": "Item not found"}"#;
        let envelope: Envelope<Vec<WishlistEntry>> =
            serde_json::from_str(body).expect("deserialize");
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Item not found"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_product_wire_shape() {
        let body = r#"{
            "_id": "p1",
            "name": "Masala Chai",
            "description": "Loose leaf blend",
            "images": [{"url": "https://img/2.jpg", "sequence": 2},
                       {"url": "https://img/1.jpg", "sequence": 1}],
            "variants": [{
                "_id": "v1",
                "price": "499.00",
                "stock": 12,
                "weight": "250g",
                "sku": "CHAI-250",
                "discount": {"active": true, "value": "10"}
            }],
            "category": "c1"
        }"#;
        let product: Product = serde_json::from_str(body).expect("deserialize");
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.variants.len(), 1);
        let variant = product.variants.first().expect("variant");
        assert_eq!(variant.price, "499.00");
        assert!(variant.discount.as_ref().expect("discount").active);
    }

    #[test]
    fn test_order_wire_statuses() {
        let body = r#"{
            "_id": "o1",
            "products": [{"productId": "p1", "quantity": 2, "price": "100.00"}],
            "shippingAddress": {"name": "A", "address": "B", "phone": "9",
                                "city": "C", "state": "S", "pincode": "110001"},
            "userDetails": {"name": "A", "email": "a@b.c", "phone": "9"},
            "paymentMethod": "COD",
            "orderStatus": "Return Requested",
            "shippingStatus": "Out For Delivery",
            "total": "200.00"
        }"#;
        let order: Order = serde_json::from_str(body).expect("deserialize");
        assert_eq!(order.order_status, saffron_core::OrderStatus::ReturnRequested);
        assert_eq!(
            order.shipping_status,
            saffron_core::ShippingStatus::OutForDelivery
        );
        assert_eq!(
            order.payment_method,
            saffron_core::PaymentMethod::CashOnDelivery
        );
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            shopping_address: Some(ShippingAddress {
                name: "A".into(),
                address: "B".into(),
                phone: "9".into(),
                city: "C".into(),
                state: "S".into(),
                pincode: "110001".into(),
            }),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).expect("serialize");
        assert!(json.get("name").is_none());
        assert!(json.get("shoppingAddress").is_some());
    }
}

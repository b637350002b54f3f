//! Status enums for orders and payments.
//!
//! The commerce API owns every transition; the storefront only asks whether
//! an action may be *offered* and, after the server confirms it, which status
//! to reflect locally. The wire values are the API's display strings
//! (`"Return Requested"` has a space), hence the explicit serde renames.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(rename = "Return Requested")]
    ReturnRequested,
    #[serde(rename = "Exchange Requested")]
    ExchangeRequested,
    /// Statuses added server-side after this build; never offered actions.
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Whether the cancel action may be offered for this status.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether return/exchange actions may be offered for this status.
    #[must_use]
    pub fn can_return_or_exchange(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// The status to reflect locally after a confirmed cancel.
    #[must_use]
    pub const fn after_cancel() -> Self {
        Self::Cancelled
    }

    /// The status to reflect locally after a confirmed return request.
    #[must_use]
    pub const fn after_return() -> Self {
        Self::ReturnRequested
    }

    /// The status to reflect locally after a confirmed exchange request.
    #[must_use]
    pub const fn after_exchange() -> Self {
        Self::ExchangeRequested
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::ReturnRequested => "Return Requested",
            Self::ExchangeRequested => "Exchange Requested",
            Self::Other => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// Carrier-facing shipping status, tracked separately from the order status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShippingStatus {
    #[default]
    Processing,
    Shipped,
    #[serde(rename = "Out For Delivery")]
    OutForDelivery,
    Delivered,
    Returned,
    #[serde(other)]
    Other,
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Razorpay's embedded checkout widget plus server-side verification.
    Razorpay,
    /// Cash on delivery; order creation is final.
    #[serde(rename = "COD")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Whether this method requires the payment-gateway round trip.
    #[must_use]
    pub const fn requires_gateway(&self) -> bool {
        matches!(self, Self::Razorpay)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Razorpay => write!(f, "Razorpay"),
            Self::CashOnDelivery => write!(f, "COD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_offered_only_before_shipping() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Confirmed.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
        assert!(!OrderStatus::ReturnRequested.can_cancel());
    }

    #[test]
    fn test_cancel_not_offered_twice() {
        // Once cancelled, the action disappears; repeating it is impossible
        // from the UI, which is the idempotence guarantee.
        let status = OrderStatus::after_cancel();
        assert_eq!(status, OrderStatus::Cancelled);
        assert!(!status.can_cancel());
    }

    #[test]
    fn test_return_exchange_offered_only_when_delivered() {
        assert!(OrderStatus::Delivered.can_return_or_exchange());
        assert!(!OrderStatus::Pending.can_return_or_exchange());
        assert!(!OrderStatus::Cancelled.can_return_or_exchange());
        assert!(!OrderStatus::ExchangeRequested.can_return_or_exchange());
    }

    #[test]
    fn test_wire_values_round_trip() {
        let json = serde_json::to_string(&OrderStatus::ReturnRequested).expect("serialize");
        assert_eq!(json, "\"Return Requested\"");
        let back: OrderStatus = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, OrderStatus::ReturnRequested);
    }

    #[test]
    fn test_unknown_wire_value_maps_to_other() {
        let status: OrderStatus = serde_json::from_str("\"Archived\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Other);
        assert!(!status.can_cancel());
        assert!(!status.can_return_or_exchange());
    }

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).expect("serialize"),
            "\"COD\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Razorpay).expect("serialize"),
            "\"Razorpay\""
        );
        assert!(PaymentMethod::Razorpay.requires_gateway());
        assert!(!PaymentMethod::CashOnDelivery.requires_gateway());
    }
}

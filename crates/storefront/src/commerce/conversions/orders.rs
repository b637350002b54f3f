//! Order type conversion functions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use saffron_core::{Money, OrderId, OrderStatus, PaymentMethod, ProductId, ShippingStatus};

use super::super::types::{Order, OrderLine, ShippingAddress, UserDetails};
use super::parse_money_or_zero;

/// One line of an order, quantities frozen at creation time.
///
/// `Deserialize` because the last-fetched order list rides in the session
/// (it is the "local list" lifecycle actions update optimistically).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub discount: Money,
    pub tax: Money,
}

/// An order ready for display, with the actions its status permits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: OrderId,
    pub status: OrderStatus,
    pub shipping_status: ShippingStatus,
    pub payment_method: PaymentMethod,
    pub lines: Vec<OrderLineView>,
    pub total: Money,
    /// Address snapshot captured at creation; later profile edits never
    /// touch this.
    pub shipping_address: ShippingAddress,
    pub user_details: UserDetails,
    pub placed_at: Option<DateTime<Utc>>,
    /// Offered actions, derived from `status` so the UI never has to know
    /// the state machine.
    pub can_cancel: bool,
    pub can_return_or_exchange: bool,
}

impl OrderView {
    /// The original ordered quantity for a product line, for bounding
    /// return/exchange requests.
    #[must_use]
    pub fn ordered_quantity(&self, product_id: &ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| &line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Reflect a confirmed transition locally without a refetch.
    pub fn apply_status(&mut self, status: OrderStatus) {
        self.can_cancel = status.can_cancel();
        self.can_return_or_exchange = status.can_return_or_exchange();
        self.status = status;
    }
}

fn convert_line(line: OrderLine) -> OrderLineView {
    OrderLineView {
        name: line.name.unwrap_or_default(),
        image: line.image,
        quantity: line.quantity,
        unit_price: line
            .price
            .as_deref()
            .map_or(Money::ZERO, |p| parse_money_or_zero(p, "order.line.price")),
        discount: line
            .discount
            .as_deref()
            .map_or(Money::ZERO, |d| parse_money_or_zero(d, "order.line.discount")),
        tax: line
            .tax
            .as_deref()
            .map_or(Money::ZERO, |t| parse_money_or_zero(t, "order.line.tax")),
        product_id: line.product_id,
    }
}

/// Convert one wire order into its view-model.
#[must_use]
pub fn convert_order(order: Order) -> OrderView {
    let lines: Vec<OrderLineView> = order.products.into_iter().map(convert_line).collect();

    // Trust the server total when present; derive it otherwise.
    let total = order.total.as_deref().map_or_else(
        || {
            lines.iter().fold(Money::ZERO, |acc, line| {
                acc.plus(line.unit_price.times(line.quantity))
            })
        },
        |t| parse_money_or_zero(t, "order.total"),
    );

    OrderView {
        id: order.id,
        can_cancel: order.order_status.can_cancel(),
        can_return_or_exchange: order.order_status.can_return_or_exchange(),
        status: order.order_status,
        shipping_status: order.shipping_status,
        payment_method: order.payment_method,
        lines,
        total,
        shipping_address: order.shipping_address,
        user_details: order.user_details,
        placed_at: order.created_at,
    }
}

/// Convert an order listing.
#[must_use]
pub fn convert_orders(orders: Vec<Order>) -> Vec<OrderView> {
    orders.into_iter().map(convert_order).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new("o1"),
            products: vec![OrderLine {
                product_id: ProductId::new("p1"),
                name: Some("Masala Chai".to_string()),
                image: None,
                quantity: 3,
                price: Some("100.00".to_string()),
                discount: None,
                tax: None,
            }],
            shipping_address: ShippingAddress::default(),
            user_details: UserDetails::default(),
            payment_method: PaymentMethod::CashOnDelivery,
            order_status: status,
            shipping_status: ShippingStatus::Processing,
            total: None,
            razorpay_order_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_actions_follow_status() {
        let pending = convert_order(wire_order(OrderStatus::Pending));
        assert!(pending.can_cancel);
        assert!(!pending.can_return_or_exchange);

        let delivered = convert_order(wire_order(OrderStatus::Delivered));
        assert!(!delivered.can_cancel);
        assert!(delivered.can_return_or_exchange);
    }

    #[test]
    fn test_total_derived_when_absent() {
        let view = convert_order(wire_order(OrderStatus::Pending));
        assert_eq!(view.total.minor_units(), 30000);
    }

    #[test]
    fn test_ordered_quantity_lookup() {
        let view = convert_order(wire_order(OrderStatus::Delivered));
        assert_eq!(view.ordered_quantity(&ProductId::new("p1")), Some(3));
        assert_eq!(view.ordered_quantity(&ProductId::new("p2")), None);
    }

    #[test]
    fn test_apply_status_updates_offered_actions() {
        let mut view = convert_order(wire_order(OrderStatus::Pending));
        view.apply_status(OrderStatus::after_cancel());
        assert_eq!(view.status, OrderStatus::Cancelled);
        assert!(!view.can_cancel);
        assert!(!view.can_return_or_exchange);
    }

    #[test]
    fn test_missing_line_amounts_default_to_zero() {
        let view = convert_order(wire_order(OrderStatus::Pending));
        let line = view.lines.first().expect("line");
        assert_eq!(line.discount, Money::ZERO);
        assert_eq!(line.tax, Money::ZERO);
    }
}

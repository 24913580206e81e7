//! Order aggregate and line items.

mod status;

pub use status::OrderStatus;

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, ProductId};
use outcome::{Outcome, UnitOutcome};
use serde::{Deserialize, Serialize};

use crate::fault::Fault;
use crate::money::{Currency, Money};

/// A line item in an order.
///
/// Product name and unit price are snapshots taken when the line is added:
/// later changes to the referenced product must not retroactively alter
/// historical order content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The referenced product.
    pub product_id: ProductId,

    /// Product name at the time the line was added.
    pub product_name: String,

    /// Unit price at the time the line was added.
    pub unit_price: Money,

    /// Quantity ordered. Always greater than zero.
    pub quantity: u32,
}

impl OrderItem {
    /// Creates a new line item.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }

    /// Returns the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Order aggregate root.
///
/// Items are kept in insertion order; adding a product that is already
/// present increases the existing line's quantity instead of duplicating
/// it. The total is always the fold of the line totals in list order, and
/// is recomputed against a scratch copy so a rejected change never commits
/// a partial total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    shipping_address: String,
    cancellation_reason: Option<String>,
}

impl Order {
    /// Creates a pending order with no items.
    ///
    /// The currency is fixed here; every line added later must be priced in
    /// it.
    pub fn create(
        customer_id: CustomerId,
        currency: Currency,
        shipping_address: impl Into<String>,
    ) -> Result<Self, Fault> {
        let shipping_address = shipping_address.into();
        if shipping_address.trim().is_empty() {
            return Err(Fault::Validation {
                field: "shipping_address",
                reason: "shipping address must not be empty".to_string(),
            });
        }

        Ok(Self {
            id: OrderId::new(),
            customer_id,
            items: Vec::new(),
            total: Money::zero(currency),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            shipped_at: None,
            shipping_address,
            cancellation_reason: None,
        })
    }

    /// Safe form of [`Order::create`].
    pub fn try_create(
        customer_id: CustomerId,
        currency: Currency,
        shipping_address: impl Into<String>,
    ) -> Outcome<Self> {
        Outcome::from_result(Self::create(customer_id, currency, shipping_address))
    }

    /// Returns the order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the customer who placed the order.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the line for a product, if present.
    pub fn get_item(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Returns the derived order total.
    pub fn total_amount(&self) -> Money {
        self.total
    }

    /// Returns the order currency.
    pub fn currency(&self) -> Currency {
        self.total.currency()
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the shipping timestamp, stamped when the order ships.
    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    /// Returns the shipping address.
    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    /// Returns the cancellation reason, if the order was cancelled.
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns true if the order has at least one line.
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    fn check_transition(&self, to: OrderStatus) -> Result<(), Fault> {
        if !self.status.can_transition(to) {
            return Err(Fault::InvalidTransition {
                entity: "Order",
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    fn check_can_modify_items(&self, operation: &'static str) -> Result<(), Fault> {
        if !self.status.can_modify_items() {
            return Err(Fault::InvalidState {
                entity: "Order",
                operation,
                current: self.status.to_string(),
                required: "Pending",
            });
        }
        Ok(())
    }

    // Folds the line totals in list order. A mismatched-currency line fails
    // the whole fold; callers must not have committed anything yet.
    fn recalculate(items: &[OrderItem], currency: Currency) -> Result<Money, Fault> {
        let mut total = Money::zero(currency);
        for item in items {
            total = total.add(item.line_total())?;
        }
        Ok(total)
    }

    fn check_add_item(
        &self,
        product_id: ProductId,
        product_name: &str,
        unit_price: Money,
        quantity: u32,
    ) -> Result<(Vec<OrderItem>, Money), Fault> {
        if quantity == 0 {
            return Err(Fault::Validation {
                field: "quantity",
                reason: "quantity must be greater than 0".to_string(),
            });
        }
        self.check_can_modify_items("add item")?;

        let mut items = self.items.clone();
        match items.iter_mut().find(|item| item.product_id == product_id) {
            Some(existing) => existing.quantity += quantity,
            None => items.push(OrderItem::new(product_id, product_name, unit_price, quantity)),
        }

        let total = Self::recalculate(&items, self.currency())?;
        Ok((items, total))
    }

    /// Adds a line item with snapshotted product name and unit price.
    ///
    /// Adding the same product again increases the existing line's quantity.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Result<(), Fault> {
        let name = product_name.into();
        let (items, total) = self.check_add_item(product_id, &name, unit_price, quantity)?;
        self.items = items;
        self.total = total;
        Ok(())
    }

    /// Safe form of [`Order::add_item`].
    pub fn try_add_item(
        &mut self,
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> UnitOutcome {
        Outcome::from_result(self.add_item(product_id, product_name, unit_price, quantity))
    }

    /// Removes the line for a product.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), Fault> {
        self.check_can_modify_items("remove item")?;

        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or(Fault::ItemNotFound { product_id })?;

        let mut items = self.items.clone();
        items.remove(index);
        let total = Self::recalculate(&items, self.currency())?;

        self.items = items;
        self.total = total;
        Ok(())
    }

    /// Safe form of [`Order::remove_item`].
    pub fn try_remove_item(&mut self, product_id: ProductId) -> UnitOutcome {
        Outcome::from_result(self.remove_item(product_id))
    }

    /// Submits the order. Requires at least one item.
    pub fn submit(&mut self) -> Result<(), Fault> {
        self.check_transition(OrderStatus::Submitted)?;
        if self.items.is_empty() {
            return Err(Fault::NoItems);
        }
        self.status = OrderStatus::Submitted;
        Ok(())
    }

    /// Safe form of [`Order::submit`].
    pub fn try_submit(&mut self) -> UnitOutcome {
        Outcome::from_result(self.submit())
    }

    /// Approves the order against a payment covering the total.
    pub fn approve(&mut self, payment: Money) -> Result<(), Fault> {
        self.check_transition(OrderStatus::Approved)?;
        if payment.currency() != self.currency() {
            return Err(Fault::CurrencyMismatch {
                left: self.currency(),
                right: payment.currency(),
            });
        }
        if payment.cents() < self.total.cents() {
            return Err(Fault::Underpayment {
                total: self.total,
                paid: payment,
            });
        }
        self.status = OrderStatus::Approved;
        Ok(())
    }

    /// Safe form of [`Order::approve`].
    pub fn try_approve(&mut self, payment: Money) -> UnitOutcome {
        Outcome::from_result(self.approve(payment))
    }

    /// Ships the order, stamping the shipping time.
    pub fn ship(&mut self) -> Result<(), Fault> {
        self.check_transition(OrderStatus::Shipped)?;
        self.status = OrderStatus::Shipped;
        self.shipped_at = Some(Utc::now());
        Ok(())
    }

    /// Safe form of [`Order::ship`].
    pub fn try_ship(&mut self) -> UnitOutcome {
        Outcome::from_result(self.ship())
    }

    /// Marks the order as delivered.
    pub fn deliver(&mut self) -> Result<(), Fault> {
        self.check_transition(OrderStatus::Delivered)?;
        self.status = OrderStatus::Delivered;
        Ok(())
    }

    /// Safe form of [`Order::deliver`].
    pub fn try_deliver(&mut self) -> UnitOutcome {
        Outcome::from_result(self.deliver())
    }

    /// Cancels the order with a non-empty reason.
    ///
    /// Shipped, delivered and already-cancelled orders cannot be cancelled.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), Fault> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(Fault::Validation {
                field: "reason",
                reason: "cancellation reason must not be empty".to_string(),
            });
        }
        self.check_transition(OrderStatus::Cancelled)?;
        self.status = OrderStatus::Cancelled;
        self.cancellation_reason = Some(reason);
        Ok(())
    }

    /// Safe form of [`Order::cancel`].
    pub fn try_cancel(&mut self, reason: impl Into<String>) -> UnitOutcome {
        Outcome::from_result(self.cancel(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::Usd).unwrap()
    }

    fn pending_order() -> Order {
        Order::create(CustomerId::new(), Currency::Usd, "1 Example Street").unwrap()
    }

    fn order_with_item(unit_price: i64, quantity: u32) -> (Order, ProductId) {
        let mut order = pending_order();
        let product_id = ProductId::new();
        order
            .add_item(product_id, "Widget", usd(unit_price), quantity)
            .unwrap();
        (order, product_id)
    }

    fn total_of_items(order: &Order) -> i64 {
        order.items().iter().map(|i| i.line_total().cents()).sum()
    }

    #[test]
    fn created_pending_and_empty() {
        let order = pending_order();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(!order.has_items());
        assert!(order.total_amount().is_zero());
        assert_eq!(order.currency(), Currency::Usd);
    }

    #[test]
    fn create_rejects_blank_shipping_address() {
        let fault = Order::create(CustomerId::new(), Currency::Usd, "  ").unwrap_err();
        assert!(matches!(
            fault,
            Fault::Validation {
                field: "shipping_address",
                ..
            }
        ));
    }

    #[test]
    fn add_item_snapshots_name_and_price() {
        let (order, product_id) = order_with_item(10_000, 2);
        let item = order.get_item(product_id).unwrap();
        assert_eq!(item.product_name, "Widget");
        assert_eq!(item.unit_price, usd(10_000));
        assert_eq!(item.quantity, 2);
        assert_eq!(order.total_amount(), usd(20_000));
    }

    #[test]
    fn adding_same_product_merges_quantity() {
        let (mut order, product_id) = order_with_item(10_000, 2);
        order.add_item(product_id, "Widget", usd(10_000), 3).unwrap();

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.get_item(product_id).unwrap().quantity, 5);
        assert_eq!(order.total_amount(), usd(50_000));
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut order = pending_order();
        let first = ProductId::new();
        let second = ProductId::new();
        order.add_item(first, "Widget", usd(100), 1).unwrap();
        order.add_item(second, "Gadget", usd(200), 1).unwrap();

        assert_eq!(order.items()[0].product_id, first);
        assert_eq!(order.items()[1].product_id, second);
    }

    #[test]
    fn zero_quantity_rejected_and_order_unchanged_in_both_forms() {
        let (mut order, product_id) = order_with_item(10_000, 2);
        let before = order.clone();

        let fault = order
            .add_item(ProductId::new(), "Gadget", usd(500), 0)
            .unwrap_err();
        assert!(matches!(
            fault,
            Fault::Validation {
                field: "quantity",
                ..
            }
        ));
        assert_eq!(order, before);

        let outcome = order.try_add_item(product_id, "Widget", usd(10_000), 0);
        assert_eq!(outcome.error().field(), Some("quantity"));
        assert_eq!(order, before);
    }

    #[test]
    fn mismatched_currency_item_rejected_without_partial_total() {
        let (mut order, _) = order_with_item(10_000, 1);
        let before = order.clone();

        let eur = Money::new(500, Currency::Eur).unwrap();
        let fault = order
            .add_item(ProductId::new(), "Imported", eur, 1)
            .unwrap_err();
        assert!(matches!(fault, Fault::CurrencyMismatch { .. }));
        assert_eq!(order, before);
    }

    #[test]
    fn remove_item_recomputes_total() {
        let (mut order, product_id) = order_with_item(10_000, 2);
        order
            .add_item(ProductId::new(), "Gadget", usd(500), 4)
            .unwrap();

        order.remove_item(product_id).unwrap();
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.total_amount(), usd(2_000));
    }

    #[test]
    fn remove_missing_item_fails() {
        let (mut order, _) = order_with_item(10_000, 2);
        let fault = order.remove_item(ProductId::new()).unwrap_err();
        assert!(matches!(fault, Fault::ItemNotFound { .. }));
    }

    #[test]
    fn total_equals_sum_of_line_totals_through_mutations() {
        let mut order = pending_order();
        let a = ProductId::new();
        let b = ProductId::new();
        let c = ProductId::new();

        order.add_item(a, "A", usd(199), 3).unwrap();
        assert_eq!(order.total_amount().cents(), total_of_items(&order));

        order.add_item(b, "B", usd(2_499), 1).unwrap();
        assert_eq!(order.total_amount().cents(), total_of_items(&order));

        order.add_item(a, "A", usd(199), 2).unwrap();
        assert_eq!(order.total_amount().cents(), total_of_items(&order));

        order.remove_item(b).unwrap();
        assert_eq!(order.total_amount().cents(), total_of_items(&order));

        order.add_item(c, "C", usd(50), 10).unwrap();
        order.remove_item(a).unwrap();
        assert_eq!(order.total_amount().cents(), total_of_items(&order));
    }

    #[test]
    fn submit_requires_items() {
        let mut order = pending_order();
        assert!(matches!(order.submit(), Err(Fault::NoItems)));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn submit_transitions_to_submitted() {
        let (mut order, _) = order_with_item(10_000, 2);
        order.submit().unwrap();
        assert_eq!(order.status(), OrderStatus::Submitted);
    }

    #[test]
    fn items_frozen_after_submit() {
        let (mut order, product_id) = order_with_item(10_000, 2);
        order.submit().unwrap();

        let fault = order
            .add_item(ProductId::new(), "Late", usd(100), 1)
            .unwrap_err();
        assert!(matches!(fault, Fault::InvalidState { entity: "Order", .. }));

        assert!(order.remove_item(product_id).is_err());
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn approve_requires_payment_covering_total() {
        let (mut order, _) = order_with_item(10_000, 2);
        order.submit().unwrap();

        let fault = order.approve(usd(19_999)).unwrap_err();
        assert_eq!(
            fault,
            Fault::Underpayment {
                total: usd(20_000),
                paid: usd(19_999),
            }
        );
        assert_eq!(order.status(), OrderStatus::Submitted);

        order.approve(usd(20_000)).unwrap();
        assert_eq!(order.status(), OrderStatus::Approved);
    }

    #[test]
    fn approve_rejects_foreign_currency_payment() {
        let (mut order, _) = order_with_item(10_000, 1);
        order.submit().unwrap();

        let eur = Money::new(50_000, Currency::Eur).unwrap();
        assert!(matches!(
            order.approve(eur),
            Err(Fault::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn ship_stamps_timestamp() {
        let (mut order, _) = order_with_item(10_000, 1);
        order.submit().unwrap();
        order.approve(usd(10_000)).unwrap();

        assert!(order.shipped_at().is_none());
        order.ship().unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);
        assert!(order.shipped_at().is_some());
    }

    #[test]
    fn full_lifecycle_reaches_delivered() {
        let (mut order, _) = order_with_item(10_000, 1);
        order.submit().unwrap();
        order.approve(usd(10_000)).unwrap();
        order.ship().unwrap();
        order.deliver().unwrap();
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.status().is_terminal());
    }

    #[test]
    fn ship_on_pending_fails_in_both_forms_and_status_unchanged() {
        let (mut order, _) = order_with_item(10_000, 1);

        let fault = order.ship().unwrap_err();
        assert!(matches!(
            fault,
            Fault::InvalidTransition { entity: "Order", .. }
        ));
        assert_eq!(order.status(), OrderStatus::Pending);

        let outcome = order.try_ship();
        assert_eq!(outcome.error().code(), "general.invalid_transition");
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn no_state_skipping() {
        let (mut order, _) = order_with_item(10_000, 1);

        // Pending -> Approved and Pending -> Delivered are not legal
        assert!(order.approve(usd(10_000)).is_err());
        assert!(order.deliver().is_err());

        order.submit().unwrap();
        // Submitted -> Shipped is not legal
        assert!(order.ship().is_err());
    }

    #[test]
    fn cancel_allowed_from_pending_submitted_and_approved() {
        for advance in 0..3 {
            let (mut order, _) = order_with_item(10_000, 1);
            if advance >= 1 {
                order.submit().unwrap();
            }
            if advance >= 2 {
                order.approve(usd(10_000)).unwrap();
            }
            order.cancel("changed mind").unwrap();
            assert_eq!(order.status(), OrderStatus::Cancelled);
            assert_eq!(order.cancellation_reason(), Some("changed mind"));
        }
    }

    #[test]
    fn cancel_rejected_once_shipped() {
        let (mut order, _) = order_with_item(10_000, 1);
        order.submit().unwrap();
        order.approve(usd(10_000)).unwrap();
        order.ship().unwrap();

        assert!(matches!(
            order.cancel("too late"),
            Err(Fault::InvalidTransition { .. })
        ));
        assert_eq!(order.status(), OrderStatus::Shipped);
    }

    #[test]
    fn cancel_requires_reason() {
        let (mut order, _) = order_with_item(10_000, 1);
        let fault = order.cancel("   ").unwrap_err();
        assert!(matches!(fault, Fault::Validation { field: "reason", .. }));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn serialization_roundtrip() {
        let (order, _) = order_with_item(10_000, 2);
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}

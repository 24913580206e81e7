//! Product aggregate with stock ledger.

use common::ProductId;
use outcome::{Outcome, UnitOutcome};
use serde::{Deserialize, Serialize};

use crate::fault::Fault;
use crate::money::Money;

/// Product aggregate root.
///
/// Stock is a plain non-negative counter: reservations decrement it and
/// restocks increment it, and a reservation that exceeds current stock is
/// rejected without touching it. The price amount may change over time but
/// its currency is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Money,
    stock: u32,
    sku: String,
    active: bool,
}

impl Product {
    /// Creates an active product with the given initial stock.
    ///
    /// The SKU is normalized to uppercase.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        initial_stock: u32,
        sku: impl Into<String>,
    ) -> Result<Self, Fault> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Fault::Validation {
                field: "name",
                reason: "name must not be empty".to_string(),
            });
        }

        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(Fault::Validation {
                field: "sku",
                reason: "sku must not be empty".to_string(),
            });
        }

        Ok(Self {
            id: ProductId::new(),
            name,
            description: description.into(),
            price,
            stock: initial_stock,
            sku: sku.trim().to_ascii_uppercase(),
            active: true,
        })
    }

    /// Safe form of [`Product::create`].
    pub fn try_create(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        initial_stock: u32,
        sku: impl Into<String>,
    ) -> Outcome<Self> {
        Outcome::from_result(Self::create(name, description, price, initial_stock, sku))
    }

    /// Returns the product ID.
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the product description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current price.
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the quantity currently in stock.
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Returns the normalized SKU.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Returns true if the product is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn check_reserve(&self, quantity: u32) -> Result<u32, Fault> {
        if quantity == 0 {
            return Err(Fault::Validation {
                field: "quantity",
                reason: "quantity must be greater than 0".to_string(),
            });
        }
        if !self.active {
            return Err(Fault::InvalidState {
                entity: "Product",
                operation: "reserve stock",
                current: "Inactive".to_string(),
                required: "Active",
            });
        }
        if quantity > self.stock {
            return Err(Fault::InsufficientStock {
                product_id: self.id,
                available: self.stock,
                requested: quantity,
            });
        }
        Ok(self.stock - quantity)
    }

    /// Reserves stock for an order line.
    ///
    /// Rejected for a zero quantity, an inactive product, or a request
    /// beyond current stock; stock is unchanged in every rejected case.
    pub fn reserve(&mut self, quantity: u32) -> Result<(), Fault> {
        let new_stock = self.check_reserve(quantity)?;
        self.stock = new_stock;
        Ok(())
    }

    /// Safe form of [`Product::reserve`].
    pub fn try_reserve(&mut self, quantity: u32) -> UnitOutcome {
        Outcome::from_result(self.reserve(quantity))
    }

    /// Returns previously reserved stock.
    pub fn restock(&mut self, quantity: u32) -> Result<(), Fault> {
        if quantity == 0 {
            return Err(Fault::Validation {
                field: "quantity",
                reason: "quantity must be greater than 0".to_string(),
            });
        }
        self.stock += quantity;
        Ok(())
    }

    /// Safe form of [`Product::restock`].
    pub fn try_restock(&mut self, quantity: u32) -> UnitOutcome {
        Outcome::from_result(self.restock(quantity))
    }

    /// Changes the price amount. The currency is immutable.
    pub fn change_price(&mut self, new_price: Money) -> Result<(), Fault> {
        if new_price.currency() != self.price.currency() {
            return Err(Fault::CurrencyMismatch {
                left: self.price.currency(),
                right: new_price.currency(),
            });
        }
        self.price = new_price;
        Ok(())
    }

    /// Safe form of [`Product::change_price`].
    pub fn try_change_price(&mut self, new_price: Money) -> UnitOutcome {
        Outcome::from_result(self.change_price(new_price))
    }

    /// Activates the product. Requires positive stock.
    pub fn activate(&mut self) -> Result<(), Fault> {
        if self.stock == 0 {
            return Err(Fault::NoStock {
                product_id: self.id,
            });
        }
        self.active = true;
        Ok(())
    }

    /// Safe form of [`Product::activate`].
    pub fn try_activate(&mut self) -> UnitOutcome {
        Outcome::from_result(self.activate())
    }

    /// Deactivates the product; pending order snapshots are unaffected.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

//! Order repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::{Fault, Order};
use tokio::sync::RwLock;

/// Persistence surface for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetches an order, faulting when absent.
    async fn get(&self, id: OrderId) -> Result<Order, Fault>;

    /// Fetches an order, returning `None` when absent.
    async fn find(&self, id: OrderId) -> Result<Option<Order>, Fault>;

    /// Fetches many orders; any missing id faults the whole batch.
    async fn get_many(&self, ids: &[OrderId]) -> Result<Vec<Order>, Fault>;

    /// Saves one order (insert or replace).
    async fn save(&self, order: Order) -> Result<(), Fault>;

    /// Saves many orders.
    async fn save_many(&self, orders: Vec<Order>) -> Result<(), Fault>;
}

/// In-memory order repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrders {
    entries: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrders {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn get(&self, id: OrderId) -> Result<Order, Fault> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Fault::NotFound {
                entity: "Order",
                id: id.to_string(),
            })
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, Fault> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[OrderId]) -> Result<Vec<Order>, Fault> {
        let entries = self.entries.read().await;
        ids.iter()
            .map(|id| {
                entries.get(id).cloned().ok_or(Fault::NotFound {
                    entity: "Order",
                    id: id.to_string(),
                })
            })
            .collect()
    }

    async fn save(&self, order: Order) -> Result<(), Fault> {
        self.entries.write().await.insert(order.id(), order);
        Ok(())
    }

    async fn save_many(&self, orders: Vec<Order>) -> Result<(), Fault> {
        let mut entries = self.entries.write().await;
        for order in orders {
            entries.insert(order.id(), order);
        }
        Ok(())
    }
}

//! Customer repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerId;
use domain::{Customer, Fault};
use tokio::sync::RwLock;

/// Persistence surface for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fetches a customer, faulting when absent.
    async fn get(&self, id: CustomerId) -> Result<Customer, Fault>;

    /// Fetches a customer, returning `None` when absent.
    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, Fault>;

    /// Fetches many customers; any missing id faults the whole batch.
    async fn get_many(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, Fault>;

    /// Saves one customer (insert or replace).
    async fn save(&self, customer: Customer) -> Result<(), Fault>;

    /// Saves many customers.
    async fn save_many(&self, customers: Vec<Customer>) -> Result<(), Fault>;
}

/// In-memory customer repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomers {
    entries: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomers {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored customers.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomers {
    async fn get(&self, id: CustomerId) -> Result<Customer, Fault> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Fault::NotFound {
                entity: "Customer",
                id: id.to_string(),
            })
    }

    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, Fault> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, Fault> {
        let entries = self.entries.read().await;
        ids.iter()
            .map(|id| {
                entries.get(id).cloned().ok_or(Fault::NotFound {
                    entity: "Customer",
                    id: id.to_string(),
                })
            })
            .collect()
    }

    async fn save(&self, customer: Customer) -> Result<(), Fault> {
        self.entries.write().await.insert(customer.id(), customer);
        Ok(())
    }

    async fn save_many(&self, customers: Vec<Customer>) -> Result<(), Fault> {
        let mut entries = self.entries.write().await;
        for customer in customers {
            entries.insert(customer.id(), customer);
        }
        Ok(())
    }
}

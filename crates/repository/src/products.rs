//! Product repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use domain::{Fault, Product};
use tokio::sync::RwLock;

/// Persistence surface for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches a product, faulting when absent.
    async fn get(&self, id: ProductId) -> Result<Product, Fault>;

    /// Fetches a product, returning `None` when absent.
    async fn find(&self, id: ProductId) -> Result<Option<Product>, Fault>;

    /// Fetches many products; any missing id faults the whole batch.
    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, Fault>;

    /// Saves one product (insert or replace).
    async fn save(&self, product: Product) -> Result<(), Fault>;

    /// Saves many products.
    async fn save_many(&self, products: Vec<Product>) -> Result<(), Fault>;
}

/// In-memory product repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProducts {
    entries: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProducts {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn get(&self, id: ProductId) -> Result<Product, Fault> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Fault::NotFound {
                entity: "Product",
                id: id.to_string(),
            })
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, Fault> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, Fault> {
        let entries = self.entries.read().await;
        ids.iter()
            .map(|id| {
                entries.get(id).cloned().ok_or(Fault::NotFound {
                    entity: "Product",
                    id: id.to_string(),
                })
            })
            .collect()
    }

    async fn save(&self, product: Product) -> Result<(), Fault> {
        self.entries.write().await.insert(product.id(), product);
        Ok(())
    }

    async fn save_many(&self, products: Vec<Product>) -> Result<(), Fault> {
        let mut entries = self.entries.write().await;
        for product in products {
            entries.insert(product.id(), product);
        }
        Ok(())
    }
}

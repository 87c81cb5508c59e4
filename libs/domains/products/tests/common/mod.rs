//! In-memory repository for handler tests

use async_trait::async_trait;
use domain_products::{
    ProductChanges, ProductDocument, ProductError, ProductFilter, ProductRepository,
    ProductResult,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Vec-backed repository that keeps insertion order, like the Mongo adapter.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<Mutex<Vec<ProductDocument>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.lock().unwrap().len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: &ProductDocument) -> ProductResult<()> {
        let mut products = self.products.lock().unwrap();
        if products.iter().any(|p| p.id == product.id) {
            return Err(ProductError::Insertion("Product already exists".into()));
        }
        products.push(product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<ProductDocument>> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find(&self, filter: &ProductFilter) -> ProductResult<Vec<ProductDocument>> {
        let needle = filter.name.as_ref().map(|name| name.to_lowercase());
        let products = self.products.lock().unwrap();

        Ok(products
            .iter()
            .filter(|p| {
                needle
                    .as_ref()
                    .is_none_or(|needle| p.name.to_lowercase().contains(needle))
            })
            .filter(|p| filter.price.contains(p.price_cents))
            .cloned()
            .collect())
    }

    async fn update_fields(&self, id: Uuid, changes: &ProductChanges) -> ProductResult<bool> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };

        if let Some(quantity) = changes.quantity {
            product.quantity = quantity;
        }
        if let Some(price_cents) = changes.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(price_scale) = changes.price_scale {
            product.price_scale = price_scale;
        }
        if let Some(status) = changes.status {
            product.status = status;
        }
        product.updated_at = changes.updated_at;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

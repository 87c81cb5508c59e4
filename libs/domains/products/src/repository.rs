use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{ProductChanges, ProductDocument, ProductFilter};

/// Repository trait for product persistence
///
/// Implementations report store failures as `ProductError::Database` and
/// unique-key violations on insert as `ProductError::Insertion`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product
    async fn insert(&self, product: &ProductDocument) -> ProductResult<()>;

    /// Look up a product by its `id` field
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<ProductDocument>>;

    /// All products matching `filter`, in store order
    async fn find(&self, filter: &ProductFilter) -> ProductResult<Vec<ProductDocument>>;

    /// Set the supplied fields; returns whether a product matched
    async fn update_fields(&self, id: Uuid, changes: &ProductChanges) -> ProductResult<bool>;

    /// Remove a product; returns whether one was removed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_document},
    options::IndexOptions,
};
use std::ops::Bound;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult, is_duplicate_key};
use crate::models::{ProductChanges, ProductDocument, ProductFilter};
use crate::repository::ProductRepository;

/// Collection holding every product
pub const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    /// Create the `id` unique index and the price index
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price_cents": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price_cents".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Remove every product, returning how many were deleted
    #[instrument(skip(self))]
    pub async fn clear(&self) -> ProductResult<u64> {
        let result = self.collection.delete_many(doc! {}).await?;
        tracing::info!(deleted = result.deleted_count, "Products collection cleared");
        Ok(result.deleted_count)
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "id": id.to_string() }
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref name) = filter.name {
            doc.insert(
                "name",
                doc! { "$regex": regex::escape(name), "$options": "i" },
            );
        }

        let mut price = doc! {};
        match filter.price.min {
            Bound::Included(min) => {
                price.insert("$gte", min);
            }
            Bound::Excluded(min) => {
                price.insert("$gt", min);
            }
            Bound::Unbounded => {}
        }
        match filter.price.max {
            Bound::Included(max) => {
                price.insert("$lte", max);
            }
            Bound::Excluded(max) => {
                price.insert("$lt", max);
            }
            Bound::Unbounded => {}
        }
        if !price.is_empty() {
            doc.insert("price_cents", price);
        }

        doc
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert(&self, product: &ProductDocument) -> ProductResult<()> {
        self.collection.insert_one(product).await.map_err(|e| {
            if is_duplicate_key(&e) {
                ProductError::Insertion(format!("Product already exists: {}", e))
            } else {
                ProductError::from(e)
            }
        })?;

        tracing::info!("Product inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> ProductResult<Option<ProductDocument>> {
        let product = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find(&self, filter: &ProductFilter) -> ProductResult<Vec<ProductDocument>> {
        let cursor = self.collection.find(Self::build_filter(filter)).await?;
        let products: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(products)
    }

    #[instrument(skip(self, changes))]
    async fn update_fields(&self, id: Uuid, changes: &ProductChanges) -> ProductResult<bool> {
        let set = to_document(changes).map_err(|e| ProductError::Update(e.to_string()))?;

        let result = self
            .collection
            .update_one(Self::id_filter(id), doc! { "$set": set })
            .await?;

        tracing::info!(matched = result.matched_count, "Product updated");
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        tracing::info!(deleted = result.deleted_count, "Product deleted");
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRange;
    use chrono::Utc;

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_escapes_name() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::name_contains("a.b+"));
        let name = doc.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"a\.b\+");
        assert_eq!(name.get_str("$options").unwrap(), "i");
        assert!(!doc.contains_key("price_cents"));
    }

    #[test]
    fn test_build_filter_inclusive_range() {
        let range = PriceRange {
            min: Bound::Included(500_000),
            max: Bound::Included(800_000),
        };
        let doc = MongoProductRepository::build_filter(&ProductFilter::price(range));
        let price = doc.get_document("price_cents").unwrap();
        assert_eq!(price.get_i64("$gte").unwrap(), 500_000);
        assert_eq!(price.get_i64("$lte").unwrap(), 800_000);
    }

    #[test]
    fn test_build_filter_strict_bounds() {
        let doc = MongoProductRepository::build_filter(&ProductFilter::price(PriceRange::above(
            500_000,
        )));
        let price = doc.get_document("price_cents").unwrap();
        assert_eq!(price.get_i64("$gt").unwrap(), 500_000);
        assert!(!price.contains_key("$lt"));

        let doc = MongoProductRepository::build_filter(&ProductFilter::price(PriceRange::below(
            50_000,
        )));
        let price = doc.get_document("price_cents").unwrap();
        assert_eq!(price.get_i64("$lt").unwrap(), 50_000);
    }

    #[test]
    fn test_id_filter_matches_stored_representation() {
        let product = ProductDocument {
            id: Uuid::new_v4(),
            name: "Desk".to_string(),
            price_cents: 100,
            price_scale: 2,
            quantity: 1,
            status: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let stored = to_document(&product).unwrap();
        let filter = MongoProductRepository::id_filter(product.id);
        assert_eq!(stored.get("id"), filter.get("id"));
    }

    #[test]
    fn test_changes_only_set_supplied_fields() {
        let changes = ProductChanges {
            quantity: None,
            price_cents: Some(750_000),
            price_scale: Some(1),
            status: None,
            updated_at: Utc::now(),
        };
        let set = to_document(&changes).unwrap();
        assert!(set.contains_key("price_cents"));
        assert!(set.contains_key("updated_at"));
        assert!(!set.contains_key("quantity"));
        assert!(!set.contains_key("status"));
    }
}

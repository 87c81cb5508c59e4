//! Product Service - Business logic layer

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    AFFORDABLE_PRICE_THRESHOLD, CreateProduct, LUXURY_PRICE_THRESHOLD, PriceRange, Product,
    ProductChanges, ProductDocument, ProductFilter, UpdateProduct, price_scale, price_to_cents,
};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validates input, parses ids, stamps ids and timestamps, and turns
/// repository results into `ProductError`s. Store access goes through `R`.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        let price_cents = to_cents(input.price)?;
        let document = ProductDocument::new(input, price_cents);

        self.repository.insert(&document).await?;

        tracing::info!(product_id = %document.id, "Product created");
        Ok(document.into())
    }

    /// Get a product by its id
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ProductResult<Product> {
        let uuid = parse_id(id)?;
        self.find_existing(uuid, id).await.map(Product::from)
    }

    /// List products matching `filter`; an empty filter lists everything
    #[instrument(skip(self))]
    pub async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let documents = self.repository.find(&filter).await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    /// Products with `min <= price <= max`
    #[instrument(skip(self))]
    pub async fn query_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        self.list(ProductFilter::price(PriceRange::inclusive(min, max)))
            .await
    }

    /// Products priced above 5000
    pub async fn get_luxury_products(&self) -> ProductResult<Vec<Product>> {
        self.list(ProductFilter::price(PriceRange::above(
            LUXURY_PRICE_THRESHOLD * 100,
        )))
        .await
    }

    /// Products priced below 500
    pub async fn get_affordable_products(&self) -> ProductResult<Vec<Product>> {
        self.list(ProductFilter::price(PriceRange::below(
            AFFORDABLE_PRICE_THRESHOLD * 100,
        )))
        .await
    }

    /// Products whose name contains `term`, ignoring case
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> ProductResult<Vec<Product>> {
        self.list(ProductFilter::name_contains(term)).await
    }

    /// Apply a partial update and return the stored result
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let uuid = parse_id(id)?;

        if input.is_empty() {
            return Err(ProductError::Update("No fields to update".to_string()));
        }
        input.validate()?;

        let changes = ProductChanges {
            quantity: input.quantity,
            price_cents: input.price.map(to_cents).transpose()?,
            price_scale: input.price.map(price_scale),
            status: input.status,
            updated_at: input.updated_at.unwrap_or_else(Utc::now),
        };

        self.find_existing(uuid, id).await?;

        if !self.repository.update_fields(uuid, &changes).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }

        tracing::info!(product_id = %uuid, "Product updated");
        self.find_existing(uuid, id).await.map(Product::from)
    }

    /// Delete a product, returning whether a document was removed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ProductResult<bool> {
        let uuid = parse_id(id)?;
        self.find_existing(uuid, id).await?;

        let deleted = self.repository.delete(uuid).await?;
        tracing::info!(product_id = %uuid, deleted, "Product deleted");
        Ok(deleted)
    }

    async fn find_existing(&self, uuid: Uuid, raw_id: &str) -> ProductResult<ProductDocument> {
        self.repository
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| ProductError::NotFound(raw_id.to_string()))
    }
}

fn parse_id(id: &str) -> ProductResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ProductError::InvalidId(id.to_string()))
}

fn to_cents(price: Decimal) -> ProductResult<i64> {
    price_to_cents(price).ok_or_else(|| {
        ProductError::Validation(format!(
            "price {} must have at most 2 decimal places",
            price
        ))
    })
}

//! Products API routes

use axum::Router;
use domain_products::{handlers, MongoProductRepository, ProductService};

use crate::state::AppState;

/// Products service over the application database
pub fn service(state: &AppState) -> ProductService<MongoProductRepository> {
    ProductService::new(MongoProductRepository::new(&state.db))
}

/// Create products router
pub fn router(state: &AppState) -> Router {
    handlers::router(service(state))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}

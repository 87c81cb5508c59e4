//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUuidResponse, InternalServerErrorResponse,
        NotFoundResponse, UnprocessableEntityResponse, ValidationErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, ListQuery, PriceRangeQuery, Product, SearchQuery, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_product,
        list_products,
        get_product,
        update_product,
        delete_product,
        products_by_price_range,
        luxury_products,
        affordable_products,
        search_products,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            ValidationErrorResponse,
            BadRequestUuidResponse,
            BadRequestQueryResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<ProductService<R>>>;

/// Create the products router. Mount it under `/products`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/filter/price-range", get(products_by_price_range))
        .route("/filter/luxury", get(luxury_products))
        .route("/filter/affordable", get(affordable_products))
        .route("/search", get(search_products))
        .route(
            "/{id}",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List products, optionally filtered by name and price
#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): SharedService<R>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Query(query) = query?;
    let products = service.list(query.into()).await?;
    Ok(Json(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (UUID)")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): SharedService<R>,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let product = service.get(&id).await?;
    Ok(Json(product))
}

/// Partially update a product
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (UUID)")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): SharedService<R>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(input) = payload?;
    let product = service.update(&id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (UUID)")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): SharedService<R>,
    Path(id): Path<String>,
) -> ProductResult<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Products with `min_price <= price <= max_price`
#[utoipa::path(
    get,
    path = "/filter/price-range",
    tag = "Products",
    params(PriceRangeQuery),
    responses(
        (status = 200, description = "Products in range", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_price_range<R: ProductRepository>(
    State(service): SharedService<R>,
    query: Result<Query<PriceRangeQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Query(range) = query?;
    let products = service
        .query_by_price_range(range.min_price, range.max_price)
        .await?;
    Ok(Json(products))
}

/// Products priced above 5000
#[utoipa::path(
    get,
    path = "/filter/luxury",
    tag = "Products",
    responses(
        (status = 200, description = "Luxury products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn luxury_products<R: ProductRepository>(
    State(service): SharedService<R>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.get_luxury_products().await?))
}

/// Products priced below 500
#[utoipa::path(
    get,
    path = "/filter/affordable",
    tag = "Products",
    responses(
        (status = 200, description = "Affordable products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn affordable_products<R: ProductRepository>(
    State(service): SharedService<R>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.get_affordable_products().await?))
}

/// Search products by name, ignoring case
#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): SharedService<R>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Query(query) = query?;
    let products = service.search_products(&query.q).await?;
    Ok(Json(products))
}

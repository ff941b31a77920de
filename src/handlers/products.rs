use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::product::StockStatus;
use crate::errors::ServiceError;
use crate::handlers::common::{CreatedResponse, MessageResponse, PaginationMeta};
use crate::services::products::{ProductFilters, ProductInput, ProductListItem};
use crate::AppState;

/// Query parameters for the product list.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// Case-insensitive substring match against name or id
    pub search: Option<String>,
    /// Exact category name, or "uncategorized" for products without one
    pub category: Option<String>,
    /// One of: out-of-stock, low-stock, in-stock
    pub status: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
}

/// A product with its derived status and total value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    /// Name of the referenced category, if any
    pub category: Option<String>,
    pub quantity: i32,
    #[schema(value_type = String, example = "899.99")]
    pub price: Decimal,
    pub supplier: Option<String>,
    pub date_added: Option<NaiveDate>,
    #[schema(example = "in-stock")]
    pub status: String,
    #[schema(value_type = String, example = "13499.85")]
    pub total_value: Decimal,
}

impl From<ProductListItem> for ProductResponse {
    fn from(item: ProductListItem) -> Self {
        Self {
            id: item.product.id,
            name: item.product.name,
            category_id: item.product.category_id,
            category: item.category_name,
            quantity: item.product.quantity,
            price: item.product.price,
            supplier: item.product.supplier,
            date_added: item.product.date_added,
            status: item.status.as_str().to_string(),
            total_value: item.total_value,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub data: Vec<ProductResponse>,
    pub pagination: PaginationMeta,
}

/// Product fields accepted by create and update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductPayload {
    pub name: String,
    pub category_id: Option<i32>,
    pub quantity: i32,
    #[schema(value_type = String, example = "899.99")]
    pub price: Decimal,
    pub supplier: Option<String>,
    pub date_added: Option<NaiveDate>,
}

impl From<ProductPayload> for ProductInput {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            category_id: payload.category_id,
            quantity: payload.quantity,
            price: payload.price,
            supplier: payload.supplier,
            date_added: payload.date_added,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List products with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Paginated product list", body = ProductListResponse),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|raw| {
            StockStatus::from_str(raw).ok_or_else(|| {
                ServiceError::ValidationError(format!("Unknown status filter: {}", raw))
            })
        })
        .transpose()?;

    let filters = ProductFilters {
        search: query.search,
        category: query.category,
        status,
    };

    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.config.api_default_page_size)
        .clamp(1, state.config.api_max_page_size);

    let result = state.services.products.list(&filters, page, limit).await?;

    Ok(Json(ProductListResponse {
        data: result.items.into_iter().map(ProductResponse::from).collect(),
        pagination: PaginationMeta::new(result.page, result.per_page, result.total),
    }))
}

/// Get a single product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product returned", body = ProductResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.products.get(id).await?;
    Ok(Json(ProductResponse::from(item)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = CreatedResponse),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.services.products.create(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(product.id, "Product added successfully")),
    ))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.update(id, payload.into()).await?;
    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.delete(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

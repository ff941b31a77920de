use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::stock_transaction::TransactionType;
use crate::errors::ServiceError;
use crate::handlers::common::MessageResponse;
use crate::services::transactions::LedgerEntry;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionQuery {
    /// Maximum number of entries to return (default 50)
    pub limit: Option<u64>,
}

/// A ledger entry joined with the referencing product's current name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub product_id: i32,
    /// Null when the product has since been deleted
    pub product_name: Option<String>,
    #[schema(example = "Stock In")]
    pub transaction_type: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
}

impl From<LedgerEntry> for TransactionResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.entry.id,
            product_id: entry.entry.product_id,
            product_name: entry.product_name,
            transaction_type: entry.entry.transaction_type,
            quantity: entry.entry.quantity,
            notes: entry.entry.notes,
            transaction_date: entry.entry.transaction_date,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordTransactionRequest {
    pub product_id: i32,
    #[schema(example = "Stock Out")]
    pub transaction_type: String,
    pub quantity: i32,
    pub notes: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_transactions).post(record_transaction))
}

/// List recent stock movements, newest first
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Recent ledger entries", body = [TransactionResponse])
    ),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let limit = query
        .limit
        .unwrap_or(state.config.transactions_default_limit)
        .clamp(1, state.config.api_max_page_size);

    let entries = state.services.transactions.list(limit).await?;
    let response: Vec<TransactionResponse> =
        entries.into_iter().map(TransactionResponse::from).collect();
    Ok(Json(response))
}

/// Record a stock movement and adjust the product's quantity
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    request_body = RecordTransactionRequest,
    responses(
        (status = 201, description = "Movement recorded", body = MessageResponse),
        (status = 400, description = "Invalid movement", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(payload): Json<RecordTransactionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let transaction_type = TransactionType::from_str(&payload.transaction_type).ok_or_else(|| {
        ServiceError::ValidationError(format!(
            "Invalid transaction type: {}",
            payload.transaction_type
        ))
    })?;

    state
        .services
        .transactions
        .record(
            payload.product_id,
            transaction_type,
            payload.quantity,
            payload.notes,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Transaction recorded successfully")),
    ))
}

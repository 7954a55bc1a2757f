//! Transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::double_option;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use captain_core::transaction::MonthlySummary;
use captain_db::{
    TransactionRepository,
    entities::transactions,
    repositories::{CreateTransactionInput, TransactionFilter, UpdateTransactionInput},
};
use captain_shared::types::{PageRequest, PageResponse};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/summary/monthly", get(monthly_summary))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Exact category.
    pub category: Option<String>,
    /// Earliest date, inclusive.
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Query parameters for a monthly summary.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Signed amount; negative for expenses.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Booking date.
    pub date: NaiveDate,
    /// Category.
    pub category: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Request body for updating a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New signed amount.
    pub amount: Option<Decimal>,
    /// New currency code.
    pub currency: Option<String>,
    /// New booking date.
    pub date: Option<NaiveDate>,
    /// New category; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    /// New note; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub note: Option<Option<String>>,
}

fn repository(state: &AppState) -> TransactionRepository {
    TransactionRepository::new((*state.db).clone())
}

/// GET `/transactions`
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<Json<PageResponse<transactions::Model>>> {
    let page = PageRequest::new(query.page, query.per_page);
    let filter = TransactionFilter {
        category: query.category,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let (rows, total) = repository(&state)
        .list(auth.user_id(), filter, &page)
        .await?;
    Ok(Json(PageResponse::new(rows, page, total)))
}

/// POST `/transactions`
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<transactions::Model>)> {
    let input = CreateTransactionInput {
        amount: request.amount,
        currency: request.currency,
        date: request.date,
        category: request.category,
        note: request.note,
    };

    let transaction = repository(&state).create(auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET `/transactions/{transaction_id}`
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<Json<transactions::Model>> {
    let transaction = repository(&state)
        .get(auth.user_id(), transaction_id)
        .await?;
    Ok(Json(transaction))
}

/// PUT `/transactions/{transaction_id}`
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> ApiResult<Json<transactions::Model>> {
    let input = UpdateTransactionInput {
        amount: request.amount,
        currency: request.currency,
        date: request.date,
        category: request.category,
        note: request.note,
    };

    let transaction = repository(&state)
        .update(auth.user_id(), transaction_id, input)
        .await?;
    Ok(Json(transaction))
}

/// DELETE `/transactions/{transaction_id}`
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repository(&state)
        .delete(auth.user_id(), transaction_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/transactions/summary/monthly`
async fn monthly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<MonthlySummary>> {
    let summary = repository(&state)
        .monthly_summary(auth.user_id(), query.year, query.month)
        .await?;
    Ok(Json(summary))
}

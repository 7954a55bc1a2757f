//! Loan routes.

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
use captain_db::{
    LoanRepository,
    entities::{
        loans,
        sea_orm_active_enums::{LoanKind, LoanStatus},
    },
    repositories::{CreateLoanInput, LoanFilter, UpdateLoanInput},
};

/// Currency of a loan created without one.
pub const DEFAULT_LOAN_CURRENCY: &str = "USD";

/// Creates the loan routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans).post(create_loan))
        .route(
            "/loans/{loan_id}",
            get(get_loan).put(update_loan).delete(delete_loan),
        )
}

/// Query parameters for listing loans.
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// Only loans in this state.
    pub status: Option<LoanStatus>,
    /// Only loans in this direction.
    pub loan_type: Option<LoanKind>,
}

/// Request body for recording a loan.
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    /// `given` or `taken`.
    pub loan_type: LoanKind,
    /// Principal.
    pub amount: Decimal,
    /// Currency code; USD when absent.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Counterparty.
    pub contact: String,
    /// Day the money changed hands.
    pub date: NaiveDate,
    /// Agreed repayment date.
    pub deadline: Option<NaiveDate>,
    /// Annual interest in percent.
    pub interest_rate: Option<Decimal>,
}

/// Request body for updating a loan.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLoanRequest {
    /// New principal.
    pub amount: Option<Decimal>,
    /// New currency code.
    pub currency: Option<String>,
    /// New counterparty.
    pub contact: Option<String>,
    /// New repayment state.
    pub status: Option<LoanStatus>,
    /// New deadline; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub deadline: Option<Option<NaiveDate>>,
    /// New interest rate; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub interest_rate: Option<Option<Decimal>>,
}

fn default_currency() -> String {
    DEFAULT_LOAN_CURRENCY.to_string()
}

fn repository(state: &AppState) -> LoanRepository {
    LoanRepository::new((*state.db).clone())
}

/// GET `/loans`
async fn list_loans(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListLoansQuery>,
) -> ApiResult<Json<Vec<loans::Model>>> {
    let filter = LoanFilter {
        status: query.status,
        loan_type: query.loan_type,
    };

    let loans = repository(&state).list(auth.user_id(), filter).await?;
    Ok(Json(loans))
}

/// POST `/loans`
async fn create_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateLoanRequest>,
) -> ApiResult<(StatusCode, Json<loans::Model>)> {
    let input = CreateLoanInput {
        loan_type: request.loan_type,
        amount: request.amount,
        currency: request.currency,
        contact: request.contact,
        date: request.date,
        deadline: request.deadline,
        interest_rate: request.interest_rate,
    };

    let loan = repository(&state).create(auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// GET `/loans/{loan_id}`
async fn get_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> ApiResult<Json<loans::Model>> {
    let loan = repository(&state).get(auth.user_id(), loan_id).await?;
    Ok(Json(loan))
}

/// PUT `/loans/{loan_id}`
async fn update_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
    Json(request): Json<UpdateLoanRequest>,
) -> ApiResult<Json<loans::Model>> {
    let input = UpdateLoanInput {
        amount: request.amount,
        currency: request.currency,
        contact: request.contact,
        status: request.status,
        deadline: request.deadline,
        interest_rate: request.interest_rate,
    };

    let loan = repository(&state)
        .update(auth.user_id(), loan_id, input)
        .await?;
    Ok(Json(loan))
}

/// DELETE `/loans/{loan_id}`
async fn delete_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repository(&state).delete(auth.user_id(), loan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Budget routes: CRUD, live status, recompute and rollover.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::double_option;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use captain_core::budget::PeriodKind;
use captain_db::{
    BudgetRepository,
    entities::{budget_alerts, budgets},
    repositories::{
        BatchRolloverReport, BudgetStatusReport, CreateBudgetInput, RecomputeReport,
        RolloverOutcome, UpdateBudgetInput,
    },
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/recompute", post(recompute_budgets))
        .route("/budgets/rollover", post(rollover_due_budgets))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{budget_id}/status", get(get_budget_status))
        .route("/budgets/{budget_id}/rollover", post(rollover_budget))
        .route("/budgets/{budget_id}/alerts", get(list_budget_alerts))
}

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    /// Only active budgets.
    #[serde(default)]
    pub active: bool,
}

/// Query parameters for a single rollover.
#[derive(Debug, Deserialize)]
pub struct RolloverQuery {
    /// Period kind of the successor; defaults to the current one.
    pub period: Option<PeriodKind>,
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Display name.
    pub name: String,
    /// Category tracked by the budget.
    pub category: String,
    /// Amount per period.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: String,
    /// Recurrence; monthly when absent.
    #[serde(default)]
    pub period: PeriodKind,
    /// Start of tracking; today when absent.
    pub start_date: Option<NaiveDate>,
    /// Last day of the current period, if already known.
    pub end_date: Option<NaiveDate>,
    /// Warning threshold in percent.
    pub alert_threshold: Option<Decimal>,
    /// Roll over automatically when the period ends.
    #[serde(default)]
    pub auto_rollover: bool,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a budget.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetRequest {
    /// New name.
    pub name: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New warning threshold.
    pub alert_threshold: Option<Decimal>,
    /// New notes; `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    /// New auto-rollover flag.
    pub auto_rollover: Option<bool>,
    /// `false` deactivates the budget.
    pub is_active: Option<bool>,
}

fn repository(state: &AppState) -> BudgetRepository {
    BudgetRepository::new((*state.db).clone())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET `/budgets`
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> ApiResult<Json<Vec<budgets::Model>>> {
    let budgets = repository(&state)
        .list(auth.user_id(), query.active)
        .await?;
    Ok(Json(budgets))
}

/// POST `/budgets`
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateBudgetRequest>,
) -> ApiResult<(StatusCode, Json<budgets::Model>)> {
    let input = CreateBudgetInput {
        name: request.name,
        category: request.category,
        amount: request.amount,
        currency: request.currency,
        period: request.period,
        start_date: request.start_date,
        end_date: request.end_date,
        alert_threshold: request.alert_threshold,
        auto_rollover: request.auto_rollover,
        notes: request.notes,
    };

    let budget = repository(&state).create(auth.user_id(), input).await?;
    info!(budget_id = %budget.id, user_id = %auth.user_id(), "budget created");
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET `/budgets/{budget_id}`
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<budgets::Model>> {
    let budget = repository(&state).get(auth.user_id(), budget_id).await?;
    Ok(Json(budget))
}

/// PUT `/budgets/{budget_id}`
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Json(request): Json<UpdateBudgetRequest>,
) -> ApiResult<Json<budgets::Model>> {
    let input = UpdateBudgetInput {
        name: request.name,
        amount: request.amount,
        alert_threshold: request.alert_threshold,
        notes: request.notes,
        auto_rollover: request.auto_rollover,
        is_active: request.is_active,
    };

    let budget = repository(&state)
        .update(auth.user_id(), budget_id, input)
        .await?;
    Ok(Json(budget))
}

/// DELETE `/budgets/{budget_id}`
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repository(&state).delete(auth.user_id(), budget_id).await?;
    info!(%budget_id, user_id = %auth.user_id(), "budget deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/budgets/{budget_id}/status`
async fn get_budget_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<BudgetStatusReport>> {
    let report = repository(&state)
        .status(auth.user_id(), budget_id, state.rates.as_ref(), today())
        .await?;
    Ok(Json(report))
}

/// POST `/budgets/recompute`
async fn recompute_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<RecomputeReport>> {
    let report = repository(&state)
        .recompute_for_owner(auth.user_id(), state.rates.as_ref(), today())
        .await?;
    Ok(Json(report))
}

/// POST `/budgets/{budget_id}/rollover`
async fn rollover_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
    Query(query): Query<RolloverQuery>,
) -> ApiResult<(StatusCode, Json<RolloverOutcome>)> {
    let outcome = repository(&state)
        .rollover(auth.user_id(), budget_id, query.period)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST `/budgets/rollover`
async fn rollover_due_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<BatchRolloverReport>> {
    let report = repository(&state)
        .rollover_due(Some(auth.user_id()), today())
        .await?;
    Ok(Json(report))
}

/// GET `/budgets/{budget_id}/alerts`
async fn list_budget_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(budget_id): Path<Uuid>,
) -> ApiResult<Json<Vec<budget_alerts::Model>>> {
    let alerts = repository(&state).alerts(auth.user_id(), budget_id).await?;
    Ok(Json(alerts))
}

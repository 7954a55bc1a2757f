//! Investment routes: CRUD, valuation history and portfolio analytics.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::double_option;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use captain_core::investment::PortfolioAnalytics;
use captain_db::{
    InvestmentRepository,
    entities::{investment_roi_entries, investments, sea_orm_active_enums::InvestmentStatus},
    repositories::{
        CreateInvestmentInput, InvestmentFilter, InvestmentSummary, RecordRoiInput,
        UpdateInvestmentInput,
    },
};

/// Creates the investment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/investments",
            get(list_investments).post(create_investment),
        )
        .route("/investments/analytics", get(portfolio_analytics))
        .route(
            "/investments/{investment_id}",
            get(get_investment)
                .put(update_investment)
                .delete(delete_investment),
        )
        .route(
            "/investments/{investment_id}/roi",
            get(roi_history).post(record_roi),
        )
}

/// Query parameters for listing investments.
#[derive(Debug, Deserialize)]
pub struct ListInvestmentsQuery {
    /// Only investments in this state.
    pub status: Option<InvestmentStatus>,
    /// Only investments of this type.
    pub investment_type: Option<String>,
}

/// Request body for creating an investment.
#[derive(Debug, Deserialize)]
pub struct CreateInvestmentRequest {
    /// Display name.
    pub name: String,
    /// Broker or platform.
    pub platform: Option<String>,
    /// Investment type; `stocks` when absent.
    pub investment_type: Option<String>,
    /// Amount paid in.
    pub initial_amount: Decimal,
    /// Value today; the initial amount when absent.
    pub current_value: Option<Decimal>,
    /// Target ROI in percent.
    pub expected_roi: Option<Decimal>,
    /// Currency code.
    pub currency: String,
    /// Day of purchase.
    pub purchase_date: NaiveDate,
    /// Day the investment matures.
    pub maturity_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating an investment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateInvestmentRequest {
    /// New name.
    pub name: Option<String>,
    /// New platform; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub platform: Option<Option<String>>,
    /// New investment type.
    pub investment_type: Option<String>,
    /// New current value.
    pub current_value: Option<Decimal>,
    /// New target ROI; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub expected_roi: Option<Option<Decimal>>,
    /// New lifecycle state.
    pub status: Option<InvestmentStatus>,
    /// New maturity date; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub maturity_date: Option<Option<NaiveDate>>,
    /// New notes; `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Request body for recording a valuation.
#[derive(Debug, Deserialize)]
pub struct RecordRoiRequest {
    /// Value of the holding.
    pub recorded_value: Decimal,
    /// Valuation date; today when absent.
    pub entry_date: Option<NaiveDate>,
    /// Free-form note.
    pub note: Option<String>,
}

fn repository(state: &AppState) -> InvestmentRepository {
    InvestmentRepository::new((*state.db).clone())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET `/investments`
async fn list_investments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListInvestmentsQuery>,
) -> ApiResult<Json<Vec<InvestmentSummary>>> {
    let filter = InvestmentFilter {
        status: query.status,
        investment_type: query.investment_type,
    };

    let investments = repository(&state)
        .list(auth.user_id(), filter, today())
        .await?;
    Ok(Json(investments))
}

/// POST `/investments`
async fn create_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateInvestmentRequest>,
) -> ApiResult<(StatusCode, Json<investments::Model>)> {
    let input = CreateInvestmentInput {
        name: request.name,
        platform: request.platform,
        investment_type: request.investment_type,
        initial_amount: request.initial_amount,
        current_value: request.current_value,
        expected_roi: request.expected_roi,
        currency: request.currency,
        purchase_date: request.purchase_date,
        maturity_date: request.maturity_date,
        notes: request.notes,
    };

    let investment = repository(&state).create(auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(investment)))
}

/// GET `/investments/{investment_id}`
async fn get_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(investment_id): Path<Uuid>,
) -> ApiResult<Json<investments::Model>> {
    let investment = repository(&state).get(auth.user_id(), investment_id).await?;
    Ok(Json(investment))
}

/// PUT `/investments/{investment_id}`
async fn update_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(investment_id): Path<Uuid>,
    Json(request): Json<UpdateInvestmentRequest>,
) -> ApiResult<Json<investments::Model>> {
    let input = UpdateInvestmentInput {
        name: request.name,
        platform: request.platform,
        investment_type: request.investment_type,
        current_value: request.current_value,
        expected_roi: request.expected_roi,
        status: request.status,
        maturity_date: request.maturity_date,
        notes: request.notes,
    };

    let investment = repository(&state)
        .update(auth.user_id(), investment_id, input)
        .await?;
    Ok(Json(investment))
}

/// DELETE `/investments/{investment_id}`
async fn delete_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(investment_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repository(&state)
        .delete(auth.user_id(), investment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/investments/{investment_id}/roi`
async fn record_roi(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(investment_id): Path<Uuid>,
    Json(request): Json<RecordRoiRequest>,
) -> ApiResult<(StatusCode, Json<investment_roi_entries::Model>)> {
    let input = RecordRoiInput {
        recorded_value: request.recorded_value,
        entry_date: request.entry_date.unwrap_or_else(today),
        note: request.note,
    };

    let entry = repository(&state)
        .record_roi(auth.user_id(), investment_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/investments/{investment_id}/roi`
async fn roi_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(investment_id): Path<Uuid>,
) -> ApiResult<Json<Vec<investment_roi_entries::Model>>> {
    let history = repository(&state)
        .roi_history(auth.user_id(), investment_id)
        .await?;
    Ok(Json(history))
}

/// GET `/investments/analytics`
async fn portfolio_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<PortfolioAnalytics>> {
    let analytics = repository(&state).analytics(auth.user_id()).await?;
    Ok(Json(analytics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request_date_is_optional() {
        let request: RecordRoiRequest =
            serde_json::from_str(r#"{"recorded_value": "1200.50"}"#).unwrap();
        assert_eq!(request.recorded_value, Decimal::new(120_050, 2));
        assert!(request.entry_date.is_none());
    }

    #[test]
    fn test_update_request_distinguishes_null_maturity() {
        let cleared: UpdateInvestmentRequest =
            serde_json::from_str(r#"{"maturity_date": null}"#).unwrap();
        assert_eq!(cleared.maturity_date, Some(None));

        let sold: UpdateInvestmentRequest = serde_json::from_str(r#"{"status": "sold"}"#).unwrap();
        assert_eq!(sold.status, Some(InvestmentStatus::Sold));
        assert_eq!(sold.maturity_date, None);
    }
}

//! Currency listing, rate resolution and the exchange-rate cache.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use captain_core::currency::{Conversion, ResolutionMethod};
use captain_db::{
    entities::{currencies, currency_preferences, exchange_rates},
    repositories::{CurrencyPreferenceRepository, CurrencyRepository, SetCurrencyPreferenceInput},
};

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// Routes behind the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/currencies/rate", get(get_rate))
        .route("/currencies/convert", get(convert))
        .route("/currencies/rates", get(list_rates).post(create_rate))
        .route(
            "/currencies/preferences",
            get(list_preferences).post(set_preference),
        )
}

/// Query for a currency pair.
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
}

/// Query for a conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Amount in the source currency.
    pub amount: Decimal,
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
}

/// Request body for a manual rate.
#[derive(Debug, Deserialize)]
pub struct CreateRateRequest {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// 1 `from_currency` = `rate` `to_currency`.
    pub rate: Decimal,
}

/// Request body for a currency preference.
#[derive(Debug, Deserialize)]
pub struct SetPreferenceRequest {
    /// Currency code.
    pub currency_code: String,
    /// Make this the primary currency.
    #[serde(default)]
    pub is_primary: bool,
    /// Position in the list.
    pub display_order: Option<i32>,
}

/// A resolved rate.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// The rate.
    pub rate: Decimal,
    /// Which tier produced it.
    pub method: ResolutionMethod,
}

/// GET `/currencies`
async fn list_currencies(State(state): State<AppState>) -> ApiResult<Json<Vec<currencies::Model>>> {
    let repo = CurrencyRepository::new((*state.db).clone());
    Ok(Json(repo.list_active().await?))
}

/// GET `/currencies/rate`
async fn get_rate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PairQuery>,
) -> Json<RateResponse> {
    let resolution = state.rates.resolve(&query.from, &query.to).await;
    Json(RateResponse {
        from: query.from.to_uppercase(),
        to: query.to.to_uppercase(),
        rate: resolution.rate,
        method: resolution.method,
    })
}

/// GET `/currencies/convert`
async fn convert(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ConvertQuery>,
) -> ApiResult<Json<Conversion>> {
    let decimal_places = CurrencyRepository::new((*state.db).clone())
        .decimal_places(&query.to)
        .await?;
    let conversion = state
        .rates
        .convert(query.amount, &query.from, &query.to, decimal_places)
        .await;
    Ok(Json(conversion))
}

/// GET `/currencies/rates`
async fn list_rates(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PairQuery>,
) -> ApiResult<Json<Vec<exchange_rates::Model>>> {
    let rows = state
        .rates
        .store()
        .list_pair(&query.from, &query.to)
        .await?;
    Ok(Json(rows))
}

/// POST `/currencies/rates`
async fn create_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateRateRequest>,
) -> ApiResult<(StatusCode, Json<exchange_rates::Model>)> {
    let row = state
        .rates
        .store()
        .create_manual(&request.from_currency, &request.to_currency, request.rate)
        .await?;
    info!(
        user_id = %auth.user_id(),
        from = %row.from_currency,
        to = %row.to_currency,
        rate = %row.rate,
        "manual exchange rate recorded"
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET `/currencies/preferences`
async fn list_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<currency_preferences::Model>>> {
    let repo = CurrencyPreferenceRepository::new((*state.db).clone());
    Ok(Json(repo.list(auth.user_id()).await?))
}

/// POST `/currencies/preferences`
async fn set_preference(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<SetPreferenceRequest>,
) -> ApiResult<Json<currency_preferences::Model>> {
    let input = SetCurrencyPreferenceInput {
        currency_code: request.currency_code,
        is_primary: request.is_primary,
        display_order: request.display_order,
    };

    let repo = CurrencyPreferenceRepository::new((*state.db).clone());
    Ok(Json(repo.set(auth.user_id(), input).await?))
}

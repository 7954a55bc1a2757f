//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod budgets;
pub mod currencies;
pub mod health;
pub mod investments;
pub mod loans;
pub mod notifications;
pub mod transactions;

/// Creates the API router; everything but the public routes sits behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(currencies::protected_routes())
        .merge(budgets::routes())
        .merge(transactions::routes())
        .merge(loans::routes())
        .merge(investments::routes())
        .merge(notifications::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(currencies::public_routes())
        .merge(protected_routes)
}

/// Deserializes a field that distinguishes "absent" from `null`.
///
/// Use with `#[serde(default)]`: absent stays `None`, `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

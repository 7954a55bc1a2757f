//! Notification routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use captain_db::{NotificationRepository, entities::notifications};

/// Creates the notification routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{notification_id}/read", put(mark_read))
}

/// GET `/notifications`
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<notifications::Model>>> {
    let repo = NotificationRepository::new((*state.db).clone());
    Ok(Json(repo.list(auth.user_id()).await?))
}

/// PUT `/notifications/{notification_id}/read`
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<notifications::Model>> {
    let repo = NotificationRepository::new((*state.db).clone());
    Ok(Json(repo.mark_read(auth.user_id(), notification_id).await?))
}

//! Notification repository.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::notifications;

/// Most notifications returned by a listing.
pub const LIST_LIMIT: u64 = 100;

/// Error types for notification operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Notification not found for this owner.
    #[error("Notification not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    /// Recipient.
    pub owner_id: Uuid,
    /// Machine-readable kind, e.g. `budget_alert`.
    pub kind: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest notifications for an owner, at most [`LIST_LIMIT`].
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<notifications::Model>, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::OwnerId.eq(owner_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(LIST_LIMIT)
            .all(&self.db)
            .await
    }

    /// Creates a notification.
    pub async fn create(
        &self,
        input: CreateNotificationInput,
    ) -> Result<notifications::Model, DbErr> {
        insert_notification(&self.db, input).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        owner_id: Uuid,
        notification_id: Uuid,
    ) -> Result<notifications::Model, NotificationError> {
        let notification = notifications::Entity::find_by_id(notification_id)
            .filter(notifications::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(NotificationError::NotFound(notification_id))?;

        if notification.is_read {
            return Ok(notification);
        }

        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes notifications created before `cutoff`, returning how many went.
    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let cutoff_at = DateTime::<FixedOffset>::from(cutoff);
        let result = notifications::Entity::delete_many()
            .filter(notifications::Column::CreatedAt.lt(cutoff_at))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            info!(deleted = result.rows_affected, %cutoff, "old notifications removed");
        }
        Ok(result.rows_affected)
    }
}

/// Inserts a notification on any connection, including an open transaction.
pub(crate) async fn insert_notification<C: ConnectionTrait>(
    conn: &C,
    input: CreateNotificationInput,
) -> Result<notifications::Model, DbErr> {
    notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(input.owner_id),
        kind: Set(input.kind),
        title: Set(input.title),
        message: Set(input.message),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
}

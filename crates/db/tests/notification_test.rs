//! Integration tests for NotificationRepository.

mod common;

use captain_db::repositories::{
    CreateNotificationInput, NotificationError, NotificationRepository,
};
use chrono::{Duration, Utc};
use common::setup_db;
use uuid::Uuid;

fn note(owner: Uuid, title: &str) -> CreateNotificationInput {
    CreateNotificationInput {
        owner_id: owner,
        kind: "budget_alert".to_string(),
        title: title.to_string(),
        message: "You have spent 85% of your budget.".to_string(),
    }
}

#[tokio::test]
async fn test_list_newest_first_per_owner() {
    let db = setup_db().await;
    let repo = NotificationRepository::new(db);
    let owner = Uuid::new_v4();

    repo.create(note(owner, "first")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    repo.create(note(owner, "second")).await.unwrap();
    repo.create(note(Uuid::new_v4(), "elsewhere"))
        .await
        .unwrap();

    let listed = repo.list(owner).await.unwrap();
    let titles: Vec<_> = listed.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[tokio::test]
async fn test_mark_read() {
    let db = setup_db().await;
    let repo = NotificationRepository::new(db);
    let owner = Uuid::new_v4();
    let created = repo.create(note(owner, "alert")).await.unwrap();
    assert!(!created.is_read);

    let read = repo.mark_read(owner, created.id).await.unwrap();
    assert!(read.is_read);

    assert!(matches!(
        repo.mark_read(Uuid::new_v4(), created.id).await,
        Err(NotificationError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_older_than() {
    let db = setup_db().await;
    let repo = NotificationRepository::new(db);
    let owner = Uuid::new_v4();
    repo.create(note(owner, "recent")).await.unwrap();

    let deleted = repo
        .delete_older_than(Utc::now() - Duration::days(180))
        .await
        .unwrap();
    assert_eq!(deleted, 0);

    let deleted = repo
        .delete_older_than(Utc::now() + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(repo.list(owner).await.unwrap().is_empty());
}

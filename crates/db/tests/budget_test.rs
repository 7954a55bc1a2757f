//! Integration tests for BudgetRepository CRUD and tracking.

mod common;

use captain_core::budget::{BudgetError as BudgetRule, BudgetStatus, PeriodKind};
use captain_db::repositories::{
    BudgetError, BudgetRepository, CreateBudgetInput, CreateTransactionInput,
    NotificationRepository, TransactionRepository, UpdateBudgetInput,
};
use common::{FixedRates, date, setup_db};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

fn groceries() -> CreateBudgetInput {
    CreateBudgetInput {
        name: "Groceries".to_string(),
        category: "Food".to_string(),
        amount: dec!(100),
        currency: "USD".to_string(),
        period: PeriodKind::Monthly,
        start_date: Some(date(2024, 3, 1)),
        end_date: None,
        alert_threshold: None,
        auto_rollover: false,
        notes: None,
    }
}

async fn spend(
    db: &DatabaseConnection,
    owner: Uuid,
    amount: Decimal,
    currency: &str,
    day: chrono::NaiveDate,
    category: &str,
) {
    TransactionRepository::new(db.clone())
        .create(
            owner,
            CreateTransactionInput {
                amount,
                currency: currency.to_string(),
                date: day,
                category: Some(category.to_string()),
                note: None,
            },
        )
        .await
        .expect("Failed to create transaction");
}

#[tokio::test]
async fn test_create_budget_defaults() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let owner = Uuid::new_v4();

    let budget = repo.create(owner, groceries()).await.unwrap();

    assert_eq!(budget.owner_id, owner);
    assert_eq!(budget.period, "monthly");
    assert_eq!(budget.alert_threshold, dec!(80));
    assert_eq!(budget.spent_amount, Decimal::ZERO);
    assert_eq!(budget.remaining_amount, dec!(100));
    assert!(budget.is_active);
    assert!(budget.end_date.is_none());
}

#[tokio::test]
async fn test_duplicate_active_budget_rejected() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let owner = Uuid::new_v4();

    repo.create(owner, groceries()).await.unwrap();
    let result = repo.create(owner, groceries()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, BudgetError::Rule(BudgetRule::Duplicate { .. })));
    assert_eq!(
        err.to_string(),
        "budget already exists for this category/period"
    );

    // Another period or another owner is fine.
    let weekly = CreateBudgetInput {
        period: PeriodKind::Weekly,
        ..groceries()
    };
    assert!(repo.create(owner, weekly).await.is_ok());
    assert!(repo.create(Uuid::new_v4(), groceries()).await.is_ok());
}

#[tokio::test]
async fn test_create_validates_amount_and_threshold() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let owner = Uuid::new_v4();

    let zero = CreateBudgetInput {
        amount: Decimal::ZERO,
        ..groceries()
    };
    assert!(matches!(
        repo.create(owner, zero).await,
        Err(BudgetError::Rule(BudgetRule::NonPositiveAmount))
    ));

    let threshold = CreateBudgetInput {
        alert_threshold: Some(dec!(120)),
        ..groceries()
    };
    assert!(matches!(
        repo.create(owner, threshold).await,
        Err(BudgetError::Rule(BudgetRule::InvalidThreshold(_)))
    ));
}

#[tokio::test]
async fn test_create_validates_currency_and_dates() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let owner = Uuid::new_v4();

    let currency = CreateBudgetInput {
        currency: "EURO".to_string(),
        ..groceries()
    };
    assert!(matches!(
        repo.create(owner, currency).await,
        Err(BudgetError::Rule(BudgetRule::InvalidCurrency(code))) if code == "EURO"
    ));

    let backwards = CreateBudgetInput {
        end_date: Some(date(2024, 2, 1)),
        ..groceries()
    };
    assert!(matches!(
        repo.create(owner, backwards).await,
        Err(BudgetError::Rule(BudgetRule::InvalidDateRange { .. }))
    ));
    assert!(repo.list(owner, false).await.unwrap().is_empty());

    let lowercase = CreateBudgetInput {
        currency: " eur ".to_string(),
        end_date: Some(date(2024, 3, 1)),
        ..groceries()
    };
    let budget = repo.create(owner, lowercase).await.unwrap();
    assert_eq!(budget.currency, "EUR");
}

#[tokio::test]
async fn test_budget_is_scoped_to_owner() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let owner = Uuid::new_v4();
    let budget = repo.create(owner, groceries()).await.unwrap();

    let result = repo.get(Uuid::new_v4(), budget.id).await;
    assert!(matches!(
        result,
        Err(BudgetError::Rule(BudgetRule::NotFound(id))) if id == budget.id
    ));
}

#[tokio::test]
async fn test_status_converts_foreign_spend_without_writing() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let owner = Uuid::new_v4();
    let budget = repo.create(owner, groceries()).await.unwrap();

    spend(&db, owner, dec!(-40), "USD", date(2024, 3, 5), "Food").await;
    spend(&db, owner, dec!(-20), "EUR", date(2024, 3, 6), "Food").await;
    // Ignored: income, other category, outside the window.
    spend(&db, owner, dec!(500), "USD", date(2024, 3, 7), "Food").await;
    spend(&db, owner, dec!(-10), "USD", date(2024, 3, 8), "Rent").await;
    spend(&db, owner, dec!(-30), "USD", date(2024, 2, 28), "Food").await;

    let report = repo
        .status(owner, budget.id, &FixedRates(dec!(1.25)), date(2024, 3, 20))
        .await
        .unwrap();

    assert_eq!(report.window_start, date(2024, 3, 1));
    assert_eq!(report.window_end, date(2024, 3, 31));
    assert_eq!(report.spent, dec!(65));
    assert_eq!(report.evaluation.status, BudgetStatus::OnTrack);
    assert_eq!(report.evaluation.percentage, dec!(65));
    assert_eq!(report.evaluation.remaining, dec!(35));

    let stored = repo.get(owner, budget.id).await.unwrap();
    assert_eq!(stored.spent_amount, Decimal::ZERO);
    assert!(stored.end_date.is_none());
}

#[tokio::test]
async fn test_list_is_read_only() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let owner = Uuid::new_v4();
    let budget = repo.create(owner, groceries()).await.unwrap();
    spend(&db, owner, dec!(-40), "USD", date(2024, 3, 5), "Food").await;

    let listed = repo.list(owner, false).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, budget.id);
    assert_eq!(listed[0].spent_amount, Decimal::ZERO);
    assert_eq!(listed[0].updated_at, budget.updated_at);
}

#[tokio::test]
async fn test_recompute_persists_and_alerts_once_per_level() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let notifications = NotificationRepository::new(db.clone());
    let owner = Uuid::new_v4();
    let rates = FixedRates(dec!(1.25));
    let today = date(2024, 3, 20);
    let budget = repo.create(owner, groceries()).await.unwrap();

    spend(&db, owner, dec!(-40), "USD", date(2024, 3, 5), "Food").await;
    let report = repo
        .recompute_for_owner(owner, &rates, today)
        .await
        .unwrap();
    assert_eq!(report.alerts_created, 0);

    let stored = repo.get(owner, budget.id).await.unwrap();
    assert_eq!(stored.spent_amount, dec!(40));
    assert_eq!(stored.remaining_amount, dec!(60));
    assert_eq!(stored.end_date, Some(date(2024, 3, 31)));

    // 85% crosses the 80% threshold.
    spend(&db, owner, dec!(-45), "USD", date(2024, 3, 10), "Food").await;
    let report = repo
        .recompute_for_owner(owner, &rates, today)
        .await
        .unwrap();
    assert_eq!(report.alerts_created, 1);
    assert_eq!(report.budgets[0].evaluation.status, BudgetStatus::Warning);

    // Still warning: no second alert.
    spend(&db, owner, dec!(-5), "USD", date(2024, 3, 11), "Food").await;
    let report = repo
        .recompute_for_owner(owner, &rates, today)
        .await
        .unwrap();
    assert_eq!(report.alerts_created, 0);

    // Over budget raises the exceeded alert.
    spend(&db, owner, dec!(-20), "USD", date(2024, 3, 12), "Food").await;
    let report = repo
        .recompute_for_owner(owner, &rates, today)
        .await
        .unwrap();
    assert_eq!(report.alerts_created, 1);
    assert_eq!(report.budgets[0].budget.remaining_amount, dec!(-10));

    let alerts = repo.alerts(owner, budget.id).await.unwrap();
    assert_eq!(alerts.len(), 2);

    let inbox = notifications.list(owner).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| n.kind == "budget_alert" && !n.is_read));
}

#[tokio::test]
async fn test_update_recomputes_remaining() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let owner = Uuid::new_v4();
    let budget = repo.create(owner, groceries()).await.unwrap();
    spend(&db, owner, dec!(-40), "USD", date(2024, 3, 5), "Food").await;
    repo.recompute_for_owner(owner, &FixedRates(Decimal::ONE), date(2024, 3, 20))
        .await
        .unwrap();

    let updated = repo
        .update(
            owner,
            budget.id,
            UpdateBudgetInput {
                name: Some("Food & drink".to_string()),
                amount: Some(dec!(150)),
                notes: Some(Some("incl. restaurants".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Food & drink");
    assert_eq!(updated.amount, dec!(150));
    assert_eq!(updated.remaining_amount, dec!(110));
    assert_eq!(updated.notes.as_deref(), Some("incl. restaurants"));
}

#[tokio::test]
async fn test_deactivated_budget_cannot_be_reactivated() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db);
    let owner = Uuid::new_v4();
    let budget = repo.create(owner, groceries()).await.unwrap();

    let deactivated = repo
        .update(
            owner,
            budget.id,
            UpdateBudgetInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!deactivated.is_active);

    let result = repo
        .update(
            owner,
            budget.id,
            UpdateBudgetInput {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(BudgetError::Rule(BudgetRule::Reactivation(_)))
    ));

    // The category is free again.
    assert!(repo.create(owner, groceries()).await.is_ok());
}

#[tokio::test]
async fn test_delete_removes_budget_and_alerts() {
    let db = setup_db().await;
    let repo = BudgetRepository::new(db.clone());
    let owner = Uuid::new_v4();
    let budget = repo.create(owner, groceries()).await.unwrap();
    spend(&db, owner, dec!(-90), "USD", date(2024, 3, 5), "Food").await;
    repo.recompute_for_owner(owner, &FixedRates(Decimal::ONE), date(2024, 3, 20))
        .await
        .unwrap();
    assert_eq!(repo.alerts(owner, budget.id).await.unwrap().len(), 1);

    repo.delete(owner, budget.id).await.unwrap();

    assert!(repo.get(owner, budget.id).await.is_err());
    assert!(matches!(
        repo.delete(owner, budget.id).await,
        Err(BudgetError::Rule(BudgetRule::NotFound(_)))
    ));
}

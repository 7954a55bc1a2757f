//! Integration tests for LoanRepository.

mod common;

use captain_db::entities::sea_orm_active_enums::{LoanKind, LoanStatus};
use captain_db::repositories::{
    CreateLoanInput, LoanError, LoanFilter, LoanRepository, UpdateLoanInput,
};
use chrono::NaiveDate;
use common::{date, setup_db};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn loan(loan_type: LoanKind, amount: Decimal, day: NaiveDate) -> CreateLoanInput {
    CreateLoanInput {
        loan_type,
        amount,
        currency: "usd".to_string(),
        contact: " Sam ".to_string(),
        date: day,
        deadline: None,
        interest_rate: None,
    }
}

#[tokio::test]
async fn test_loan_crud() {
    let db = setup_db().await;
    let repo = LoanRepository::new(db);
    let owner = Uuid::new_v4();

    let created = repo
        .create(owner, loan(LoanKind::Given, dec!(250), date(2024, 4, 1)))
        .await
        .unwrap();
    assert_eq!(created.currency, "USD");
    assert_eq!(created.contact, "Sam");
    assert_eq!(created.status, LoanStatus::Outstanding);

    let updated = repo
        .update(
            owner,
            created.id,
            UpdateLoanInput {
                status: Some(LoanStatus::Paid),
                deadline: Some(Some(date(2024, 6, 1))),
                interest_rate: Some(Some(dec!(5))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, LoanStatus::Paid);
    assert_eq!(updated.deadline, Some(date(2024, 6, 1)));
    assert_eq!(updated.interest_rate, Some(dec!(5)));

    let cleared = repo
        .update(
            owner,
            created.id,
            UpdateLoanInput {
                deadline: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.deadline, None);
    assert_eq!(cleared.status, LoanStatus::Paid);

    assert!(matches!(
        repo.get(Uuid::new_v4(), created.id).await,
        Err(LoanError::NotFound(_))
    ));

    repo.delete(owner, created.id).await.unwrap();
    assert!(matches!(
        repo.delete(owner, created.id).await,
        Err(LoanError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_filters_and_orders_by_date() {
    let db = setup_db().await;
    let repo = LoanRepository::new(db);
    let owner = Uuid::new_v4();

    let older = repo
        .create(owner, loan(LoanKind::Given, dec!(10), date(2024, 1, 5)))
        .await
        .unwrap();
    let newer = repo
        .create(owner, loan(LoanKind::Given, dec!(20), date(2024, 2, 5)))
        .await
        .unwrap();
    let borrowed = repo
        .create(owner, loan(LoanKind::Taken, dec!(30), date(2024, 3, 5)))
        .await
        .unwrap();
    repo.create(
        Uuid::new_v4(),
        loan(LoanKind::Given, dec!(40), date(2024, 3, 9)),
    )
    .await
    .unwrap();
    repo.update(
        owner,
        older.id,
        UpdateLoanInput {
            status: Some(LoanStatus::Paid),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let all = repo.list(owner, LoanFilter::default()).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![borrowed.id, newer.id, older.id]);

    let given = LoanFilter {
        loan_type: Some(LoanKind::Given),
        ..Default::default()
    };
    assert_eq!(repo.list(owner, given).await.unwrap().len(), 2);

    let open_given = LoanFilter {
        status: Some(LoanStatus::Outstanding),
        loan_type: Some(LoanKind::Given),
    };
    let open = repo.list(owner, open_given).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, newer.id);
}

#[tokio::test]
async fn test_create_validation() {
    let db = setup_db().await;
    let repo = LoanRepository::new(db);
    let owner = Uuid::new_v4();

    let zero = loan(LoanKind::Taken, Decimal::ZERO, date(2024, 1, 1));
    assert!(matches!(
        repo.create(owner, zero).await,
        Err(LoanError::NonPositiveAmount)
    ));

    let mut blank = loan(LoanKind::Taken, dec!(5), date(2024, 1, 1));
    blank.contact = "   ".to_string();
    assert!(matches!(
        repo.create(owner, blank).await,
        Err(LoanError::EmptyContact)
    ));

    let mut currency = loan(LoanKind::Taken, dec!(5), date(2024, 1, 1));
    currency.currency = "dollars".to_string();
    assert!(matches!(
        repo.create(owner, currency).await,
        Err(LoanError::InvalidCurrency(_))
    ));

    let mut interest = loan(LoanKind::Taken, dec!(5), date(2024, 1, 1));
    interest.interest_rate = Some(dec!(-1));
    assert!(matches!(
        repo.create(owner, interest).await,
        Err(LoanError::NegativeInterest(_))
    ));

    let stored = repo.list(owner, LoanFilter::default()).await.unwrap();
    assert!(stored.is_empty());
}

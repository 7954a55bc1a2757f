//! Integration tests for CurrencyPreferenceRepository.

mod common;

use captain_db::repositories::{
    CurrencyPreferenceError, CurrencyPreferenceRepository, SetCurrencyPreferenceInput,
};
use common::setup_db;
use uuid::Uuid;

fn preference(code: &str, is_primary: bool) -> SetCurrencyPreferenceInput {
    SetCurrencyPreferenceInput {
        currency_code: code.to_string(),
        is_primary,
        display_order: None,
    }
}

#[tokio::test]
async fn test_single_primary_per_owner() {
    let db = setup_db().await;
    let repo = CurrencyPreferenceRepository::new(db);
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    repo.set(owner, preference("usd", true)).await.unwrap();
    repo.set(other, preference("USD", true)).await.unwrap();
    let euro = repo.set(owner, preference("EUR", true)).await.unwrap();
    assert_eq!(euro.currency_code, "EUR");
    assert!(euro.is_primary);

    let listed = repo.list(owner).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].currency_code, "EUR");
    assert!(listed[0].is_primary);
    assert!(!listed[1].is_primary);

    let untouched = repo.list(other).await.unwrap();
    assert_eq!(untouched.len(), 1);
    assert!(untouched[0].is_primary);
}

#[tokio::test]
async fn test_existing_preference_is_updated_in_place() {
    let db = setup_db().await;
    let repo = CurrencyPreferenceRepository::new(db);
    let owner = Uuid::new_v4();

    let first = repo.set(owner, preference("GBP", true)).await.unwrap();
    let mut reordered = preference("gbp", false);
    reordered.display_order = Some(3);
    let second = repo.set(owner, reordered).await.unwrap();

    assert_eq!(second.id, first.id);
    assert!(!second.is_primary);
    assert_eq!(second.display_order, 3);
    assert_eq!(repo.list(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejects_bad_codes() {
    let db = setup_db().await;
    let repo = CurrencyPreferenceRepository::new(db);
    let owner = Uuid::new_v4();

    assert!(matches!(
        repo.set(owner, preference("dollars", false)).await,
        Err(CurrencyPreferenceError::InvalidCurrency(_))
    ));
    assert!(matches!(
        repo.set(owner, preference("XYZ", false)).await,
        Err(CurrencyPreferenceError::CurrencyNotFound(code)) if code == "XYZ"
    ));
    assert!(repo.list(owner).await.unwrap().is_empty());
}

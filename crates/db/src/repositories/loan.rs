//! Loan repository.
//!
//! Money lent to or borrowed from a contact, tracked until paid back.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use captain_core::currency::normalize_code;

use crate::entities::loans;
use crate::entities::sea_orm_active_enums::{LoanKind, LoanStatus};

/// Error types for loan operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    /// Loan not found for this owner.
    #[error("Loan not found: {0}")]
    NotFound(Uuid),

    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Contact name is blank.
    #[error("Contact must not be empty")]
    EmptyContact,

    /// Interest rates are percentages and never negative.
    #[error("Interest rate must not be negative, got {0}")]
    NegativeInterest(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a loan.
#[derive(Debug, Clone)]
pub struct CreateLoanInput {
    /// Lent or borrowed.
    pub loan_type: LoanKind,
    /// Principal.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Counterparty.
    pub contact: String,
    /// Day the money changed hands.
    pub date: NaiveDate,
    /// Agreed repayment date.
    pub deadline: Option<NaiveDate>,
    /// Annual interest in percent.
    pub interest_rate: Option<Decimal>,
}

/// Input for updating a loan.
#[derive(Debug, Clone, Default)]
pub struct UpdateLoanInput {
    /// New principal.
    pub amount: Option<Decimal>,
    /// New currency code.
    pub currency: Option<String>,
    /// New counterparty.
    pub contact: Option<String>,
    /// New repayment state.
    pub status: Option<LoanStatus>,
    /// New deadline; `Some(None)` clears it.
    pub deadline: Option<Option<NaiveDate>>,
    /// New interest rate; `Some(None)` clears it.
    pub interest_rate: Option<Option<Decimal>>,
}

/// Filter for listing loans.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanFilter {
    /// Only loans in this state.
    pub status: Option<LoanStatus>,
    /// Only loans in this direction.
    pub loan_type: Option<LoanKind>,
}

/// Loan repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an outstanding loan.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the currency or
    /// contact is invalid, the interest rate is negative, or the insert fails.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateLoanInput,
    ) -> Result<loans::Model, LoanError> {
        validate_amount(input.amount)?;
        let currency = normalize_currency(&input.currency)?;
        let contact = validate_contact(&input.contact)?;
        validate_interest(input.interest_rate)?;
        let now = Utc::now().into();

        let loan = loans::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            loan_type: Set(input.loan_type),
            amount: Set(input.amount),
            currency: Set(currency),
            contact: Set(contact),
            status: Set(LoanStatus::Outstanding),
            date: Set(input.date),
            deadline: Set(input.deadline),
            interest_rate: Set(input.interest_rate),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(loan_id = %loan.id, loan_type = ?loan.loan_type, "loan recorded");
        Ok(loan)
    }

    /// Gets a loan owned by `owner_id`.
    pub async fn get(&self, owner_id: Uuid, loan_id: Uuid) -> Result<loans::Model, LoanError> {
        loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(LoanError::NotFound(loan_id))
    }

    /// Lists loans, most recent first.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: LoanFilter,
    ) -> Result<Vec<loans::Model>, DbErr> {
        let mut query = loans::Entity::find().filter(loans::Column::OwnerId.eq(owner_id));

        if let Some(status) = filter.status {
            query = query.filter(loans::Column::Status.eq(status));
        }
        if let Some(loan_type) = filter.loan_type {
            query = query.filter(loans::Column::LoanType.eq(loan_type));
        }

        query
            .order_by_desc(loans::Column::Date)
            .order_by_desc(loans::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a loan.
    pub async fn update(
        &self,
        owner_id: Uuid,
        loan_id: Uuid,
        input: UpdateLoanInput,
    ) -> Result<loans::Model, LoanError> {
        let loan = self.get(owner_id, loan_id).await?;
        let mut active: loans::ActiveModel = loan.into();

        if let Some(amount) = input.amount {
            validate_amount(amount)?;
            active.amount = Set(amount);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(normalize_currency(&currency)?);
        }
        if let Some(contact) = input.contact {
            active.contact = Set(validate_contact(&contact)?);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(deadline) = input.deadline {
            active.deadline = Set(deadline);
        }
        if let Some(interest_rate) = input.interest_rate {
            validate_interest(interest_rate)?;
            active.interest_rate = Set(interest_rate);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a loan.
    pub async fn delete(&self, owner_id: Uuid, loan_id: Uuid) -> Result<(), LoanError> {
        let result = loans::Entity::delete_many()
            .filter(loans::Column::Id.eq(loan_id))
            .filter(loans::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LoanError::NotFound(loan_id));
        }
        info!(loan_id = %loan_id, "loan deleted");
        Ok(())
    }
}

fn validate_amount(amount: Decimal) -> Result<(), LoanError> {
    if amount <= Decimal::ZERO {
        return Err(LoanError::NonPositiveAmount);
    }
    Ok(())
}

fn validate_interest(rate: Option<Decimal>) -> Result<(), LoanError> {
    match rate {
        Some(rate) if rate < Decimal::ZERO => Err(LoanError::NegativeInterest(rate)),
        _ => Ok(()),
    }
}

fn validate_contact(contact: &str) -> Result<String, LoanError> {
    let contact = contact.trim();
    if contact.is_empty() {
        return Err(LoanError::EmptyContact);
    }
    Ok(contact.to_string())
}

fn normalize_currency(code: &str) -> Result<String, LoanError> {
    normalize_code(code).ok_or_else(|| LoanError::InvalidCurrency(code.to_string()))
}

//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod currency;
pub mod currency_preference;
pub mod exchange_rate;
pub mod investment;
pub mod loan;
pub mod notification;
pub mod transaction;

pub use budget::{
    BatchRolloverReport, BudgetError, BudgetRepository, BudgetStatusReport, CreateBudgetInput,
    RecomputeReport, RolloverFailure, RolloverOutcome, UpdateBudgetInput,
};
pub use currency::CurrencyRepository;
pub use currency_preference::{
    CurrencyPreferenceError, CurrencyPreferenceRepository, SetCurrencyPreferenceInput,
};
pub use exchange_rate::{ExchangeRateError, ExchangeRateRepository};
pub use investment::{
    CreateInvestmentInput, InvestmentError, InvestmentFilter, InvestmentRepository,
    InvestmentSummary, RecordRoiInput, UpdateInvestmentInput,
};
pub use loan::{CreateLoanInput, LoanError, LoanFilter, LoanRepository, UpdateLoanInput};
pub use notification::{CreateNotificationInput, NotificationError, NotificationRepository};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};

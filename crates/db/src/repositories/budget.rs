//! Budget repository.
//!
//! Reads never write: listing and status evaluate on the fly. Cached
//! `spent_amount`/`remaining_amount` columns, filled end dates and alerts are
//! only written by [`BudgetRepository::recompute_for_owner`]. Rollover
//! deactivates the predecessor and inserts the successor in one transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use captain_core::budget::{
    BudgetDefinition, BudgetError as BudgetRule, BudgetEvaluation, BudgetService, PeriodKind,
    default_alert_threshold, effective_end, is_due, period_window, plan_rollover,
    tracking_window,
};
use captain_core::currency::{ExchangeRates, convert_amount, normalize_code};

use super::currency::CurrencyRepository;
use super::notification::{CreateNotificationInput, insert_notification};
use super::transaction::TransactionRepository;
use crate::entities::{budget_alerts, budgets, sea_orm_active_enums::AlertLevel};

/// Notification kind used for budget alerts.
pub const BUDGET_ALERT_KIND: &str = "budget_alert";

/// Rollovers applied to one chain per batch run.
const MAX_CATCH_UP_ROLLOVERS: usize = 400;

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// A budget rule was violated.
    #[error(transparent)]
    Rule(#[from] BudgetRule),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Display name.
    pub name: String,
    /// Transaction category tracked.
    pub category: String,
    /// Budgeted amount per period.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: String,
    /// Recurrence.
    pub period: PeriodKind,
    /// First tracked day; today when unset.
    pub start_date: Option<NaiveDate>,
    /// Last tracked day.
    pub end_date: Option<NaiveDate>,
    /// Alert threshold in percent; 80 when unset.
    pub alert_threshold: Option<Decimal>,
    /// Roll over automatically once ended.
    pub auto_rollover: bool,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Input for updating a budget.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// New name.
    pub name: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New alert threshold.
    pub alert_threshold: Option<Decimal>,
    /// New notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
    /// New auto-rollover flag.
    pub auto_rollover: Option<bool>,
    /// `Some(false)` deactivates. Inactive budgets cannot be reactivated.
    pub is_active: Option<bool>,
}

/// Live evaluation of a budget over its tracking window.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatusReport {
    /// The budget as stored.
    pub budget: budgets::Model,
    /// First day counted.
    pub window_start: NaiveDate,
    /// Last day counted.
    pub window_end: NaiveDate,
    /// Spend in the budget currency.
    pub spent: Decimal,
    /// Status tier, percentage and remaining amount.
    pub evaluation: BudgetEvaluation,
}

/// Outcome of a recompute pass.
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeReport {
    /// Reports for each active budget, after persisting.
    pub budgets: Vec<BudgetStatusReport>,
    /// Alerts raised during this pass.
    pub alerts_created: usize,
}

/// Predecessor and successor of a rollover.
#[derive(Debug, Clone, Serialize)]
pub struct RolloverOutcome {
    /// The now inactive budget.
    pub previous: budgets::Model,
    /// The new active budget.
    pub next: budgets::Model,
}

/// A budget that could not be rolled over.
#[derive(Debug, Clone, Serialize)]
pub struct RolloverFailure {
    /// Budget ID.
    pub budget_id: Uuid,
    /// Why it failed.
    pub error: String,
}

/// Outcome of a batch rollover.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchRolloverReport {
    /// IDs of the successors created.
    pub rolled_over: Vec<Uuid>,
    /// Budgets that failed.
    pub failed: Vec<RolloverFailure>,
}

/// Budget repository for CRUD, tracking and rollover.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Creates a budget.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Amount is not positive
    /// - Threshold is outside `(0, 100]`
    /// - Currency is not a three-letter code
    /// - End date precedes start date
    /// - An active budget already covers this category and period
    /// - Database operation fails
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let threshold = input.alert_threshold.unwrap_or_else(default_alert_threshold);
        BudgetService::validate_amount(input.amount)?;
        BudgetService::validate_threshold(threshold)?;
        let currency = normalize_code(&input.currency)
            .ok_or_else(|| BudgetRule::InvalidCurrency(input.currency.clone()))?;
        let now = Utc::now();
        let start_date = input.start_date.unwrap_or_else(|| now.date_naive());
        BudgetService::validate_dates(start_date, input.end_date)?;

        let category = input.category.trim().to_string();
        ensure_unique_active(&self.db, owner_id, &category, input.period, None).await?;

        let model = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(input.name.trim().to_string()),
            category: Set(category),
            amount: Set(input.amount),
            currency: Set(currency),
            period: Set(input.period.as_str().to_string()),
            start_date: Set(start_date),
            end_date: Set(input.end_date),
            alert_threshold: Set(threshold),
            is_active: Set(true),
            auto_rollover: Set(input.auto_rollover),
            spent_amount: Set(Decimal::ZERO),
            remaining_amount: Set(input.amount),
            notes: Set(input.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let budget = model.insert(&self.db).await?;
        info!(
            budget_id = %budget.id,
            owner_id = %owner_id,
            category = %budget.category,
            "budget created"
        );
        Ok(budget)
    }

    /// Gets a budget owned by `owner_id`.
    pub async fn get(
        &self,
        owner_id: Uuid,
        budget_id: Uuid,
    ) -> Result<budgets::Model, BudgetError> {
        find_owned(&self.db, owner_id, budget_id).await
    }

    /// Lists an owner's budgets, newest first. Never writes.
    pub async fn list(
        &self,
        owner_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<budgets::Model>, BudgetError> {
        let mut query = budgets::Entity::find().filter(budgets::Column::OwnerId.eq(owner_id));
        if active_only {
            query = query.filter(budgets::Column::IsActive.eq(true));
        }

        Ok(query
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Updates a budget.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Budget is not found
    /// - Amount or threshold is invalid
    /// - An inactive budget is asked to become active
    /// - Database operation fails
    pub async fn update(
        &self,
        owner_id: Uuid,
        budget_id: Uuid,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = find_owned(&self.db, owner_id, budget_id).await?;

        if input.is_active == Some(true) && !budget.is_active {
            return Err(BudgetRule::Reactivation(budget_id).into());
        }

        let spent = budget.spent_amount;
        let mut active: budgets::ActiveModel = budget.into();

        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(amount) = input.amount {
            BudgetService::validate_amount(amount)?;
            active.amount = Set(amount);
            active.remaining_amount = Set(amount.saturating_sub(spent));
        }
        if let Some(threshold) = input.alert_threshold {
            BudgetService::validate_threshold(threshold)?;
            active.alert_threshold = Set(threshold);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        if let Some(auto_rollover) = input.auto_rollover {
            active.auto_rollover = Set(auto_rollover);
        }
        if input.is_active == Some(false) {
            active.is_active = Set(false);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget and its alerts.
    pub async fn delete(&self, owner_id: Uuid, budget_id: Uuid) -> Result<(), BudgetError> {
        let txn = self.db.begin().await?;
        let budget = find_owned(&txn, owner_id, budget_id).await?;

        budget_alerts::Entity::delete_many()
            .filter(budget_alerts::Column::BudgetId.eq(budget.id))
            .exec(&txn)
            .await?;
        budgets::Entity::delete_by_id(budget.id).exec(&txn).await?;

        txn.commit().await?;
        info!(budget_id = %budget_id, "budget deleted");
        Ok(())
    }

    /// Alerts raised for a budget, newest first.
    pub async fn alerts(
        &self,
        owner_id: Uuid,
        budget_id: Uuid,
    ) -> Result<Vec<budget_alerts::Model>, BudgetError> {
        let budget = find_owned(&self.db, owner_id, budget_id).await?;
        Ok(budget_alerts::Entity::find()
            .filter(budget_alerts::Column::BudgetId.eq(budget.id))
            .order_by_desc(budget_alerts::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    /// Evaluates a budget on `today` without writing to it.
    ///
    /// Rate resolution may still populate the exchange-rate cache.
    pub async fn status(
        &self,
        owner_id: Uuid,
        budget_id: Uuid,
        rates: &dyn ExchangeRates,
        today: NaiveDate,
    ) -> Result<BudgetStatusReport, BudgetError> {
        let budget = find_owned(&self.db, owner_id, budget_id).await?;
        Ok(self.evaluate(budget, rates, today).await?)
    }

    /// Recomputes every active budget of an owner and persists the result.
    ///
    /// Stores spent and remaining, fills an unset end date with the end of the
    /// first period, and raises an alert plus notification the first time a
    /// budget reaches each alerting status.
    pub async fn recompute_for_owner(
        &self,
        owner_id: Uuid,
        rates: &dyn ExchangeRates,
        today: NaiveDate,
    ) -> Result<RecomputeReport, BudgetError> {
        let active = self.list(owner_id, true).await?;
        let mut report = RecomputeReport {
            budgets: Vec::with_capacity(active.len()),
            alerts_created: 0,
        };

        for budget in active {
            // Rates are resolved before the transaction opens.
            let evaluated = self.evaluate(budget, rates, today).await?;

            let txn = self.db.begin().await?;
            let stored = persist_tracking(&txn, &evaluated).await?;
            if raise_alert(&txn, &stored, &evaluated.evaluation).await? {
                report.alerts_created += 1;
            }
            txn.commit().await?;

            report.budgets.push(BudgetStatusReport {
                budget: stored,
                ..evaluated
            });
        }

        info!(
            owner_id = %owner_id,
            budgets = report.budgets.len(),
            alerts = report.alerts_created,
            "budgets recomputed"
        );
        Ok(report)
    }

    async fn evaluate(
        &self,
        budget: budgets::Model,
        rates: &dyn ExchangeRates,
        today: NaiveDate,
    ) -> Result<BudgetStatusReport, DbErr> {
        let period = PeriodKind::parse(&budget.period);
        let (window_start, window_end) =
            tracking_window(period, budget.start_date, budget.end_date, today);
        let spent = self
            .converted_spend(&budget, window_start, window_end, rates)
            .await?;
        let evaluation = BudgetService::evaluate(spent, budget.amount, budget.alert_threshold);

        Ok(BudgetStatusReport {
            budget,
            window_start,
            window_end,
            spent,
            evaluation,
        })
    }

    /// Spend in the window, converted into the budget currency.
    async fn converted_spend(
        &self,
        budget: &budgets::Model,
        start: NaiveDate,
        end: NaiveDate,
        rates: &dyn ExchangeRates,
    ) -> Result<Decimal, DbErr> {
        let by_currency = TransactionRepository::new(self.db.clone())
            .spend_by_currency(budget.owner_id, &budget.category, start, end)
            .await?;

        let target = budget.currency.as_str();
        let mut total = Decimal::ZERO;
        let mut decimal_places = None;

        for (currency, amount) in by_currency {
            if currency.eq_ignore_ascii_case(target) {
                total += amount;
                continue;
            }

            let dp = match decimal_places {
                Some(dp) => dp,
                None => {
                    let dp = CurrencyRepository::new(self.db.clone())
                        .decimal_places(target)
                        .await?;
                    *decimal_places.insert(dp)
                }
            };
            let resolution = rates.rate(&currency, target).await;
            if resolution.method.is_degraded() {
                warn!(
                    budget_id = %budget.id,
                    from = %currency,
                    to = %target,
                    method = ?resolution.method,
                    "spend converted with a degraded rate"
                );
            }
            total += convert_amount(amount, resolution.rate, dp);
        }

        Ok(total)
    }

    // ========================================================================
    // Rollover
    // ========================================================================

    /// Rolls a budget over into the next period.
    ///
    /// `target` changes the period kind of the successor. Deactivation and
    /// insertion commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Budget is not found or already inactive
    /// - Another active budget covers the successor's category and period
    /// - Database operation fails
    pub async fn rollover(
        &self,
        owner_id: Uuid,
        budget_id: Uuid,
        target: Option<PeriodKind>,
    ) -> Result<RolloverOutcome, BudgetError> {
        let txn = self.db.begin().await?;

        let budget = find_owned(&txn, owner_id, budget_id).await?;
        let successor = plan_rollover(&to_definition(&budget), target)?;
        ensure_unique_active(
            &txn,
            owner_id,
            &successor.category,
            successor.period,
            Some(budget.id),
        )
        .await?;

        let now = Utc::now();
        let mut previous: budgets::ActiveModel = budget.into();
        previous.is_active = Set(false);
        previous.updated_at = Set(now.into());
        let previous = previous.update(&txn).await?;

        let next = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(successor.name),
            category: Set(successor.category),
            amount: Set(successor.amount),
            currency: Set(successor.currency),
            period: Set(successor.period.as_str().to_string()),
            start_date: Set(successor.start_date),
            end_date: Set(successor.end_date),
            alert_threshold: Set(successor.alert_threshold),
            is_active: Set(successor.is_active),
            auto_rollover: Set(successor.auto_rollover),
            spent_amount: Set(Decimal::ZERO),
            remaining_amount: Set(successor.amount),
            notes: Set(successor.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(
            previous = %previous.id,
            next = %next.id,
            start_date = %next.start_date,
            "budget rolled over"
        );
        Ok(RolloverOutcome { previous, next })
    }

    /// Rolls over every due budget, for one owner or all of them.
    ///
    /// Due means active, auto-rollover and ended before `today`; an unset end
    /// date counts as the end of the first period window. A chain that missed
    /// several periods is caught up, so `rolled_over` holds every successor
    /// created. Failures are collected and do not stop the batch.
    pub async fn rollover_due(
        &self,
        owner_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<BatchRolloverReport, BudgetError> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::IsActive.eq(true))
            .filter(budgets::Column::AutoRollover.eq(true));
        if let Some(owner_id) = owner_id {
            query = query.filter(budgets::Column::OwnerId.eq(owner_id));
        }
        let mut due: Vec<(NaiveDate, budgets::Model)> = query
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|budget| {
                let definition = to_definition(&budget);
                is_due(&definition, today).then(|| (effective_end(&definition), budget))
            })
            .collect();
        due.sort_by_key(|(end, budget)| (*end, budget.created_at));

        let mut report = BatchRolloverReport::default();
        for (_, budget) in due {
            self.catch_up(budget, today, &mut report).await;
        }

        info!(
            rolled_over = report.rolled_over.len(),
            failed = report.failed.len(),
            "batch rollover finished"
        );
        Ok(report)
    }

    async fn catch_up(
        &self,
        mut budget: budgets::Model,
        today: NaiveDate,
        report: &mut BatchRolloverReport,
    ) {
        for _ in 0..MAX_CATCH_UP_ROLLOVERS {
            match self.rollover(budget.owner_id, budget.id, None).await {
                Ok(outcome) => {
                    report.rolled_over.push(outcome.next.id);
                    if !is_due(&to_definition(&outcome.next), today) {
                        return;
                    }
                    budget = outcome.next;
                }
                Err(e) => {
                    warn!(budget_id = %budget.id, error = %e, "rollover failed");
                    report.failed.push(RolloverFailure {
                        budget_id: budget.id,
                        error: e.to_string(),
                    });
                    return;
                }
            }
        }
        warn!(budget_id = %budget.id, "rollover chain still behind, resuming next run");
    }
}

/// Storage-independent view of a stored budget.
#[must_use]
pub fn to_definition(model: &budgets::Model) -> BudgetDefinition {
    BudgetDefinition {
        id: Some(model.id),
        name: model.name.clone(),
        category: model.category.clone(),
        amount: model.amount,
        currency: model.currency.clone(),
        period: PeriodKind::parse(&model.period),
        start_date: model.start_date,
        end_date: model.end_date,
        alert_threshold: model.alert_threshold,
        is_active: model.is_active,
        auto_rollover: model.auto_rollover,
        notes: model.notes.clone(),
    }
}

async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    budget_id: Uuid,
) -> Result<budgets::Model, BudgetError> {
    budgets::Entity::find_by_id(budget_id)
        .filter(budgets::Column::OwnerId.eq(owner_id))
        .one(conn)
        .await?
        .ok_or_else(|| BudgetRule::NotFound(budget_id).into())
}

async fn ensure_unique_active<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    category: &str,
    period: PeriodKind,
    exclude: Option<Uuid>,
) -> Result<(), BudgetError> {
    let mut query = budgets::Entity::find()
        .filter(budgets::Column::OwnerId.eq(owner_id))
        .filter(budgets::Column::Category.eq(category))
        .filter(budgets::Column::Period.eq(period.as_str()))
        .filter(budgets::Column::IsActive.eq(true));
    if let Some(id) = exclude {
        query = query.filter(budgets::Column::Id.ne(id));
    }

    if query.one(conn).await?.is_some() {
        return Err(BudgetRule::Duplicate {
            category: category.to_string(),
            period: period.as_str().to_string(),
        }
        .into());
    }
    Ok(())
}

async fn persist_tracking<C: ConnectionTrait>(
    conn: &C,
    report: &BudgetStatusReport,
) -> Result<budgets::Model, DbErr> {
    let budget = &report.budget;
    let mut active: budgets::ActiveModel = budget.clone().into();
    active.spent_amount = Set(report.spent);
    active.remaining_amount = Set(report.evaluation.remaining);
    if budget.end_date.is_none() {
        let (_, first_end) = period_window(PeriodKind::parse(&budget.period), budget.start_date);
        active.end_date = Set(Some(first_end));
    }
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await
}

/// Records an alert and notification unless one exists for this level.
async fn raise_alert<C: ConnectionTrait>(
    conn: &C,
    budget: &budgets::Model,
    evaluation: &BudgetEvaluation,
) -> Result<bool, DbErr> {
    let Some(level) = AlertLevel::for_status(evaluation.status) else {
        return Ok(false);
    };

    let existing = budget_alerts::Entity::find()
        .filter(budget_alerts::Column::BudgetId.eq(budget.id))
        .filter(budget_alerts::Column::Status.eq(level))
        .one(conn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    budget_alerts::ActiveModel {
        id: Set(Uuid::new_v4()),
        budget_id: Set(budget.id),
        owner_id: Set(budget.owner_id),
        status: Set(level),
        percentage: Set(evaluation.percentage),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    let (title, message) = match level {
        AlertLevel::Exceeded => (
            format!("Budget exceeded: {}", budget.name),
            format!(
                "You have spent {}% of your {} {} budget for {}.",
                evaluation.percentage, budget.amount, budget.currency, budget.category
            ),
        ),
        AlertLevel::Warning => (
            format!("Budget warning: {}", budget.name),
            format!(
                "You have spent {}% of your {} {} budget for {}, above your {}% alert threshold.",
                evaluation.percentage,
                budget.amount,
                budget.currency,
                budget.category,
                budget.alert_threshold
            ),
        ),
    };
    insert_notification(
        conn,
        CreateNotificationInput {
            owner_id: budget.owner_id,
            kind: BUDGET_ALERT_KIND.to_string(),
            title,
            message,
        },
    )
    .await?;

    info!(
        budget_id = %budget.id,
        level = ?level,
        percentage = %evaluation.percentage,
        "budget alert raised"
    );
    Ok(true)
}

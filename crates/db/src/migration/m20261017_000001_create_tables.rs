//! Creates the currency, rate cache, transaction, budget and notification tables.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // ============================================================
        // CURRENCY MANAGEMENT
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Code)
                            .string_len(3)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Currencies::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Currencies::Symbol).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Currencies::DecimalPlaces)
                            .small_integer()
                            .not_null()
                            .default(2),
                    )
                    .col(
                        ColumnDef::new(Currencies::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExchangeRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExchangeRates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRates::FromCurrency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRates::ToCurrency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(decimal(ExchangeRates::Rate, backend, 24, 12).not_null())
                    .col(
                        ColumnDef::new(ExchangeRates::Source)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExchangeRates::Date).date().not_null())
                    .col(
                        ColumnDef::new(ExchangeRates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Pair lookups always order by recency.
        manager
            .create_index(
                Index::create()
                    .name("idx_exchange_rates_pair_created")
                    .table(ExchangeRates::Table)
                    .col(ExchangeRates::FromCurrency)
                    .col(ExchangeRates::ToCurrency)
                    .col(ExchangeRates::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // TRANSACTIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::OwnerId).uuid().not_null())
                    .col(decimal(Transactions::Amount, backend, 19, 4).not_null())
                    .col(
                        ColumnDef::new(Transactions::Currency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Category).string_len(64).null())
                    .col(ColumnDef::new(Transactions::Note).text().null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_owner_category_date")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .col(Transactions::Category)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // BUDGETS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Budgets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Budgets::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Budgets::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Budgets::Category).string_len(64).not_null())
                    .col(decimal(Budgets::Amount, backend, 19, 4).not_null())
                    .col(ColumnDef::new(Budgets::Currency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Budgets::Period)
                            .string_len(16)
                            .not_null()
                            .default("monthly"),
                    )
                    .col(ColumnDef::new(Budgets::StartDate).date().not_null())
                    .col(ColumnDef::new(Budgets::EndDate).date().null())
                    .col(
                        decimal(Budgets::AlertThreshold, backend, 5, 2)
                            .not_null()
                            .default(80),
                    )
                    .col(
                        ColumnDef::new(Budgets::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Budgets::AutoRollover)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        decimal(Budgets::SpentAmount, backend, 19, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        decimal(Budgets::RemainingAmount, backend, 19, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Budgets::Notes).text().null())
                    .col(
                        ColumnDef::new(Budgets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Budgets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_budgets_owner_active")
                    .table(Budgets::Table)
                    .col(Budgets::OwnerId)
                    .col(Budgets::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BudgetAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetAlerts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetAlerts::BudgetId).uuid().not_null())
                    .col(ColumnDef::new(BudgetAlerts::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(BudgetAlerts::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(decimal(BudgetAlerts::Percentage, backend, 12, 2).not_null())
                    .col(
                        ColumnDef::new(BudgetAlerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_budget_alerts_budget")
                            .from(BudgetAlerts::Table, BudgetAlerts::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // NOTIFICATIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Notifications::Kind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_owner_created")
                    .table(Notifications::Table)
                    .col(Notifications::OwnerId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetAlerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExchangeRates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await
    }
}

/// Fixed-point column. SQLite only has REAL storage and rejects precision above 16.
pub(super) fn decimal<T: IntoIden>(
    col: T,
    backend: DbBackend,
    precision: u32,
    scale: u32,
) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    if backend == DbBackend::Sqlite {
        def.decimal();
    } else {
        def.decimal_len(precision, scale);
    }
    def
}

#[derive(DeriveIden)]
pub(super) enum Currencies {
    Table,
    Code,
    Name,
    Symbol,
    DecimalPlaces,
    IsActive,
}

#[derive(DeriveIden)]
enum ExchangeRates {
    Table,
    Id,
    FromCurrency,
    ToCurrency,
    Rate,
    Source,
    Date,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    OwnerId,
    Amount,
    Currency,
    Date,
    Category,
    Note,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Budgets {
    Table,
    Id,
    OwnerId,
    Name,
    Category,
    Amount,
    Currency,
    Period,
    StartDate,
    EndDate,
    AlertThreshold,
    IsActive,
    AutoRollover,
    SpentAmount,
    RemainingAmount,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BudgetAlerts {
    Table,
    Id,
    BudgetId,
    OwnerId,
    Status,
    Percentage,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    OwnerId,
    Kind,
    Title,
    Message,
    IsRead,
    CreatedAt,
}

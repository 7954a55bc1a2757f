//! Creates the loan, investment, ROI history and currency preference tables.

use sea_orm_migration::prelude::*;

use super::m20261017_000001_create_tables::decimal;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // ============================================================
        // LOANS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Loans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Loans::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Loans::LoanType).string_len(16).not_null())
                    .col(decimal(Loans::Amount, backend, 19, 4).not_null())
                    .col(ColumnDef::new(Loans::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Loans::Contact).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Loans::Status)
                            .string_len(16)
                            .not_null()
                            .default("outstanding"),
                    )
                    .col(ColumnDef::new(Loans::Date).date().not_null())
                    .col(ColumnDef::new(Loans::Deadline).date().null())
                    .col(decimal(Loans::InterestRate, backend, 7, 4).null())
                    .col(
                        ColumnDef::new(Loans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Loans::UpdatedAt)
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
                    .name("idx_loans_owner_status")
                    .table(Loans::Table)
                    .col(Loans::OwnerId)
                    .col(Loans::Status)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // INVESTMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Investments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Investments::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Investments::Name)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Investments::Platform)
                            .string_len(128)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Investments::InvestmentType)
                            .string_len(32)
                            .not_null()
                            .default("stocks"),
                    )
                    .col(
                        decimal(Investments::InitialAmount, backend, 19, 4)
                            .not_null(),
                    )
                    .col(decimal(Investments::CurrentValue, backend, 19, 4).null())
                    .col(decimal(Investments::ExpectedRoi, backend, 12, 2).null())
                    .col(decimal(Investments::ActualRoi, backend, 12, 2).null())
                    .col(
                        ColumnDef::new(Investments::Currency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Investments::PurchaseDate).date().not_null())
                    .col(ColumnDef::new(Investments::MaturityDate).date().null())
                    .col(
                        ColumnDef::new(Investments::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Investments::Notes).text().null())
                    .col(
                        ColumnDef::new(Investments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Investments::UpdatedAt)
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
                    .name("idx_investments_owner_purchase")
                    .table(Investments::Table)
                    .col(Investments::OwnerId)
                    .col(Investments::PurchaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvestmentRoiEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentRoiEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvestmentRoiEntries::InvestmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        decimal(InvestmentRoiEntries::RecordedValue, backend, 19, 4)
                            .not_null(),
                    )
                    .col(
                        decimal(InvestmentRoiEntries::RoiPercentage, backend, 12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentRoiEntries::EntryDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvestmentRoiEntries::Note).text().null())
                    .col(
                        ColumnDef::new(InvestmentRoiEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_roi_entries_investment")
                            .from(
                                InvestmentRoiEntries::Table,
                                InvestmentRoiEntries::InvestmentId,
                            )
                            .to(Investments::Table, Investments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // CURRENCY PREFERENCES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(CurrencyPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CurrencyPreferences::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CurrencyPreferences::OwnerId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrencyPreferences::CurrencyCode)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CurrencyPreferences::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CurrencyPreferences::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CurrencyPreferences::CreatedAt)
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
                    .name("idx_currency_preferences_owner_code")
                    .table(CurrencyPreferences::Table)
                    .col(CurrencyPreferences::OwnerId)
                    .col(CurrencyPreferences::CurrencyCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CurrencyPreferences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvestmentRoiEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Loans {
    Table,
    Id,
    OwnerId,
    LoanType,
    Amount,
    Currency,
    Contact,
    Status,
    Date,
    Deadline,
    InterestRate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Investments {
    Table,
    Id,
    OwnerId,
    Name,
    Platform,
    InvestmentType,
    InitialAmount,
    CurrentValue,
    ExpectedRoi,
    ActualRoi,
    Currency,
    PurchaseDate,
    MaturityDate,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InvestmentRoiEntries {
    Table,
    Id,
    InvestmentId,
    RecordedValue,
    RoiPercentage,
    EntryDate,
    Note,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CurrencyPreferences {
    Table,
    Id,
    OwnerId,
    CurrencyCode,
    IsPrimary,
    DisplayOrder,
    CreatedAt,
}

//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and stay within the
//! portable schema builder so they run on PostgreSQL and SQLite alike.

pub use sea_orm_migration::prelude::*;

mod m20261017_000001_create_tables;
mod m20261017_000002_seed_currencies;
mod m20261017_000003_create_portfolio_tables;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261017_000001_create_tables::Migration),
            Box::new(m20261017_000002_seed_currencies::Migration),
            Box::new(m20261017_000003_create_portfolio_tables::Migration),
        ]
    }
}

//! `SeaORM` Entity for budgets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub currency: String,
    /// Period name; unknown values read as monthly.
    pub period: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub alert_threshold: Decimal,
    pub is_active: bool,
    pub auto_rollover: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub spent_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub remaining_amount: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_alerts::Entity")]
    BudgetAlerts,
}

impl Related<super::budget_alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetAlerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

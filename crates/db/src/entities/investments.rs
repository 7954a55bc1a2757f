//! `SeaORM` Entity for investments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::InvestmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub platform: Option<String>,
    pub investment_type: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub initial_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub current_value: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub expected_roi: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub actual_roi: Option<Decimal>,
    pub currency: String,
    pub purchase_date: Date,
    pub maturity_date: Option<Date>,
    pub status: InvestmentStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investment_roi_entries::Entity")]
    InvestmentRoiEntries,
}

impl Related<super::investment_roi_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentRoiEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

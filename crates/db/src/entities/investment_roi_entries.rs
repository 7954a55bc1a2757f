//! `SeaORM` Entity for investment_roi_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_roi_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub investment_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub recorded_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub roi_percentage: Decimal,
    pub entry_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investments::Entity",
        from = "Column::InvestmentId",
        to = "super::investments::Column::Id",
        on_delete = "Cascade"
    )]
    Investments,
}

impl Related<super::investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

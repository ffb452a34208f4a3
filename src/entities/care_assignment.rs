use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Durable caretaker-to-senior link. Role constraints (senior_id points at a
/// senior, caretaker_id at a caretaker) are enforced by the write handlers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "care_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub senior_id: i32,
    pub caretaker_id: i32,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub is_active: bool,
    pub is_primary_caretaker: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub schedule: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SeniorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Senior,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CaretakerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Caretaker,
}

impl ActiveModelBehavior for ActiveModel {}

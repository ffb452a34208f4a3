use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "medication_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub medication_id: i32,
    pub scheduled_time: DateTime,
    pub was_taken: bool,
    pub actual_time: Option<DateTime>,
    pub confirmed_by: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::medication::Entity",
        from = "Column::MedicationId",
        to = "super::medication::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Medication,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ConfirmedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    ConfirmedBy,
}

impl Related<super::medication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

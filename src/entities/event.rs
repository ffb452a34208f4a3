use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// NGO-organized event. `current_registrations <= max_participants` is maintained
/// by the registration handler inside a transaction, not by a table constraint.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ngo_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub event_type: String,
    pub event_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub venue: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub max_participants: i32,
    pub current_registrations: i32,
    pub is_active: bool,
    pub registration_deadline: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ngo::Entity",
        from = "Column::NgoId",
        to = "super::ngo::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Ngo,
    #[sea_orm(has_many = "super::event_registration::Entity")]
    Registrations,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Creator,
}

impl Related<super::ngo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ngo.def()
    }
}

impl Related<super::event_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

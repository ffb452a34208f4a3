use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "ngos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub registration_number: String,
    pub email: String,
    pub phone_number: String,
    pub website: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub mission: Option<String>,
    /// The ngo_admin user managing this organization.
    pub admin_id: Option<i32>,
    pub is_verified: bool,
    pub is_active: bool,
    pub established_date: Option<Date>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdminId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Admin,
    #[sea_orm(has_many = "super::volunteer_profile::Entity")]
    VolunteerProfile,
    #[sea_orm(has_many = "super::volunteer_task::Entity")]
    VolunteerTask,
    #[sea_orm(has_many = "super::event::Entity")]
    Event,
}

impl Related<super::volunteer_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VolunteerProfile.def()
    }
}

impl Related<super::volunteer_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VolunteerTask.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

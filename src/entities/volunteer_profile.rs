use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "volunteer_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub ngo_id: i32,
    /// Badge identifier issued by the NGO, not a user reference.
    #[sea_orm(unique)]
    pub volunteer_code: String,
    pub join_date: Date,
    pub is_available: bool,
    pub availability_hours: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub skills: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub interests: Option<String>,
    pub total_hours: f64,
    pub seniors_helped: i32,
    pub tasks_completed: i32,
    pub rating: f64,
    pub total_reviews: i32,
    pub background_check_completed: bool,
    pub background_check_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::ngo::Entity",
        from = "Column::NgoId",
        to = "super::ngo::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Ngo,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ngo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ngo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

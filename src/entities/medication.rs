use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "twice_daily")]
    TwiceDaily,
    #[sea_orm(string_value = "thrice_daily")]
    ThriceDaily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "as_needed")]
    AsNeeded,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "medications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub senior_id: i32,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: Frequency,
    /// Free-form, e.g. "Morning", "Morning and night".
    pub time_of_day: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub side_effects: Option<String>,
    pub is_active: bool,
    pub prescribed_by: Option<String>,
    pub prescription_date: Option<Date>,
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
    #[sea_orm(has_many = "super::medication_log::Entity")]
    Logs,
}

impl Related<super::medication_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

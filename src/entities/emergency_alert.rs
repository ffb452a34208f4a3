use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Distress signal raised by/for a senior. `alert_time` doubles as the creation
/// timestamp; `response_time_seconds` is derived once the alert is resolved.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "emergency_alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub senior_id: i32,
    pub alert_time: DateTime,
    pub alert_type: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime>,
    pub resolved_by: Option<i32>,
    pub response_time_seconds: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub responders_notified: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_notes: Option<String>,
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
        from = "Column::ResolvedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Resolver,
}

impl ActiveModelBehavior for ActiveModel {}

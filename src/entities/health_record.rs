use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Point-in-time vitals for a senior. Every measurement is optional; whoever is
/// recording enters what was actually measured.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "health_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub senior_id: i32,
    pub record_date: Date,
    pub record_time: Time,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    /// Beats per minute.
    pub heart_rate: Option<i32>,
    /// Fahrenheit.
    pub temperature: Option<f64>,
    /// mg/dL.
    pub blood_sugar: Option<i32>,
    /// SpO2 percentage.
    pub oxygen_level: Option<i32>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub recorded_by: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
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
        from = "Column::RecordedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Recorder,
}

impl ActiveModelBehavior for ActiveModel {}

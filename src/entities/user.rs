use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role. Every role-conditioned behavior in the API matches on this
/// exhaustively, so adding a variant surfaces every dispatch site at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "senior")]
    Senior,
    #[sea_orm(string_value = "caretaker")]
    Caretaker,
    #[sea_orm(string_value = "senior_admin")]
    SeniorAdmin,
    #[sea_orm(string_value = "volunteer")]
    Volunteer,
    #[sea_orm(string_value = "ngo_admin")]
    NgoAdmin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SeniorAdmin | Role::NgoAdmin)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub is_active: bool,
    pub last_active: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::senior_profile::Entity")]
    SeniorProfile,
    #[sea_orm(has_one = "super::caretaker_profile::Entity")]
    CaretakerProfile,
    #[sea_orm(has_one = "super::volunteer_profile::Entity")]
    VolunteerProfile,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::senior_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeniorProfile.def()
    }
}

impl Related<super::caretaker_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CaretakerProfile.def()
    }
}

impl Related<super::volunteer_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VolunteerProfile.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::SeniorAdmin).unwrap(),
            "\"senior_admin\""
        );
        let parsed: Role = serde_json::from_str("\"ngo_admin\"").unwrap();
        assert_eq!(parsed, Role::NgoAdmin);
    }

    #[test]
    fn full_name_trims_missing_parts() {
        let user = Model {
            id: 1,
            username: "m.okonkwo".into(),
            email: "m@example.org".into(),
            password_hash: String::new(),
            first_name: "Margaret".into(),
            last_name: String::new(),
            role: Role::Senior,
            phone_number: None,
            date_of_birth: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            is_active: true,
            last_active: None,
            created_at: Default::default(),
            updated_at: Default::default(),
        };
        assert_eq!(user.full_name(), "Margaret");
    }
}

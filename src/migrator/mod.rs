use sea_orm_migration::prelude::*;

mod m20260601_000001_create_users;
mod m20260601_000002_create_profiles;
mod m20260601_000003_create_care_tables;
mod m20260601_000004_create_task_tables;
mod m20260601_000005_create_event_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_users::Migration),
            Box::new(m20260601_000002_create_profiles::Migration),
            Box::new(m20260601_000003_create_care_tables::Migration),
            Box::new(m20260601_000004_create_task_tables::Migration),
            Box::new(m20260601_000005_create_event_tables::Migration),
        ]
    }
}

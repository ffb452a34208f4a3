use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VolunteerTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VolunteerTasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VolunteerTasks::SeniorId).integer().not_null())
                    .col(
                        ColumnDef::new(VolunteerTasks::VolunteerId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerTasks::NgoId).integer().not_null())
                    .col(ColumnDef::new(VolunteerTasks::Title).string().not_null())
                    .col(ColumnDef::new(VolunteerTasks::TaskType).string().not_null())
                    .col(ColumnDef::new(VolunteerTasks::Description).text().not_null())
                    .col(
                        ColumnDef::new(VolunteerTasks::ScheduledDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerTasks::ScheduledTime)
                            .time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerTasks::EstimatedDuration)
                            .integer()
                            .default(60)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerTasks::Location).string().not_null())
                    .col(
                        ColumnDef::new(VolunteerTasks::Status)
                            .string_len(20)
                            .default("assigned")
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerTasks::ActualStartTime).date_time())
                    .col(ColumnDef::new(VolunteerTasks::ActualEndTime).date_time())
                    .col(ColumnDef::new(VolunteerTasks::CompletionNotes).text())
                    .col(
                        ColumnDef::new(VolunteerTasks::HoursLogged)
                            .double()
                            .default(0.0)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerTasks::Notes).text())
                    .col(ColumnDef::new(VolunteerTasks::CreatedBy).integer())
                    .col(
                        ColumnDef::new(VolunteerTasks::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerTasks::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_tasks_senior")
                            .from(VolunteerTasks::Table, VolunteerTasks::SeniorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_tasks_volunteer")
                            .from(VolunteerTasks::Table, VolunteerTasks::VolunteerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_tasks_ngo")
                            .from(VolunteerTasks::Table, VolunteerTasks::NgoId)
                            .to(Ngos::Table, Ngos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_tasks_created_by")
                            .from(VolunteerTasks::Table, VolunteerTasks::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_volunteer_tasks_volunteer_id")
                    .table(VolunteerTasks::Table)
                    .col(VolunteerTasks::VolunteerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_volunteer_tasks_ngo_id")
                    .table(VolunteerTasks::Table)
                    .col(VolunteerTasks::NgoId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_volunteer_tasks_status")
                    .table(VolunteerTasks::Table)
                    .col(VolunteerTasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmergencyAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmergencyAlerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmergencyAlerts::SeniorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyAlerts::AlertTime)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmergencyAlerts::AlertType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmergencyAlerts::Location).string())
                    .col(ColumnDef::new(EmergencyAlerts::Latitude).double())
                    .col(ColumnDef::new(EmergencyAlerts::Longitude).double())
                    .col(
                        ColumnDef::new(EmergencyAlerts::IsResolved)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmergencyAlerts::ResolvedAt).date_time())
                    .col(ColumnDef::new(EmergencyAlerts::ResolvedBy).integer())
                    .col(
                        ColumnDef::new(EmergencyAlerts::ResponseTimeSeconds)
                            .big_integer(),
                    )
                    .col(ColumnDef::new(EmergencyAlerts::RespondersNotified).text())
                    .col(ColumnDef::new(EmergencyAlerts::Notes).text())
                    .col(ColumnDef::new(EmergencyAlerts::ResolutionNotes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_emergency_alerts_senior")
                            .from(EmergencyAlerts::Table, EmergencyAlerts::SeniorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_emergency_alerts_resolved_by")
                            .from(EmergencyAlerts::Table, EmergencyAlerts::ResolvedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_emergency_alerts_senior_id")
                    .table(EmergencyAlerts::Table)
                    .col(EmergencyAlerts::SeniorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_emergency_alerts_is_resolved")
                    .table(EmergencyAlerts::Table)
                    .col(EmergencyAlerts::IsResolved)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HealthRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HealthRecords::SeniorId).integer().not_null())
                    .col(ColumnDef::new(HealthRecords::RecordDate).date().not_null())
                    .col(ColumnDef::new(HealthRecords::RecordTime).time().not_null())
                    .col(ColumnDef::new(HealthRecords::BloodPressureSystolic).integer())
                    .col(ColumnDef::new(HealthRecords::BloodPressureDiastolic).integer())
                    .col(ColumnDef::new(HealthRecords::HeartRate).integer())
                    .col(ColumnDef::new(HealthRecords::Temperature).double())
                    .col(ColumnDef::new(HealthRecords::BloodSugar).integer())
                    .col(ColumnDef::new(HealthRecords::OxygenLevel).integer())
                    .col(ColumnDef::new(HealthRecords::Weight).double())
                    .col(ColumnDef::new(HealthRecords::Notes).text())
                    .col(ColumnDef::new(HealthRecords::RecordedBy).integer())
                    .col(
                        ColumnDef::new(HealthRecords::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_health_records_senior")
                            .from(HealthRecords::Table, HealthRecords::SeniorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_health_records_recorded_by")
                            .from(HealthRecords::Table, HealthRecords::RecordedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_health_records_senior_id")
                    .table(HealthRecords::Table)
                    .col(HealthRecords::SeniorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmergencyAlerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VolunteerTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Ngos {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum VolunteerTasks {
    Table,
    Id,
    SeniorId,
    VolunteerId,
    NgoId,
    Title,
    TaskType,
    Description,
    ScheduledDate,
    ScheduledTime,
    EstimatedDuration,
    Location,
    Status,
    ActualStartTime,
    ActualEndTime,
    CompletionNotes,
    HoursLogged,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmergencyAlerts {
    Table,
    Id,
    SeniorId,
    AlertTime,
    AlertType,
    Location,
    Latitude,
    Longitude,
    IsResolved,
    ResolvedAt,
    ResolvedBy,
    ResponseTimeSeconds,
    RespondersNotified,
    Notes,
    ResolutionNotes,
}

#[derive(DeriveIden)]
enum HealthRecords {
    Table,
    Id,
    SeniorId,
    RecordDate,
    RecordTime,
    BloodPressureSystolic,
    BloodPressureDiastolic,
    HeartRate,
    Temperature,
    BloodSugar,
    OxygenLevel,
    Weight,
    Notes,
    RecordedBy,
    CreatedAt,
}

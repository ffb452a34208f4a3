use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CareAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CareAssignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CareAssignments::SeniorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareAssignments::CaretakerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareAssignments::StartDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CareAssignments::EndDate).date())
                    .col(
                        ColumnDef::new(CareAssignments::IsActive)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareAssignments::IsPrimaryCaretaker)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CareAssignments::Schedule).text())
                    .col(ColumnDef::new(CareAssignments::Notes).text())
                    .col(
                        ColumnDef::new(CareAssignments::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CareAssignments::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_care_assignments_senior")
                            .from(CareAssignments::Table, CareAssignments::SeniorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_care_assignments_caretaker")
                            .from(CareAssignments::Table, CareAssignments::CaretakerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_care_assignments_senior_id")
                    .table(CareAssignments::Table)
                    .col(CareAssignments::SeniorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_care_assignments_caretaker_id")
                    .table(CareAssignments::Table)
                    .col(CareAssignments::CaretakerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appointments::SeniorId).integer().not_null())
                    .col(ColumnDef::new(Appointments::Title).string().not_null())
                    .col(
                        ColumnDef::new(Appointments::AppointmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Appointments::Description).text())
                    .col(
                        ColumnDef::new(Appointments::AppointmentDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::AppointmentTime)
                            .time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::DurationMinutes)
                            .integer()
                            .default(30)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Appointments::Location).string().not_null())
                    .col(ColumnDef::new(Appointments::DoctorName).string())
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string_len(20)
                            .default("scheduled")
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::ReminderSent)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Appointments::ReminderTime).date_time())
                    .col(ColumnDef::new(Appointments::Notes).text())
                    .col(ColumnDef::new(Appointments::CaretakerId).integer())
                    .col(ColumnDef::new(Appointments::CreatedBy).integer())
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_senior")
                            .from(Appointments::Table, Appointments::SeniorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_caretaker")
                            .from(Appointments::Table, Appointments::CaretakerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_created_by")
                            .from(Appointments::Table, Appointments::CreatedBy)
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
                    .name("idx_appointments_senior_id")
                    .table(Appointments::Table)
                    .col(Appointments::SeniorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_date")
                    .table(Appointments::Table)
                    .col(Appointments::AppointmentDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Medications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Medications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Medications::SeniorId).integer().not_null())
                    .col(
                        ColumnDef::new(Medications::MedicationName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Medications::Dosage).string().not_null())
                    .col(
                        ColumnDef::new(Medications::Frequency)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Medications::TimeOfDay).string().not_null())
                    .col(ColumnDef::new(Medications::StartDate).date().not_null())
                    .col(ColumnDef::new(Medications::EndDate).date())
                    .col(ColumnDef::new(Medications::Instructions).text())
                    .col(ColumnDef::new(Medications::SideEffects).text())
                    .col(
                        ColumnDef::new(Medications::IsActive)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Medications::PrescribedBy).string())
                    .col(ColumnDef::new(Medications::PrescriptionDate).date())
                    .col(ColumnDef::new(Medications::Notes).text())
                    .col(ColumnDef::new(Medications::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Medications::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medications_senior")
                            .from(Medications::Table, Medications::SeniorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medications_senior_id")
                    .table(Medications::Table)
                    .col(Medications::SeniorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MedicationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MedicationLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MedicationLogs::MedicationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MedicationLogs::ScheduledTime)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MedicationLogs::WasTaken)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MedicationLogs::ActualTime).date_time())
                    .col(ColumnDef::new(MedicationLogs::ConfirmedBy).integer())
                    .col(ColumnDef::new(MedicationLogs::Notes).text())
                    .col(
                        ColumnDef::new(MedicationLogs::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medication_logs_medication")
                            .from(MedicationLogs::Table, MedicationLogs::MedicationId)
                            .to(Medications::Table, Medications::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medication_logs_confirmed_by")
                            .from(MedicationLogs::Table, MedicationLogs::ConfirmedBy)
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
                    .name("idx_medication_logs_medication_id")
                    .table(MedicationLogs::Table)
                    .col(MedicationLogs::MedicationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MedicationLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Medications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CareAssignments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CareAssignments {
    Table,
    Id,
    SeniorId,
    CaretakerId,
    StartDate,
    EndDate,
    IsActive,
    IsPrimaryCaretaker,
    Schedule,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    SeniorId,
    Title,
    AppointmentType,
    Description,
    AppointmentDate,
    AppointmentTime,
    DurationMinutes,
    Location,
    DoctorName,
    Status,
    ReminderSent,
    ReminderTime,
    Notes,
    CaretakerId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Medications {
    Table,
    Id,
    SeniorId,
    MedicationName,
    Dosage,
    Frequency,
    TimeOfDay,
    StartDate,
    EndDate,
    Instructions,
    SideEffects,
    IsActive,
    PrescribedBy,
    PrescriptionDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MedicationLogs {
    Table,
    Id,
    MedicationId,
    ScheduledTime,
    WasTaken,
    ActualTime,
    ConfirmedBy,
    Notes,
    CreatedAt,
}

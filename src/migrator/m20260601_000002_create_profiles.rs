use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ngos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ngos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ngos::Name).string().not_null())
                    .col(
                        ColumnDef::new(Ngos::RegistrationNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Ngos::Email).string().not_null())
                    .col(ColumnDef::new(Ngos::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Ngos::Address).text().not_null())
                    .col(ColumnDef::new(Ngos::City).string().not_null())
                    .col(ColumnDef::new(Ngos::State).string().not_null())
                    .col(ColumnDef::new(Ngos::ZipCode).string().not_null())
                    .col(ColumnDef::new(Ngos::Website).string())
                    .col(ColumnDef::new(Ngos::Description).text())
                    .col(ColumnDef::new(Ngos::Mission).text())
                    .col(ColumnDef::new(Ngos::AdminId).integer())
                    .col(
                        ColumnDef::new(Ngos::IsVerified)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ngos::IsActive)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Ngos::EstablishedDate).date())
                    .col(ColumnDef::new(Ngos::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Ngos::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ngos_admin")
                            .from(Ngos::Table, Ngos::AdminId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeniorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeniorProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeniorProfiles::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SeniorProfiles::BloodGroup).string())
                    .col(ColumnDef::new(SeniorProfiles::MedicalConditions).text())
                    .col(ColumnDef::new(SeniorProfiles::Allergies).text())
                    .col(ColumnDef::new(SeniorProfiles::CurrentMedications).text())
                    .col(ColumnDef::new(SeniorProfiles::EmergencyContactName).string())
                    .col(ColumnDef::new(SeniorProfiles::EmergencyContactPhone).string())
                    .col(ColumnDef::new(SeniorProfiles::EmergencyContactRelation).string())
                    .col(
                        ColumnDef::new(SeniorProfiles::LivingArrangement)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeniorProfiles::MobilityLevel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeniorProfiles::CareLevelNeeded)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SeniorProfiles::Notes).text())
                    .col(
                        ColumnDef::new(SeniorProfiles::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeniorProfiles::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_senior_profiles_user")
                            .from(SeniorProfiles::Table, SeniorProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CaretakerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CaretakerProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::YearsOfExperience)
                            .integer()
                            .default(0)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CaretakerProfiles::Certifications).text())
                    .col(ColumnDef::new(CaretakerProfiles::Specializations).text())
                    .col(
                        ColumnDef::new(CaretakerProfiles::IsAvailable)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::WorkingHours)
                            .string()
                            .default("full_time")
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::EmploymentType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::Rating)
                            .double()
                            .default(0.0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::TotalReviews)
                            .integer()
                            .default(0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::BackgroundCheckCompleted)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CaretakerProfiles::BackgroundCheckDate).date())
                    .col(ColumnDef::new(CaretakerProfiles::Notes).text())
                    .col(
                        ColumnDef::new(CaretakerProfiles::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaretakerProfiles::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_caretaker_profiles_user")
                            .from(CaretakerProfiles::Table, CaretakerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VolunteerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VolunteerProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::NgoId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::VolunteerCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(VolunteerProfiles::JoinDate).date().not_null())
                    .col(
                        ColumnDef::new(VolunteerProfiles::IsAvailable)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::AvailabilityHours)
                            .string()
                            .default("flexible")
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerProfiles::Skills).text())
                    .col(ColumnDef::new(VolunteerProfiles::Interests).text())
                    .col(
                        ColumnDef::new(VolunteerProfiles::TotalHours)
                            .double()
                            .default(0.0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::SeniorsHelped)
                            .integer()
                            .default(0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::TasksCompleted)
                            .integer()
                            .default(0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::Rating)
                            .double()
                            .default(0.0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::TotalReviews)
                            .integer()
                            .default(0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::BackgroundCheckCompleted)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerProfiles::BackgroundCheckDate).date())
                    .col(ColumnDef::new(VolunteerProfiles::Notes).text())
                    .col(
                        ColumnDef::new(VolunteerProfiles::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VolunteerProfiles::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_profiles_user")
                            .from(VolunteerProfiles::Table, VolunteerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_profiles_ngo")
                            .from(VolunteerProfiles::Table, VolunteerProfiles::NgoId)
                            .to(Ngos::Table, Ngos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_volunteer_profiles_ngo_id")
                    .table(VolunteerProfiles::Table)
                    .col(VolunteerProfiles::NgoId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VolunteerProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CaretakerProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SeniorProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ngos::Table).to_owned())
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
    Name,
    RegistrationNumber,
    Email,
    PhoneNumber,
    Address,
    City,
    State,
    ZipCode,
    Website,
    Description,
    Mission,
    AdminId,
    IsVerified,
    IsActive,
    EstablishedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SeniorProfiles {
    Table,
    Id,
    UserId,
    BloodGroup,
    MedicalConditions,
    Allergies,
    CurrentMedications,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelation,
    LivingArrangement,
    MobilityLevel,
    CareLevelNeeded,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CaretakerProfiles {
    Table,
    Id,
    UserId,
    YearsOfExperience,
    Certifications,
    Specializations,
    IsAvailable,
    WorkingHours,
    EmploymentType,
    Rating,
    TotalReviews,
    BackgroundCheckCompleted,
    BackgroundCheckDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VolunteerProfiles {
    Table,
    Id,
    UserId,
    NgoId,
    VolunteerCode,
    JoinDate,
    IsAvailable,
    AvailabilityHours,
    Skills,
    Interests,
    TotalHours,
    SeniorsHelped,
    TasksCompleted,
    Rating,
    TotalReviews,
    BackgroundCheckCompleted,
    BackgroundCheckDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

pub mod appointment;
pub mod auth_token;
pub mod care_assignment;
pub mod caretaker_profile;
pub mod emergency_alert;
pub mod event;
pub mod event_registration;
pub mod health_record;
pub mod medication;
pub mod medication_log;
pub mod ngo;
pub mod notification;
pub mod senior_profile;
pub mod user;
pub mod volunteer_profile;
pub mod volunteer_task;

pub use appointment::Entity as Appointment;
pub use auth_token::Entity as AuthToken;
pub use care_assignment::Entity as CareAssignment;
pub use caretaker_profile::Entity as CaretakerProfile;
pub use emergency_alert::Entity as EmergencyAlert;
pub use event::Entity as Event;
pub use event_registration::Entity as EventRegistration;
pub use health_record::Entity as HealthRecord;
pub use medication::Entity as Medication;
pub use medication_log::Entity as MedicationLog;
pub use ngo::Entity as Ngo;
pub use notification::Entity as Notification;
pub use senior_profile::Entity as SeniorProfile;
pub use user::Entity as User;
pub use volunteer_profile::Entity as VolunteerProfile;
pub use volunteer_task::Entity as VolunteerTask;

pub mod prelude;

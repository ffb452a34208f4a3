pub use super::appointment::Entity as Appointment;
pub use super::auth_token::Entity as AuthToken;
pub use super::care_assignment::Entity as CareAssignment;
pub use super::caretaker_profile::Entity as CaretakerProfile;
pub use super::emergency_alert::Entity as EmergencyAlert;
pub use super::event::Entity as Event;
pub use super::event_registration::Entity as EventRegistration;
pub use super::health_record::Entity as HealthRecord;
pub use super::medication::Entity as Medication;
pub use super::medication_log::Entity as MedicationLog;
pub use super::ngo::Entity as Ngo;
pub use super::notification::Entity as Notification;
pub use super::senior_profile::Entity as SeniorProfile;
pub use super::user::Entity as User;
pub use super::volunteer_profile::Entity as VolunteerProfile;
pub use super::volunteer_task::Entity as VolunteerTask;

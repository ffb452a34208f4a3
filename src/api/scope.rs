//! Per-role visibility scoping for role-sensitive resources.
//!
//! Every list and retrieve on these resources goes through one of these
//! builders, so a row outside the caller's scope is indistinguishable from a
//! missing row. Matches are exhaustive over `Role`; adding a role forces a
//! decision at every dispatch site.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::entities::{
    appointment, health_record, medication, notification, prelude::*, user::Role, volunteer_task,
};

use super::middleware::CurrentUser;

fn nothing<E: EntityTrait>(select: Select<E>) -> Select<E> {
    select.filter(Expr::value(false))
}

pub fn appointments(caller: CurrentUser) -> Select<Appointment> {
    let select = Appointment::find();
    match caller.role {
        Role::Senior => select.filter(appointment::Column::SeniorId.eq(caller.id)),
        Role::Caretaker => select.filter(appointment::Column::CaretakerId.eq(caller.id)),
        Role::Volunteer => nothing(select),
        Role::SeniorAdmin | Role::NgoAdmin => select,
    }
}

pub fn medications(caller: CurrentUser) -> Select<Medication> {
    let select = Medication::find();
    match caller.role {
        Role::Senior => select.filter(medication::Column::SeniorId.eq(caller.id)),
        Role::Caretaker | Role::Volunteer => nothing(select),
        Role::SeniorAdmin | Role::NgoAdmin => select,
    }
}

pub fn tasks(caller: CurrentUser) -> Select<VolunteerTask> {
    let select = VolunteerTask::find();
    match caller.role {
        Role::Senior => select.filter(volunteer_task::Column::SeniorId.eq(caller.id)),
        Role::Volunteer => select.filter(volunteer_task::Column::VolunteerId.eq(caller.id)),
        Role::Caretaker => nothing(select),
        Role::SeniorAdmin | Role::NgoAdmin => select,
    }
}

pub fn health_records(caller: CurrentUser) -> Select<HealthRecord> {
    let select = HealthRecord::find();
    match caller.role {
        Role::Senior => select.filter(health_record::Column::SeniorId.eq(caller.id)),
        Role::Caretaker | Role::Volunteer => nothing(select),
        Role::SeniorAdmin | Role::NgoAdmin => select,
    }
}

/// Notifications are private to their addressee for every role, admins
/// included.
pub fn notifications(caller: CurrentUser) -> Select<Notification> {
    Notification::find().filter(notification::Column::UserId.eq(caller.id))
}

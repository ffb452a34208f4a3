use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{
    appointment, emergency_alert, event, medication, ngo, user, volunteer_profile, volunteer_task,
};

/// Seeds the business gauges from current row counts so the first scrape
/// after a restart reflects the database, not zero. Counters and the alert
/// response-time histogram are driven from the handlers.
pub async fn init_metrics(db: &DatabaseConnection) {
    let user_count = user::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("seniorcare_users_total").set(user_count as f64);

    let ngo_count = ngo::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("seniorcare_ngos_total").set(ngo_count as f64);

    let appointment_count = appointment::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("seniorcare_appointments_total").set(appointment_count as f64);

    let medication_count = medication::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("seniorcare_medications_total").set(medication_count as f64);

    let task_count = volunteer_task::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("seniorcare_tasks_total").set(task_count as f64);

    let event_count = event::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("seniorcare_events_total").set(event_count as f64);

    let active_alerts = emergency_alert::Entity::find()
        .filter(emergency_alert::Column::IsResolved.eq(false))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("seniorcare_active_alerts").set(active_alerts as f64);

    // Per-NGO volunteer headcount. NGO cardinality is small; a loop is fine.
    let ngos = ngo::Entity::find().all(db).await.unwrap_or_default();
    for n in ngos {
        let count = volunteer_profile::Entity::find()
            .filter(volunteer_profile::Column::NgoId.eq(n.id))
            .count(db)
            .await
            .unwrap_or(0);
        metrics::gauge!("seniorcare_ngo_volunteers_total", "ngo" => n.name).set(count as f64);
    }

    tracing::info!(
        "Initialized metrics: users={}, ngos={}, appointments={}, medications={}, tasks={}, events={}, active_alerts={}",
        user_count,
        ngo_count,
        appointment_count,
        medication_count,
        task_count,
        event_count,
        active_alerts
    );
}

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::db::DbPool;
use crate::handlers::{classes, health, invoices, members, rooms, sessions, trainers};

#[allow(clippy::too_many_arguments)]
pub fn create_router(
    pool: DbPool,
    members_state: members::MembersState,
    trainers_state: trainers::TrainersState,
    rooms_state: rooms::RoomsState,
    classes_state: classes::ClassesState,
    sessions_state: sessions::SessionsState,
    invoices_state: invoices::InvoicesState,
) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .with_state(pool)
        // Members
        .route("/members", post(members::create).get(members::search))
        .route(
            "/members/{id}",
            get(members::show)
                .put(members::update)
                .delete(members::delete),
        )
        .route("/members/{id}/dashboard", get(members::dashboard))
        .route("/members/{id}/dashboard.txt", get(members::dashboard_text))
        .route("/members/{id}/goals", post(members::add_goal))
        .route("/members/{id}/metrics", post(members::add_metric))
        .route("/members/{id}/registrations", post(members::register))
        .route("/members/{id}/invoices", get(members::invoices))
        .with_state(members_state)
        // Trainers
        .route("/trainers", post(trainers::create))
        .route("/trainers/{id}", get(trainers::show))
        .route(
            "/trainers/{id}/availability",
            post(trainers::add_availability),
        )
        .route("/trainers/{id}/schedule", get(trainers::schedule))
        .with_state(trainers_state)
        // Rooms
        .route("/rooms", post(rooms::create))
        .route("/rooms/{id}", get(rooms::show))
        .with_state(rooms_state)
        // Classes
        .route("/classes", post(classes::create))
        .route("/classes/{id}", get(classes::show).put(classes::update))
        .with_state(classes_state)
        // Personal training sessions
        .route("/sessions", post(sessions::create))
        .route("/sessions/{id}", put(sessions::reschedule))
        .route("/sessions/{id}/status", put(sessions::update_status))
        .with_state(sessions_state)
        // Invoices
        .route("/invoices", post(invoices::create))
        .route("/invoices/{id}/status", put(invoices::update_status))
        .with_state(invoices_state)
}

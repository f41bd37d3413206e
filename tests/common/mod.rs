#![allow(dead_code)]

use axum::{body::Body, Router};
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fitclub::db::{create_memory_pool, DbPool};
use fitclub::migrations::run_migrations_for_tests;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    use fitclub::handlers::{classes, invoices, members, rooms, sessions, trainers};
    use fitclub::repositories::{
        ClassRepository, DashboardRepository, InvoiceRepository, MemberRepository,
        ProgressRepository, RoomRepository, SessionRepository, TrainerRepository,
    };

    let class_repo = ClassRepository::new(pool.clone());
    let invoice_repo = InvoiceRepository::new(pool.clone());

    let members_state = members::MembersState {
        member_repo: MemberRepository::new(pool.clone()),
        dashboard_repo: DashboardRepository::new(pool.clone()),
        progress_repo: ProgressRepository::new(pool.clone()),
        class_repo: class_repo.clone(),
        invoice_repo: invoice_repo.clone(),
    };
    let trainers_state = trainers::TrainersState {
        trainer_repo: TrainerRepository::new(pool.clone()),
    };
    let rooms_state = rooms::RoomsState {
        room_repo: RoomRepository::new(pool.clone()),
    };
    let classes_state = classes::ClassesState { class_repo };
    let sessions_state = sessions::SessionsState {
        session_repo: SessionRepository::new(pool.clone()),
    };
    let invoices_state = invoices::InvoicesState { invoice_repo };

    fitclub::routes::create_router(
        pool,
        members_state,
        trainers_state,
        rooms_state,
        classes_state,
        sessions_state,
        invoices_state,
    )
}

/// Send a request with an optional JSON body and return the status and the
/// raw response body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Like [`send`], parsing the response body as JSON.
pub async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body).await;
    let json = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, json)
}

// Test data creation helpers
pub async fn create_member(app: &Router, name: &str, email: &str) -> i64 {
    let (status, body) = send_json(
        app,
        "POST",
        "/members",
        Some(serde_json::json!({ "full_name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

pub async fn create_trainer(app: &Router, name: &str, email: &str) -> i64 {
    let (status, body) = send_json(
        app,
        "POST",
        "/trainers",
        Some(serde_json::json!({ "full_name": name, "email": email, "specialty": "Strength" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

pub async fn create_room(app: &Router, name: &str, capacity: i64) -> i64 {
    let (status, body) = send_json(
        app,
        "POST",
        "/rooms",
        Some(serde_json::json!({ "name": name, "capacity": capacity })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Result;
use crate::models::{CreatePtSession, ReschedulePtSession, UpdateSessionStatus};
use crate::repositories::SessionRepository;

#[derive(Clone)]
pub struct SessionsState {
    pub session_repo: SessionRepository,
}

pub async fn create(
    State(state): State<SessionsState>,
    Json(input): Json<CreatePtSession>,
) -> Result<Response> {
    let session = state.session_repo.schedule(input).await?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

pub async fn reschedule(
    State(state): State<SessionsState>,
    Path(id): Path<i64>,
    Json(input): Json<ReschedulePtSession>,
) -> Result<Response> {
    let session = state.session_repo.reschedule(id, input).await?;
    Ok(Json(session).into_response())
}

pub async fn update_status(
    State(state): State<SessionsState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateSessionStatus>,
) -> Result<Response> {
    let session = state.session_repo.set_status(id, input.status).await?;
    Ok(Json(session).into_response())
}

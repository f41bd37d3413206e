use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::CreateRoom;
use crate::repositories::RoomRepository;

#[derive(Clone)]
pub struct RoomsState {
    pub room_repo: RoomRepository,
}

pub async fn create(
    State(state): State<RoomsState>,
    Json(input): Json<CreateRoom>,
) -> Result<Response> {
    let room = state.room_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(room)).into_response())
}

pub async fn show(State(state): State<RoomsState>, Path(id): Path<i64>) -> Result<Response> {
    let room = state
        .room_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Room"))?;
    Ok(Json(room).into_response())
}

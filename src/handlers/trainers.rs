use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{CreateAvailability, CreateTrainer};
use crate::repositories::TrainerRepository;

use super::local_now;

#[derive(Clone)]
pub struct TrainersState {
    pub trainer_repo: TrainerRepository,
}

pub async fn create(
    State(state): State<TrainersState>,
    Json(input): Json<CreateTrainer>,
) -> Result<Response> {
    let trainer = state.trainer_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(trainer)).into_response())
}

pub async fn show(State(state): State<TrainersState>, Path(id): Path<i64>) -> Result<Response> {
    let trainer = state
        .trainer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Trainer"))?;
    Ok(Json(trainer).into_response())
}

pub async fn add_availability(
    State(state): State<TrainersState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateAvailability>,
) -> Result<Response> {
    let slot = state.trainer_repo.add_availability(id, input).await?;
    Ok((StatusCode::CREATED, Json(slot)).into_response())
}

/// Upcoming sessions and classes from the current time on.
pub async fn schedule(
    State(state): State<TrainersState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let schedule = state.trainer_repo.schedule(id, local_now()).await?;
    Ok(Json(schedule).into_response())
}

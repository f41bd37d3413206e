use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::ClassRequest;
use crate::repositories::ClassRepository;

#[derive(Clone)]
pub struct ClassesState {
    pub class_repo: ClassRepository,
}

pub async fn create(
    State(state): State<ClassesState>,
    Json(input): Json<ClassRequest>,
) -> Result<Response> {
    let class = state.class_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(class)).into_response())
}

pub async fn show(State(state): State<ClassesState>, Path(id): Path<i64>) -> Result<Response> {
    let class = state
        .class_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Class"))?;
    Ok(Json(class).into_response())
}

pub async fn update(
    State(state): State<ClassesState>,
    Path(id): Path<i64>,
    Json(input): Json<ClassRequest>,
) -> Result<Response> {
    let class = state.class_repo.update(id, input).await?;
    Ok(Json(class).into_response())
}

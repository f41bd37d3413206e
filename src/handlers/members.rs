use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{
    CreateGoal, CreateHealthMetric, CreateMember, CreateRegistration, MemberDashboard,
    UpdateMember,
};
use crate::repositories::{
    ClassRepository, DashboardRepository, InvoiceRepository, MemberRepository, ProgressRepository,
};

use super::local_now;

#[derive(Clone)]
pub struct MembersState {
    pub member_repo: MemberRepository,
    pub dashboard_repo: DashboardRepository,
    pub progress_repo: ProgressRepository,
    pub class_repo: ClassRepository,
    pub invoice_repo: InvoiceRepository,
}

#[derive(Template)]
#[template(path = "members/dashboard.txt")]
struct DashboardTextTemplate {
    full_name: String,
    email: String,
    phone: String,
    goal: String,
    metric: String,
}

impl From<&MemberDashboard> for DashboardTextTemplate {
    fn from(dashboard: &MemberDashboard) -> Self {
        Self {
            full_name: dashboard.full_name.clone(),
            email: dashboard.email.clone(),
            phone: dashboard.phone.clone().unwrap_or_else(|| "N/A".to_string()),
            goal: dashboard.goal_description(),
            metric: dashboard.metric_description(),
        }
    }
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

pub async fn create(
    State(state): State<MembersState>,
    Json(input): Json<CreateMember>,
) -> Result<Response> {
    let member = state.member_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(member)).into_response())
}

pub async fn search(
    State(state): State<MembersState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let members = state.dashboard_repo.search_members(&query.q).await?;
    Ok(Json(members).into_response())
}

pub async fn show(State(state): State<MembersState>, Path(id): Path<i64>) -> Result<Response> {
    let member = state
        .member_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Member"))?;
    Ok(Json(member).into_response())
}

pub async fn update(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
    Json(changes): Json<UpdateMember>,
) -> Result<Response> {
    let member = state.member_repo.update_profile(id, changes).await?;
    Ok(Json(member).into_response())
}

pub async fn delete(State(state): State<MembersState>, Path(id): Path<i64>) -> Result<Response> {
    if !state.member_repo.delete(id).await? {
        return Err(AppError::not_found("Member"));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn dashboard(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let dashboard = load_dashboard(&state, id).await?;
    Ok(Json(dashboard).into_response())
}

/// Plain-text rendering of the dashboard for terminals.
pub async fn dashboard_text(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let dashboard = load_dashboard(&state, id).await?;
    let body = DashboardTextTemplate::from(&dashboard)
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}

pub async fn add_goal(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateGoal>,
) -> Result<Response> {
    let goal = state.progress_repo.set_active_goal(id, input).await?;
    Ok((StatusCode::CREATED, Json(goal)).into_response())
}

pub async fn add_metric(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateHealthMetric>,
) -> Result<Response> {
    let metric = state
        .progress_repo
        .record_metric(id, input, local_now())
        .await?;
    Ok((StatusCode::CREATED, Json(metric)).into_response())
}

pub async fn register(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateRegistration>,
) -> Result<Response> {
    let registration = state
        .class_repo
        .register(id, input.class_id, local_now())
        .await?;
    Ok((StatusCode::CREATED, Json(registration)).into_response())
}

pub async fn invoices(
    State(state): State<MembersState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    if state.member_repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("Member"));
    }
    let invoices = state.invoice_repo.find_by_member(id).await?;
    Ok(Json(invoices).into_response())
}

async fn load_dashboard(state: &MembersState, id: i64) -> Result<MemberDashboard> {
    state
        .dashboard_repo
        .member_dashboard(id)
        .await?
        .ok_or_else(|| AppError::not_found("Member"))
}

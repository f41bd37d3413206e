use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Result;
use crate::models::{CreateInvoice, UpdateInvoiceStatus};
use crate::repositories::InvoiceRepository;

use super::local_now;

#[derive(Clone)]
pub struct InvoicesState {
    pub invoice_repo: InvoiceRepository,
}

pub async fn create(
    State(state): State<InvoicesState>,
    Json(input): Json<CreateInvoice>,
) -> Result<Response> {
    let invoice = state.invoice_repo.create(input, local_now()).await?;
    Ok((StatusCode::CREATED, Json(invoice)).into_response())
}

pub async fn update_status(
    State(state): State<InvoicesState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateInvoiceStatus>,
) -> Result<Response> {
    let invoice = state
        .invoice_repo
        .set_status(id, input.status, local_now())
        .await?;
    Ok(Json(invoice).into_response())
}

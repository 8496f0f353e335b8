//! Axum route handlers for the record API.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::matching::engine::RankedMatch;
use crate::models::records::{Company, CompanyForm, Worker, WorkerForm};
use crate::records::store::Submission;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CompanyCreatedResponse {
    pub row: usize,
    pub company: Company,
}

#[derive(Debug, Serialize)]
pub struct WorkerCreatedResponse {
    pub row: usize,
    pub worker: Worker,
    /// Best postings for the new resume. Empty when no company is stored.
    pub matches: Vec<RankedMatch>,
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, AppError> {
    Ok(Json(state.store.companies().await?))
}

/// POST /api/v1/companies
pub async fn handle_add_company(
    State(state): State<AppState>,
    Json(form): Json<CompanyForm>,
) -> Result<(StatusCode, Json<CompanyCreatedResponse>), AppError> {
    match state.store.append_company(&form).await? {
        Submission::Stored { row, record } => Ok((
            StatusCode::CREATED,
            Json(CompanyCreatedResponse {
                row,
                company: record,
            }),
        )),
        Submission::Rejected(report) => Err(AppError::Validation(report.message())),
    }
}

/// GET /api/v1/workers
pub async fn handle_list_workers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Worker>>, AppError> {
    Ok(Json(state.store.workers().await?))
}

/// POST /api/v1/workers
///
/// Stores the worker, then ranks every stored posting against the new resume.
pub async fn handle_add_worker(
    State(state): State<AppState>,
    Json(form): Json<WorkerForm>,
) -> Result<(StatusCode, Json<WorkerCreatedResponse>), AppError> {
    let (row, worker) = match state.store.append_worker(&form).await? {
        Submission::Stored { row, record } => (row, record),
        Submission::Rejected(report) => return Err(AppError::Validation(report.message())),
    };

    let companies = state.store.companies().await?;
    let matches = state.engine.rank(&worker.resume, &companies);

    Ok((
        StatusCode::CREATED,
        Json(WorkerCreatedResponse {
            row,
            worker,
            matches,
        }),
    ))
}

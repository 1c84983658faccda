//! Handlers for the `/scans` resource: submit, status, results.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use scanlab_core::error::CoreError;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field name carrying uploaded scan files.
pub const FILES_FIELD: &str = "files";

/// Query parameters shared by status and results.
///
/// `scanId` is accepted as an alias for older clients.
#[derive(Debug, Deserialize)]
pub struct JobIdQuery {
    #[serde(alias = "scanId")]
    pub job_id: Option<String>,
}

impl JobIdQuery {
    /// The trimmed job id. A malformed query string is a bad request; an
    /// absent or blank id is `MissingParameter`.
    fn require(query: Result<Query<Self>, QueryRejection>) -> AppResult<String> {
        let Query(query) = query?;
        let id = query
            .job_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(CoreError::MissingParameter("job_id"))?;
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/scans
///
/// Accept a multipart upload of one or more `files` parts and start a scan
/// job. File content is drained and discarded. Returns 201 with the job id.
pub async fn submit_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file_names = Vec::new();
    let mut total_bytes: usize = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("unnamed").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        total_bytes += data.len();
        file_names.push(name);
    }

    let file_count = file_names.len();
    let receipt = state.jobs.submit(file_names).await?;

    tracing::debug!(
        job_id = %receipt.job_id,
        file_count,
        total_bytes,
        "Scan upload received",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/scans/status?job_id=
///
/// Current stage, progress and ETA. 400 when `job_id` is missing, 404 when
/// it is unknown.
pub async fn get_status(
    State(state): State<AppState>,
    query: Result<Query<JobIdQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let job_id = JobIdQuery::require(query)?;
    let report = state.jobs.status(&job_id).await?;
    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// GET /api/v1/scans/results?job_id=
///
/// Diagnostic payload of a completed job. 409 while still processing, 422
/// if the job failed.
pub async fn get_results(
    State(state): State<AppState>,
    query: Result<Query<JobIdQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let job_id = JobIdQuery::require(query)?;
    let result = state.jobs.results(&job_id).await?;
    Ok(Json(DataResponse { data: result }))
}

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    auth::AdminGuard,
    error::{AppError, AppResult},
    input::JsonBody,
    models::{Job, JobChanges, NewJob},
    state::AppState,
};

/// Public view of a job posting; `created_at` is the posting date only, taken
/// in UTC rather than the database session's time zone.
#[derive(Serialize)]
pub struct JobSummary {
    pub id: i32,
    pub title: Option<String>,
    pub client: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Job> for JobSummary {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            title: job.title,
            client: job.client,
            description: job.description,
            created_at: job.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<JobSummary>>> {
    let jobs = state.store().list_jobs().await?;
    Ok(Json(jobs.into_iter().map(JobSummary::from).collect()))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> AppResult<Json<JobSummary>> {
    let job = state
        .store()
        .find_job(job_id)
        .await?
        .ok_or_else(AppError::not_found)?;
    Ok(Json(JobSummary::from(job)))
}

pub async fn create_job(
    _admin: AdminGuard,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewJob>,
) -> AppResult<Json<Job>> {
    let job = state.store().create_job(payload).await?;
    info!(job_id = job.id, "created job");
    Ok(Json(job))
}

/// Overwrites title, client and description. Answers `null` when the job does not exist.
pub async fn update_job(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
    JsonBody(changes): JsonBody<JobChanges>,
) -> AppResult<Json<Option<Job>>> {
    let updated = state.store().update_job(job_id, changes).await?;
    info!(job_id, found = updated.is_some(), "updated job");
    Ok(Json(updated))
}

pub async fn delete_job(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> AppResult<Json<Value>> {
    let deleted = state.store().delete_job(job_id).await?;
    debug!(job_id, deleted, "deleted job");
    Ok(Json(json!({ "ok": true })))
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AdminGuard,
    error::AppResult,
    input::JsonBody,
    models::{Candidate, CandidateReview, NewCandidate},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CandidateFilter {
    pub job_id: Option<i32>,
}

pub async fn list_candidates(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> AppResult<Json<Vec<Candidate>>> {
    // No job id matches no rows.
    let Some(job_id) = filter.job_id else {
        return Ok(Json(Vec::new()));
    };
    let candidates = state.store().list_candidates(job_id).await?;
    Ok(Json(candidates))
}

pub async fn submit_application(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewCandidate>,
) -> AppResult<Json<Candidate>> {
    let candidate = state.store().create_candidate(payload).await?;
    info!(
        candidate_id = candidate.id,
        job_id = ?candidate.job_id,
        "received application"
    );
    Ok(Json(candidate))
}

pub async fn review_candidate(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(candidate_id): Path<i32>,
    JsonBody(review): JsonBody<CandidateReview>,
) -> AppResult<Json<Option<Candidate>>> {
    let updated = state.store().review_candidate(candidate_id, review).await?;
    info!(candidate_id, found = updated.is_some(), "reviewed candidate");
    Ok(Json(updated))
}

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::AssignmentWithClient,
    pdf::payslip_document,
    state::AppState,
};

use super::pdf_response;

const SHIFT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Serialize)]
pub struct PayrollSummary {
    pub id: i32,
    pub month: String,
}

/// Shift row with `start`/`end` as "YYYY-MM-DD HH:MM" in UTC. Times are not
/// shifted into the database session's time zone.
#[derive(Serialize)]
pub struct ShiftSummary {
    pub id: i32,
    pub start: String,
    pub end: String,
    pub client: Option<String>,
    pub place: Option<String>,
}

impl From<AssignmentWithClient> for ShiftSummary {
    fn from(row: AssignmentWithClient) -> Self {
        Self {
            id: row.assignment.id,
            start: row.assignment.start_ts.format(SHIFT_TIME_FORMAT).to_string(),
            end: row.assignment.end_ts.format(SHIFT_TIME_FORMAT).to_string(),
            client: row.client,
            place: row.assignment.place,
        }
    }
}

pub async fn list_payrolls(State(state): State<AppState>) -> AppResult<Json<Vec<PayrollSummary>>> {
    let rows = state.store().list_payrolls().await?;
    Ok(Json(
        rows.into_iter()
            .map(|payroll| PayrollSummary {
                id: payroll.id,
                month: payroll.month,
            })
            .collect(),
    ))
}

pub async fn list_shifts(State(state): State<AppState>) -> AppResult<Json<Vec<ShiftSummary>>> {
    let rows = state.store().list_shifts().await?;
    Ok(Json(rows.into_iter().map(ShiftSummary::from).collect()))
}

pub async fn payslip_pdf(
    State(state): State<AppState>,
    Path(payroll_id): Path<i32>,
) -> AppResult<Response> {
    let row = state
        .store()
        .find_payroll(payroll_id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let document = payslip_document(&state.config.company, &row, Utc::now());
    pdf_response(&state, document, format!("lonespecifikation-{payroll_id}.pdf")).await
}

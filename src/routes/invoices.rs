use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::InvoiceWithClient,
    pdf::invoice_document,
    state::AppState,
};

use super::pdf_response;

#[derive(Serialize)]
pub struct InvoiceSummary {
    pub id: i32,
    pub client: String,
    pub date: String,
    pub amount: Option<BigDecimal>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<InvoiceWithClient> for InvoiceSummary {
    fn from(row: InvoiceWithClient) -> Self {
        Self {
            id: row.invoice.id,
            client: row.client.unwrap_or_else(|| "-".to_string()),
            date: row.invoice.date.format("%Y-%m-%d").to_string(),
            amount: row.invoice.amount,
            kind: row.invoice.kind,
        }
    }
}

pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Json<Vec<InvoiceSummary>>> {
    let rows = state.store().list_invoices().await?;
    Ok(Json(rows.into_iter().map(InvoiceSummary::from).collect()))
}

pub async fn invoice_pdf(
    State(state): State<AppState>,
    Path(invoice_id): Path<i32>,
) -> AppResult<Response> {
    let row = state
        .store()
        .find_invoice(invoice_id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let document = invoice_document(&state.config.company, &row, Utc::now());
    pdf_response(&state, document, format!("faktura-{invoice_id}.pdf")).await
}

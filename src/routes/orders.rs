use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

use crate::{
    error::AppResult,
    input::{sql_text, JsonBody},
    models::{Invoice, NewInvoice, INVOICE_KIND_RECRUITMENT, INVOICE_KIND_STAFFING},
    state::AppState,
};

pub const UNKNOWN_CLIENT: &str = "Okänd kund";

/// Turns an order into an invoice draft. The whole request body is kept as
/// the invoice payload, and `price_incl_vat` is stored exactly as sent.
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> AppResult<Json<Invoice>> {
    let client_name = order_client_name(&payload);
    let client = state.store().resolve_client(client_name).await?;

    let new_invoice = NewInvoice {
        client_id: Some(client.id),
        amount: payload.get("price_incl_vat").and_then(sql_text),
        kind: invoice_kind(payload.get("orderType").and_then(Value::as_str)).to_string(),
        payload: Some(payload),
    };
    let invoice = state.store().create_invoice(new_invoice).await?;

    info!(
        invoice_id = invoice.id,
        client_id = client.id,
        kind = %invoice.kind,
        "created invoice from order"
    );
    Ok(Json(invoice))
}

fn order_client_name(payload: &Value) -> String {
    payload
        .get("client")
        .and_then(sql_text)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

pub(crate) fn invoice_kind(order_type: Option<&str>) -> &'static str {
    match order_type {
        Some("bemanning") => INVOICE_KIND_STAFFING,
        _ => INVOICE_KIND_RECRUITMENT,
    }
}

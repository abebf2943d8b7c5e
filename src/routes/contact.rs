use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};

/// Contact form stub: accepts any body and stores nothing.
pub async fn submit_contact(body: Bytes) -> Json<Value> {
    tracing::info!(bytes = body.len(), "received contact request");
    Json(json!({ "ok": true }))
}

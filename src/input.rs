//! Request body handling.
//!
//! Bodies are read permissively: a request without a JSON content type counts
//! as an empty object, and scalar fields reach the database as the client
//! wrote them. Whatever PostgreSQL would refuse surfaces as a store failure.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// JSON request body. Malformed JSON is a bare 400; a missing or non-JSON
/// content type yields `{}`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let value = if is_json {
            parse_body(&bytes).map_err(IntoResponse::into_response)?
        } else {
            Value::Object(Map::new())
        };

        serde_json::from_value(value).map(JsonBody).map_err(|err| {
            AppError::internal(format!("unusable request body: {err}")).into_response()
        })
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Only objects and arrays are accepted at the top level; an empty body is `{}`.
fn parse_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => {
            tracing::debug!("rejected non-object JSON body");
            Err(AppError::bare(StatusCode::BAD_REQUEST))
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected malformed JSON body");
            Err(AppError::bare(StatusCode::BAD_REQUEST))
        }
    }
}

/// Text a query parameter would carry for this JSON value. `None` for null.
pub fn sql_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Text column: strings as given, other scalars in their JSON spelling.
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(sql_text))
}

/// Integer column: a JSON integer or a string holding one, as PostgreSQL
/// coerces `'4'` into an `integer`.
pub fn loose_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match &value {
        Value::Null => return Ok(None),
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid input for type integer: {value}")))
}

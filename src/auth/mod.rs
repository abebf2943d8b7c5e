use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, HeaderValue},
};
use axum_extra::headers::{self, Header};
use axum_extra::TypedHeader;

use crate::{error::AppError, state::AppState};

pub static ADMIN_KEY_HEADER: HeaderName = HeaderName::from_static("x-admin-key");

/// Raw value of the `x-admin-key` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminKey(pub String);

impl Header for AdminKey {
    fn name() -> &'static HeaderName {
        &ADMIN_KEY_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let key = value.to_str().map_err(|_| headers::Error::invalid())?;
        Ok(AdminKey(key.to_owned()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(value));
        }
    }
}

/// An unset secret never matches, so admin routes stay closed until one is configured.
pub fn admin_key_matches(configured: &str, presented: Option<&str>) -> bool {
    !configured.is_empty() && presented == Some(configured)
}

/// Proof that the request carried the admin secret. Taking it as the first
/// handler argument rejects the request before its body is read.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = TypedHeader::<AdminKey>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(AdminKey(key))| key);

        if admin_key_matches(&state.config.admin_api_key, presented.as_deref()) {
            Ok(AdminGuard)
        } else {
            tracing::debug!(
                path = %parts.uri.path(),
                header_present = presented.is_some(),
                "rejected admin request"
            );
            Err(AppError::unauthorized())
        }
    }
}

//! Shared-secret guard for the CMS webhooks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::secrets_match;
use crate::error::AppError;
use crate::state::AppState;

pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

/// Proof that the caller knows `REVALIDATE_SECRET`. Always granted when no
/// secret is configured.
#[derive(Debug, Clone, Copy)]
pub struct RevalidateSecret;

impl FromRequestParts<AppState> for RevalidateSecret {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.revalidate_secret.as_deref() else {
            return Ok(RevalidateSecret);
        };

        let provided = parts
            .headers
            .get(REVALIDATE_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing revalidate secret".into()))?;

        if !secrets_match(expected, provided) {
            tracing::warn!("Rejected webhook call with wrong revalidate secret");
            return Err(AppError::Unauthorized("Invalid revalidate secret".into()));
        }
        Ok(RevalidateSecret)
    }
}

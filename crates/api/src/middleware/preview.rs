//! Draft preview extractor.

use atrium_db::Visibility;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::secrets_match;
use crate::error::AppError;
use crate::state::AppState;

pub const PREVIEW_HEADER: &str = "x-preview-token";

/// Content visibility for this request.
///
/// Without the `x-preview-token` header the request sees published content
/// only. With it, the token must equal the configured `PREVIEW_TOKEN`;
/// a wrong token, or any token while preview is disabled, is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview(pub Visibility);

impl Preview {
    pub fn visibility(self) -> Visibility {
        self.0
    }

    pub fn is_active(self) -> bool {
        self.0.is_preview()
    }
}

impl FromRequestParts<AppState> for Preview {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(PREVIEW_HEADER) else {
            return Ok(Preview(Visibility::Published));
        };
        let token = header
            .to_str()
            .map_err(|_| AppError::BadRequest("Malformed preview token".into()))?;

        match state.config.preview_token.as_deref() {
            Some(expected) if secrets_match(expected, token) => {
                tracing::debug!("Preview mode enabled for request");
                Ok(Preview(Visibility::IncludeDrafts))
            }
            Some(_) => Err(AppError::Unauthorized("Invalid preview token".into())),
            None => Err(AppError::Unauthorized("Preview is disabled".into())),
        }
    }
}

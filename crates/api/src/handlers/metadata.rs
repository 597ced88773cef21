//! Handlers for document metadata.

use atrium_core::route::split_path;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::content::RequestScope;
use crate::error::AppResult;
use crate::middleware::preview::Preview;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/metadata/{lang}
pub async fn home_metadata(
    preview: Preview,
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> AppResult<impl IntoResponse> {
    let scope = RequestScope::new(preview.visibility());
    let metadata = state
        .resolver
        .generate_metadata(&language, &[], &scope)
        .await;

    Ok(Json(DataResponse { data: metadata }))
}

/// GET /api/v1/metadata/{lang}/{*path}
///
/// Title, description, canonical path and per-language alternates. Falls
/// back to the default language's document when the path has no content in
/// the requested one.
pub async fn path_metadata(
    preview: Preview,
    State(state): State<AppState>,
    Path((language, path)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let scope = RequestScope::new(preview.visibility());
    let metadata = state
        .resolver
        .generate_metadata(&language, &split_path(&path), &scope)
        .await;

    Ok(Json(DataResponse { data: metadata }))
}

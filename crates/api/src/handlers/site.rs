//! Handlers for the public site routes.
//!
//! Every page request is resolved through the [`Resolver`](crate::resolver::Resolver)
//! with a fresh [`RequestScope`]. Published responses that resolved cleanly
//! are kept in the render cache, tagged with the documents they show, until
//! revalidation drops them.

use atrium_core::paths::localized_path;
use atrium_core::route::split_path;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use crate::content::RequestScope;
use crate::error::{AppError, AppResult};
use crate::middleware::preview::Preview;
use crate::render_cache::CachedRender;
use crate::resolver::Resolution;
use crate::revalidation::document_tag;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response header reporting whether the render cache answered.
pub const RENDER_CACHE_HEADER: HeaderName = HeaderName::from_static("x-render-cache");

/// GET /
///
/// Redirect to the home page of the default language.
pub async fn root_redirect(State(state): State<AppState>) -> Redirect {
    Redirect::permanent(&localized_path::<&str>(&state.site.default_language, &[]))
}

/// GET /{lang}
pub async fn render_home(
    preview: Preview,
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> AppResult<Response> {
    render(&state, &language, Vec::new(), preview).await
}

/// GET /{lang}/{*path}
pub async fn render_page(
    preview: Preview,
    State(state): State<AppState>,
    Path((language, path)): Path<(String, String)>,
) -> AppResult<Response> {
    render(&state, &language, split_path(&path), preview).await
}

async fn render(
    state: &AppState,
    language: &str,
    segments: Vec<String>,
    preview: Preview,
) -> AppResult<Response> {
    let cache_key = localized_path(language, &segments);
    if !preview.is_active() {
        if let Some(cached) = state.render_cache.get(&cache_key).await {
            tracing::debug!(path = %cache_key, "Render cache hit");
            return Ok(json_response(cached.status, cached.body, "hit"));
        }
    }

    let scope = RequestScope::new(preview.visibility());
    let resolution = state.resolver.resolve(language, &segments, &scope).await;
    let (status, input) = match resolution {
        Resolution::Redirect(location) => return Ok(Redirect::permanent(&location).into_response()),
        Resolution::Found(input) => (StatusCode::OK, input),
        Resolution::NotFound(input) => (StatusCode::NOT_FOUND, input),
        Resolution::Error(input) => (StatusCode::INTERNAL_SERVER_ERROR, input),
    };

    let body = serde_json::to_value(DataResponse { data: &input })
        .map_err(|e| AppError::InternalError(format!("Cannot serialize render input: {e}")))?;

    if !preview.is_active() && status != StatusCode::INTERNAL_SERVER_ERROR {
        let render = input
            .document_ids()
            .into_iter()
            .fold(CachedRender::new(status, body.clone()), |render, id| {
                render.tagged(document_tag(id))
            });
        state.render_cache.put(cache_key, render).await;
    }
    Ok(json_response(status, body, "miss"))
}

fn json_response(status: StatusCode, body: serde_json::Value, cache: &'static str) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(RENDER_CACHE_HEADER, HeaderValue::from_static(cache));
    response
}

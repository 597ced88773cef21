//! CMS webhooks that trigger revalidation after a write.
//!
//! Invalidation failures are logged by the hook and never fail the call; the
//! response reports which paths and tags were targeted.

use atrium_core::content::{Page, Post};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::revalidate::RevalidateSecret;
use crate::response::DataResponse;
use crate::revalidation::{PageChange, PostChange};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookOperation {
    Change,
    Delete,
}

/// Body of `POST /api/v1/hooks/pages`.
#[derive(Debug, Deserialize)]
pub struct PageHookRequest {
    pub operation: HookOperation,
    /// Language the write happened in; the default language when absent.
    #[serde(default)]
    pub locale: Option<String>,
    pub doc: Page,
    #[serde(default)]
    pub previous_doc: Option<Page>,
}

/// Body of `POST /api/v1/hooks/posts`.
#[derive(Debug, Deserialize)]
pub struct PostHookRequest {
    pub operation: HookOperation,
    pub doc: Post,
    #[serde(default)]
    pub previous_doc: Option<Post>,
}

/// POST /api/v1/hooks/pages
pub async fn page_hook(
    _secret: RevalidateSecret,
    State(state): State<AppState>,
    Json(input): Json<PageHookRequest>,
) -> AppResult<impl IntoResponse> {
    let locale = input
        .locale
        .unwrap_or_else(|| state.site.default_language.clone());
    if !state.site.is_supported(&locale) {
        return Err(AppError::BadRequest(format!("Unsupported locale '{locale}'")));
    }

    tracing::info!(
        page_id = %input.doc.id,
        locale = %locale,
        operation = ?input.operation,
        "Page webhook received"
    );
    let report = match input.operation {
        HookOperation::Change => {
            let change = PageChange {
                locale,
                doc: input.doc,
                previous_doc: input.previous_doc,
            };
            state.revalidation.after_page_change(&change).await
        }
        HookOperation::Delete => state.revalidation.after_page_delete(&locale, &input.doc).await,
    };

    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/hooks/posts
pub async fn post_hook(
    _secret: RevalidateSecret,
    State(state): State<AppState>,
    Json(input): Json<PostHookRequest>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(
        post_id = %input.doc.id,
        language = %input.doc.language,
        operation = ?input.operation,
        "Post webhook received"
    );
    let report = match input.operation {
        HookOperation::Change => {
            let change = PostChange {
                doc: input.doc,
                previous_doc: input.previous_doc,
            };
            state.revalidation.after_post_change(&change).await
        }
        HookOperation::Delete => state.revalidation.after_post_delete(&input.doc).await,
    };

    Ok(Json(DataResponse { data: report }))
}

//! Sitemap listing of every published page and post path.

use atrium_core::config::SiteConfig;
use atrium_core::content::{Page, Post, Relation};
use atrium_core::page_tree::PageArena;
use atrium_core::paths::{page_path, post_path};
use atrium_core::types::Timestamp;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::render_cache::CachedRender;
use crate::response::DataResponse;
use crate::revalidation::{PAGES_SITEMAP_TAG, POSTS_SITEMAP_TAG};
use crate::state::AppState;

/// Render cache key of the sitemap listing.
pub const SITEMAP_CACHE_KEY: &str = "/api/v1/sitemap";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub path: String,
    pub updated_at: Option<Timestamp>,
}

/// Canonical paths of `pages` in every supported language they are
/// translated into, followed by `posts` in their own language.
pub fn sitemap_entries(site: &SiteConfig, pages: &[Page], posts: &[Post]) -> Vec<SitemapEntry> {
    let arena = PageArena::from_pages(pages);
    let mut entries = Vec::new();

    for page in pages {
        let parent_slug = arena.parent_slug(&page.id);
        for language in site.languages.iter().filter(|l| page.is_translated(l)) {
            entries.push(SitemapEntry {
                path: page_path(language, parent_slug, &page.slug),
                updated_at: page.updated_at,
            });
        }
    }

    for post in posts.iter().filter(|p| site.is_supported(&p.language)) {
        let page_slug = match &post.page {
            Some(Relation::Populated(page)) => Some(page.slug.as_str()),
            Some(Relation::Id(id)) => arena.get(id).map(|node| node.slug.as_str()),
            None => None,
        };
        entries.push(SitemapEntry {
            path: post_path(&post.language, page_slug, &post.slug),
            updated_at: post.updated_at.or(post.published_at),
        });
    }

    entries
}

/// GET /api/v1/sitemap
///
/// Cached under both sitemap tags, so any page or post revalidation
/// refreshes it.
pub async fn sitemap(State(state): State<AppState>) -> AppResult<Response> {
    if let Some(cached) = state.render_cache.get(SITEMAP_CACHE_KEY).await {
        return Ok((cached.status, Json(cached.body)).into_response());
    }

    let (pages, posts) = state.resolver.fetcher().list_published().await?;
    let entries = sitemap_entries(&state.site, &pages, &posts);
    tracing::debug!(entries = entries.len(), "Built sitemap");

    let body = serde_json::to_value(DataResponse { data: entries })
        .map_err(|e| AppError::InternalError(format!("Cannot serialize sitemap: {e}")))?;
    let render = CachedRender::new(StatusCode::OK, body.clone())
        .tagged(PAGES_SITEMAP_TAG)
        .tagged(POSTS_SITEMAP_TAG);
    state.render_cache.put(SITEMAP_CACHE_KEY, render).await;

    Ok((StatusCode::OK, Json(body)).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

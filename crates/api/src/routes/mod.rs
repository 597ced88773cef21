pub mod health;
pub mod site;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /metadata/{lang}                 metadata for the home page
/// /metadata/{lang}/{*path}         metadata for any other page
///
/// /sitemap                         published page and post paths
///
/// /hooks/pages                     page change / delete webhook (POST)
/// /hooks/posts                     post change / delete webhook (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Metadata.
        .route("/metadata/{lang}", get(handlers::metadata::home_metadata))
        .route(
            "/metadata/{lang}/{*path}",
            get(handlers::metadata::path_metadata),
        )
        // Sitemap.
        .route("/sitemap", get(handlers::sitemap::sitemap))
        // Revalidation webhooks.
        .route("/hooks/pages", post(handlers::hooks::page_hook))
        .route("/hooks/posts", post(handlers::hooks::post_hook))
}

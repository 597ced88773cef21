use axum::routing::get;
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// Public site routes. Mounted at the root, after every static route, so the
/// language parameter only captures what nothing else claims.
///
/// ```text
/// /                       redirect to the default language home
/// /{lang}                 home page
/// /{lang}/{*path}         any other page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(site::root_redirect))
        .route("/{lang}", get(site::render_home))
        .route("/{lang}/{*path}", get(site::render_page))
}

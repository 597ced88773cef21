use std::num::NonZeroUsize;
use std::sync::Arc;

use atrium_core::config::SiteConfig;
use atrium_db::ContentStore;

use crate::config::ServerConfig;
use crate::content::ContentFetcher;
use crate::render_cache::RenderCache;
use crate::resolver::Resolver;
use crate::revalidation::{Invalidator, RevalidationHook};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Content store adapter (PostgreSQL or in-memory).
    pub store: Arc<dyn ContentStore>,
    /// Immutable site tables.
    pub site: Arc<SiteConfig>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub resolver: Arc<Resolver>,
    /// Rendered page responses; also the revalidation target.
    pub render_cache: Arc<RenderCache>,
    pub revalidation: Arc<RevalidationHook>,
}

impl AppState {
    /// Wire the resolver, render cache and revalidation hook around `store`.
    pub fn new(store: Arc<dyn ContentStore>, site: SiteConfig, config: ServerConfig) -> Self {
        let site = Arc::new(site);
        let fetcher = ContentFetcher::new(
            Arc::clone(&store),
            Arc::clone(&site),
            config.fetch_timeout(),
        );
        let resolver = Arc::new(Resolver::new(Arc::clone(&site), fetcher));
        let capacity =
            NonZeroUsize::new(config.render_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        let render_cache = Arc::new(RenderCache::with_capacity(capacity));
        let revalidation = Arc::new(RevalidationHook::new(
            Arc::clone(&store),
            Arc::clone(&site),
            Arc::clone(&render_cache) as Arc<dyn Invalidator>,
        ));

        Self {
            store,
            site,
            config: Arc::new(config),
            resolver,
            render_cache,
            revalidation,
        }
    }
}

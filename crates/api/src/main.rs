use std::net::SocketAddr;
use std::sync::Arc;

use atrium_core::config::SiteConfig;
use atrium_db::{ContentStore, MemoryContentStore, PgContentStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atrium_api::config::ServerConfig;
use atrium_api::router::build_app_router;
use atrium_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atrium_api=debug,atrium_db=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let site = match &config.site_config_path {
        Some(path) => SiteConfig::from_json_file(path).expect("Failed to load site configuration"),
        None => SiteConfig::default(),
    };
    tracing::info!(
        site = %site.site_name,
        default_language = %site.default_language,
        languages = ?site.languages,
        "Loaded site configuration"
    );

    // --- Content store ---
    let store = connect_store(&config).await;

    // --- App state and router ---
    let state = AppState::new(store, site, config.clone());
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the in-memory store,
/// seeded from `CONTENT_SEED_PATH` when given.
async fn connect_store(config: &ServerConfig) -> Arc<dyn ContentStore> {
    if let Some(database_url) = &config.database_url {
        let pool = atrium_db::create_pool(database_url)
            .await
            .expect("Failed to connect to database");
        tracing::info!("Database connection pool created");

        atrium_db::health_check(&pool)
            .await
            .expect("Database health check failed");
        tracing::info!("Database health check passed");

        atrium_db::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");

        return Arc::new(PgContentStore::new(pool));
    }

    match &config.content_seed_path {
        Some(path) => {
            let store =
                MemoryContentStore::from_json_file(path).expect("Failed to load content seed");
            tracing::info!(path = %path, "Using in-memory content store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("Neither DATABASE_URL nor CONTENT_SEED_PATH set, serving an empty site");
            Arc::new(MemoryContentStore::new())
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

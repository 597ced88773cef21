use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on any single content store call, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Maximum number of rendered responses kept in memory.
    pub render_cache_capacity: usize,
    /// Requests carrying this value in `x-preview-token` see drafts.
    /// Preview is disabled when unset.
    pub preview_token: Option<String>,
    /// Shared secret expected in `x-revalidate-secret` on webhook calls.
    /// Webhooks are open when unset.
    pub revalidate_secret: Option<String>,
    /// JSON site configuration; built-in tables are used when unset.
    pub site_config_path: Option<String>,
    /// PostgreSQL content store. Takes precedence over `content_seed_path`.
    pub database_url: Option<String>,
    /// JSON fixture for the in-memory content store.
    pub content_seed_path: Option<String>,
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `FETCH_TIMEOUT_MS`      | `5000`                  |
    /// | `RENDER_CACHE_CAPACITY` | `512`                   |
    /// | `PREVIEW_TOKEN`         | unset                   |
    /// | `REVALIDATE_SECRET`     | unset                   |
    /// | `SITE_CONFIG_PATH`      | unset                   |
    /// | `DATABASE_URL`          | unset                   |
    /// | `CONTENT_SEED_PATH`     | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let fetch_timeout_ms: u64 = std::env::var("FETCH_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("FETCH_TIMEOUT_MS must be a valid u64");

        let render_cache_capacity: usize = std::env::var("RENDER_CACHE_CAPACITY")
            .unwrap_or_else(|_| "512".into())
            .parse()
            .expect("RENDER_CACHE_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            fetch_timeout_ms,
            render_cache_capacity,
            preview_token: optional_var("PREVIEW_TOKEN"),
            revalidate_secret: optional_var("REVALIDATE_SECRET"),
            site_config_path: optional_var("SITE_CONFIG_PATH"),
            database_url: optional_var("DATABASE_URL"),
            content_seed_path: optional_var("CONTENT_SEED_PATH"),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

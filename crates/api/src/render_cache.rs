//! Bounded cache of rendered responses, keyed by request path.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use axum::http::StatusCode;
use lru::LruCache;
use tokio::sync::Mutex;

use crate::revalidation::{InvalidateError, Invalidator};

/// A cached response body with the tags it can be invalidated under.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRender {
    pub status: StatusCode,
    pub body: serde_json::Value,
    pub tags: Vec<String>,
}

impl CachedRender {
    pub fn new(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body,
            tags: Vec::new(),
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

pub struct RenderCache {
    entries: Mutex<LruCache<String, CachedRender>>,
}

impl RenderCache {
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn get(&self, path: &str) -> Option<CachedRender> {
        self.entries.lock().await.get(path).cloned()
    }

    pub async fn put(&self, path: impl Into<String>, render: CachedRender) {
        self.entries.lock().await.put(path.into(), render);
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.entries.lock().await.contains(path)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Invalidator for RenderCache {
    async fn invalidate_path(&self, path: &str) -> Result<(), InvalidateError> {
        let removed = self.entries.lock().await.pop(path).is_some();
        tracing::debug!(path = %path, removed, "Render cache path invalidated");
        Ok(())
    }

    async fn invalidate_tag(&self, tag: &str) -> Result<(), InvalidateError> {
        let mut entries = self.entries.lock().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, render)| render.tags.iter().any(|t| t == tag))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &stale {
            entries.pop(path);
        }
        tracing::debug!(tag = %tag, removed = stale.len(), "Render cache tag invalidated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

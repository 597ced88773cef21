//! In-memory [`ContentStore`], seedable from a JSON fixture.
//!
//! Relations are returned exactly as they were inserted, so fixtures can mix
//! bare ids and populated documents.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use atrium_core::content::{Page, Post};
use serde::Deserialize;

use super::query::{PageQuery, PostQuery};
use super::ContentStore;
use crate::error::StoreError;

/// On-disk seed format: `{ "pages": [...], "posts": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    pages: RwLock<Vec<Page>>,
    posts: RwLock<Vec<Post>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".into())
}

fn apply_limit<T>(mut docs: Vec<T>, limit: Option<i64>) -> Vec<T> {
    if let Some(limit) = limit {
        docs.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
    }
    docs
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(pages: Vec<Page>, posts: Vec<Post>) -> Self {
        Self {
            pages: RwLock::new(pages),
            posts: RwLock::new(posts),
        }
    }

    pub fn from_seed_str(raw: &str) -> Result<Self, StoreError> {
        let seed: Seed =
            serde_json::from_str(raw).map_err(|e| StoreError::Seed(e.to_string()))?;
        tracing::info!(
            pages = seed.pages.len(),
            posts = seed.posts.len(),
            "Loaded content seed"
        );
        Ok(Self::with_documents(seed.pages, seed.posts))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;
        Self::from_seed_str(&raw)
    }

    /// Insert or replace a page by id.
    pub fn upsert_page(&self, page: Page) -> Result<(), StoreError> {
        let mut pages = self.pages.write().map_err(poisoned)?;
        match pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => pages.push(page),
        }
        Ok(())
    }

    /// Insert or replace a post by id.
    pub fn upsert_post(&self, post: Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().map_err(poisoned)?;
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => posts.push(post),
        }
        Ok(())
    }

    pub fn remove_page(&self, id: &str) -> Result<Option<Page>, StoreError> {
        let mut pages = self.pages.write().map_err(poisoned)?;
        Ok(pages
            .iter()
            .position(|p| p.id == id)
            .map(|i| pages.remove(i)))
    }

    pub fn remove_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let mut posts = self.posts.write().map_err(poisoned)?;
        Ok(posts
            .iter()
            .position(|p| p.id == id)
            .map(|i| posts.remove(i)))
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_pages(&self, query: &PageQuery) -> Result<Vec<Page>, StoreError> {
        let pages = self.pages.read().map_err(poisoned)?;
        let mut found: Vec<Page> = pages.iter().filter(|p| query.matches(p)).cloned().collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(apply_limit(found, query.limit))
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().map_err(poisoned)?;
        let mut found: Vec<Post> = posts.iter().filter(|p| query.matches(p)).cloned().collect();
        query.sort_posts(&mut found);
        Ok(apply_limit(found, query.limit))
    }

    async fn find_page_by_id(&self, id: &str) -> Result<Option<Page>, StoreError> {
        let pages = self.pages.read().map_err(poisoned)?;
        Ok(pages.iter().find(|p| p.id == id).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.pages.read().map(|_| ()).map_err(poisoned)
    }
}

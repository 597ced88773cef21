//! PostgreSQL-backed [`ContentStore`].

use async_trait::async_trait;
use atrium_core::content::{Page, Post};

use super::query::{PageQuery, PostQuery};
use super::ContentStore;
use crate::error::StoreError;
use crate::repositories::{PageRepo, PostRepo};
use crate::DbPool;

/// Content store over the `pages` / `posts` tables.
#[derive(Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn find_pages(&self, query: &PageQuery) -> Result<Vec<Page>, StoreError> {
        PageRepo::find(&self.pool, query).await
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        PostRepo::find(&self.pool, query).await
    }

    async fn find_page_by_id(&self, id: &str) -> Result<Option<Page>, StoreError> {
        PageRepo::find_by_id(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

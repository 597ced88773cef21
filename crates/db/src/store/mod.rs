//! The content store seam.

pub mod memory;
pub mod pg;
pub mod query;

use async_trait::async_trait;
use atrium_core::content::{Page, Post};
use atrium_core::types::DocId;

use crate::error::StoreError;
use query::{PageQuery, PostQuery, Visibility};

/// Read access to CMS content.
///
/// Implementations must be read-only for every method here; writes happen in
/// the CMS and reach Atrium only through revalidation webhooks.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Pages matching every clause of `query`.
    async fn find_pages(&self, query: &PageQuery) -> Result<Vec<Page>, StoreError>;

    /// Posts matching every clause of `query`, ordered by `query.sort`.
    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError>;

    /// A page by id regardless of publish state.
    async fn find_page_by_id(&self, id: &str) -> Result<Option<Page>, StoreError>;

    /// One batched lookup of posts by id. An empty id list never reaches
    /// the backing store.
    async fn find_posts_by_ids(
        &self,
        ids: &[DocId],
        visibility: Visibility,
    ) -> Result<Vec<Post>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_posts(&PostQuery::new(visibility).ids(ids.to_vec()))
            .await
    }

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

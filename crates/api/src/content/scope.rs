//! Request-scoped memoization for content fetches.
//!
//! A [`RequestScope`] is created when a request arrives and dropped with its
//! response. Every fetch made through it is keyed by operation and
//! arguments; concurrent identical fetches share one store round trip.
//! Nothing is shared between requests, since drafts and locale differ.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use atrium_core::content::{Post, ResolvedPage};
use atrium_db::Visibility;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PageKey {
    pub slug: String,
    pub parent_slug: Option<String>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum PostKey {
    ById { id: String, language: String },
    BySlug { slug: String, language: String },
}

type Memo<K, V> = Mutex<HashMap<K, Arc<OnceCell<Option<V>>>>>;

/// Per-request fetch context: visibility plus the memo tables.
#[derive(Debug, Default)]
pub struct RequestScope {
    visibility: Visibility,
    pages: Memo<PageKey, ResolvedPage>,
    posts: Memo<PostKey, Post>,
}

impl RequestScope {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Number of distinct fetches made through this scope.
    pub fn memoized_len(&self) -> usize {
        let pages = self.pages.lock().map(|m| m.len()).unwrap_or(0);
        let posts = self.posts.lock().map(|m| m.len()).unwrap_or(0);
        pages + posts
    }

    pub(crate) async fn page<F, Fut>(&self, key: PageKey, fetch: F) -> Option<ResolvedPage>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<ResolvedPage>>,
    {
        memoized(&self.pages, key, fetch).await
    }

    pub(crate) async fn post<F, Fut>(&self, key: PostKey, fetch: F) -> Option<Post>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Post>>,
    {
        memoized(&self.posts, key, fetch).await
    }
}

async fn memoized<K, V, F, Fut>(memo: &Memo<K, V>, key: K, fetch: F) -> Option<V>
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Option<V>>,
{
    // A poisoned table only means another fetch panicked; skip memoization.
    let cell = memo
        .lock()
        .ok()
        .map(|mut table| Arc::clone(table.entry(key).or_default()));
    match cell {
        Some(cell) => cell.get_or_init(fetch).await.clone(),
        None => fetch().await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

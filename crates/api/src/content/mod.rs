//! Content fetchers: locale- and draft-aware reads from the content store.
//!
//! Each fetcher has a `try_` form returning [`FetchError`] and a public form
//! that memoizes through the request's [`RequestScope`] and collapses the
//! error to `None`, logging it at the level the failure deserves.

pub mod scope;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use atrium_core::config::SiteConfig;
use atrium_core::content::{Page, Post, PostCategory, Relation, ResolvedPage};
use atrium_core::sections::{bind_posts, bound_post_count};
use atrium_db::{
    ContentStore, PageQuery, ParentFilter, PostQuery, PostSort, StoreError, Visibility,
};

pub use scope::RequestScope;
use scope::{PageKey, PostKey};

/// Why a fetch produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("content store did not answer within {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    fn not_found(entity: &'static str, key: &str) -> Self {
        FetchError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Collapse a fetch result to an `Option`, logging the failure.
fn collapse<T>(result: Result<T, FetchError>, operation: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(FetchError::NotFound { entity, key }) => {
            tracing::info!(operation, entity, key = %key, "Content not found");
            None
        }
        Err(err) => {
            tracing::error!(operation, error = %err, "Content fetch failed");
            None
        }
    }
}

/// Read-only access to pages and posts, with every store call bounded by a
/// timeout.
#[derive(Clone)]
pub struct ContentFetcher {
    store: Arc<dyn ContentStore>,
    site: Arc<SiteConfig>,
    timeout: Duration,
}

impl ContentFetcher {
    pub fn new(store: Arc<dyn ContentStore>, site: Arc<SiteConfig>, timeout: Duration) -> Self {
        Self {
            store,
            site,
            timeout,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }

    // -- pages ---------------------------------------------------------------

    /// Page `slug` in `language`, under `parent_slug` when given, with its
    /// sections bound to their posts.
    pub async fn fetch_page_by_slug(
        &self,
        scope: &RequestScope,
        slug: &str,
        parent_slug: Option<&str>,
        language: &str,
    ) -> Option<ResolvedPage> {
        let key = PageKey {
            slug: slug.to_string(),
            parent_slug: parent_slug.map(str::to_string),
            language: language.to_string(),
        };
        scope
            .page(key, || async {
                collapse(
                    self.try_fetch_page_by_slug(scope.visibility(), slug, parent_slug, language)
                        .await,
                    "fetch_page_by_slug",
                )
            })
            .await
    }

    pub async fn try_fetch_page_by_slug(
        &self,
        visibility: Visibility,
        slug: &str,
        parent_slug: Option<&str>,
        language: &str,
    ) -> Result<ResolvedPage, FetchError> {
        let parent = match parent_slug {
            None => None,
            Some(parent_slug) => {
                let found = self.find_root_page(visibility, parent_slug).await?;
                if found.is_none() {
                    tracing::warn!(
                        slug = %slug,
                        parent_slug = %parent_slug,
                        "Parent page not found, querying without parent filter"
                    );
                }
                found
            }
        };

        let filter = match (parent_slug, &parent) {
            (None, _) => ParentFilter::Root,
            (Some(_), Some(parent)) => ParentFilter::Id(parent.id.clone()),
            (Some(_), None) => ParentFilter::Any,
        };
        let query = PageQuery::new(visibility)
            .slug(slug)
            .parent(filter)
            .locale(language)
            .limit(1);
        let page = self
            .timed(self.store.find_pages(&query))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::not_found("page", slug))?;

        let posts = if self.site.skips_posts(slug) {
            Vec::new()
        } else {
            let query = PostQuery::new(visibility)
                .page_id(page.id.clone())
                .language(language)
                .sort(PostSort::SortOrder);
            self.timed(self.store.find_posts(&query)).await?
        };

        let parent_slug = parent.map(|p| p.slug).or_else(|| {
            page.parent_page
                .as_ref()
                .and_then(Relation::populated)
                .map(|p| p.slug.clone())
        });
        let sections = bind_posts(page.sections, &posts);
        tracing::debug!(
            slug = %slug,
            language = %language,
            sections = sections.len(),
            posts = bound_post_count(&sections),
            "Fetched page"
        );

        Ok(ResolvedPage {
            title: page.title.get(language).unwrap_or_default().to_string(),
            description: page.description.get(language).unwrap_or_default().to_string(),
            id: page.id,
            slug: page.slug,
            parent_slug,
            language: language.to_string(),
            sections,
            status: page.status,
            updated_at: page.updated_at,
        })
    }

    async fn find_root_page(
        &self,
        visibility: Visibility,
        slug: &str,
    ) -> Result<Option<Page>, FetchError> {
        let query = PageQuery::new(visibility)
            .slug(slug)
            .parent(ParentFilter::Root)
            .limit(1);
        Ok(self.timed(self.store.find_pages(&query)).await?.into_iter().next())
    }

    // -- posts ---------------------------------------------------------------

    /// Career posting `id` in `language`, with related posts populated.
    pub async fn fetch_post_by_id(
        &self,
        scope: &RequestScope,
        id: &str,
        language: &str,
    ) -> Option<Post> {
        let key = PostKey::ById {
            id: id.to_string(),
            language: language.to_string(),
        };
        scope
            .post(key, || async {
                collapse(
                    self.try_fetch_post_by_id(scope.visibility(), id, language).await,
                    "fetch_post_by_id",
                )
            })
            .await
    }

    pub async fn try_fetch_post_by_id(
        &self,
        visibility: Visibility,
        id: &str,
        language: &str,
    ) -> Result<Post, FetchError> {
        let query = PostQuery::new(visibility)
            .id(id)
            .category(PostCategory::Careers)
            .language(language)
            .limit(1);
        self.find_one_post(&query, visibility, id).await
    }

    /// News article `slug` in `language`, with related posts populated.
    pub async fn fetch_post_by_slug(
        &self,
        scope: &RequestScope,
        slug: &str,
        language: &str,
    ) -> Option<Post> {
        let key = PostKey::BySlug {
            slug: slug.to_string(),
            language: language.to_string(),
        };
        scope
            .post(key, || async {
                collapse(
                    self.try_fetch_post_by_slug(scope.visibility(), slug, language)
                        .await,
                    "fetch_post_by_slug",
                )
            })
            .await
    }

    pub async fn try_fetch_post_by_slug(
        &self,
        visibility: Visibility,
        slug: &str,
        language: &str,
    ) -> Result<Post, FetchError> {
        let query = PostQuery::new(visibility)
            .slug(slug)
            .category(PostCategory::News)
            .language(language)
            .limit(1);
        self.find_one_post(&query, visibility, slug).await
    }

    async fn find_one_post(
        &self,
        query: &PostQuery,
        visibility: Visibility,
        key: &str,
    ) -> Result<Post, FetchError> {
        let post = self
            .timed(self.store.find_posts(query))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::not_found("post", key))?;
        Ok(self.populate_related(post, visibility).await)
    }

    /// Replace unresolved `related_posts` ids with documents, using one
    /// batched lookup. Ids that do not resolve are dropped. Related posts of
    /// related posts are left as they are.
    pub async fn populate_related(&self, mut post: Post, visibility: Visibility) -> Post {
        let ids = post.unresolved_related_ids();
        if ids.is_empty() {
            return post;
        }

        let found = match self
            .timed(self.store.find_posts_by_ids(&ids, visibility))
            .await
        {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    post_id = %post.id,
                    error = %err,
                    "Could not resolve related posts, leaving references unresolved"
                );
                return post;
            }
        };

        let mut by_id: HashMap<String, Post> =
            found.into_iter().map(|p| (p.id.clone(), p)).collect();
        post.related_posts = std::mem::take(&mut post.related_posts)
            .into_iter()
            .filter_map(|relation| match relation {
                Relation::Id(id) => by_id.remove(&id).map(|p| Relation::Populated(Box::new(p))),
                populated => Some(populated),
            })
            .collect();
        post
    }

    // -- listings ------------------------------------------------------------

    /// Every published page and post, for the sitemap.
    pub async fn list_published(&self) -> Result<(Vec<Page>, Vec<Post>), FetchError> {
        let pages = self
            .timed(self.store.find_pages(&PageQuery::new(Visibility::Published)))
            .await?;
        let posts = self
            .timed(
                self.store
                    .find_posts(&PostQuery::new(Visibility::Published).sort(PostSort::Newest)),
            )
            .await?;
        Ok((pages, posts))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use atrium_core::content::Page;
    use atrium_db::MemoryContentStore;

    use super::*;

    const SEED: &str = r#"{
        "pages": [
            { "id": "p-about", "slug": "about", "title": { "en": "About", "vi": "Giới thiệu" },
              "status": "published", "sections": [{ "section_id": "intro" }, { "section_id": "empty" }] },
            { "id": "p-team", "slug": "team", "parent_page": "p-about",
              "title": { "en": "Team" }, "status": "published" },
            { "id": "p-contact", "slug": "contact", "title": { "en": "Contact" }, "status": "published",
              "sections": [{ "section_id": "form" }] }
        ],
        "posts": [
            { "id": "n1", "slug": "launch", "title": "Launch", "category": "news", "language": "en",
              "status": "published", "page": "p-about", "section_id": "intro", "sort_order": 2,
              "related_posts": ["n2", "gone"] },
            { "id": "n2", "slug": "follow-up", "title": "Follow up", "category": "news",
              "language": "en", "status": "published", "page": "p-about", "section_id": "intro",
              "sort_order": 1, "related_posts": ["n1"] },
            { "id": "c1", "slug": "hello", "title": "Hello", "category": "news", "language": "en",
              "status": "published", "page": "p-contact", "section_id": "form" },
            { "id": "JOB-001", "slug": "engineer", "title": "Engineer", "category": "careers",
              "language": "en", "status": "published" }
        ]
    }"#;

    fn fetcher_with(store: Arc<dyn ContentStore>) -> ContentFetcher {
        ContentFetcher::new(store, Arc::new(SiteConfig::default()), Duration::from_millis(200))
    }

    fn fetcher() -> ContentFetcher {
        fetcher_with(Arc::new(MemoryContentStore::from_seed_str(SEED).unwrap()))
    }

    // -- pages ---------------------------------------------------------------

    #[tokio::test]
    async fn page_sections_get_their_posts_in_sort_order() {
        let page = fetcher()
            .try_fetch_page_by_slug(Visibility::Published, "about", None, "en")
            .await
            .unwrap();
        assert_eq!(page.title, "About");
        let intro: Vec<_> = page.sections[0].posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(intro, vec!["n2", "n1"]);
        assert!(page.sections[1].posts.is_empty());
    }

    #[tokio::test]
    async fn pages_without_posts_skip_the_post_query() {
        let page = fetcher()
            .try_fetch_page_by_slug(Visibility::Published, "contact", None, "en")
            .await
            .unwrap();
        assert!(page.sections[0].posts.is_empty());
    }

    #[tokio::test]
    async fn child_page_resolves_under_parent() {
        let page = fetcher()
            .try_fetch_page_by_slug(Visibility::Published, "team", Some("about"), "en")
            .await
            .unwrap();
        assert_eq!(page.id, "p-team");
        assert_eq!(page.parent_slug.as_deref(), Some("about"));
    }

    #[tokio::test]
    async fn missing_parent_drops_the_parent_filter() {
        let page = fetcher()
            .try_fetch_page_by_slug(Visibility::Published, "team", Some("nowhere"), "en")
            .await
            .unwrap();
        assert_eq!(page.id, "p-team");
    }

    #[tokio::test]
    async fn child_page_is_not_a_root_page() {
        let result = fetcher()
            .try_fetch_page_by_slug(Visibility::Published, "team", None, "en")
            .await;
        assert_matches!(result, Err(FetchError::NotFound { entity: "page", .. }));
    }

    #[tokio::test]
    async fn untranslated_page_is_not_found() {
        let result = fetcher()
            .try_fetch_page_by_slug(Visibility::Published, "team", Some("about"), "vi")
            .await;
        assert_matches!(result, Err(FetchError::NotFound { .. }));
    }

    // -- posts ---------------------------------------------------------------

    #[tokio::test]
    async fn related_posts_are_populated_one_level_deep() {
        let post = fetcher()
            .try_fetch_post_by_slug(Visibility::Published, "launch", "en")
            .await
            .unwrap();
        // "gone" does not exist and is dropped.
        assert_eq!(post.related_posts.len(), 1);
        let related = post.related_posts[0].populated().unwrap();
        assert_eq!(related.id, "n2");
        assert_matches!(related.related_posts.as_slice(), [Relation::Id(id)] if id == "n1");
    }

    #[tokio::test]
    async fn post_fetchers_filter_by_category() {
        let fetcher = fetcher();
        assert!(fetcher
            .try_fetch_post_by_id(Visibility::Published, "JOB-001", "en")
            .await
            .is_ok());
        assert_matches!(
            fetcher
                .try_fetch_post_by_id(Visibility::Published, "n1", "en")
                .await,
            Err(FetchError::NotFound { .. })
        );
        assert_matches!(
            fetcher
                .try_fetch_post_by_slug(Visibility::Published, "engineer", "en")
                .await,
            Err(FetchError::NotFound { .. })
        );
    }

    // -- failures ------------------------------------------------------------

    struct SlowStore;

    #[async_trait]
    impl ContentStore for SlowStore {
        async fn find_pages(&self, _: &PageQuery) -> Result<Vec<Page>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }
        async fn find_posts(&self, _: &PostQuery) -> Result<Vec<Post>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn find_page_by_id(&self, _: &str) -> Result<Option<Page>, StoreError> {
            Ok(None)
        }
        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let result = fetcher_with(Arc::new(SlowStore))
            .try_fetch_page_by_slug(Visibility::Published, "about", None, "en")
            .await;
        assert_matches!(result, Err(FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn store_errors_collapse_to_none() {
        let fetcher = fetcher_with(Arc::new(SlowStore));
        let scope = RequestScope::new(Visibility::Published);
        assert_matches!(
            fetcher.try_fetch_post_by_id(Visibility::Published, "JOB-001", "en").await,
            Err(FetchError::Store(StoreError::Unavailable(_)))
        );
        assert!(fetcher.fetch_post_by_id(&scope, "JOB-001", "en").await.is_none());
    }

    #[tokio::test]
    async fn public_fetchers_memoize_per_scope() {
        let fetcher = fetcher();
        let scope = RequestScope::new(Visibility::Published);
        let first = fetcher.fetch_page_by_slug(&scope, "about", None, "en").await;
        let second = fetcher.fetch_page_by_slug(&scope, "about", None, "en").await;
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(scope.memoized_len(), 1);
    }
}

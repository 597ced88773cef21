//! Render-cache revalidation after CMS writes.
//!
//! The CMS calls the webhook after a page or post is saved or deleted. The
//! hook works out every public path the document was reachable at before and
//! is reachable at now, and tells the [`Invalidator`] to drop the stale ones.
//! Renders are also tagged with the ids of the documents they show (see
//! [`document_tag`]), so paths no hook can compute are dropped by tag.

use std::sync::Arc;

use async_trait::async_trait;
use atrium_core::config::SiteConfig;
use atrium_core::content::{Page, Post, PostCategory, Relation};
use atrium_core::page_tree::{PageArena, PageNode, MAX_PARENT_DEPTH};
use atrium_core::paths::{page_path, post_path};
use atrium_core::route::{nested_key, RouteDescriptor};
use atrium_db::ContentStore;
use serde::{Deserialize, Serialize};

/// Cache tag covering the page part of the sitemap.
pub const PAGES_SITEMAP_TAG: &str = "pages-sitemap";
/// Cache tag covering the post part of the sitemap.
pub const POSTS_SITEMAP_TAG: &str = "posts-sitemap";

/// Cache tag carried by every render that shows document `id`.
pub fn document_tag(id: &str) -> String {
    format!("doc:{id}")
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidateError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Something holding rendered output that can be told to forget it.
#[async_trait]
pub trait Invalidator: Send + Sync {
    async fn invalidate_path(&self, path: &str) -> Result<(), InvalidateError>;

    async fn invalidate_tag(&self, tag: &str) -> Result<(), InvalidateError>;
}

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// A page write, with the stored snapshot from before it when there was one.
#[derive(Debug, Clone, Deserialize)]
pub struct PageChange {
    pub locale: String,
    pub doc: Page,
    #[serde(default)]
    pub previous_doc: Option<Page>,
}

/// A post write. Posts carry their own language.
#[derive(Debug, Clone, Deserialize)]
pub struct PostChange {
    pub doc: Post,
    #[serde(default)]
    pub previous_doc: Option<Post>,
}

/// What a hook invocation invalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevalidationReport {
    pub paths: Vec<String>,
    pub tags: Vec<String>,
}

/// A document's public path together with whether it was live there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSnapshot {
    pub path: String,
    pub published: bool,
}

/// Paths to invalidate, given the paths a document is reachable at after
/// and before a write. `current` is empty for a delete.
///
/// A current path goes stale when the document is live there. A previous
/// path goes stale when the document was live there and has since moved or
/// been unpublished; when it is still live at the same path it is already
/// covered by the current one. No path appears twice.
pub fn invalidation_targets(current: &[PathSnapshot], previous: &[PathSnapshot]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for snapshot in current.iter().chain(previous).filter(|s| s.published) {
        if !paths.contains(&snapshot.path) {
            paths.push(snapshot.path.clone());
        }
    }
    paths
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

pub struct RevalidationHook {
    store: Arc<dyn ContentStore>,
    site: Arc<SiteConfig>,
    invalidator: Arc<dyn Invalidator>,
}

impl RevalidationHook {
    pub fn new(
        store: Arc<dyn ContentStore>,
        site: Arc<SiteConfig>,
        invalidator: Arc<dyn Invalidator>,
    ) -> Self {
        Self {
            store,
            site,
            invalidator,
        }
    }

    pub async fn after_page_change(&self, change: &PageChange) -> RevalidationReport {
        let current = self.page_snapshot(&change.locale, &change.doc).await;
        let previous = match &change.previous_doc {
            Some(doc) => vec![self.page_snapshot(&change.locale, doc).await],
            None => Vec::new(),
        };
        let paths = invalidation_targets(std::slice::from_ref(&current), &previous);
        self.apply(paths, PAGES_SITEMAP_TAG, &change.doc.id).await
    }

    pub async fn after_page_delete(&self, locale: &str, doc: &Page) -> RevalidationReport {
        let previous = self.page_snapshot(locale, doc).await;
        let paths = invalidation_targets(&[], std::slice::from_ref(&previous));
        self.apply(paths, PAGES_SITEMAP_TAG, &doc.id).await
    }

    pub async fn after_post_change(&self, change: &PostChange) -> RevalidationReport {
        let current = self.post_snapshots(&change.doc).await;
        let previous = match &change.previous_doc {
            Some(doc) => self.post_snapshots(doc).await,
            None => Vec::new(),
        };
        let paths = invalidation_targets(&current, &previous);
        self.apply(paths, POSTS_SITEMAP_TAG, &change.doc.id).await
    }

    pub async fn after_post_delete(&self, doc: &Post) -> RevalidationReport {
        let previous = self.post_snapshots(doc).await;
        let paths = invalidation_targets(&[], &previous);
        self.apply(paths, POSTS_SITEMAP_TAG, &doc.id).await
    }

    async fn apply(&self, paths: Vec<String>, sitemap_tag: &str, doc_id: &str) -> RevalidationReport {
        let mut report = RevalidationReport::default();
        for path in paths {
            match self.invalidator.invalidate_path(&path).await {
                Ok(()) => tracing::info!(path = %path, "Revalidated path"),
                Err(e) => tracing::error!(path = %path, error = %e, "Path revalidation failed"),
            }
            report.paths.push(path);
        }
        if report.paths.is_empty() {
            return report;
        }
        for tag in [sitemap_tag.to_string(), document_tag(doc_id)] {
            if let Err(e) = self.invalidator.invalidate_tag(&tag).await {
                tracing::error!(tag = %tag, error = %e, "Tag revalidation failed");
            }
            report.tags.push(tag);
        }
        report
    }

    // -- path snapshots ------------------------------------------------------

    async fn page_snapshot(&self, locale: &str, page: &Page) -> PathSnapshot {
        let parent_slug = self.parent_slug(page).await;
        PathSnapshot {
            path: page_path(locale, parent_slug.as_deref(), &page.slug),
            published: page.status.is_published(),
        }
    }

    /// Every path a post is shown at: its post path, the news or career
    /// routes serving it, the page it is attached to, and the special nested
    /// route framing it when that page is in the nested-route table.
    async fn post_snapshots(&self, post: &Post) -> Vec<PathSnapshot> {
        let language = post.language.as_str();
        let names = self.site.route_names(language);
        let page = self.post_page(post).await;

        let mut paths = vec![post_path(
            language,
            page.as_ref().map(|p| p.slug.as_str()),
            &post.slug,
        )];
        let mut routes = match post.category {
            PostCategory::News => vec![RouteDescriptor::News {
                post_slug: post.slug.clone(),
            }],
            PostCategory::Careers => vec![
                RouteDescriptor::Career {
                    post_id: post.id.clone(),
                },
                RouteDescriptor::CareerApplication {
                    post_id: post.id.clone(),
                },
            ],
        };
        if let Some(page) = &page {
            let parent_slug = self.parent_slug(page).await;
            if let Some(parent) = parent_slug.as_deref() {
                if self.site.components.nested.contains_key(&nested_key(parent, &page.slug)) {
                    routes.push(RouteDescriptor::SpecialNested {
                        parent_slug: parent.to_string(),
                        extra_path: page.slug.clone(),
                        post_id: Some(post.id.clone()),
                    });
                }
            }
            paths.push(page_path(language, parent_slug.as_deref(), &page.slug));
        }
        if let Some(names) = names {
            paths.extend(routes.iter().filter_map(|route| route.to_path(language, names)));
        }

        let published = post.status.is_published();
        paths
            .into_iter()
            .map(|path| PathSnapshot { path, published })
            .collect()
    }

    async fn post_page(&self, post: &Post) -> Option<Page> {
        match post.page.as_ref()? {
            Relation::Populated(page) => Some((**page).clone()),
            Relation::Id(id) => match self.store.find_page_by_id(id).await {
                Ok(Some(page)) => Some(page),
                Ok(None) => {
                    tracing::warn!(post_id = %post.id, page_id = %id, "Post page not found");
                    None
                }
                Err(e) => {
                    tracing::warn!(post_id = %post.id, page_id = %id, error = %e, "Post page lookup failed");
                    None
                }
            },
        }
    }

    /// Slug of the page's parent. Unpopulated ancestors are loaded from the
    /// store one at a time; the walk stops after [`MAX_PARENT_DEPTH`] steps
    /// and a cyclic chain yields no parent.
    async fn parent_slug(&self, page: &Page) -> Option<String> {
        let mut arena = PageArena::new();
        arena.insert(PageNode::from(page));

        let mut next = page.parent_page.clone();
        for _ in 0..=MAX_PARENT_DEPTH {
            let Some(relation) = next.take() else { break };
            if arena.contains(relation.id()) {
                break;
            }
            let parent = match relation {
                Relation::Populated(parent) => *parent,
                Relation::Id(id) => match self.store.find_page_by_id(&id).await {
                    Ok(Some(parent)) => parent,
                    Ok(None) => {
                        tracing::warn!(page_id = %page.id, parent_id = %id, "Parent page not found");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(page_id = %page.id, parent_id = %id, error = %e, "Parent page lookup failed");
                        break;
                    }
                },
            };
            arena.insert(PageNode::from(&parent));
            next = parent.parent_page;
        }

        match arena.ancestors(&page.id) {
            Ok(chain) => chain.first().map(|parent| parent.slug.clone()),
            Err(e) => {
                tracing::warn!(page_id = %page.id, error = %e, "Broken page ancestry, treating page as root");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Query descriptions understood by every [`ContentStore`](super::ContentStore).
//!
//! All set clauses are combined with logical AND. Unset clauses do not
//! filter.

use atrium_core::content::{Page, Post, PostCategory};
use atrium_core::types::DocId;

/// Whether draft documents are visible (preview mode) or only published ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Published,
    IncludeDrafts,
}

impl Visibility {
    pub fn is_preview(self) -> bool {
        self == Visibility::IncludeDrafts
    }

    fn admits(self, published: bool) -> bool {
        published || self == Visibility::IncludeDrafts
    }
}

/// Constraint on a page's `parent_page`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ParentFilter {
    /// No constraint.
    #[default]
    Any,
    /// Only pages without a parent.
    Root,
    /// Only children of the given page.
    Id(DocId),
}

// ---------------------------------------------------------------------------
// PageQuery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub id: Option<DocId>,
    pub slug: Option<String>,
    pub parent: ParentFilter,
    /// Only pages translated into this language.
    pub locale: Option<String>,
    pub visibility: Visibility,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn parent(mut self, parent: ParentFilter) -> Self {
        self.parent = parent;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// In-process evaluation of the query against one page.
    pub fn matches(&self, page: &Page) -> bool {
        self.visibility.admits(page.status.is_published())
            && self.id.as_deref().map_or(true, |id| page.id == id)
            && self.slug.as_deref().map_or(true, |slug| page.slug == slug)
            && match &self.parent {
                ParentFilter::Any => true,
                ParentFilter::Root => page.parent_page.is_none(),
                ParentFilter::Id(id) => page.parent_id() == Some(id.as_str()),
            }
            && self
                .locale
                .as_deref()
                .map_or(true, |lang| page.is_translated(lang))
    }
}

// ---------------------------------------------------------------------------
// PostQuery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    /// Ascending `sort_order`, ties by id.
    #[default]
    SortOrder,
    /// Most recently published first.
    Newest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Restrict to these ids (a batched lookup).
    pub ids: Option<Vec<DocId>>,
    pub slug: Option<String>,
    pub category: Option<PostCategory>,
    pub page_id: Option<DocId>,
    pub language: Option<String>,
    pub visibility: Visibility,
    pub sort: PostSort,
    pub limit: Option<i64>,
}

impl PostQuery {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    pub fn id(self, id: impl Into<DocId>) -> Self {
        self.ids(vec![id.into()])
    }

    pub fn ids(mut self, ids: Vec<DocId>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn category(mut self, category: PostCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn page_id(mut self, page_id: impl Into<DocId>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn sort(mut self, sort: PostSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.visibility.admits(post.status.is_published())
            && self
                .ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| *id == post.id))
            && self.slug.as_deref().map_or(true, |slug| post.slug == slug)
            && self.category.map_or(true, |c| post.category == c)
            && self
                .page_id
                .as_deref()
                .map_or(true, |id| post.page_id() == Some(id))
            && self
                .language
                .as_deref()
                .map_or(true, |lang| post.language == lang)
    }

    /// Order `posts` in place according to `self.sort`.
    pub fn sort_posts(&self, posts: &mut [Post]) {
        match self.sort {
            PostSort::SortOrder => {
                posts.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)))
            }
            PostSort::Newest => posts.sort_by(|a, b| {
                b.published_at
                    .cmp(&a.published_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

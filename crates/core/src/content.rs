//! Content documents as the CMS stores them: pages, their embedded sections,
//! and posts.
//!
//! References between documents are [`Relation`]s, which the store may hand
//! back either as a bare id or as an inline (populated) document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// Shared field types
// ---------------------------------------------------------------------------

/// Publish state of a document. Drafts are only visible in preview mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
        }
    }

    pub fn is_published(self) -> bool {
        self == Status::Published
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Status::Draft),
            "published" => Ok(Status::Published),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// A per-language text field, keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized(pub BTreeMap<String, String>);

impl Localized {
    /// Value for `language`, treating blank strings as absent.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0
            .get(language)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn has(&self, language: &str) -> bool {
        self.get(language).is_some()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Localized {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Anything stored as a top-level document in the content store.
pub trait Document {
    fn id(&self) -> &str;
}

/// A reference to another document: either just its id or the document
/// itself when the store populated it inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Id(DocId),
    Populated(Box<T>),
}

impl<T: Document> Relation<T> {
    pub fn id(&self) -> &str {
        match self {
            Relation::Id(id) => id,
            Relation::Populated(doc) => doc.id(),
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Relation::Id(_) => None,
            Relation::Populated(doc) => Some(doc),
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, Relation::Populated(_))
    }
}

// ---------------------------------------------------------------------------
// Page and Section
// ---------------------------------------------------------------------------

/// A page document. Sections are embedded; posts point back at the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: DocId,
    pub slug: String,
    #[serde(default)]
    pub parent_page: Option<Relation<Page>>,
    pub title: Localized,
    #[serde(default)]
    pub description: Localized,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Page {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_page.as_ref().map(Relation::id)
    }

    /// A page exists in a language when it has a title there.
    pub fn is_translated(&self, language: &str) -> bool {
        self.title.has(language)
    }
}

impl Document for Page {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A content block embedded in a page.
///
/// `posts` is never stored: it is filled by
/// [`bind_posts`](crate::sections::bind_posts) after the page is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_id: String,
    #[serde(default)]
    pub title: Localized,
    #[serde(default)]
    pub content_blocks: serde_json::Value,
    #[serde(default)]
    pub content_array: serde_json::Value,
    #[serde(default, skip_deserializing)]
    pub posts: Vec<Post>,
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    News,
    Careers,
}

impl PostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::News => "news",
            PostCategory::Careers => "careers",
        }
    }
}

impl std::str::FromStr for PostCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(PostCategory::News),
            "careers" => Ok(PostCategory::Careers),
            other => Err(format!("unknown post category '{other}'")),
        }
    }
}

/// A news article or career posting. Each post is written in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: DocId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: serde_json::Value,
    pub category: PostCategory,
    #[serde(default)]
    pub page: Option<Relation<Page>>,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub related_posts: Vec<Relation<Post>>,
    pub language: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Post {
    pub fn page_id(&self) -> Option<&str> {
        self.page.as_ref().map(Relation::id)
    }

    /// Ids of related posts the store did not populate inline.
    pub fn unresolved_related_ids(&self) -> Vec<DocId> {
        self.related_posts
            .iter()
            .filter(|r| !r.is_populated())
            .map(|r| r.id().to_string())
            .collect()
    }
}

impl Document for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Language-resolved page
// ---------------------------------------------------------------------------

/// A page as served for one language, with sections bound to their posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPage {
    pub id: DocId,
    pub slug: String,
    pub parent_slug: Option<String>,
    pub language: String,
    pub title: String,
    pub description: String,
    pub sections: Vec<Section>,
    pub status: Status,
    pub updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn relation_deserializes_bare_id() {
        let rel: Relation<Page> = serde_json::from_value(json!("page-1")).unwrap();
        assert_matches!(rel, Relation::Id(ref id) if id == "page-1");
        assert_eq!(rel.id(), "page-1");
    }

    #[test]
    fn relation_deserializes_populated_document() {
        let rel: Relation<Page> = serde_json::from_value(json!({
            "id": "page-2",
            "slug": "about",
            "title": { "en": "About" },
        }))
        .unwrap();
        assert!(rel.is_populated());
        assert_eq!(rel.id(), "page-2");
        assert_eq!(rel.populated().unwrap().slug, "about");
    }

    #[test]
    fn localized_ignores_blank_values() {
        let title: Localized = [("en", "About"), ("zh", "  ")].into_iter().collect();
        assert_eq!(title.get("en"), Some("About"));
        assert!(!title.has("zh"));
        assert_eq!(title.languages().collect::<Vec<_>>(), vec!["en"]);
    }

    #[test]
    fn section_posts_are_not_read_from_input() {
        let section: Section = serde_json::from_value(json!({
            "section_id": "openings",
            "posts": [{ "bogus": true }],
        }))
        .unwrap();
        assert!(section.posts.is_empty());
    }

    #[test]
    fn unresolved_related_ids_skips_populated() {
        let populated = Post {
            id: "p2".into(),
            slug: "second".into(),
            title: "Second".into(),
            excerpt: None,
            content: serde_json::Value::Null,
            category: PostCategory::News,
            page: None,
            section_id: None,
            related_posts: vec![],
            language: "en".into(),
            status: Status::Published,
            sort_order: 0,
            published_at: None,
            updated_at: None,
        };
        let mut post = populated.clone();
        post.id = "p1".into();
        post.related_posts = vec![
            Relation::Id("p3".into()),
            Relation::Populated(Box::new(populated)),
        ];
        assert_eq!(post.unresolved_related_ids(), vec!["p3".to_string()]);
    }

    #[test]
    fn status_defaults_to_draft() {
        let page: Page =
            serde_json::from_value(json!({ "id": "1", "slug": "x", "title": {} })).unwrap();
        assert_eq!(page.status, Status::Draft);
        assert!(!page.status.is_published());
    }
}

//! Row type for the `posts` table.

use atrium_core::content::{Post, Relation};
use atrium_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::StoreError;

/// A row from the `posts` table. Relations come back as bare ids.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Json<serde_json::Value>,
    pub category: String,
    pub page_id: Option<String>,
    pub section_id: Option<String>,
    pub related_post_ids: Vec<String>,
    pub language: String,
    pub status: String,
    pub sort_order: i32,
    pub published_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl TryFrom<PostRow> for Post {
    type Error = StoreError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let decode = |reason: String| StoreError::Decode {
            id: row.id.clone(),
            reason,
        };
        let category = row.category.parse().map_err(decode)?;
        let status = row.status.parse().map_err(decode)?;
        Ok(Post {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content.0,
            category,
            page: row.page_id.map(Relation::Id),
            section_id: row.section_id,
            related_posts: row.related_post_ids.into_iter().map(Relation::Id).collect(),
            language: row.language,
            status,
            sort_order: row.sort_order,
            published_at: row.published_at,
            updated_at: Some(row.updated_at),
        })
    }
}

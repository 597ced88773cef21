//! Repository for the `posts` table.

use atrium_core::content::Post;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::StoreError;
use crate::models::post::PostRow;
use crate::store::query::{PostQuery, PostSort, Visibility};

/// Column list for posts queries.
const COLUMNS: &str = "id, slug, title, excerpt, content, category, page_id, section_id, \
    related_post_ids, language, status, sort_order, published_at, updated_at";

/// Read-only access to posts.
pub struct PostRepo;

impl PostRepo {
    /// Find posts matching `query`.
    pub async fn find(pool: &PgPool, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        if matches!(&query.ids, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM posts WHERE TRUE"));

        if query.visibility == Visibility::Published {
            qb.push(" AND status = 'published'");
        }
        if let Some(ids) = &query.ids {
            qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        if let Some(slug) = &query.slug {
            qb.push(" AND slug = ").push_bind(slug.clone());
        }
        if let Some(category) = query.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(page_id) = &query.page_id {
            qb.push(" AND page_id = ").push_bind(page_id.clone());
        }
        if let Some(language) = &query.language {
            qb.push(" AND language = ").push_bind(language.clone());
        }
        match query.sort {
            PostSort::SortOrder => qb.push(" ORDER BY sort_order ASC, id"),
            PostSort::Newest => qb.push(" ORDER BY published_at DESC NULLS LAST, id"),
        };
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let rows = qb.build_query_as::<PostRow>().fetch_all(pool).await?;
        rows.into_iter().map(Post::try_from).collect()
    }
}

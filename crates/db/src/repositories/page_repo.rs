//! Repository for the `pages` table.

use atrium_core::content::Page;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::StoreError;
use crate::models::page::PageRow;
use crate::store::query::{PageQuery, ParentFilter, Visibility};

/// Column list for pages queries.
const COLUMNS: &str = "id, slug, parent_page_id, title, description, sections, status, updated_at";

/// Read-only access to pages.
pub struct PageRepo;

impl PageRepo {
    /// Find pages matching `query`, newest first.
    pub async fn find(pool: &PgPool, query: &PageQuery) -> Result<Vec<Page>, StoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM pages WHERE TRUE"));

        if query.visibility == Visibility::Published {
            qb.push(" AND status = 'published'");
        }
        if let Some(id) = &query.id {
            qb.push(" AND id = ").push_bind(id.clone());
        }
        if let Some(slug) = &query.slug {
            qb.push(" AND slug = ").push_bind(slug.clone());
        }
        match &query.parent {
            ParentFilter::Any => {}
            ParentFilter::Root => {
                qb.push(" AND parent_page_id IS NULL");
            }
            ParentFilter::Id(parent_id) => {
                qb.push(" AND parent_page_id = ").push_bind(parent_id.clone());
            }
        }
        if let Some(locale) = &query.locale {
            qb.push(" AND NULLIF(btrim(title ->> ")
                .push_bind(locale.clone())
                .push("), '') IS NOT NULL");
        }
        qb.push(" ORDER BY updated_at DESC, id");
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let rows = qb.build_query_as::<PageRow>().fetch_all(pool).await?;
        rows.into_iter().map(Page::try_from).collect()
    }

    /// Find a page by id, in any status.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Page>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        let row = sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Page::try_from).transpose()
    }
}

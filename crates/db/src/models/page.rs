//! Row type for the `pages` table.

use atrium_core::content::{Localized, Page, Relation, Section};
use atrium_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::StoreError;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow)]
pub struct PageRow {
    pub id: String,
    pub slug: String,
    pub parent_page_id: Option<String>,
    pub title: Json<Localized>,
    pub description: Json<Localized>,
    pub sections: Json<Vec<Section>>,
    pub status: String,
    pub updated_at: Timestamp,
}

impl TryFrom<PageRow> for Page {
    type Error = StoreError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|reason| StoreError::Decode {
            id: row.id.clone(),
            reason,
        })?;
        Ok(Page {
            id: row.id,
            slug: row.slug,
            parent_page: row.parent_page_id.map(Relation::Id),
            title: row.title.0,
            description: row.description.0,
            sections: row.sections.0,
            status,
            updated_at: Some(row.updated_at),
        })
    }
}

//! SQL repositories backing [`PgContentStore`](crate::PgContentStore).

pub mod page_repo;
pub mod post_repo;

pub use page_repo::PageRepo;
pub use post_repo::PostRepo;

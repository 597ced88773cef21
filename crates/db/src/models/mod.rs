pub mod page;
pub mod post;

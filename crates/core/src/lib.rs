//! Atrium core domain logic.
//!
//! Everything in this crate is pure: content document models, the site
//! configuration tables, route classification, section-post binding,
//! canonical path computation and component selection. No I/O happens here,
//! so both the store adapters and the HTTP layer can depend on it.

pub mod components;
pub mod config;
pub mod content;
pub mod error;
pub mod page_tree;
pub mod paths;
pub mod route;
pub mod sections;
pub mod types;

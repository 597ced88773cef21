//! Atrium API server library.
//!
//! Exposes the building blocks (config, state, content fetchers, resolver,
//! render cache, revalidation, routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render_cache;
pub mod resolver;
pub mod response;
pub mod revalidation;
pub mod router;
pub mod routes;
pub mod state;

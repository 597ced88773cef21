pub mod hooks;
pub mod metadata;
pub mod site;
pub mod sitemap;

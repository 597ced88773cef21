//! Static site configuration tables.
//!
//! Loaded once at startup (built-in defaults or a JSON file), validated, and
//! then shared read-only by the route parser and the resolver.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::route::RouteParser;

// ---------------------------------------------------------------------------
// Canonical section names
// ---------------------------------------------------------------------------

/// Canonical (language-independent) name of the news section.
pub const NEWS_SECTION: &str = "news";
/// Canonical (language-independent) name of the careers section.
pub const CAREERS_SECTION: &str = "careers";
/// Canonical name of the career application sub-route.
pub const APPLY_SEGMENT: &str = "apply";

// ---------------------------------------------------------------------------
// Component keys
// ---------------------------------------------------------------------------

/// Identifier of a presentational component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(pub String);

impl ComponentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Localized route names reserved for the news and careers sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNames {
    pub news: String,
    pub careers: String,
    pub apply: String,
}

impl RouteNames {
    fn validate(&self, language: &str) -> Result<(), CoreError> {
        for (field, value) in [
            ("news", &self.news),
            ("careers", &self.careers),
            ("apply", &self.apply),
        ] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(CoreError::Config(format!(
                    "route name '{field}' for language '{language}' must be a single non-empty segment"
                )));
            }
        }
        Ok(())
    }
}

/// Component lookup tables, consulted in priority order by
/// [`select_component`](crate::components::select_component).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTable {
    /// Keyed by `"{parent}/{extra}"`. Also defines which two- and
    /// three-segment paths are special nested routes.
    #[serde(default)]
    pub nested: BTreeMap<String, ComponentKey>,
    /// Keyed by parent slug, or by canonical section name for news/careers.
    #[serde(default)]
    pub parents: BTreeMap<String, ComponentKey>,
    /// Keyed by page slug.
    #[serde(default)]
    pub pages: BTreeMap<String, ComponentKey>,
    #[serde(default)]
    pub default: Option<ComponentKey>,
    pub not_found: ComponentKey,
    pub error: ComponentKey,
}

// ---------------------------------------------------------------------------
// SiteConfig
// ---------------------------------------------------------------------------

/// Immutable site-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site_name: String,
    pub default_language: String,
    pub languages: Vec<String>,
    pub route_names: BTreeMap<String, RouteNames>,
    pub components: ComponentTable,
    /// Page slugs whose posts are never fetched.
    #[serde(default)]
    pub pages_without_posts: Vec<String>,
}

impl SiteConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        let config: SiteConfig = serde_json::from_str(raw)
            .map_err(|e| CoreError::Config(format!("malformed site config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-table consistency.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.languages.is_empty() {
            return Err(CoreError::Config("at least one language is required".into()));
        }
        if !self.is_supported(&self.default_language) {
            return Err(CoreError::Config(format!(
                "default language '{}' is not in the language list",
                self.default_language
            )));
        }
        for language in &self.languages {
            let names = self.route_names.get(language).ok_or_else(|| {
                CoreError::Config(format!("no route names for language '{language}'"))
            })?;
            names.validate(language)?;
        }
        for key in self.components.nested.keys() {
            match key.split_once('/') {
                Some((parent, extra))
                    if !parent.is_empty() && !extra.is_empty() && !extra.contains('/') => {}
                _ => {
                    return Err(CoreError::Config(format!(
                        "nested route key '{key}' must look like 'parent/extra'"
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    pub fn route_names(&self, language: &str) -> Option<&RouteNames> {
        self.route_names.get(language)
    }

    /// A segment parser for `language`, or `None` if it is not supported.
    pub fn parser(&self, language: &str) -> Option<RouteParser<'_>> {
        if !self.is_supported(language) {
            return None;
        }
        let names = self.route_names(language)?;
        Some(RouteParser::new(names, &self.components.nested))
    }

    pub fn skips_posts(&self, page_slug: &str) -> bool {
        self.pages_without_posts.iter().any(|s| s == page_slug)
    }
}

impl Default for SiteConfig {
    /// Built-in tables for the English / Vietnamese / Chinese site.
    fn default() -> Self {
        let names = |news: &str, careers: &str, apply: &str| RouteNames {
            news: news.into(),
            careers: careers.into(),
            apply: apply.into(),
        };
        let key = ComponentKey::new;

        let route_names = BTreeMap::from([
            ("en".to_string(), names("news", "careers", "apply")),
            ("vi".to_string(), names("tin-tuc", "tuyen-dung", "ung-tuyen")),
            ("zh".to_string(), names("xinwen", "zhaopin", "shenqing")),
        ]);

        let components = ComponentTable {
            nested: BTreeMap::from([
                ("careers/apply".to_string(), key("career-application")),
                ("about/team".to_string(), key("team-member")),
            ]),
            parents: BTreeMap::from([
                (NEWS_SECTION.to_string(), key("news-post")),
                (CAREERS_SECTION.to_string(), key("career-detail")),
            ]),
            pages: BTreeMap::from([
                ("home".to_string(), key("home")),
                ("news".to_string(), key("news-listing")),
                ("careers".to_string(), key("career-listing")),
                ("contact".to_string(), key("contact")),
            ]),
            default: Some(key("standard-page")),
            not_found: key("not-found"),
            error: key("error"),
        };

        Self {
            site_name: "Atrium".into(),
            default_language: "en".into(),
            languages: vec!["en".into(), "vi".into(), "zh".into()],
            route_names,
            components,
            pages_without_posts: vec!["contact".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

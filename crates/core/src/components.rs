//! Presentational component selection.

use crate::config::{ComponentKey, ComponentTable, APPLY_SEGMENT, CAREERS_SECTION, NEWS_SECTION};
use crate::route::{nested_key, RouteDescriptor};

/// The table keys a route is looked up under, most specific first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentCandidates {
    pub nested: Option<String>,
    pub parent: Option<String>,
    pub page: Option<String>,
}

impl ComponentCandidates {
    pub fn for_route(route: &RouteDescriptor) -> Self {
        match route {
            RouteDescriptor::Page { slug } => Self {
                page: Some(slug.clone()),
                ..Self::default()
            },
            RouteDescriptor::ChildPage {
                parent_slug,
                child_slug,
            } => Self {
                nested: Some(nested_key(parent_slug, child_slug)),
                parent: Some(parent_slug.clone()),
                page: Some(child_slug.clone()),
            },
            RouteDescriptor::News { .. } => Self {
                parent: Some(NEWS_SECTION.to_string()),
                ..Self::default()
            },
            RouteDescriptor::Career { .. } => Self {
                parent: Some(CAREERS_SECTION.to_string()),
                ..Self::default()
            },
            RouteDescriptor::CareerApplication { .. } => Self {
                nested: Some(nested_key(CAREERS_SECTION, APPLY_SEGMENT)),
                parent: Some(CAREERS_SECTION.to_string()),
                page: None,
            },
            RouteDescriptor::SpecialNested {
                parent_slug,
                extra_path,
                ..
            } => Self {
                nested: Some(nested_key(parent_slug, extra_path)),
                parent: Some(parent_slug.clone()),
                page: Some(extra_path.clone()),
            },
            RouteDescriptor::NotFound => Self::default(),
        }
    }
}

/// Pick the component for `route`: nested-route component, then
/// parent-route component, then page component, then the default.
///
/// `None` means nothing renders for this route.
pub fn select_component(route: &RouteDescriptor, table: &ComponentTable) -> Option<ComponentKey> {
    if route.is_not_found() {
        return Some(table.not_found.clone());
    }
    let candidates = ComponentCandidates::for_route(route);

    candidates
        .nested
        .as_deref()
        .and_then(|k| table.nested.get(k))
        .or_else(|| candidates.parent.as_deref().and_then(|k| table.parents.get(k)))
        .or_else(|| candidates.page.as_deref().and_then(|k| table.pages.get(k)))
        .or(table.default.as_ref())
        .cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Route segment classification.
//!
//! Turns the path segments that follow the language prefix into a
//! [`RouteDescriptor`]. Parsing never fails: shapes that match no rule are
//! classified as [`RouteDescriptor::NotFound`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{ComponentKey, RouteNames};
use crate::paths::{localized_path, HOME_SLUG};

/// Classified shape of a request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteDescriptor {
    /// A top-level page. The empty path is `Page { slug: "home" }`.
    Page { slug: String },
    /// A page nested under a parent page.
    ChildPage {
        parent_slug: String,
        child_slug: String,
    },
    /// A news article, looked up by slug.
    News { post_slug: String },
    /// A career posting, looked up by id.
    Career { post_id: String },
    /// The application form for a career posting.
    CareerApplication { post_id: String },
    /// The page at `parent_slug/extra_path` from the nested-route table,
    /// framing the post `post_id` when the path carries one.
    SpecialNested {
        parent_slug: String,
        extra_path: String,
        post_id: Option<String>,
    },
    NotFound,
}

impl RouteDescriptor {
    pub fn home() -> Self {
        RouteDescriptor::Page {
            slug: HOME_SLUG.to_string(),
        }
    }

    pub fn page_slug(&self) -> Option<&str> {
        match self {
            RouteDescriptor::Page { slug } => Some(slug),
            _ => None,
        }
    }

    pub fn parent_slug(&self) -> Option<&str> {
        match self {
            RouteDescriptor::ChildPage { parent_slug, .. }
            | RouteDescriptor::SpecialNested { parent_slug, .. } => Some(parent_slug),
            _ => None,
        }
    }

    /// The second-level identifier: child page slug, post slug or post id.
    pub fn child_slug(&self) -> Option<&str> {
        match self {
            RouteDescriptor::ChildPage { child_slug, .. } => Some(child_slug),
            RouteDescriptor::News { post_slug } => Some(post_slug),
            RouteDescriptor::Career { post_id }
            | RouteDescriptor::CareerApplication { post_id } => Some(post_id),
            RouteDescriptor::SpecialNested { post_id, .. } => post_id.as_deref(),
            _ => None,
        }
    }

    pub fn extra_path(&self) -> Option<&str> {
        match self {
            RouteDescriptor::SpecialNested { extra_path, .. } => Some(extra_path),
            _ => None,
        }
    }

    pub fn is_news(&self) -> bool {
        matches!(self, RouteDescriptor::News { .. })
    }

    pub fn is_career(&self) -> bool {
        matches!(
            self,
            RouteDescriptor::Career { .. } | RouteDescriptor::CareerApplication { .. }
        )
    }

    pub fn is_career_application(&self) -> bool {
        matches!(self, RouteDescriptor::CareerApplication { .. })
    }

    pub fn is_special_nested(&self) -> bool {
        matches!(self, RouteDescriptor::SpecialNested { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteDescriptor::NotFound)
    }

    /// Public path of this route in `language`, using that language's route
    /// names. `None` for [`RouteDescriptor::NotFound`].
    pub fn to_path(&self, language: &str, names: &RouteNames) -> Option<String> {
        let segments: Vec<&str> = match self {
            RouteDescriptor::Page { slug } if slug == HOME_SLUG => vec![],
            RouteDescriptor::Page { slug } => vec![slug.as_str()],
            RouteDescriptor::ChildPage {
                parent_slug,
                child_slug,
            } => vec![parent_slug.as_str(), child_slug.as_str()],
            RouteDescriptor::News { post_slug } => vec![names.news.as_str(), post_slug.as_str()],
            RouteDescriptor::Career { post_id } => vec![names.careers.as_str(), post_id.as_str()],
            RouteDescriptor::CareerApplication { post_id } => vec![
                names.careers.as_str(),
                names.apply.as_str(),
                post_id.as_str(),
            ],
            RouteDescriptor::SpecialNested {
                parent_slug,
                extra_path,
                post_id,
            } => [Some(parent_slug), Some(extra_path), post_id.as_ref()]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect(),
            RouteDescriptor::NotFound => return None,
        };
        Some(localized_path(language, &segments))
    }
}

/// Key into the nested-route component table.
pub fn nested_key(parent: &str, extra: &str) -> String {
    format!("{parent}/{extra}")
}

/// Split a raw path into segments, dropping empty ones (`a//b` → `[a, b]`).
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Segment parser bound to one language's route names.
#[derive(Debug, Clone, Copy)]
pub struct RouteParser<'a> {
    names: &'a RouteNames,
    nested: &'a BTreeMap<String, ComponentKey>,
}

impl<'a> RouteParser<'a> {
    pub fn new(names: &'a RouteNames, nested: &'a BTreeMap<String, ComponentKey>) -> Self {
        Self { names, nested }
    }

    /// Classify `segments`. Rules are tried in order; the careers
    /// application rule wins over the generic nested-route rule.
    pub fn parse<S: AsRef<str>>(&self, segments: &[S]) -> RouteDescriptor {
        let segs: Vec<&str> = segments
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .collect();

        match segs.as_slice() {
            [] => RouteDescriptor::home(),
            [first, slug] if *first == self.names.news => RouteDescriptor::News {
                post_slug: slug.to_string(),
            },
            [first, apply, id] if *first == self.names.careers && *apply == self.names.apply => {
                RouteDescriptor::CareerApplication {
                    post_id: id.to_string(),
                }
            }
            [first, id] if *first == self.names.careers => RouteDescriptor::Career {
                post_id: id.to_string(),
            },
            [slug] => RouteDescriptor::Page {
                slug: slug.to_string(),
            },
            [parent, extra] if self.nested.contains_key(&nested_key(parent, extra)) => {
                RouteDescriptor::SpecialNested {
                    parent_slug: parent.to_string(),
                    extra_path: extra.to_string(),
                    post_id: None,
                }
            }
            [parent, child] => RouteDescriptor::ChildPage {
                parent_slug: parent.to_string(),
                child_slug: child.to_string(),
            },
            [parent, extra, id] if self.nested.contains_key(&nested_key(parent, extra)) => {
                RouteDescriptor::SpecialNested {
                    parent_slug: parent.to_string(),
                    extra_path: extra.to_string(),
                    post_id: Some(id.to_string()),
                }
            }
            _ => RouteDescriptor::NotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::config::SiteConfig;

    fn parse(language: &str, segments: &[&str]) -> RouteDescriptor {
        let config = SiteConfig::default();
        config.parser(language).unwrap().parse(segments)
    }

    // -- pages ---------------------------------------------------------------

    #[test]
    fn empty_path_is_home() {
        assert_eq!(parse("en", &[]), RouteDescriptor::home());
        assert_eq!(parse("vi", &[]).page_slug(), Some("home"));
    }

    #[test]
    fn single_segment_is_plain_page() {
        for slug in ["about", "contact", "news", "careers", "anything-else"] {
            let route = parse("en", &[slug]);
            assert_eq!(route.page_slug(), Some(slug));
            assert_eq!(route.parent_slug(), None);
            assert_eq!(route.child_slug(), None);
            assert_eq!(route.extra_path(), None);
            assert!(!route.is_news());
            assert!(!route.is_career());
            assert!(!route.is_special_nested());
        }
    }

    #[test]
    fn two_segments_is_child_page() {
        assert_matches!(
            parse("en", &["about", "history"]),
            RouteDescriptor::ChildPage { parent_slug, child_slug }
                if parent_slug == "about" && child_slug == "history"
        );
    }

    #[test]
    fn empty_segments_are_ignored() {
        assert_eq!(parse("en", &["", "about", ""]), parse("en", &["about"]));
        assert_eq!(split_path("/about//team/"), vec!["about", "team"]);
    }

    // -- news / careers ------------------------------------------------------

    #[test]
    fn news_route_uses_slug() {
        let route = parse("en", &["news", "launch-announcement"]);
        assert!(route.is_news());
        assert_eq!(route.child_slug(), Some("launch-announcement"));
    }

    #[test]
    fn news_route_name_is_per_language() {
        assert!(parse("vi", &["tin-tuc", "ra-mat"]).is_news());
        // The English route name is just a parent slug in Vietnamese.
        assert_matches!(
            parse("vi", &["news", "ra-mat"]),
            RouteDescriptor::ChildPage { .. }
        );
    }

    #[test]
    fn career_route_uses_id() {
        assert_matches!(
            parse("en", &["careers", "JOB-001"]),
            RouteDescriptor::Career { post_id } if post_id == "JOB-001"
        );
    }

    #[test]
    fn career_application_takes_priority_over_nested_table() {
        // "careers/apply" is also a key of the nested table.
        let route = parse("en", &["careers", "apply", "JOB-001"]);
        assert_matches!(
            route,
            RouteDescriptor::CareerApplication { ref post_id } if post_id == "JOB-001"
        );
        assert!(route.is_career());
        assert!(!route.is_special_nested());
    }

    #[test]
    fn localized_apply_segment() {
        assert!(parse("vi", &["tuyen-dung", "ung-tuyen", "JOB-9"]).is_career_application());
        assert_eq!(
            parse("vi", &["tuyen-dung", "apply", "JOB-9"]),
            RouteDescriptor::NotFound
        );
    }

    // -- special nested ------------------------------------------------------

    #[test]
    fn nested_table_key_marks_special_nested() {
        let route = parse("en", &["about", "team", "member-7"]);
        assert!(route.is_special_nested());
        assert_eq!(route.parent_slug(), Some("about"));
        assert_eq!(route.extra_path(), Some("team"));
        assert_eq!(route.child_slug(), Some("member-7"));
    }

    #[test]
    fn two_segment_nested_key_is_special_nested_without_post() {
        let route = parse("en", &["about", "team"]);
        assert_matches!(
            route,
            RouteDescriptor::SpecialNested {
                ref parent_slug,
                ref extra_path,
                post_id: None,
            } if parent_slug == "about" && extra_path == "team"
        );
        assert_eq!(route.child_slug(), None);
    }

    #[test]
    fn every_nested_key_is_recognized() {
        let config = SiteConfig::default();
        // No nested key starts with a zh news/careers route name.
        let parser = config.parser("zh").unwrap();
        for key in config.components.nested.keys() {
            let (parent, extra) = key.split_once('/').unwrap();
            assert!(parser.parse(&[parent, extra]).is_special_nested(), "{key}");
            assert!(parser.parse(&[parent, extra, "id-1"]).is_special_nested(), "{key}");
        }
    }

    #[test]
    fn careers_route_name_wins_over_two_segment_nested_key() {
        assert_matches!(
            parse("en", &["careers", "apply"]),
            RouteDescriptor::Career { post_id } if post_id == "apply"
        );
    }

    #[test]
    fn unknown_three_segment_path_is_not_found() {
        assert_eq!(
            parse("en", &["about", "history", "extra"]),
            RouteDescriptor::NotFound
        );
    }

    // -- to_path -------------------------------------------------------------

    #[test]
    fn to_path_uses_target_language_route_names() {
        let config = SiteConfig::default();
        let route = parse("en", &["careers", "apply", "JOB-001"]);
        let vi = config.route_names("vi").unwrap();
        assert_eq!(
            route.to_path("vi", vi).as_deref(),
            Some("/vi/tuyen-dung/ung-tuyen/JOB-001")
        );
        assert_eq!(RouteDescriptor::home().to_path("vi", vi).as_deref(), Some("/vi"));
        assert_eq!(RouteDescriptor::NotFound.to_path("vi", vi), None);
    }

    #[test]
    fn to_path_parses_back_to_same_route() {
        let config = SiteConfig::default();
        let routes = [
            parse("en", &[]),
            parse("en", &["about"]),
            parse("en", &["about", "history"]),
            parse("en", &["about", "team", "m-1"]),
            parse("en", &["about", "team"]),
            parse("en", &["news", "launch"]),
            parse("en", &["careers", "JOB-1"]),
            parse("en", &["careers", "apply", "JOB-1"]),
        ];
        for language in ["en", "vi", "zh"] {
            let names = config.route_names(language).unwrap();
            let parser = config.parser(language).unwrap();
            for route in &routes {
                let path = route.to_path(language, names).unwrap();
                let prefix = format!("/{language}");
                let rest = path.strip_prefix(&prefix).unwrap();
                assert_eq!(&parser.parse(&split_path(rest)), route, "{path}");
            }
        }
    }

    #[test]
    fn deep_paths_are_not_found() {
        assert!(parse("en", &["a", "b", "c", "d"]).is_not_found());
        assert!(parse("en", &["news", "a", "b"]).is_not_found());
    }
}

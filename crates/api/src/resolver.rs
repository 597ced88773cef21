//! Route resolution: from a language and path segments to the component to
//! render and the documents it renders.
//!
//! The resolver never fails. Unsupported languages redirect, missing content
//! becomes [`Resolution::NotFound`], and a panic anywhere in resolution is
//! caught and becomes [`Resolution::Error`].

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use atrium_core::components::select_component;
use atrium_core::config::{ComponentKey, SiteConfig};
use atrium_core::content::{Post, Relation, ResolvedPage, Section};
use atrium_core::paths::localized_path;
use atrium_core::route::RouteDescriptor;
use futures::FutureExt;
use serde::Serialize;

use crate::content::{ContentFetcher, RequestScope};

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Documents handed to the presentational component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderProps {
    /// The page's sections with their posts bound, or empty.
    pub sections: Vec<Section>,
    /// The post being shown, for news, career and special nested routes.
    pub data: Option<Post>,
    pub page: Option<ResolvedPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderInput {
    /// `None` means nothing is rendered for this route.
    pub component: Option<ComponentKey>,
    pub route: RouteDescriptor,
    pub props: RenderProps,
    pub language: String,
}

impl RenderInput {
    /// Ids of every document this render shows, sorted and distinct.
    pub fn document_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        if let Some(page) = &self.props.page {
            ids.push(&page.id);
        }
        for section in &self.props.sections {
            ids.extend(section.posts.iter().map(|post| post.id.as_str()));
        }
        if let Some(post) = &self.props.data {
            ids.push(&post.id);
            ids.extend(post.related_posts.iter().map(Relation::id));
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(RenderInput),
    NotFound(RenderInput),
    Error(RenderInput),
    /// The language is not supported; the same path under the default
    /// language.
    Redirect(String),
}

impl Resolution {
    pub fn render_input(&self) -> Option<&RenderInput> {
        match self {
            Resolution::Found(input) | Resolution::NotFound(input) | Resolution::Error(input) => {
                Some(input)
            }
            Resolution::Redirect(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Document metadata for a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub description: Option<String>,
    /// Language of the document the metadata came from.
    pub language: String,
    pub canonical_path: Option<String>,
    /// The same route in every supported language.
    pub alternates: BTreeMap<String, String>,
    pub found: bool,
}

/// What one dispatch fetched.
#[derive(Debug, Default)]
struct Fetched {
    page: Option<ResolvedPage>,
    post: Option<Post>,
}

impl Fetched {
    fn is_empty(&self) -> bool {
        self.page.is_none() && self.post.is_none()
    }

    fn into_props(self) -> RenderProps {
        RenderProps {
            sections: self
                .page
                .as_ref()
                .map(|p| p.sections.clone())
                .unwrap_or_default(),
            data: self.post,
            page: self.page,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

pub struct Resolver {
    site: Arc<SiteConfig>,
    fetcher: ContentFetcher,
}

impl Resolver {
    pub fn new(site: Arc<SiteConfig>, fetcher: ContentFetcher) -> Self {
        Self { site, fetcher }
    }

    pub fn fetcher(&self) -> &ContentFetcher {
        &self.fetcher
    }

    /// Resolve the page at `/{language}/{segments...}`.
    pub async fn resolve(
        &self,
        language: &str,
        segments: &[String],
        scope: &RequestScope,
    ) -> Resolution {
        let result = AssertUnwindSafe(self.resolve_route(language, segments, scope))
            .catch_unwind()
            .await;
        match result {
            Ok(resolution) => resolution,
            Err(panic) => {
                tracing::error!(
                    path = %localized_path(language, segments),
                    panic = %panic_message(panic.as_ref()),
                    "Route resolution panicked"
                );
                Resolution::Error(RenderInput {
                    component: Some(self.site.components.error.clone()),
                    route: RouteDescriptor::NotFound,
                    props: RenderProps::default(),
                    language: self.fallback_language(language).to_string(),
                })
            }
        }
    }

    async fn resolve_route(
        &self,
        language: &str,
        segments: &[String],
        scope: &RequestScope,
    ) -> Resolution {
        let Some(parser) = self.site.parser(language) else {
            let location = self.redirect_location(language, segments);
            tracing::debug!(language = %language, location = %location, "Unsupported language, redirecting");
            return Resolution::Redirect(location);
        };

        let route = parser.parse(segments);
        let fetched = self.dispatch(&route, language, scope).await;
        if fetched.is_empty() {
            tracing::debug!(path = %localized_path(language, segments), "No content for route");
            return Resolution::NotFound(RenderInput {
                component: Some(self.site.components.not_found.clone()),
                route,
                props: RenderProps::default(),
                language: language.to_string(),
            });
        }

        let component = select_component(&route, &self.site.components);
        Resolution::Found(RenderInput {
            component,
            route,
            props: fetched.into_props(),
            language: language.to_string(),
        })
    }

    /// Metadata for `/{language}/{segments...}`, falling back to the default
    /// language when the route has no content in `language`.
    pub async fn generate_metadata(
        &self,
        language: &str,
        segments: &[String],
        scope: &RequestScope,
    ) -> Metadata {
        let result = AssertUnwindSafe(self.metadata_for(language, segments, scope))
            .catch_unwind()
            .await;
        match result {
            Ok(metadata) => metadata,
            Err(panic) => {
                tracing::error!(
                    path = %localized_path(language, segments),
                    panic = %panic_message(panic.as_ref()),
                    "Metadata generation panicked"
                );
                self.site_metadata(self.fallback_language(language))
            }
        }
    }

    async fn metadata_for(
        &self,
        language: &str,
        segments: &[String],
        scope: &RequestScope,
    ) -> Metadata {
        // Unsupported languages are treated like the redirect target.
        let (language, segments) = if self.site.is_supported(language) {
            (language, segments.to_vec())
        } else {
            let mut prefixed = Vec::with_capacity(segments.len() + 1);
            prefixed.push(language.to_string());
            prefixed.extend_from_slice(segments);
            (self.site.default_language.as_str(), prefixed)
        };
        let Some(parser) = self.site.parser(language) else {
            return self.site_metadata(language);
        };

        let route = parser.parse(&segments);
        let mut fetched = self.dispatch(&route, language, scope).await;
        let mut content_language = language;
        let default = self.site.default_language.as_str();
        if fetched.is_empty() && language != default {
            tracing::debug!(
                language = %language,
                fallback = %default,
                "No content in requested language, using default language metadata"
            );
            fetched = self.dispatch(&route, default, scope).await;
            content_language = default;
        }

        let document = match (&fetched.post, &fetched.page) {
            (Some(post), _) => Some((post.title.clone(), post.excerpt.clone())),
            (None, Some(page)) => Some((
                page.title.clone(),
                Some(page.description.clone()).filter(|d| !d.is_empty()),
            )),
            (None, None) => None,
        };

        let mut metadata = match document {
            Some((title, description)) => Metadata {
                title: format!("{title} | {}", self.site.site_name),
                description,
                language: content_language.to_string(),
                canonical_path: None,
                alternates: BTreeMap::new(),
                found: true,
            },
            None => self.site_metadata(language),
        };
        metadata.canonical_path = self
            .site
            .route_names(language)
            .and_then(|names| route.to_path(language, names));
        metadata.alternates = self
            .site
            .languages
            .iter()
            .filter_map(|lang| {
                let names = self.site.route_names(lang)?;
                Some((lang.clone(), route.to_path(lang, names)?))
            })
            .collect();
        metadata
    }

    /// Fetch what `route` needs in `language`.
    async fn dispatch(
        &self,
        route: &RouteDescriptor,
        language: &str,
        scope: &RequestScope,
    ) -> Fetched {
        let fetcher = &self.fetcher;
        match route {
            RouteDescriptor::News { post_slug } => Fetched {
                post: fetcher.fetch_post_by_slug(scope, post_slug, language).await,
                page: None,
            },
            RouteDescriptor::Career { post_id }
            | RouteDescriptor::CareerApplication { post_id } => Fetched {
                post: fetcher.fetch_post_by_id(scope, post_id, language).await,
                page: None,
            },
            RouteDescriptor::SpecialNested {
                parent_slug,
                extra_path,
                post_id,
            } => {
                let framing_page =
                    fetcher.fetch_page_by_slug(scope, extra_path, Some(parent_slug.as_str()), language);
                match post_id {
                    Some(post_id) => {
                        let (post, page) = tokio::join!(
                            fetcher.fetch_post_by_id(scope, post_id, language),
                            framing_page,
                        );
                        Fetched { page, post }
                    }
                    None => Fetched {
                        page: framing_page.await,
                        post: None,
                    },
                }
            }
            RouteDescriptor::ChildPage {
                parent_slug,
                child_slug,
            } => Fetched {
                page: fetcher
                    .fetch_page_by_slug(scope, child_slug, Some(parent_slug.as_str()), language)
                    .await,
                post: None,
            },
            RouteDescriptor::Page { slug } => Fetched {
                page: fetcher.fetch_page_by_slug(scope, slug, None, language).await,
                post: None,
            },
            RouteDescriptor::NotFound => Fetched::default(),
        }
    }

    /// `/{default}/{language}/{segments...}`: the unsupported language is
    /// taken to be the first path segment.
    fn redirect_location(&self, language: &str, segments: &[String]) -> String {
        let mut path = Vec::with_capacity(segments.len() + 1);
        path.push(language);
        path.extend(segments.iter().map(String::as_str));
        localized_path(&self.site.default_language, &path)
    }

    fn fallback_language<'a>(&'a self, language: &'a str) -> &'a str {
        if self.site.is_supported(language) {
            language
        } else {
            &self.site.default_language
        }
    }

    fn site_metadata(&self, language: &str) -> Metadata {
        Metadata {
            title: self.site.site_name.clone(),
            description: None,
            language: language.to_string(),
            canonical_path: None,
            alternates: BTreeMap::new(),
            found: false,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Canonical public paths for pages and posts.

/// Slug of the home page; its path collapses to `/{lang}`.
pub const HOME_SLUG: &str = "home";

/// Path segment used for posts that are not attached to any page.
pub const UNATTACHED_POSTS_SEGMENT: &str = "posts";

/// Public path of a page: `/{lang}[/{parent}]/{slug}`, or `/{lang}` for home.
pub fn page_path(language: &str, parent_slug: Option<&str>, slug: &str) -> String {
    if slug == HOME_SLUG {
        return format!("/{language}");
    }
    match parent_slug {
        Some(parent) => format!("/{language}/{parent}/{slug}"),
        None => format!("/{language}/{slug}"),
    }
}

/// Public path of a post: `/{lang}/{page}/{slug}`, or
/// `/{lang}/posts/{slug}` when the post has no page.
pub fn post_path(language: &str, page_slug: Option<&str>, slug: &str) -> String {
    let page = page_slug.unwrap_or(UNATTACHED_POSTS_SEGMENT);
    format!("/{language}/{page}/{slug}")
}

/// Join `segments` under a language prefix.
pub fn localized_path<S: AsRef<str>>(language: &str, segments: &[S]) -> String {
    let mut path = format!("/{language}");
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        path.push('/');
        path.push_str(segment);
    }
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

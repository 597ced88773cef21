//! Section-post binding.

use std::collections::HashMap;

use crate::content::{Post, Section};

/// Attach each post to the section whose `section_id` it names.
///
/// Posts keep their input order within a section. Posts without a matching
/// section are dropped. Any posts already on a section are replaced, so
/// binding is idempotent.
pub fn bind_posts(sections: Vec<Section>, posts: &[Post]) -> Vec<Section> {
    let mut by_section: HashMap<&str, Vec<&Post>> = HashMap::new();
    for post in posts {
        if let Some(section_id) = post.section_id.as_deref() {
            by_section.entry(section_id).or_default().push(post);
        }
    }

    sections
        .into_iter()
        .map(|mut section| {
            section.posts = by_section
                .get(section.section_id.as_str())
                .map(|matched| matched.iter().map(|p| (*p).clone()).collect())
                .unwrap_or_default();
            section
        })
        .collect()
}

/// Total number of posts attached across all sections.
pub fn bound_post_count(sections: &[Section]) -> usize {
    sections.iter().map(|s| s.posts.len()).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Arena of pages keyed by id, with bounded parent walks.
//!
//! The `parent_page` reference can form a cycle if bad data slips past the
//! CMS. Walks here are capped at [`MAX_PARENT_DEPTH`] and a cycle or an
//! over-deep chain yields "no parent" rather than looping.

use std::collections::{HashMap, HashSet};

use crate::content::Page;
use crate::types::DocId;

/// Maximum number of ancestors followed from any page.
pub const MAX_PARENT_DEPTH: usize = 8;

/// The parts of a page the tree walk needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    pub id: DocId,
    pub slug: String,
    pub parent_id: Option<DocId>,
}

impl From<&Page> for PageNode {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            slug: page.slug.clone(),
            parent_id: page.parent_id().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("page {0} is its own ancestor")]
    Cycle(DocId),
    #[error("ancestry exceeds the maximum parent depth")]
    TooDeep,
}

#[derive(Debug, Clone, Default)]
pub struct PageArena {
    nodes: HashMap<DocId, PageNode>,
}

impl PageArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pages<'a>(pages: impl IntoIterator<Item = &'a Page>) -> Self {
        let mut arena = Self::new();
        for page in pages {
            arena.insert(PageNode::from(page));
        }
        arena
    }

    pub fn insert(&mut self, node: PageNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn get(&self, id: &str) -> Option<&PageNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ancestors of `id`, nearest first.
    ///
    /// The walk stops at a root or at a parent that is not in the arena.
    pub fn ancestors(&self, id: &str) -> Result<Vec<&PageNode>, TreeError> {
        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut chain = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent_id.as_deref());

        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                return Err(TreeError::Cycle(parent_id.to_string()));
            }
            let Some(parent) = self.nodes.get(parent_id) else {
                break;
            };
            if chain.len() == MAX_PARENT_DEPTH {
                return Err(TreeError::TooDeep);
            }
            chain.push(parent);
            current = parent.parent_id.as_deref();
        }

        Ok(chain)
    }

    /// Slug of the immediate parent of `id`, or `None` when the page is a
    /// root, its parent is unknown, or its ancestry is broken.
    pub fn parent_slug(&self, id: &str) -> Option<&str> {
        match self.ancestors(id) {
            Ok(chain) => chain.first().map(|n| n.slug.as_str()),
            Err(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

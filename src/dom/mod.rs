//! DOM snapshot and query module
//!
//! This module provides the read-only view of a rendered page consumed by the
//! healing resolver. It includes:
//! - ElementNode: Representation of DOM elements
//! - DomTree: Captured element tree plus the page URL
//! - DocumentQuery: Tag-filtered element lookup in document order

pub mod element;
pub mod query;
pub mod tree;

pub use element::ElementNode;
pub use query::{DocumentQuery, TagFilter};
pub use tree::DomTree;

use crate::error::Result;
use headless_chrome::Tab;
use std::sync::Arc;

/// Capture the DOM tree from a browser tab
pub fn extract_dom(tab: &Arc<Tab>) -> Result<DomTree> {
    DomTree::from_tab(tab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("input");
        assert_eq!(element.tag_name, "input");
    }

    #[test]
    fn test_dom_tree_export() {
        let root = ElementNode::new("body");
        let tree = DomTree::new(root);
        assert_eq!(tree.root.tag_name, "body");
        assert!(tree.find_all(TagFilter::Only(&["input"])).is_empty());
    }
}

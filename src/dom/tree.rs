use crate::dom::element::ElementNode;
use crate::dom::query::{DocumentQuery, TagFilter};
use crate::error::{LocatorError, Result};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Snapshot of a rendered page: its element tree and the URL it was taken from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomTree {
    /// URL of the page at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Root element of the DOM tree
    pub root: ElementNode,
}

impl DomTree {
    /// Create a new DomTree without a page URL
    pub fn new(root: ElementNode) -> Self {
        Self { url: None, root }
    }

    /// Builder method: set the page URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Capture the DOM tree of a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("extract_dom.js");

        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| LocatorError::DomParseFailed(format!("Failed to execute DOM extraction script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| LocatorError::DomParseFailed("No value returned from DOM extraction".to_string()))?;

        // The script returns a JSON string, so unwrap the string before parsing the tree
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| LocatorError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }

    /// Parse a snapshot document
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LocatorError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))
    }

    /// Load a snapshot document previously written with [`DomTree::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LocatorError::DomParseFailed(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Write the snapshot as a JSON document
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| LocatorError::DomParseFailed(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LocatorError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }

    fn collect<'a>(node: &'a ElementNode, filter: TagFilter<'_>, out: &mut Vec<&'a ElementNode>) {
        if filter.matches(node) {
            out.push(node);
        }
        for child in &node.children {
            Self::collect(child, filter, out);
        }
    }
}

impl DocumentQuery for DomTree {
    fn find_all(&self, filter: TagFilter<'_>) -> Vec<&ElementNode> {
        let mut found = Vec::new();
        Self::collect(&self.root, filter, &mut found);
        found
    }

    fn route(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        Some(url.path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> ElementNode {
        let form = ElementNode::new("form").with_children(vec![
            ElementNode::new("input").with_attribute("id", "amt"),
            ElementNode::new("textarea").with_text("notes"),
            ElementNode::new("button").with_attribute("type", "submit"),
        ]);

        ElementNode::new("body").with_children(vec![
            ElementNode::new("h1").with_text("Add transaction"),
            form,
            ElementNode::new("select").with_attribute("name", "category"),
        ])
    }

    #[test]
    fn test_find_all_in_document_order() {
        let tree = DomTree::new(create_test_tree());
        let controls = ["input", "textarea", "select"];

        let found: Vec<_> = tree
            .find_all(TagFilter::Only(&controls))
            .into_iter()
            .map(|el| el.tag_name.as_str())
            .collect();

        assert_eq!(found, vec!["input", "textarea", "select"]);
    }

    #[test]
    fn test_find_all_unfiltered_includes_root() {
        let tree = DomTree::new(create_test_tree());
        assert_eq!(tree.find_all(TagFilter::All).len(), tree.count_elements());
        assert_eq!(tree.count_elements(), 7);
    }

    #[test]
    fn test_route_from_url() {
        let tree = DomTree::new(ElementNode::new("body")).with_url("http://127.0.0.1:5000/add?x=1");
        assert_eq!(tree.route(), Some("/add".to_string()));

        let no_url = DomTree::new(ElementNode::new("body"));
        assert_eq!(no_url.route(), None);
    }

    #[test]
    fn test_json_round_trip() {
        let tree = DomTree::new(create_test_tree()).with_url("http://localhost/add");
        let json = tree.to_json().unwrap();

        assert!(json.contains("\"tag_name\": \"body\""));
        assert_eq!(DomTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = DomTree::from_json("{not json").unwrap_err();
        assert!(matches!(err, LocatorError::DomParseFailed(_)));
    }
}

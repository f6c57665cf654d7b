use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a DOM element node captured from a rendered page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Element attributes (e.g., id, name, class, data-testid)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text content of the element, descendants included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,

    /// Whether the element was rendered visibly at capture time
    #[serde(default)]
    pub is_visible: bool,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            text_content: None,
            children: Vec::new(),
            is_visible: false,
        }
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set visibility
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    /// Get a non-empty attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Get element ID
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Get the `name` attribute
    pub fn name(&self) -> Option<&str> {
        self.get_attribute("name")
    }

    /// Get the `type` attribute
    pub fn input_type(&self) -> Option<&str> {
        self.get_attribute("type")
    }

    /// Get the stable test identifier (`data-testid`)
    pub fn test_id(&self) -> Option<&str> {
        self.get_attribute("data-testid")
    }

    /// First token of the `class` attribute
    pub fn first_class(&self) -> Option<&str> {
        self.get_attribute("class")
            .and_then(|classes| classes.split_whitespace().next())
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        self.get_attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    /// Trimmed, non-empty text content
    pub fn text(&self) -> Option<&str> {
        self.text_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Convert to a simplified string representation
    pub fn to_simple_string(&self) -> String {
        let mut parts = vec![format!("<{}", self.tag_name)];

        for key in ["id", "name", "class", "data-testid"] {
            if let Some(value) = self.get_attribute(key) {
                parts.push(format!(" {}=\"{}\"", key, value));
            }
        }

        parts.push(">".to_string());

        if let Some(text) = self.text() {
            parts.push(text.to_string());
        }

        parts.join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_creation() {
        let element = ElementNode::new("input")
            .with_attribute("id", "amount")
            .with_attribute("name", "amount")
            .with_attribute("type", "number")
            .with_visibility(true);

        assert_eq!(element.tag_name, "input");
        assert_eq!(element.id(), Some("amount"));
        assert_eq!(element.name(), Some("amount"));
        assert_eq!(element.input_type(), Some("number"));
        assert!(element.is_visible);
    }

    #[test]
    fn test_empty_attributes_are_absent() {
        let element = ElementNode::new("input")
            .with_attribute("id", "")
            .with_attribute("class", "   ");

        assert_eq!(element.id(), None);
        assert_eq!(element.first_class(), None);
    }

    #[test]
    fn test_first_class_and_has_class() {
        let element = ElementNode::new("select").with_attribute("class", "x-small form-control");

        assert_eq!(element.first_class(), Some("x-small"));
        assert!(element.has_class("form-control"));
        assert!(!element.has_class("hidden"));
    }

    #[test]
    fn test_text_is_trimmed() {
        let element = ElementNode::new("textarea").with_text("  notes \n");
        assert_eq!(element.text(), Some("notes"));

        let blank = ElementNode::new("textarea").with_text(" \n ");
        assert_eq!(blank.text(), None);
    }

    #[test]
    fn test_test_id() {
        let element = ElementNode::new("button").with_attribute("data-testid", "save-button");
        assert_eq!(element.test_id(), Some("save-button"));
    }

    #[test]
    fn test_serialization() {
        let element = ElementNode::new("button")
            .with_attribute("type", "submit")
            .with_text("Save")
            .with_visibility(true);

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: ElementNode = serde_json::from_str(&json).unwrap();

        assert_eq!(element, deserialized);
    }

    #[test]
    fn test_to_simple_string() {
        let element = ElementNode::new("input")
            .with_attribute("id", "amt")
            .with_attribute("class", "form-control")
            .with_attribute("data-testid", "amount-input");

        let simple = element.to_simple_string();
        assert!(simple.starts_with("<input"));
        assert!(simple.contains("id=\"amt\""));
        assert!(simple.contains("class=\"form-control\""));
        assert!(simple.contains("data-testid=\"amount-input\""));
    }
}

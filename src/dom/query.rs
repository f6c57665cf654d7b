use crate::dom::element::ElementNode;

/// Tag-name filter applied by a [`DocumentQuery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter<'a> {
    /// Every element in the document
    All,
    /// Only elements whose tag is one of the listed names (case-insensitive)
    Only(&'a [&'a str]),
}

impl TagFilter<'_> {
    /// Check whether an element passes the filter
    pub fn matches(&self, element: &ElementNode) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Only(tags) => tags.iter().any(|tag| element.is_tag(tag)),
        }
    }
}

/// Read-only query surface over one captured document.
///
/// Implementations return matching elements in document order; the resolver
/// relies on that order for its first-seen tie break.
pub trait DocumentQuery {
    /// All elements passing `filter`, in document order
    fn find_all(&self, filter: TagFilter<'_>) -> Vec<&ElementNode>;

    /// Route path of the captured page (e.g. "/add"), when known
    fn route(&self) -> Option<String> {
        None
    }
}

impl<T: DocumentQuery + ?Sized> DocumentQuery for &T {
    fn find_all(&self, filter: TagFilter<'_>) -> Vec<&ElementNode> {
        (**self).find_all(filter)
    }

    fn route(&self) -> Option<String> {
        (**self).route()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_filter_matches() {
        let input = ElementNode::new("INPUT");
        let div = ElementNode::new("div");
        let controls = ["input", "textarea", "select"];

        assert!(TagFilter::All.matches(&div));
        assert!(TagFilter::Only(&controls).matches(&input));
        assert!(!TagFilter::Only(&controls).matches(&div));
    }
}

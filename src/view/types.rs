//! View tree types.

use std::collections::BTreeMap;

/// A node of the rendered view: text or a wrapping element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Text(String),
    Element(ViewElement),
}

impl ViewNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.push_text(out);
                }
            }
        }
    }
}

impl From<ViewElement> for ViewNode {
    fn from(element: ViewElement) -> Self {
        Self::Element(element)
    }
}

/// A named element with string parameters wrapping child nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewElement {
    name: String,
    params: BTreeMap<String, String>,
    children: Vec<ViewNode>,
}

impl ViewElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<ViewNode>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ViewNode>) -> Self {
        self.children = children;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Look up a parameter, ignoring ASCII case of the name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[ViewNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<ViewNode> {
        &mut self.children
    }

    /// True when both elements would render the same opening tag.
    pub fn same_wrapper(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_lookup_ignores_case() {
        let element = ViewElement::new("abbr").with_param("TITLE", "World Wide Web");
        assert_eq!(element.param("title"), Some("World Wide Web"));
        assert_eq!(element.param("lang"), None);
    }

    #[test]
    fn test_text_content_flattens_children() {
        let node = ViewNode::from(
            ViewElement::new("p")
                .with_child(ViewNode::text("the "))
                .with_child(ViewElement::new("abbr").with_child(ViewNode::text("WWW"))),
        );
        assert_eq!(node.text_content(), "the WWW");
    }

    #[test]
    fn test_same_wrapper_compares_name_and_params() {
        let a = ViewElement::new("abbr").with_param("title", "x");
        let b = ViewElement::new("abbr")
            .with_param("title", "x")
            .with_child(ViewNode::text("ignored"));
        let c = ViewElement::new("abbr").with_param("title", "y");
        assert!(a.same_wrapper(&b));
        assert!(!a.same_wrapper(&c));
    }
}

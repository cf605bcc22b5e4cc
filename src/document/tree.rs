//! Ordered element tree of a language file.

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Comment text, kept verbatim. Comments keep their position but are
    /// ignored by sibling ordering.
    Comment(String),
}

impl Node {
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Comment(_) => None,
        }
    }

    #[must_use]
    pub const fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Comment(_) => None,
        }
    }
}

/// An XML element: name, attributes in document order, optional text and
/// ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    #[must_use]
    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// First child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.children.iter_mut().filter_map(Node::as_element_mut).find(|e| e.name == name)
    }

    /// Follows `path` down from this element.
    #[must_use]
    pub fn descendant<S: AsRef<str>>(&self, path: &[S]) -> Option<&Self> {
        path.iter().try_fold(self, |current, name| current.child(name.as_ref()))
    }

    /// Text of a leaf: no element children and text that is not blank.
    #[must_use]
    pub fn leaf_text(&self) -> Option<&str> {
        if self.has_elements() {
            return None;
        }
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Neither element children nor text other than whitespace.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        !self.has_elements() && self.text.as_deref().is_none_or(|t| t.trim().is_empty())
    }

    /// Inserts `child` before the first sibling element whose name compares
    /// greater (ordinal), or at the end when there is none.
    pub fn insert_sorted(&mut self, child: Self) {
        let index = self
            .children
            .iter()
            .position(|node| node.as_element().is_some_and(|e| e.name > child.name))
            .unwrap_or(self.children.len());
        self.children.insert(index, Node::Element(child));
    }
}

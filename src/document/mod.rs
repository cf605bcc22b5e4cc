//! Language documents: one XML file per language.
//!
//! ```xml
//! <languages>
//!   <language name="English" id="en">
//!     <Errors>
//!       <Required>{0} is required</Required>
//!     </Errors>
//!   </language>
//! </languages>
//! ```

mod tree;
mod xml;

pub use tree::{
    Element,
    Node,
};
pub use xml::XmlError;

use crate::key::TranslationKey;
use crate::language::{
    english_name,
    language_id,
};

/// Root element name.
pub const ROOT_ELEMENT: &str = "languages";
/// Language-declaration element; every key lives below it.
pub const LANGUAGE_ELEMENT: &str = "language";

/// A parsed language file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDocument {
    /// The `<languages>` element.
    root: Element,
}

impl LanguageDocument {
    /// Creates an empty document for `language`.
    #[must_use]
    pub fn new(language: &str) -> Self {
        let declaration = Element::new(LANGUAGE_ELEMENT)
            .with_attribute("name", english_name(language))
            .with_attribute("id", language_id(language));

        let mut root = Element::new(ROOT_ELEMENT);
        root.insert_sorted(declaration);
        Self { root }
    }

    /// Parses XML text.
    ///
    /// Only well-formedness is checked here; use [`Self::language`] to check the
    /// language-declaration shape.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        xml::parse_root(xml).map(|root| Self { root })
    }

    /// Serializes the whole document.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        xml::write_root(&self.root)
    }

    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// The language-declaration node, if the document has one.
    #[must_use]
    pub fn language(&self) -> Option<&Element> {
        self.root.child(LANGUAGE_ELEMENT)
    }

    pub fn language_mut(&mut self) -> Option<&mut Element> {
        self.root.child_mut(LANGUAGE_ELEMENT)
    }

    /// Stored translation for `key`, if any.
    #[must_use]
    pub fn lookup(&self, key: &TranslationKey) -> Option<&str> {
        self.language()?.descendant(key.segments())?.leaf_text()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::key;

    #[rstest]
    fn new_document_declares_language() {
        let document = LanguageDocument::new("sv-SE");

        assert_that!(document.root().name, eq(ROOT_ELEMENT));
        let language = document.language().unwrap();
        assert_that!(language.attribute("name"), some(eq("Swedish (Sweden)")));
        assert_that!(language.attribute("id"), some(eq("sv-se")));
        assert_that!(language.has_elements(), eq(false));
    }

    #[rstest]
    fn new_document_serializes_declaration() {
        let xml = LanguageDocument::new("en").to_xml().unwrap();

        assert_that!(
            xml,
            eq(concat!(
                "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n",
                "<languages>\n",
                "  <language name=\"English\" id=\"en\"/>\n",
                "</languages>\n",
            ))
        );
    }

    #[rstest]
    fn lookup_finds_leaf_text() {
        let document = LanguageDocument::parse(
            r#"<languages><language id="en"><Errors><Required>Required</Required></Errors></language></languages>"#,
        )
        .unwrap();

        assert_that!(document.lookup(&key("Errors/Required")), some(eq("Required")));
        assert_that!(document.lookup(&key("/Errors/Required")), some(eq("Required")));
        assert_that!(document.lookup(&key("Errors")), none());
        assert_that!(document.lookup(&key("Errors/Missing")), none());
    }

    #[rstest]
    fn lookup_without_language_node_misses() {
        let document =
            LanguageDocument::parse("<translations><Errors><Required>x</Required></Errors></translations>")
                .unwrap();

        assert_that!(document.language(), none());
        assert_that!(document.lookup(&key("Errors/Required")), none());
    }

    #[rstest]
    fn round_trip_preserves_tree() {
        let mut document = LanguageDocument::new("en");
        let language = document.language_mut().unwrap();
        let mut errors = Element::new("Errors");
        errors.insert_sorted(Element::new("Required").with_text("{0} is required"));
        language.insert_sorted(errors);

        let reloaded = LanguageDocument::parse(&document.to_xml().unwrap()).unwrap();

        assert_eq!(reloaded, document);
    }
}

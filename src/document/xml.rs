//! Reading and writing language files with `quick-xml`.

use std::io::Cursor;

use quick_xml::events::{
    BytesDecl,
    BytesEnd,
    BytesStart,
    BytesText,
    Event,
};
use quick_xml::{
    Reader,
    Writer,
};
use thiserror::Error;

use super::tree::{
    Element,
    Node,
};

/// Errors raised while reading or writing XML.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid UTF-8 in {context}")]
    Utf8 { context: &'static str },

    #[error("document has no root element")]
    MissingRoot,

    #[error("element '{0}' is not closed")]
    Unclosed(String),

    #[error("content after the root element")]
    TrailingContent,
}

/// An element being read, with the whitespace-only text seen inside it.
struct Frame {
    element: Element,
    /// Kept as the element's text if it turns out to be a leaf.
    whitespace: String,
}

impl Frame {
    fn new(element: Element) -> Self {
        Self { element, whitespace: String::new() }
    }

    /// Whitespace-only text is indentation unless the element has nothing else.
    fn finish(mut self) -> Element {
        if self.element.children.is_empty()
            && self.element.text.is_none()
            && !self.whitespace.is_empty()
        {
            self.element.text = Some(self.whitespace);
        }
        self.element
    }
}

/// Parses XML text into its root element.
///
/// Whitespace-only text between elements is dropped, but kept as the text of
/// an element that has no other content; any other text is kept verbatim.
/// Comments are kept as [`Node::Comment`] children, except those outside the
/// root element.
pub(super) fn parse_root(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(XmlError::TrailingContent);
                }
                stack.push(Frame::new(element_from_start(&start)?));
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(XmlError::TrailingContent);
                }
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml validates end names, so the top of the stack is the closing element.
                if let Some(frame) = stack.pop() {
                    attach(&mut stack, &mut root, frame.finish());
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if let Some(current) = stack.last_mut() {
                    if text.trim().is_empty() {
                        current.whitespace.push_str(&text);
                    } else {
                        append_text(&mut current.element, &text);
                    }
                }
            }
            Event::CData(data) => {
                let data = std::str::from_utf8(&data)
                    .map_err(|_| XmlError::Utf8 { context: "CDATA section" })?;
                if let Some(current) = stack.last_mut() {
                    append_text(&mut current.element, data);
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    let comment = std::str::from_utf8(&comment)
                        .map_err(|_| XmlError::Utf8 { context: "comment" })?;
                    parent.element.children.push(Node::Comment(comment.to_string()));
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.element.name));
    }

    root.ok_or(XmlError::MissingRoot)
}

/// Serializes a root element with an XML declaration and two-space indentation.
pub(super) fn write_root(root: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))?;
    write_element(&mut writer, root)?;

    let mut xml = String::from_utf8(writer.into_inner().into_inner())
        .map_err(|_| XmlError::Utf8 { context: "serialized document" })?;
    xml.push('\n');
    Ok(xml)
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|_| XmlError::Utf8 { context: "element name" })?
        .to_string();

    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|_| XmlError::Utf8 { context: "attribute name" })?
            .to_string();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Adds a completed element to its parent, or makes it the root.
fn attach(stack: &mut [Frame], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

fn append_text(element: &mut Element, text: &str) {
    element.text.get_or_insert_with(String::new).push_str(text);
}

//! Generic XML tree parser.
//!
//! Turns one document into a tree of [`XmlNode`]s without any knowledge of
//! dialect semantics. Comments, processing instructions and the XML
//! declaration never reach the tree, so a commented-out declaration is
//! indistinguishable from a deleted one.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

/// One element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Element name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated text content, trimmed.
    pub text: String,
}

impl XmlNode {
    /// Returns the value of an attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value of a required attribute.
    ///
    /// # Errors
    /// Returns `MissingAttribute` if the attribute is absent.
    pub fn required_attr(&self, name: &str) -> Result<&str, ParseError> {
        self.attr(name)
            .ok_or_else(|| ParseError::missing_attr(&self.name, name))
    }

    /// Iterates over the children with the given element name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the first child with the given element name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the text of the first child with the given name, if non-empty.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// Parses a document into its root element.
///
/// # Arguments
/// * `xml` - Document content
///
/// # Errors
/// Returns `ParseError::Malformed` with the line and column of the first
/// syntax error, including unclosed elements and documents with no root.
pub fn parse_document(xml: &str) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let node = open_node(xml, position, e)?;
                stack.push(node);
            }
            Ok(Event::Empty(ref e)) => {
                let node = open_node(xml, position, e)?;
                attach(xml, position, &mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let Some(mut node) = stack.pop() else {
                    return Err(ParseError::malformed_at(xml, position, "unexpected end tag"));
                };
                node.text = node.text.trim().to_string();
                attach(xml, position, &mut stack, &mut root, node)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    let raw = std::str::from_utf8(t.as_ref())
                        .map_err(|e| ParseError::malformed_at(xml, position, e.to_string()))?;
                    let text = unescape(raw)
                        .map_err(|e| ParseError::malformed_at(xml, position, e.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(top) = stack.last_mut() {
                    let reference = format!("&{};", String::from_utf8_lossy(r.as_ref()));
                    let text = unescape(&reference)
                        .map_err(|e| ParseError::malformed_at(xml, position, e.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::malformed_at(
                    xml,
                    reader.error_position() as usize,
                    e.to_string(),
                ));
            }
            // Comments, declarations, processing instructions and doctypes
            // carry nothing the compiler needs.
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::malformed_at(
            xml,
            xml.len(),
            format!("element '{}' is never closed", open.name),
        ));
    }
    root.ok_or_else(|| ParseError::malformed_at(xml, xml.len(), "document has no root element"))
}

fn open_node(xml: &str, position: usize, e: &BytesStart<'_>) -> Result<XmlNode, ParseError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::malformed_at(xml, position, err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map_err(|err| ParseError::malformed_at(xml, position, err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlNode {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    xml: &str,
    position: usize,
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::malformed_at(
            xml,
            position,
            format!("second root element '{}'", node.name),
        ));
    }
    *root = Some(node);
    Ok(())
}

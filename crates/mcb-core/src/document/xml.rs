//! Generic XML element tree over quick-xml
//!
//! Keeps element order, attribute order, text and comments so that content
//! this crate does not understand survives a load/save cycle. Text of leaf
//! elements is kept exactly. Whitespace-only text next to child elements or
//! comments is layout and is dropped; output indentation is regenerated on
//! write.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// XML syntax or structure failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    /// Not well-formed
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    /// Well-formed fragments that do not make a document
    #[error("{0}")]
    Structure(String),

    /// Writer failure
    #[error("write error: {0}")]
    Write(String),
}

/// Child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
}

/// XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child element
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position when it already exists
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Element children, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Element children named `name`
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element named `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text children
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Parse a document into its root element
pub fn parse(text: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Structure("unbalanced end tag".to_string()))?;
                drop_layout_text(&mut element);
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlError::Structure(e.to_string()))?
                    .into_owned();
                push_text(&mut stack, text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                push_text(&mut stack, text)?;
            }
            Event::Comment(c) => {
                // Comments outside the root element are not kept.
                if let Some(parent) = stack.last_mut() {
                    let comment = String::from_utf8_lossy(&c).into_owned();
                    parent.children.push(XmlNode::Comment(comment));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Structure(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| XmlError::Structure("document has no root element".to_string()))
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Structure(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Structure(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(XmlError::Structure(format!(
                "second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: String) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::Structure(format!("text outside root element: '{text}'"))),
    }
}

/// Remove indentation text from elements that also hold elements or comments
fn drop_layout_text(element: &mut Element) {
    let structured = element
        .children
        .iter()
        .any(|c| !matches!(c, XmlNode::Text(_)));
    if structured {
        element
            .children
            .retain(|c| !matches!(c, XmlNode::Text(t) if t.trim().is_empty()));
    }
}

/// Serialize with an XML declaration and `indent` spaces per level
pub fn write(root: &Element, indent: usize) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;
    let mut out = String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

fn write_error(e: impl std::fmt::Display) -> XmlError {
    XmlError::Write(e.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_error)?,
            XmlNode::Comment(c) => writer
                .write_event(Event::Comment(BytesText::from_escaped(c.as_str())))
                .map_err(write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}

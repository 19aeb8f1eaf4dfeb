//! Owned XML element tree for package parts.
//!
//! Parts are parsed into a simple tree that keeps qualified names exactly as
//! written (`w:p`, `r:id`, ...) so that serializing an untouched tree yields
//! equivalent markup. Namespace declarations are ordinary attributes.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use super::error::{DocxError, DocxResult};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`XmlElement::set_attr`].
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`XmlElement::push`].
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push(child);
        self
    }

    /// Append a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }

    /// Child elements, skipping text and other node kinds.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |element| element.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|element| element.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Append `child` and return it for further editing.
    pub fn push_mut(&mut self, child: XmlElement) -> &mut XmlElement {
        let index = self.children.len();
        self.insert_mut(index, child)
    }

    /// Insert at a node position (counting every node kind).
    pub fn insert(&mut self, index: usize, child: XmlElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Insert at a node position and return the inserted element.
    pub fn insert_mut(&mut self, index: usize, child: XmlElement) -> &mut XmlElement {
        let index = index.min(self.children.len());
        self.children.insert(index, XmlNode::Element(child));
        match &mut self.children[index] {
            XmlNode::Element(element) => element,
            _ => unreachable!("an element was just inserted here"),
        }
    }

    /// Remove every child element called `name`, returning how many were removed.
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(element) if element.name == name));
        before - self.children.len()
    }

    /// Keep only the child elements accepted by `keep`; other node kinds are dropped.
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&XmlElement) -> bool) {
        self.children.retain(|node| match node {
            XmlNode::Element(element) => keep(element),
            _ => false,
        });
    }

    /// Node position of the first child element called `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(element) if element.name == name))
    }

    /// Return the child called `name`, creating it at its schema position if absent.
    pub fn get_or_insert(&mut self, name: &str, order: &[&str]) -> &mut XmlElement {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                let index = self.ordered_position(name, order);
                self.children
                    .insert(index, XmlNode::Element(XmlElement::new(name)));
                index
            }
        };
        match &mut self.children[index] {
            XmlNode::Element(element) => element,
            _ => unreachable!("position refers to an element node"),
        }
    }

    /// Return the child called `name`, creating it as the first child if absent.
    ///
    /// Property containers (`w:pPr`, `w:rPr`, `w:tcPr`, `w:tblPr`) always lead
    /// their parent.
    pub fn get_or_insert_first(&mut self, name: &str) -> &mut XmlElement {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                self.children
                    .insert(0, XmlNode::Element(XmlElement::new(name)));
                0
            }
        };
        match &mut self.children[index] {
            XmlNode::Element(element) => element,
            _ => unreachable!("position refers to an element node"),
        }
    }

    /// Insert `child` before the first sibling that must follow it in `order`.
    pub fn insert_ordered(&mut self, child: XmlElement, order: &[&str]) {
        let index = self.ordered_position(&child.name, order);
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Remove any existing children with the same name, then insert `child` in order.
    pub fn replace_ordered(&mut self, child: XmlElement, order: &[&str]) {
        self.remove_children(&child.name);
        self.insert_ordered(child, order);
    }

    fn ordered_position(&self, name: &str, order: &[&str]) -> usize {
        let Some(rank) = order.iter().position(|candidate| *candidate == name) else {
            return self.children.len();
        };
        let successors = &order[rank + 1..];
        self.children
            .iter()
            .position(|node| match node {
                XmlNode::Element(element) => successors.contains(&element.name.as_str()),
                _ => false,
            })
            .unwrap_or(self.children.len())
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) | XmlNode::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all content with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![XmlNode::Text(text.into())];
    }

    /// Every descendant element called `name`, depth first.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for element in self.elements() {
            if element.name == name {
                found.push(element);
            }
            element.collect_descendants(name, found);
        }
    }

    /// Serialize as a standalone part, including the XML declaration.
    pub fn to_document_string(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(DECLARATION);
        out.push('\n');
        self.write_to(&mut out);
        out
    }

    /// Serialize just this element.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                XmlNode::Element(element) => element.write_to(out),
                XmlNode::Text(text) => out.push_str(&escape(text.as_str())),
                XmlNode::CData(data) => {
                    out.push_str("<![CDATA[");
                    out.push_str(data);
                    out.push_str("]]>");
                }
                XmlNode::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
                XmlNode::ProcessingInstruction(body) => {
                    out.push_str("<?");
                    out.push_str(body);
                    out.push_str("?>");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Parse a part's XML into its root element.
pub fn parse(xml: &str) -> DocxResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DocxError::malformed("xml", "unbalanced end tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape()?.into_owned();
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let data = String::from_utf8_lossy(&data).into_owned();
                    parent.children.push(XmlNode::CData(data));
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    let comment = String::from_utf8_lossy(&comment).into_owned();
                    parent.children.push(XmlNode::Comment(comment));
                }
            }
            Event::PI(body) => {
                if let Some(parent) = stack.last_mut() {
                    let body = String::from_utf8_lossy(&body).into_owned();
                    parent.children.push(XmlNode::ProcessingInstruction(body));
                }
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(DocxError::malformed("xml", "unclosed element"));
    }
    root.ok_or_else(|| DocxError::malformed("xml", "no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> DocxResult<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

//! Element tree: markup parsing and serialization.
//!
//! Documents are held as an owned tree of [`Element`]s read with `quick-xml`.
//! Every element keeps its literal attributes and, separately, a live
//! [`StyleDeclaration`] model for its `style` attribute. The two are kept in
//! step by [`Element::set_attribute`] and [`Element::set_style_property`], but
//! the parser only fills in the literal attribute: a freshly parsed element
//! has `style="..."` text and an empty live model until
//! [`crate::restore::restore_text_box_styles`] rehydrates it.

#[cfg(test)]
#[path = "markup_test.rs"]
mod markup_test;

use std::io::Write;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::MarkupError;
use crate::style::StyleDeclaration;

/// Soft line break inside rich text.
const LINE_BREAK: &str = "br";

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A child element.
    Element(Element),
    /// Character data, unescaped.
    Text(String),
    /// A comment, without its delimiters.
    Comment(String),
    /// A CDATA section, without its delimiters.
    CData(String),
}

/// A markup element with ordered attributes and child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
    style: StyleDeclaration,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
            style: StyleDeclaration::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`].
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`Element::push_element`].
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_element(child);
        self
    }

    /// Builder form of [`Element::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Qualified element name as written, e.g. `"foreignObject"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without any namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    // --- Attributes ---

    /// Literal value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists.
    /// Setting `style` also re-parses the live style model.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name == "style" {
            self.style.set_css_text(&value);
        }
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_owned(), value));
        }
    }

    /// Remove an attribute, returning its value. Removing `style` also
    /// clears the live style model.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        if name == "style" {
            self.style.clear();
        }
        let pos = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// Iterate over attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `id` attribute, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Numeric attribute value, or `default` when absent or unparseable.
    #[must_use]
    pub fn number_attribute(&self, name: &str, default: f64) -> f64 {
        self.attribute(name).and_then(parse_number).unwrap_or(default)
    }

    // --- Live style ---

    /// The live style model.
    #[must_use]
    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    /// Raw access to the live style model. Changes made here are not
    /// reflected into the literal `style` attribute.
    pub fn style_mut(&mut self) -> &mut StyleDeclaration {
        &mut self.style
    }

    /// Write one property to the live style model and reflect the result
    /// into the literal `style` attribute.
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.set(name, value);
        self.reflect_style();
    }

    /// Remove one property from the live style model, reflecting the result.
    pub fn remove_style_property(&mut self, name: &str) -> Option<String> {
        let old = self.style.remove(name);
        self.reflect_style();
        old
    }

    fn reflect_style(&mut self) {
        let text = self.style.css_text();
        if text.is_empty() {
            self.attrs.retain(|(k, _)| k != "style");
        } else if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == "style") {
            slot.1 = text;
        } else {
            self.attrs.push(("style".to_owned(), text));
        }
    }

    // --- Children ---

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable child nodes.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Mutable child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Append a child element.
    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Concatenated text of all descendant text and CDATA nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// Text with each `<br>` element read as a line break, as a browser's
    /// `innerText` reports it.
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_lines(&mut out);
        out
    }

    fn collect_lines(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                Node::Element(el) if el.local_name() == LINE_BREAK => out.push('\n'),
                Node::Element(el) => el.collect_lines(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// Replace all children with the lines of `text`, separated by `<br/>`
    /// elements.
    pub fn set_inner_text(&mut self, text: &str) {
        self.children.clear();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.children.push(Node::Element(Element::new(LINE_BREAK)));
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if !line.is_empty() {
                self.children.push(Node::Text(line.to_owned()));
            }
        }
    }

    /// Replace all children with a single text node (none for empty text).
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    // --- Queries ---

    /// Depth-first search (self included) for the element with `id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find(id))
    }

    /// Mutable form of [`Element::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        for child in self.child_elements_mut() {
            if let Some(found) = child.find_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Chain of elements from `self` down to the element with `id`, inclusive.
    #[must_use]
    pub fn path_to(&self, id: &str) -> Option<Vec<&Element>> {
        if self.id() == Some(id) {
            return Some(vec![self]);
        }
        for child in self.child_elements() {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// First descendant (self excluded) named `name`, in document order.
    #[must_use]
    pub fn first_descendant(&self, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.first_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable form of [`Element::first_descendant`].
    pub fn first_descendant_mut(&mut self, name: &str) -> Option<&mut Element> {
        for child in self.child_elements_mut() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.first_descendant_mut(name) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every element of the subtree (self included) in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for child in self.child_elements() {
            child.walk(f);
        }
    }

    /// Mutable pre-order visit of the subtree (self included).
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.child_elements_mut() {
            child.walk_mut(f);
        }
    }

    /// Remove the descendant with `id` from wherever it sits in the subtree.
    pub fn remove_descendant(&mut self, id: &str) -> Option<Element> {
        let pos = self
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(el) if el.id() == Some(id)));
        if let Some(pos) = pos {
            return match self.children.remove(pos) {
                Node::Element(el) => Some(el),
                _ => None,
            };
        }
        for child in self.child_elements_mut() {
            if let Some(found) = child.remove_descendant(id) {
                return Some(found);
            }
        }
        None
    }
}

/// Parse a finite number, tolerating surrounding whitespace and a `px` unit.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    match text.trim().trim_end_matches("px").trim_end().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

// =============================================================
// Parsing
// =============================================================

/// Parse markup into its single root element.
///
/// Declarations, processing instructions and doctypes are dropped, as is
/// anything outside the root element. The live style model of every parsed
/// element is left empty.
///
/// # Errors
///
/// Returns a [`MarkupError`] when the input is not well-formed: bad syntax,
/// an undecodable attribute, mismatched or unclosed tags, no root element or
/// more than one.
pub fn parse(text: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let el = element_from_start(&start)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(end) => {
                let Some(el) = stack.pop() else {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    return Err(MarkupError::UnexpectedClose(name));
                };
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let content = text.unescape()?;
                    if !content.is_empty() {
                        parent.children.push(Node::Text(content.into_owned()));
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::CData(String::from_utf8_lossy(&data).into_owned()));
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MarkupError::Unclosed(open.name));
    }
    root.ok_or(MarkupError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        if let Some(slot) = el.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            el.attrs.push((key, value));
        }
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), MarkupError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(MarkupError::MultipleRoots);
    }
    *root = Some(el);
    Ok(())
}

// =============================================================
// Serialization
// =============================================================

/// Serialize an element tree to markup.
///
/// Attributes are written in stored order with their literal values; the
/// live style model is not consulted.
///
/// # Errors
///
/// Returns [`MarkupError::Write`] if the underlying writer fails.
pub fn serialize(root: &Element) -> Result<String, MarkupError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &Element) -> Result<(), MarkupError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        match child {
            Node::Element(c) => write_element(writer, c)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            Node::Comment(c) => writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?,
            Node::CData(c) => writer.write_event(Event::CData(BytesCData::new(c.as_str())))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

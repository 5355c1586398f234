//! Document model: text shapes inside an SVG element tree.
//!
//! A [`Document`] owns the root `<svg>` element. Text shapes come in two
//! kinds (see [`TextKind`]): primitive `<text>` elements styled by
//! presentational attributes, and styled-box containers
//! (`<foreignObject se:type="text">`) whose single `<div>` carries all of
//! its styling as inline style.
//!
//! [`Document::load`] and [`Document::export`] are the serialization
//! boundary. Loading migrates legacy attributes and rehydrates live style
//! before the document is handed out. Exporting never writes presentational
//! attributes on a styled-box container and writes each box's style text
//! verbatim.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use tracing::debug;
use uuid::Uuid;

use crate::accessor::{TextBoxStyle, TextBoxStyleMut, TextStyle};
use crate::consts::{
    FOREIGN_OBJECT, ID_PREFIX, NEW_TEXT_HEIGHT, NEW_TEXT_WIDTH, PRIMITIVE_TEXT, SE_NS, SVG_NS, TEXT_BOX, TEXT_TYPE,
    TYPE_ATTR, XHTML_NS,
};
use crate::error::DocError;
use crate::geom::Point;
use crate::mapping::{Facet, format_number};
use crate::markup::{self, Element};
use crate::restore::{migrate_legacy_attributes, restore_text_box_styles};
use crate::style::StyleDeclaration;

/// Shapes are addressed by their `id` attribute.
pub type ShapeId = String;

/// The two representations of a text shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// A `<text>` element styled by presentational attributes.
    Primitive,
    /// A `<foreignObject se:type="text">` container owning a styled `<div>`.
    StyledBox,
}

/// Whether `el` is a styled-box text container.
#[must_use]
pub fn is_text_container(el: &Element) -> bool {
    el.local_name() == FOREIGN_OBJECT && el.attribute(TYPE_ATTR) == Some(TEXT_TYPE)
}

/// Classify `el` as a text shape, if it is one.
#[must_use]
pub fn text_kind(el: &Element) -> Option<TextKind> {
    if is_text_container(el) {
        Some(TextKind::StyledBox)
    } else if el.local_name() == PRIMITIVE_TEXT {
        Some(TextKind::Primitive)
    } else {
        None
    }
}

fn new_shape_id() -> ShapeId {
    format!("{ID_PREFIX}{}", Uuid::new_v4().simple())
}

/// An SVG drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

impl Document {
    /// Create an empty drawing with one layer.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let layer = Element::new("g")
            .with_attr("class", "layer")
            .with_child(Element::new("title").with_text("Layer 1"));
        let root = Element::new("svg")
            .with_attr("width", format_number(width))
            .with_attr("height", format_number(height))
            .with_attr("xmlns", SVG_NS)
            .with_attr("xmlns:se", SE_NS)
            .with_child(layer);
        Self { root }
    }

    /// Parse markup into a document, migrating legacy text attributes and
    /// rehydrating styled-box styles.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Markup`] for malformed markup and
    /// [`DocError::NotSvg`] when the root element is not `<svg>`.
    pub fn load(text: &str) -> Result<Self, DocError> {
        let mut root = markup::parse(text)?;
        if root.local_name() != "svg" {
            return Err(DocError::NotSvg(root.name().to_owned()));
        }
        let migrated = migrate_legacy_attributes(&mut root);
        let restored = restore_text_box_styles(&mut root);
        debug!(migrated, restored, "loaded document");
        Ok(Self { root })
    }

    /// Serialize the document.
    ///
    /// Styled-box containers are written without presentational attributes;
    /// any found are first moved into the box style on a copy, so `self` is
    /// not modified.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Markup`] if writing fails.
    pub fn export(&self) -> Result<String, DocError> {
        let mut root = self.root.clone();
        migrate_legacy_attributes(&mut root);
        if !root.has_attribute("xmlns") {
            root.set_attribute("xmlns", SVG_NS);
        }
        if !root.has_attribute("xmlns:se") {
            root.set_attribute("xmlns:se", SE_NS);
        }
        Ok(markup::serialize(&root)?)
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Append a new shape to the last layer group, or to the root when
    /// there is none.
    fn append_shape(&mut self, shape: Element) {
        let layer = self.root.child_elements_mut().filter(|el| el.local_name() == "g").last();
        match layer {
            Some(layer) => layer.push_element(shape),
            None => self.root.push_element(shape),
        }
    }

    // --- Creation ---

    /// Append a styled-box text shape at `at` with `style` as its inline
    /// style. Returns the new shape's id.
    pub fn create_styled_text(&mut self, at: Point, style: &TextStyle) -> ShapeId {
        let id = new_shape_id();
        let mut div = Element::new(TEXT_BOX).with_attr("xmlns", XHTML_NS);
        TextBoxStyleMut::new(&mut div).apply(style);
        let container = Element::new(FOREIGN_OBJECT)
            .with_attr("id", id.clone())
            .with_attr("x", format_number(at.x))
            .with_attr("y", format_number(at.y))
            .with_attr("width", format_number(NEW_TEXT_WIDTH))
            .with_attr("height", format_number(NEW_TEXT_HEIGHT))
            .with_attr(TYPE_ATTR, TEXT_TYPE)
            .with_child(div);
        self.append_shape(container);
        debug!(%id, "created styled text");
        id
    }

    /// Append a primitive `<text>` shape at `at` with `style` written as
    /// presentational attributes. Returns the new shape's id.
    pub fn create_primitive_text(&mut self, at: Point, style: &TextStyle) -> ShapeId {
        let id = new_shape_id();
        let mut text = Element::new(PRIMITIVE_TEXT)
            .with_attr("id", id.clone())
            .with_attr("x", format_number(at.x))
            .with_attr("y", format_number(at.y))
            .with_attr("xml:space", "preserve");
        for facet in Facet::ALL {
            text.set_attribute(facet.attribute(), facet.to_attribute_value(&style.get(facet)));
        }
        self.append_shape(text);
        debug!(%id, "created primitive text");
        id
    }

    // --- Lookup ---

    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Element> {
        self.root.find(id)
    }

    pub fn shape_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(id)
    }

    /// Kind of the text shape `id`, or `None` if it is missing or not text.
    #[must_use]
    pub fn kind(&self, id: &str) -> Option<TextKind> {
        self.shape(id).and_then(text_kind)
    }

    /// The styled box of container `id`.
    #[must_use]
    pub fn text_box(&self, id: &str) -> Option<&Element> {
        self.shape(id)
            .filter(|el| is_text_container(el))
            .and_then(|el| el.first_descendant(TEXT_BOX))
    }

    pub fn text_box_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.shape_mut(id)
            .filter(|el| is_text_container(el))
            .and_then(|el| el.first_descendant_mut(TEXT_BOX))
    }

    /// Ids of every text shape, in document order.
    #[must_use]
    pub fn text_shape_ids(&self) -> Vec<ShapeId> {
        let mut ids = Vec::new();
        self.root.walk(&mut |el| {
            if let (Some(_), Some(id)) = (text_kind(el), el.id()) {
                ids.push(id.to_owned());
            }
        });
        ids
    }

    // --- Mutation ---

    /// Remove shape `id`, returning it.
    pub fn remove_shape(&mut self, id: &str) -> Option<Element> {
        let removed = self.root.remove_descendant(id);
        if removed.is_some() {
            debug!(%id, "removed shape");
        }
        removed
    }

    /// Text content of shape `id`: the box text for styled boxes, with each
    /// `<br>` read as `\n`; the element text for primitives.
    #[must_use]
    pub fn text_content(&self, id: &str) -> Option<String> {
        match self.kind(id)? {
            TextKind::StyledBox => Some(self.text_box(id).map(Element::inner_text).unwrap_or_default()),
            TextKind::Primitive => self.shape(id).map(Element::text_content),
        }
    }

    /// Replace the text content of shape `id`. In a styled box each `\n`
    /// becomes a `<br/>`. Returns `false` when there is no such text shape
    /// or the container has no box.
    pub fn set_text_content(&mut self, id: &str, text: &str) -> bool {
        match self.kind(id) {
            Some(TextKind::StyledBox) => match self.text_box_mut(id) {
                Some(div) => {
                    div.set_inner_text(text);
                    true
                }
                None => false,
            },
            Some(TextKind::Primitive) => match self.shape_mut(id) {
                Some(el) => {
                    el.set_text(text);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    // --- Style ---

    /// Declarations inherited by the box of container `id` from its
    /// ancestors, nearest winning. Presentational attributes on ancestors
    /// count, overridden by the same ancestor's inline style. Decoration
    /// does not inherit.
    #[must_use]
    pub fn effective_style(&self, id: &str) -> StyleDeclaration {
        let mut out = StyleDeclaration::new();
        let Some(path) = self.root.path_to(id) else {
            return out;
        };
        for ancestor in path {
            let inline = StyleDeclaration::parse(ancestor.attribute("style").unwrap_or_default());
            for facet in Facet::ALL.into_iter().filter(|f| f.inherited()) {
                let property = facet.css_property();
                if let Some(value) = inline.get(property) {
                    out.set(property, value);
                } else if let Some(value) = ancestor.attribute(facet.attribute()) {
                    out.set(property, &facet.to_style_value(value));
                }
            }
        }
        out
    }

    /// Current style facts of text shape `id`, whichever its kind.
    #[must_use]
    pub fn text_style(&self, id: &str) -> Option<TextStyle> {
        match self.kind(id)? {
            TextKind::StyledBox => {
                let effective = self.effective_style(id);
                Some(TextBoxStyle::new(self.text_box(id), Some(&effective)).snapshot())
            }
            TextKind::Primitive => {
                let el = self.shape(id)?;
                let mut decls = StyleDeclaration::new();
                for facet in Facet::ALL {
                    if let Some(value) = el.attribute(facet.attribute()) {
                        decls.set(facet.css_property(), &facet.to_style_value(value));
                    }
                }
                Some(TextBoxStyle::new(None, Some(&decls)).snapshot())
            }
        }
    }
}

//! Hit-testing text shapes.
//!
//! Points are in user space. A shape's own `transform` attribute is undone
//! before testing against its bounds; ancestor transforms are not.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Document, ShapeId, TextKind};
use crate::geom::{Point, Rect, Transform};
use crate::glyphs::GlyphProvider;

/// Bounds of text shape `id` in its own coordinate system, with the
/// transform that maps them into user space.
///
/// Styled boxes use the container's `x`/`y`/`width`/`height`; primitives
/// use the glyph bbox.
#[must_use]
pub fn shape_bounds(doc: &Document, glyphs: &dyn GlyphProvider, id: &str) -> Option<(Rect, Transform)> {
    let el = doc.shape(id)?;
    let bounds = match doc.kind(id)? {
        TextKind::StyledBox => Rect::new(
            el.number_attribute("x", 0.0),
            el.number_attribute("y", 0.0),
            el.number_attribute("width", 0.0),
            el.number_attribute("height", 0.0),
        ),
        TextKind::Primitive => glyphs.layout(el).bbox,
    };
    Some((bounds, Transform::parse(el.attribute("transform").unwrap_or_default())))
}

/// Topmost text shape under `pt`.
#[must_use]
pub fn text_shape_at(doc: &Document, glyphs: &dyn GlyphProvider, pt: Point) -> Option<ShapeId> {
    doc.text_shape_ids().into_iter().rev().find(|id| {
        shape_bounds(doc, glyphs, id).is_some_and(|(bounds, matrix)| {
            matrix.inverse().is_some_and(|inv| bounds.contains(inv.apply(pt)))
        })
    })
}

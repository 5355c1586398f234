//! Per-character glyph geometry.
//!
//! The caret engine needs, for every character of a primitive `<text>`
//! shape, where its glyph starts and ends, plus the shape's bounding box.
//! Browsers answer this through `SVGTextContentElement`; see
//! [`crate::dom::SvgGlyphProvider`]. Hosts without that API (and the test
//! suite) use [`EstimatedGlyphs`], which lays glyphs out on a fixed advance.

#[cfg(test)]
#[path = "glyphs_test.rs"]
mod glyphs_test;

use crate::consts::{ESTIMATED_ADVANCE_RATIO, ESTIMATED_ASCENT_RATIO};
use crate::geom::{Point, Rect};
use crate::mapping::{DEFAULT_SIZE_PX, TextAnchor};
use crate::markup::Element;

/// Glyph geometry of one text shape, in the shape's user space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphLayout {
    /// Start position of each character.
    pub starts: Vec<Point>,
    /// End position of each character.
    pub ends: Vec<Point>,
    /// Bounding box of the whole text.
    pub bbox: Rect,
    /// `false` when the positions are reported in zoomed, offset canvas
    /// coordinates and need correcting before use.
    pub accurate: bool,
}

impl GlyphLayout {
    /// Number of characters laid out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len().min(self.ends.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source of glyph geometry for primitive text shapes.
pub trait GlyphProvider {
    /// Lay out the characters of `shape`, a `<text>` element.
    fn layout(&self, shape: &Element) -> GlyphLayout;
}

/// Fixed-advance estimate from `x`, `y`, `font-size` and `text-anchor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedGlyphs;

impl GlyphProvider for EstimatedGlyphs {
    fn layout(&self, shape: &Element) -> GlyphLayout {
        let text = shape.text_content();
        let size = match shape.number_attribute("font-size", DEFAULT_SIZE_PX) {
            s if s > 0.0 => s,
            _ => DEFAULT_SIZE_PX,
        };
        let advance = size * ESTIMATED_ADVANCE_RATIO;
        let count = text.chars().count();
        #[allow(clippy::cast_precision_loss)]
        let total = advance * count as f64;

        let x = shape.number_attribute("x", 0.0);
        let y = shape.number_attribute("y", 0.0);
        let left = match TextAnchor::parse(shape.attribute("text-anchor").unwrap_or_default()) {
            TextAnchor::Middle => x - total / 2.0,
            TextAnchor::End => x - total,
            TextAnchor::Start | TextAnchor::Justify => x,
        };

        let mut starts = Vec::with_capacity(count);
        let mut ends = Vec::with_capacity(count);
        for i in 0..count {
            #[allow(clippy::cast_precision_loss)]
            let x0 = left + advance * i as f64;
            starts.push(Point::new(x0, y));
            ends.push(Point::new(x0 + advance, y));
        }

        GlyphLayout {
            starts,
            ends,
            bbox: Rect::new(left, y - size * ESTIMATED_ASCENT_RATIO, total, size),
            accurate: true,
        }
    }
}

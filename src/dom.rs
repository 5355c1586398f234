//! Glyph geometry read from the live SVG through `web_sys`.
//!
//! Shapes are looked up by id in the host document. When a shape is not
//! rendered, or the browser refuses a query, the estimate is used instead.

use wasm_bindgen::JsCast;
use web_sys::SvgTextContentElement;

use crate::geom::{Point, Rect};
use crate::glyphs::{EstimatedGlyphs, GlyphLayout, GlyphProvider};
use crate::markup::Element;

pub struct SvgGlyphProvider {
    document: web_sys::Document,
    /// Whether this browser reports character positions in user space.
    accurate: bool,
}

impl SvgGlyphProvider {
    #[must_use]
    pub fn new(document: web_sys::Document, accurate: bool) -> Self {
        Self { document, accurate }
    }

    fn measure(&self, shape: &Element) -> Option<GlyphLayout> {
        let node = self.document.get_element_by_id(shape.id()?)?;
        let Ok(text) = node.dyn_into::<SvgTextContentElement>() else {
            return None;
        };
        let count = u32::try_from(text.get_number_of_chars()).unwrap_or_default();

        let mut starts = Vec::new();
        let mut ends = Vec::new();
        for i in 0..count {
            let (Ok(start), Ok(end)) = (text.get_start_position_of_char(i), text.get_end_position_of_char(i)) else {
                return None;
            };
            starts.push(Point::new(f64::from(start.x()), f64::from(start.y())));
            ends.push(Point::new(f64::from(end.x()), f64::from(end.y())));
        }
        let Ok(bbox) = text.get_b_box() else {
            return None;
        };

        Some(GlyphLayout {
            starts,
            ends,
            bbox: Rect::new(
                f64::from(bbox.x()),
                f64::from(bbox.y()),
                f64::from(bbox.width()),
                f64::from(bbox.height()),
            ),
            accurate: self.accurate,
        })
    }
}

impl GlyphProvider for SvgGlyphProvider {
    fn layout(&self, shape: &Element) -> GlyphLayout {
        match self.measure(shape) {
            Some(layout) => layout,
            None => EstimatedGlyphs.layout(shape),
        }
    }
}

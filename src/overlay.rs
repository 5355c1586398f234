//! Caret line and selection highlight, in screen space.
//!
//! The caret engine recomputes these on every caret or selection change; the
//! renderer only draws what is here.

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// The blinking caret.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaretLine {
    pub from: Point,
    pub to: Point,
    /// Current blink phase.
    pub visible: bool,
}

/// Selection highlight quadrilateral. Corners are separate because a
/// transformed text shape selects along a rotated or skewed box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBlock {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl SelectionBlock {
    /// SVG path data for the highlight.
    #[must_use]
    pub fn path_data(&self) -> String {
        let Self { top_left: tl, top_right: tr, bottom_right: br, bottom_left: bl } = self;
        format!("M{},{} L{},{} {},{} {},{}z", tl.x, tl.y, tr.x, tr.y, br.x, br.y, bl.x, bl.y)
    }

    /// Corners in drawing order.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// What the overlay shows right now. At most one of the two is present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Overlay {
    pub caret: Option<CaretLine>,
    pub selection: Option<SelectionBlock>,
}

impl Overlay {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.caret.is_none() && self.selection.is_none()
    }
}

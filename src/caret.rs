//! Caret and selection on primitive `<text>` shapes.
//!
//! Primitive text has no native editing, so the engine derives one
//! [`CharCell`] per character from glyph geometry (plus a zero-width
//! sentinel past the end) and runs a small state machine over them:
//!
//! ```text
//! Inactive ──begin──▶ Editing{index} ◀──drag/select──▶ Selecting{start,end}
//!     ▲                     │                                  │
//!     └─────────── end ─────┴──────────────────────────────────┘
//! ```
//!
//! The real text lives in a hidden input surface owned by the host. The
//! engine mirrors that input's selection and tells the host to move it with
//! [`Action::SetInputSelection`]. Time is passed in as `now` (milliseconds),
//! which keeps the double-click arming delay, the select-all window and the
//! blink phase plain state.

#[cfg(test)]
#[path = "caret_test.rs"]
mod caret_test;

use tracing::debug;

use crate::config::EditorConfig;
use crate::doc::ShapeId;
use crate::engine::Action;
use crate::geom::{Point, Rect, Transform, Viewport};
use crate::glyphs::GlyphLayout;
use crate::overlay::{CaretLine, Overlay, SelectionBlock};

/// Horizontal extent of one character, in the shape's user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharCell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Build the cells for `layout`, one per character plus the end sentinel.
///
/// Positions reported as inaccurate are in zoomed canvas coordinates and get
/// mapped back with `(x - content_width * zoom) / zoom`.
#[must_use]
pub fn compute_cells(layout: &GlyphLayout, content_width: f64, zoom: f64) -> Vec<CharCell> {
    let fix = |x: f64| {
        if layout.accurate {
            x
        } else {
            (x - content_width * zoom) / zoom
        }
    };
    let bbox = layout.bbox;
    let mut cells = Vec::with_capacity(layout.len() + 1);
    let mut end_x = bbox.x + bbox.width / 2.0;
    for (start, end) in layout.starts.iter().zip(&layout.ends) {
        let x = fix(start.x);
        end_x = fix(end.x);
        cells.push(CharCell { x, y: bbox.y, width: end_x - x, height: bbox.height });
    }
    cells.push(CharCell { x: end_x, y: bbox.y, width: 0.0, height: bbox.height });
    cells
}

/// Character index for user-space `x`.
///
/// The point belongs to the last cell starting at or left of it (so a gap
/// between cells belongs to the preceding one); past that cell's midpoint
/// the index moves to the next character. Left of the first cell gives 0,
/// right of the last gives the end.
#[must_use]
pub fn index_from_point(cells: &[CharCell], x: f64) -> usize {
    let chars = cells.len().saturating_sub(1);
    if chars == 0 {
        return 0;
    }
    let Some(pos) = cells[..chars].iter().rposition(|c| c.x <= x) else {
        return 0;
    };
    let cell = cells[pos];
    if x > cell.x + cell.width / 2.0 { pos + 1 } else { pos }
}

/// Range of the alphanumeric run around `index`, as `(start, end)`.
#[must_use]
pub fn word_bounds(text: &str, index: usize) -> (usize, usize) {
    let chars: Vec<char> = text.chars().collect();
    let index = index.min(chars.len());
    let before = chars[..index].iter().rev().take_while(|c| c.is_alphanumeric()).count();
    let after = chars[index..].iter().take_while(|c| c.is_alphanumeric()).count();
    (index - before, index + after)
}

/// Where the caret engine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretState {
    #[default]
    Inactive,
    Editing { index: usize },
    Selecting { start: usize, end: usize },
}

/// Caret blink phase. `running` means the host timer exists.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Blink {
    running: bool,
    visible: bool,
    last_toggle: f64,
}

/// Caret and selection engine for one primitive shape at a time.
#[derive(Debug, Clone)]
pub struct CaretEngine {
    state: CaretState,
    shape: Option<ShapeId>,
    text: String,
    cells: Vec<CharCell>,
    bbox: Rect,
    matrix: Transform,
    viewport: Viewport,
    /// Mirror of the input surface's selection.
    input: (usize, usize),
    anchor: usize,
    press: Option<Point>,
    blink: Blink,
    overlay: Overlay,
    clock: f64,
    double_click_at: f64,
    select_all_until: Option<f64>,
    blink_interval_ms: f64,
    double_click_arm_ms: f64,
    triple_click_window_ms: f64,
    click_slop_px: f64,
    content_width: f64,
}

impl Default for CaretEngine {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl CaretEngine {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: CaretState::Inactive,
            shape: None,
            text: String::new(),
            cells: Vec::new(),
            bbox: Rect::default(),
            matrix: Transform::IDENTITY,
            viewport: Viewport::default(),
            input: (0, 0),
            anchor: 0,
            press: None,
            blink: Blink::default(),
            overlay: Overlay::default(),
            clock: 0.0,
            double_click_at: 0.0,
            select_all_until: None,
            blink_interval_ms: config.blink_interval_ms,
            double_click_arm_ms: config.double_click_arm_ms,
            triple_click_window_ms: config.triple_click_window_ms,
            click_slop_px: config.click_slop_px,
            content_width: config.content_width,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> CaretState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != CaretState::Inactive
    }

    /// The shape being edited.
    #[must_use]
    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    #[must_use]
    pub fn cells(&self) -> &[CharCell] {
        &self.cells
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The input surface's selection as `(start, end)`.
    #[must_use]
    pub fn input_selection(&self) -> (usize, usize) {
        self.input
    }

    /// Whether the host blink timer should be running.
    #[must_use]
    pub fn is_blinking(&self) -> bool {
        self.blink.running
    }

    fn len(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    // --- Session ---

    /// Enter caret editing on `shape`.
    ///
    /// With an `entry` point (screen space) the caret goes to the nearest
    /// index; without one it goes to the end of the text.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        &mut self,
        shape: ShapeId,
        text: &str,
        layout: &GlyphLayout,
        matrix: Transform,
        zoom: f64,
        entry: Option<Point>,
        now: f64,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.is_active() {
            actions.extend(self.end());
        }
        debug!(%shape, chars = text.chars().count(), accurate = layout.accurate, "caret editing started");

        self.shape = Some(shape);
        self.matrix = matrix;
        self.viewport = Viewport { zoom };
        self.clock = now;
        self.double_click_at = now + self.double_click_arm_ms;
        self.select_all_until = None;
        self.press = None;
        self.load_layout(text, layout);
        let len = self.len();
        self.input = (len, len);

        actions.push(Action::FocusInput);
        let index = match entry {
            Some(pt) => self.index_at(pt),
            None => len,
        };
        self.anchor = index;
        actions.extend(self.set_cursor(index));
        actions
    }

    /// Text or layout changed while editing; `selection` is the input
    /// surface's new selection.
    pub fn refresh(&mut self, text: &str, layout: &GlyphLayout, selection: (usize, usize)) -> Vec<Action> {
        if !self.is_active() {
            return Vec::new();
        }
        self.load_layout(text, layout);
        let (start, end) = (selection.0.min(selection.1), selection.0.max(selection.1));
        self.anchor = start;
        self.set_selection(start, end, false)
    }

    fn load_layout(&mut self, text: &str, layout: &GlyphLayout) {
        text.clone_into(&mut self.text);
        self.bbox = layout.bbox;
        self.cells = compute_cells(layout, self.content_width, self.viewport.zoom);
    }

    /// Leave caret editing: stop the blink timer, clear the overlay, blur
    /// the input surface.
    pub fn end(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.blink.running {
            actions.push(Action::StopBlink);
        }
        if self.is_active() {
            actions.push(Action::BlurInput);
            actions.push(Action::RenderNeeded);
            debug!(shape = self.shape.as_deref().unwrap_or_default(), "caret editing ended");
        }
        self.blink = Blink::default();
        self.overlay = Overlay::default();
        self.state = CaretState::Inactive;
        self.shape = None;
        self.cells.clear();
        self.text.clear();
        self.press = None;
        self.select_all_until = None;
        actions
    }

    // --- Caret and selection ---

    /// Index under a screen point.
    #[must_use]
    pub fn index_at(&self, screen: Point) -> usize {
        let pt = self.viewport.screen_to_pt(screen, &self.matrix);
        index_from_point(&self.cells, pt.x)
    }

    /// Place a collapsed caret at `index`.
    pub fn set_cursor(&mut self, index: usize) -> Vec<Action> {
        let mut actions = Vec::new();
        let index = index.min(self.len());
        self.input = (index, index);
        if !self.text.is_empty() {
            actions.push(Action::SetInputSelection { start: index, end: index });
        }
        if !self.blink.running {
            self.blink.running = true;
            actions.push(Action::StartBlink { interval_ms: self.blink_interval_ms });
        }
        self.blink.visible = true;
        self.blink.last_toggle = self.clock;

        let x = self.cells.get(index).map_or(self.bbox.x, |c| c.x);
        self.overlay = Overlay {
            caret: Some(CaretLine {
                from: self.viewport.pt_to_screen(Point::new(x, self.bbox.y), &self.matrix),
                to: self.viewport.pt_to_screen(Point::new(x, self.bbox.bottom()), &self.matrix),
                visible: true,
            }),
            selection: None,
        };
        self.state = CaretState::Editing { index };
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select `start..end`. Equal ends collapse to a caret. With
    /// `apply_input` the input surface's selection is moved too.
    pub fn set_selection(&mut self, start: usize, end: usize, apply_input: bool) -> Vec<Action> {
        let len = self.len();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        if start == end {
            return self.set_cursor(end);
        }
        let mut actions = Vec::new();
        self.input = (start, end);
        if apply_input {
            actions.push(Action::SetInputSelection { start, end });
        }

        let x0 = self.cells.get(start).map_or(self.bbox.x, |c| c.x);
        let x1 = self.cells.get(end).map_or(self.bbox.right(), |c| c.x);
        let (top, bottom) = (self.bbox.y, self.bbox.bottom());
        let to_screen = |x: f64, y: f64| self.viewport.pt_to_screen(Point::new(x, y), &self.matrix);
        self.overlay = Overlay {
            caret: None,
            selection: Some(SelectionBlock {
                top_left: to_screen(x0, top),
                top_right: to_screen(x1, top),
                bottom_right: to_screen(x1, bottom),
                bottom_left: to_screen(x0, bottom),
            }),
        };
        self.state = CaretState::Selecting { start, end };
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select the whole text.
    pub fn select_all(&mut self) -> Vec<Action> {
        self.anchor = 0;
        self.set_selection(0, self.len(), true)
    }

    // --- Pointer ---

    /// Press at a screen point: caret to the nearest index, which becomes
    /// the selection anchor.
    pub fn pointer_down(&mut self, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_active() {
            return Vec::new();
        }
        self.clock = now;
        self.press = Some(screen);
        self.anchor = self.index_at(screen);
        let mut actions = vec![Action::FocusInput];
        actions.extend(self.set_cursor(self.anchor));
        actions
    }

    /// Drag: extend the selection from the anchor to the pointer.
    pub fn pointer_move(&mut self, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_active() || self.press.is_none() {
            return Vec::new();
        }
        self.clock = now;
        let index = self.index_at(screen);
        self.set_selection(self.anchor, index, false)
    }

    /// Release: commit the selection to the input surface. Returns the
    /// actions and whether the release asks to leave edit mode (a click
    /// within the slop that landed off the shape).
    pub fn pointer_up(&mut self, screen: Point, now: f64) -> (Vec<Action>, bool) {
        if !self.is_active() {
            return (Vec::new(), false);
        }
        self.clock = now;
        let index = self.index_at(screen);
        let mut actions = self.set_selection(self.anchor, index, true);

        let is_click = self.press.take().is_some_and(|p| {
            (screen.x - p.x).abs() < self.click_slop_px && (screen.y - p.y).abs() < self.click_slop_px
        });
        let pt = self.viewport.screen_to_pt(screen, &self.matrix);
        let on_shape = self.bbox.contains(pt);
        if is_click && !on_shape {
            return (actions, true);
        }

        if let Some(deadline) = self.select_all_until.take() {
            if is_click && now <= deadline {
                actions.extend(self.select_all());
            }
        }
        (actions, false)
    }

    /// Double-click: select the word under the pointer and arm select-all
    /// for the next click. Ignored until the arming delay after `begin` has
    /// passed.
    pub fn double_click(&mut self, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_active() || now < self.double_click_at {
            return Vec::new();
        }
        self.clock = now;
        let index = self.index_at(screen);
        let (start, end) = word_bounds(&self.text, index);
        self.anchor = start;
        self.select_all_until = Some(now + self.triple_click_window_ms);
        self.set_selection(start, end, true)
    }

    // --- Blink ---

    /// Advance the blink phase. Called by the host timer.
    pub fn blink(&mut self, now: f64) -> Vec<Action> {
        if !self.blink.running {
            return Vec::new();
        }
        self.clock = now;
        if now - self.blink.last_toggle < self.blink_interval_ms {
            return Vec::new();
        }
        self.blink.last_toggle = now;
        self.blink.visible = !self.blink.visible;
        match self.overlay.caret.as_mut() {
            Some(caret) => {
                caret.visible = self.blink.visible;
                vec![Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }
}

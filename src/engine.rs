use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::accessor::TextStyle;
use crate::commands::{self, StyleCommand};
use crate::config::EditorConfig;
use crate::doc::{Document, ShapeId};
use crate::dom::SvgGlyphProvider;
use crate::edit::{EditSession, Mode, TextEditController};
use crate::error::DocError;
use crate::geom::{Point, Transform, Viewport};
use crate::glyphs::{EstimatedGlyphs, GlyphProvider};
use crate::hit;
use crate::input::{Button, Key, Modifiers, Tool, UiState};
use crate::overlay::Overlay;
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    ShapeCreated { id: ShapeId },
    ShapeDeleted { id: ShapeId },
    /// Content or style of a shape changed.
    Changed { id: ShapeId },
    Selected { id: ShapeId },
    SelectionCleared,
    ModeChanged { mode: Mode },
    /// Focus the styled box of `id` for native editing.
    FocusTextBox { id: ShapeId, select_all: bool },
    BlurTextBox { id: ShapeId },
    /// Register input, blur and keydown callbacks on the styled box of `id`.
    AttachListeners { id: ShapeId },
    DetachListeners { id: ShapeId },
    /// Insert a line break at the box's caret and suppress the default
    /// Enter behavior.
    InsertSoftBreak { id: ShapeId },
    /// Focus the hidden input surface that receives primitive-text typing.
    FocusInput,
    BlurInput,
    SetInputSelection { start: usize, end: usize },
    /// Start the one blink timer, calling `blink` every `interval_ms`.
    StartBlink { interval_ms: f64 },
    StopBlink,
    SetCursor { cursor: String },
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: Document,
    pub viewport: Viewport,
    pub ui: UiState,
    pub config: EditorConfig,
    controller: TextEditController,
    glyphs: Box<dyn GlyphProvider>,
    outbox: Vec<Action>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            doc: Document::default(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            controller: TextEditController::new(&config),
            glyphs: Box::new(EstimatedGlyphs),
            outbox: Vec::new(),
            config,
        }
    }

    /// Replace the source of per-character geometry.
    pub fn set_glyph_provider(&mut self, glyphs: Box<dyn GlyphProvider>) {
        self.glyphs = glyphs;
    }

    // --- Document ---

    /// Replace the document with parsed `text`. On failure the current
    /// document is kept and `false` returned. Teardown of an active edit
    /// session is queued for [`Self::drain_actions`].
    pub fn load(&mut self, text: &str) -> bool {
        match Document::load(text) {
            Ok(doc) => {
                let teardown = self.controller.end(&mut self.doc, false);
                self.outbox.extend(teardown);
                self.doc = doc;
                self.ui.selected_id = None;
                self.outbox.push(Action::SelectionCleared);
                self.outbox.push(Action::RenderNeeded);
                true
            }
            Err(err) => {
                warn!(error = %err, "load failed; keeping current document");
                false
            }
        }
    }

    /// Actions queued by calls that report only success.
    pub fn drain_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.outbox)
    }

    /// Serialize the document.
    ///
    /// # Errors
    ///
    /// Returns [`DocError`] if the markup cannot be written.
    pub fn export(&self) -> Result<String, DocError> {
        self.doc.export()
    }

    /// End any edit session and clear the selection.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut actions = self.controller.end(&mut self.doc, false);
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionCleared);
        }
        actions
    }

    /// Delete shape `id`, leaving edit mode first if it is being edited.
    pub fn apply_delete(&mut self, id: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.controller.editing_id() == Some(id) {
            actions.extend(self.controller.end(&mut self.doc, false));
        }
        if self.doc.remove_shape(id).is_some() {
            actions.push(Action::ShapeDeleted { id: id.to_owned() });
            actions.push(Action::RenderNeeded);
        }
        self.absorb(&actions);
        actions
    }

    // --- Tool / style ---

    /// Set the active tool. Switching tools leaves edit mode.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.controller.end(&mut self.doc, true);
        self.ui.tool = tool;
        let cursor = if tool == Tool::Text { "text" } else { "default" };
        actions.push(Action::SetCursor { cursor: cursor.to_owned() });
        self.absorb(&actions);
        actions
    }

    /// Set the zoom factor. Non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > 0.0 {
            self.viewport.zoom = zoom;
        }
    }

    /// Apply a toolbar command to the shape being edited, or else the
    /// selected one.
    pub fn apply_style_command(&mut self, command: &StyleCommand) -> Vec<Action> {
        let Some(id) = self.target() else {
            return Vec::new();
        };
        if !commands::apply(&mut self.doc, &id, command) {
            return Vec::new();
        }
        let mut actions = vec![Action::Changed { id }];
        actions.extend(self.controller.relayout(&self.doc, self.glyphs.as_ref()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Style facts of text shape `id` for the toolbar.
    #[must_use]
    pub fn text_style(&self, id: &str) -> Option<TextStyle> {
        self.doc.text_style(id)
    }

    /// Style facts of the edited or selected shape.
    #[must_use]
    pub fn current_text_style(&self) -> Option<TextStyle> {
        self.target().and_then(|id| self.doc.text_style(&id))
    }

    // --- Edit mode ---

    /// Enter edit mode on `id`. `entry` is the screen point that asked for
    /// it, if any.
    pub fn begin_edit(&mut self, id: &str, entry: Option<Point>, now: f64) -> Vec<Action> {
        let actions = self.controller.begin(&mut self.doc, self.glyphs.as_ref(), id, self.viewport, entry, now);
        self.absorb(&actions);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, now: f64) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.viewport.screen_to_pt(screen_pt, &Transform::IDENTITY);
        let mut actions = Vec::new();
        match self.controller.session().cloned() {
            Some(EditSession::Primitive { .. }) => return self.controller.pointer_down(screen_pt, now),
            Some(EditSession::RichText { id, .. }) => {
                if hit::text_shape_at(&self.doc, self.glyphs.as_ref(), world).as_deref() == Some(id.as_str()) {
                    return Vec::new();
                }
                actions.extend(self.controller.end(&mut self.doc, false));
            }
            None => {}
        }

        if self.ui.tool.creates_shape() {
            let style = self.config.default_style.clone();
            let id = if self.config.styled_text {
                self.doc.create_styled_text(world, &style)
            } else {
                self.doc.create_primitive_text(world, &style)
            };
            actions.push(Action::ShapeCreated { id: id.clone() });
            actions.extend(self.controller.begin(&mut self.doc, self.glyphs.as_ref(), &id, self.viewport, None, now));
        } else {
            match hit::text_shape_at(&self.doc, self.glyphs.as_ref(), world) {
                Some(id) => actions.push(Action::Selected { id }),
                None if self.ui.selected_id.is_some() => actions.push(Action::SelectionCleared),
                None => {}
            }
            actions.push(Action::RenderNeeded);
        }
        self.absorb(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, now: f64) -> Vec<Action> {
        let actions = self.controller.pointer_move(screen_pt, now);
        self.absorb(&actions);
        actions
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, now: f64) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let actions = self.controller.pointer_up(&mut self.doc, screen_pt, now);
        self.absorb(&actions);
        actions
    }

    /// In select mode a double-click on a text shape edits it; while
    /// editing primitive text it selects a word.
    pub fn on_double_click(&mut self, screen_pt: Point, now: f64) -> Vec<Action> {
        if self.controller.mode() == Mode::TextEdit {
            let actions = self.controller.double_click(screen_pt, now);
            self.absorb(&actions);
            return actions;
        }
        let world = self.viewport.screen_to_pt(screen_pt, &Transform::IDENTITY);
        match hit::text_shape_at(&self.doc, self.glyphs.as_ref(), world) {
            Some(id) => self.begin_edit(&id, Some(screen_pt), now),
            None => Vec::new(),
        }
    }

    /// Ctrl/Cmd+B, I and U toggle style on the target shape. Outside of
    /// edit mode Enter edits the selected shape and Delete removes it.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers, now: f64) -> Vec<Action> {
        if modifiers.ctrl || modifiers.meta {
            let command = match key.0.to_ascii_lowercase().as_str() {
                "b" => Some(StyleCommand::ToggleBold),
                "i" => Some(StyleCommand::ToggleItalic),
                "u" => Some(StyleCommand::ToggleDecoration("underline".to_owned())),
                _ => None,
            };
            if let Some(command) = command {
                return self.apply_style_command(&command);
            }
        }

        if self.controller.mode() == Mode::TextEdit {
            let actions = self.controller.on_key_down(&mut self.doc, &key);
            self.absorb(&actions);
            return actions;
        }
        let Some(id) = self.ui.selected_id.clone() else {
            return Vec::new();
        };
        match key.0.as_str() {
            "Enter" => self.begin_edit(&id, None, now),
            "Delete" | "Backspace" => self.apply_delete(&id),
            _ => Vec::new(),
        }
    }

    /// The host's editing surface changed to `text` with the given
    /// selection.
    pub fn on_text_input(&mut self, text: &str, selection_start: usize, selection_end: usize) -> Vec<Action> {
        let actions =
            self.controller
                .on_text_input(&mut self.doc, self.glyphs.as_ref(), text, (selection_start, selection_end));
        self.absorb(&actions);
        actions
    }

    pub fn on_blur(&mut self) -> Vec<Action> {
        let actions = self.controller.on_blur(&mut self.doc);
        self.absorb(&actions);
        actions
    }

    /// Blink timer tick.
    pub fn blink(&mut self, now: f64) -> Vec<Action> {
        let actions = self.controller.blink(now);
        self.absorb(&actions);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    #[must_use]
    pub fn editing(&self) -> Option<&str> {
        self.controller.editing_id()
    }

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        self.controller.caret().overlay()
    }

    #[must_use]
    pub fn controller(&self) -> &TextEditController {
        &self.controller
    }

    fn target(&self) -> Option<ShapeId> {
        self.controller.editing_id().map(str::to_owned).or_else(|| self.ui.selected_id.clone())
    }

    /// Track selection changes reported by `actions`.
    fn absorb(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::Selected { id } => self.ui.selected_id = Some(id.clone()),
                Action::SelectionCleared => self.ui.selected_id = None,
                Action::ShapeDeleted { id } if self.ui.selected_id.as_ref() == Some(id) => {
                    self.ui.selected_id = None;
                }
                _ => {}
            }
        }
    }
}

/// The full engine. Wraps `EngineCore`, owns the overlay canvas and reads
/// glyph geometry from the live SVG.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    viewport_width: f64,
    viewport_height: f64,
    dpr: f64,
}

impl Engine {
    /// Create an engine drawing its overlay on `canvas` and measuring text
    /// in `document`.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, document: web_sys::Document, config: EditorConfig) -> Self {
        let glyphs = SvgGlyphProvider::new(document, config.accurate_char_positions);
        let mut core = EngineCore::with_config(config);
        core.set_glyph_provider(Box::new(glyphs));
        Self { canvas, core, viewport_width: 0.0, viewport_height: 0.0, dpr: 1.0 }
    }

    fn now() -> f64 {
        js_sys::Date::now()
    }

    // --- Delegated data inputs ---

    pub fn load(&mut self, text: &str) -> bool {
        self.core.load(text)
    }

    pub fn drain_actions(&mut self) -> Vec<Action> {
        self.core.drain_actions()
    }

    /// # Errors
    ///
    /// Returns [`DocError`] if the markup cannot be written.
    pub fn export(&self) -> Result<String, DocError> {
        self.core.export()
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.core.clear()
    }

    pub fn apply_delete(&mut self, id: &str) -> Vec<Action> {
        self.core.apply_delete(id)
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn apply_style_command(&mut self, command: &StyleCommand) -> Vec<Action> {
        self.core.apply_style_command(command)
    }

    pub fn begin_edit(&mut self, id: &str) -> Vec<Action> {
        self.core.begin_edit(id, None, Self::now())
    }

    // --- Viewport ---

    /// Update viewport dimensions, device pixel ratio and zoom.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64, zoom: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
        self.core.set_zoom(zoom);
        debug!(width_css, height_css, dpr, zoom, "viewport updated");
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, Self::now())
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, Self::now())
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, Self::now())
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_double_click(screen_pt, Self::now())
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers, Self::now())
    }

    pub fn on_text_input(&mut self, text: &str, selection_start: usize, selection_end: usize) -> Vec<Action> {
        self.core.on_text_input(text, selection_start, selection_end)
    }

    pub fn on_blur(&mut self) -> Vec<Action> {
        self.core.on_blur()
    }

    pub fn blink(&mut self) -> Vec<Action> {
        self.core.blink(Self::now())
    }

    // --- Render ---

    /// Draw the overlay to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call
    /// fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, self.core.overlay(), self.viewport_width, self.viewport_height, self.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.core.mode()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.core.selection()
    }

    #[must_use]
    pub fn current_text_style(&self) -> Option<TextStyle> {
        self.core.current_text_style()
    }
}

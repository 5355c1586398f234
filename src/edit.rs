//! Text-edit mode: the single, exclusive edit session.
//!
//! A session edits one text shape. Styled boxes are edited by the host's
//! native rich editing and report back through input, key and blur
//! callbacks; primitive text is edited through the [`CaretEngine`]. Every
//! exit path goes through [`TextEditController::end`], which tears the
//! session down and deletes the shape if it was left empty.

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::caret::CaretEngine;
use crate::config::EditorConfig;
use crate::doc::{Document, ShapeId, TextKind};
use crate::engine::Action;
use crate::geom::{Point, Transform, Viewport};
use crate::glyphs::GlyphProvider;
use crate::input::Key;

/// Editor-wide mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Select,
    TextEdit,
}

/// The shape being edited and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSession {
    /// Caret-driven editing of a primitive `<text>`.
    Primitive { id: ShapeId },
    /// Native editing of a styled box. `listening` is false when the
    /// container has no box to focus.
    RichText { id: ShapeId, listening: bool },
}

impl EditSession {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Primitive { id } | Self::RichText { id, .. } => id,
        }
    }
}

pub struct TextEditController {
    session: Option<EditSession>,
    caret: CaretEngine,
}

impl Default for TextEditController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl TextEditController {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self { session: None, caret: CaretEngine::new(config) }
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.session.is_some() { Mode::TextEdit } else { Mode::Select }
    }

    #[must_use]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.session.as_ref().map(EditSession::id)
    }

    #[must_use]
    pub fn caret(&self) -> &CaretEngine {
        &self.caret
    }

    fn is_primitive(&self) -> bool {
        matches!(self.session, Some(EditSession::Primitive { .. }))
    }

    // --- Session ---

    /// Start editing `id`, ending any other session first.
    ///
    /// `entry` is the screen point that started the edit, if any; the caret
    /// of a primitive goes there instead of to the end.
    pub fn begin(
        &mut self,
        doc: &mut Document,
        glyphs: &dyn GlyphProvider,
        id: &str,
        viewport: Viewport,
        entry: Option<Point>,
        now: f64,
    ) -> Vec<Action> {
        if self.editing_id() == Some(id) {
            return Vec::new();
        }
        let mut actions = self.end(doc, false);
        let Some(kind) = doc.kind(id) else {
            debug!(%id, "not a text shape; edit mode not entered");
            return actions;
        };

        actions.push(Action::ModeChanged { mode: Mode::TextEdit });
        match kind {
            TextKind::StyledBox => {
                let listening = doc.text_box(id).is_some();
                if listening {
                    actions.push(Action::FocusTextBox { id: id.to_owned(), select_all: true });
                    actions.push(Action::AttachListeners { id: id.to_owned() });
                }
                self.session = Some(EditSession::RichText { id: id.to_owned(), listening });
            }
            TextKind::Primitive => {
                if let Some(el) = doc.shape(id) {
                    let layout = glyphs.layout(el);
                    let matrix = Transform::parse(el.attribute("transform").unwrap_or_default());
                    let text = el.text_content();
                    actions.extend(self.caret.begin(id.to_owned(), &text, &layout, matrix, viewport.zoom, entry, now));
                }
                self.session = Some(EditSession::Primitive { id: id.to_owned() });
            }
        }
        debug!(%id, ?kind, "edit mode entered");
        actions
    }

    /// Leave edit mode. With `reselect` the shape is selected again unless
    /// it was deleted for being empty.
    pub fn end(&mut self, doc: &mut Document, reselect: bool) -> Vec<Action> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        let empty = match &session {
            EditSession::RichText { id, listening } => {
                if *listening {
                    actions.push(Action::DetachListeners { id: id.clone() });
                    actions.push(Action::BlurTextBox { id: id.clone() });
                }
                doc.text_box(id).is_some_and(|div| div.inner_text().trim().is_empty())
            }
            EditSession::Primitive { id } => {
                actions.extend(self.caret.end());
                doc.text_content(id).is_some_and(|text| text.is_empty())
            }
        };

        let id = session.id();
        actions.push(Action::ModeChanged { mode: Mode::Select });
        if empty && doc.remove_shape(id).is_some() {
            debug!(%id, "empty text shape deleted on exit");
            actions.push(Action::ShapeDeleted { id: id.to_owned() });
        } else if reselect {
            actions.push(Action::Selected { id: id.to_owned() });
        }
        actions.push(Action::RenderNeeded);
        debug!(%id, "edit mode left");
        actions
    }

    // --- Callbacks ---

    /// The host's editing surface changed. `selection` is its selection
    /// after the change, in characters.
    pub fn on_text_input(
        &mut self,
        doc: &mut Document,
        glyphs: &dyn GlyphProvider,
        text: &str,
        selection: (usize, usize),
    ) -> Vec<Action> {
        let Some(id) = self.editing_id().map(str::to_owned) else {
            return Vec::new();
        };
        if !doc.set_text_content(&id, text) {
            return Vec::new();
        }
        let mut actions = vec![Action::Changed { id: id.clone() }];
        if self.is_primitive() {
            if let Some(el) = doc.shape(&id) {
                actions.extend(self.caret.refresh(text, &glyphs.layout(el), selection));
            }
        }
        actions
    }

    /// Escape leaves edit mode; Enter in a styled box inserts a soft break.
    pub fn on_key_down(&mut self, doc: &mut Document, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            return self.end(doc, true);
        }
        match &self.session {
            Some(EditSession::RichText { id, listening: true }) if key.is_enter() => {
                vec![Action::InsertSoftBreak { id: id.clone() }, Action::Changed { id: id.clone() }]
            }
            _ => Vec::new(),
        }
    }

    /// The styled box lost focus.
    pub fn on_blur(&mut self, doc: &mut Document) -> Vec<Action> {
        match self.session {
            Some(EditSession::RichText { .. }) => self.end(doc, true),
            _ => Vec::new(),
        }
    }

    /// Glyph geometry of the edited primitive changed (restyle, move).
    pub fn relayout(&mut self, doc: &Document, glyphs: &dyn GlyphProvider) -> Vec<Action> {
        let Some(EditSession::Primitive { id }) = &self.session else {
            return Vec::new();
        };
        match doc.shape(id) {
            Some(el) => self.caret.refresh(&el.text_content(), &glyphs.layout(el), self.caret.input_selection()),
            None => Vec::new(),
        }
    }

    // --- Pointer (primitive sessions) ---

    pub fn pointer_down(&mut self, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_primitive() {
            return Vec::new();
        }
        self.caret.pointer_down(screen, now)
    }

    pub fn pointer_move(&mut self, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_primitive() {
            return Vec::new();
        }
        self.caret.pointer_move(screen, now)
    }

    /// A click off the shape leaves edit mode.
    pub fn pointer_up(&mut self, doc: &mut Document, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_primitive() {
            return Vec::new();
        }
        let (mut actions, exit) = self.caret.pointer_up(screen, now);
        if exit {
            actions.extend(self.end(doc, true));
        }
        actions
    }

    pub fn double_click(&mut self, screen: Point, now: f64) -> Vec<Action> {
        if !self.is_primitive() {
            return Vec::new();
        }
        self.caret.double_click(screen, now)
    }

    /// Blink timer tick.
    pub fn blink(&mut self, now: f64) -> Vec<Action> {
        self.caret.blink(now)
    }
}

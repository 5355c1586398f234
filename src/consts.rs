//! Shared constants for the text crate.

// ── Markup ──────────────────────────────────────────────────────

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// XHTML namespace URI, declared on the styled box.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Editor extension namespace URI bound to the `se` prefix.
pub const SE_NS: &str = "http://svg-edit.googlecode.com";

/// Attribute that tags a `foreignObject` with its editor shape type.
pub const TYPE_ATTR: &str = "se:type";

/// Value of [`TYPE_ATTR`] on styled-box text containers.
pub const TEXT_TYPE: &str = "text";

/// Element name of styled-box text containers.
pub const FOREIGN_OBJECT: &str = "foreignObject";

/// Element name of the embedded styled box.
pub const TEXT_BOX: &str = "div";

/// Element name of primitive text shapes.
pub const PRIMITIVE_TEXT: &str = "text";

/// Prefix for generated shape ids.
pub const ID_PREFIX: &str = "svg_";

// ── Timing ──────────────────────────────────────────────────────

/// Caret blink half-period in milliseconds.
pub const BLINK_INTERVAL_MS: f64 = 600.0;

/// Delay after entering edit mode before a double-click selects a word.
pub const DOUBLE_CLICK_ARM_MS: f64 = 300.0;

/// Window after a word selection in which one more click selects everything.
pub const TRIPLE_CLICK_WINDOW_MS: f64 = 300.0;

// ── Pointer ─────────────────────────────────────────────────────

/// Screen-space slop within which a press and release count as a click.
pub const CLICK_SLOP_PX: f64 = 2.0;

// ── New shapes ──────────────────────────────────────────────────

/// Width of a newly created styled-box text container.
pub const NEW_TEXT_WIDTH: f64 = 200.0;

/// Height of a newly created styled-box text container.
pub const NEW_TEXT_HEIGHT: f64 = 50.0;

/// Average glyph advance as a fraction of the font size, for estimates.
pub const ESTIMATED_ADVANCE_RATIO: f64 = 0.6;

/// Ascent as a fraction of the font size, for estimated text boxes.
pub const ESTIMATED_ASCENT_RATIO: f64 = 0.8;

// ── Overlay ─────────────────────────────────────────────────────

/// Caret stroke color.
pub const CARET_STROKE: &str = "#333";

/// Selection highlight fill color.
pub const SELECTION_FILL: &str = "green";

/// Selection highlight opacity.
pub const SELECTION_OPACITY: f64 = 0.5;

//! Rendering: draws the edit overlay to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the overlay computed by the caret engine and produces pixels; it
//! does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

use crate::consts::{CARET_STROKE, SELECTION_FILL, SELECTION_OPACITY};
use crate::overlay::{CaretLine, Overlay, SelectionBlock};

/// Caret stroke width in screen pixels.
const CARET_WIDTH_PX: f64 = 1.0;

/// Clear the canvas and draw the overlay.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    overlay: &Overlay,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    if let Some(block) = &overlay.selection {
        draw_selection(ctx, block)?;
    }
    if let Some(caret) = overlay.caret.filter(|c| c.visible) {
        draw_caret(ctx, &caret);
    }
    Ok(())
}

fn draw_selection(ctx: &CanvasRenderingContext2d, block: &SelectionBlock) -> Result<(), JsValue> {
    let path = Path2d::new_with_path_string(&block.path_data())?;
    ctx.save();
    ctx.set_global_alpha(SELECTION_OPACITY);
    ctx.set_fill_style_str(SELECTION_FILL);
    ctx.fill_with_path_2d(&path);
    ctx.restore();
    Ok(())
}

fn draw_caret(ctx: &CanvasRenderingContext2d, caret: &CaretLine) {
    ctx.begin_path();
    ctx.move_to(caret.from.x, caret.from.y);
    ctx.line_to(caret.to.x, caret.to.y);
    ctx.set_stroke_style_str(CARET_STROKE);
    ctx.set_line_width(CARET_WIDTH_PX);
    ctx.stroke();
}

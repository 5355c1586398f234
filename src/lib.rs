//! Text editing and style persistence for the vector-graphics canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to the
//! drawing surface. It owns everything about text shapes: creating them,
//! switching the canvas between select mode and text-edit mode, tracking the
//! caret and selection on primitive `<text>` shapes, and keeping the styling
//! of styled-box text (`<foreignObject se:type="text">` wrapping a `<div>`)
//! intact through export and import. The host JavaScript layer wires DOM
//! events to the engine and carries out the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`edit`] | Exclusive edit session: rich-text vs. caret dispatch |
//! | [`caret`] | Character cells, caret and selection state machine |
//! | [`overlay`] | Caret line and selection highlight geometry |
//! | [`doc`] | Document model, text shapes, load/export |
//! | [`markup`] | Element tree parsed from and written to XML markup |
//! | [`style`] | Live inline style declarations |
//! | [`mapping`] | Attribute ↔ style vocabulary for the seven style facets |
//! | [`accessor`] | Typed read/write of style facts on a styled box |
//! | [`restore`] | Post-load style rehydration and legacy attribute migration |
//! | [`commands`] | Toolbar style commands |
//! | [`glyphs`] | Per-character geometry providers |
//! | [`dom`] | Browser-backed glyph geometry |
//! | [`geom`] | Points, rectangles and affine transforms |
//! | [`input`] | Tools, buttons, modifiers and keys |
//! | [`hit`] | Hit-testing text shapes |
//! | [`render`] | Overlay rendering onto a 2D canvas |
//! | [`config`] | Editor configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Shared constants (timings, defaults, attribute names) |

pub mod accessor;
pub mod caret;
pub mod commands;
pub mod config;
pub mod consts;
pub mod doc;
pub mod dom;
pub mod edit;
pub mod engine;
pub mod error;
pub mod geom;
pub mod glyphs;
pub mod hit;
pub mod input;
pub mod mapping;
pub mod markup;
pub mod overlay;
pub mod render;
pub mod restore;
pub mod style;

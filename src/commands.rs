//! Toolbar style commands.
//!
//! Each command resolves against the shape's current style to one facet
//! and its new value, then writes it the way the shape stores style: into
//! the inline style of a styled box, or as a presentational attribute on a
//! primitive `<text>`.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{TextBoxStyleMut, TextStyle};
use crate::doc::{Document, TextKind};
use crate::mapping::{DECORATIONS, DEFAULT_DECORATION, Facet, TextAnchor, map_decoration, size_to_style};
use crate::markup::parse_number;

/// A style change requested by the toolbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum StyleCommand {
    ToggleBold,
    ToggleItalic,
    /// Add or remove one decoration token (`underline`, `overline`,
    /// `line-through`).
    ToggleDecoration(String),
    SetAnchor(TextAnchor),
    /// Font size in pixels.
    SetFontSize(f64),
    SetFontFamily(String),
    SetColor(String),
    SetWeight(String),
}

/// Whether `weight` renders bold: `bold`, `bolder` or 600 and up.
#[must_use]
pub fn is_bold(weight: &str) -> bool {
    match weight.trim() {
        "bold" | "bolder" => true,
        other => parse_number(other).is_some_and(|n| n >= 600.0),
    }
}

impl StyleCommand {
    /// The facet this command changes and its new style-vocabulary value,
    /// or `None` when the command is meaningless (an unknown decoration).
    #[must_use]
    pub fn resolve(&self, current: &TextStyle) -> Option<(Facet, String)> {
        let change = match self {
            Self::ToggleBold => {
                let weight = if is_bold(&current.weight) { "normal" } else { "bold" };
                (Facet::Weight, weight.to_owned())
            }
            Self::ToggleItalic => {
                let slant = if current.slant == "italic" { "normal" } else { "italic" };
                (Facet::Slant, slant.to_owned())
            }
            Self::ToggleDecoration(token) => {
                let token = token.trim().to_ascii_lowercase();
                if token == DEFAULT_DECORATION || !DECORATIONS.iter().any(|d| *d == token) {
                    return None;
                }
                (Facet::Decoration, toggle_token(&current.decoration, &token))
            }
            Self::SetAnchor(anchor) => (Facet::Alignment, Facet::Alignment.to_style_value(anchor.as_str())),
            Self::SetFontSize(px) => (Facet::Size, size_to_style(*px)),
            Self::SetFontFamily(family) => (Facet::Family, family.clone()),
            Self::SetColor(color) => (Facet::Color, color.clone()),
            Self::SetWeight(weight) => (Facet::Weight, weight.clone()),
        };
        Some(change)
    }
}

fn toggle_token(decoration: &str, token: &str) -> String {
    let mut tokens: Vec<&str> = decoration
        .split_whitespace()
        .filter(|t| *t != DEFAULT_DECORATION)
        .collect();
    if let Some(pos) = tokens.iter().position(|t| *t == token) {
        tokens.remove(pos);
    } else {
        tokens.push(token);
    }
    map_decoration(&tokens.join(" "))
}

/// Apply `command` to text shape `id`. Returns `false` when there is no
/// such text shape, the container has no box, or the command does not
/// apply.
pub fn apply(doc: &mut Document, id: &str, command: &StyleCommand) -> bool {
    let Some(current) = doc.text_style(id) else {
        return false;
    };
    let Some((facet, value)) = command.resolve(&current) else {
        return false;
    };
    let applied = match doc.kind(id) {
        Some(TextKind::StyledBox) => match doc.text_box_mut(id) {
            Some(div) => {
                TextBoxStyleMut::new(div).set(facet, &value);
                true
            }
            None => false,
        },
        Some(TextKind::Primitive) => match doc.shape_mut(id) {
            Some(el) => {
                el.set_attribute(facet.attribute(), facet.to_attribute_value(&value));
                true
            }
            None => false,
        },
        None => false,
    };
    if applied {
        debug!(%id, ?facet, %value, "applied style command");
    }
    applied
}

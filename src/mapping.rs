//! Style-mapping table: presentational attributes ↔ inline style.
//!
//! Primitive `<text>` shapes carry their styling as SVG presentational
//! attributes (`text-anchor`, `font-weight`, `fill`, ...). Styled boxes carry
//! the same facts as CSS declarations (`text-align`, `font-weight`, `color`,
//! ...). This module is the single place that translates between the two
//! vocabularies. Every function is total: unknown input maps to the facet's
//! default instead of failing.
//!
//! Only alignment really differs between the vocabularies. The other facets
//! are lexically identical but still go through here so validation and
//! defaults live in one spot.

#[cfg(test)]
#[path = "mapping_test.rs"]
mod mapping_test;

use serde::{Deserialize, Serialize};

use crate::markup::parse_number;

/// Presentational attribute names that a styled-box container must never
/// carry.
pub const PRESENTATION_ATTRIBUTES: [&str; 7] = [
    "text-anchor",
    "font-weight",
    "font-style",
    "font-family",
    "font-size",
    "fill",
    "text-decoration",
];

/// `text-anchor` → `text-align`.
pub const ANCHOR_TO_ALIGN: [(&str, &str); 4] =
    [("start", "left"), ("middle", "center"), ("end", "right"), ("justify", "justify")];

/// Accepted `font-weight` keywords and numeric weights.
pub const WEIGHTS: [&str; 13] = [
    "normal", "bold", "bolder", "lighter", "100", "200", "300", "400", "500", "600", "700", "800", "900",
];

/// Accepted `font-style` keywords.
pub const SLANTS: [&str; 3] = ["normal", "italic", "oblique"];

/// Accepted `text-decoration` tokens.
pub const DECORATIONS: [&str; 4] = ["none", "underline", "overline", "line-through"];

pub const DEFAULT_ALIGN: &str = "left";
pub const DEFAULT_ANCHOR: &str = "start";
pub const DEFAULT_WEIGHT: &str = "normal";
pub const DEFAULT_SLANT: &str = "normal";
pub const DEFAULT_DECORATION: &str = "none";
pub const DEFAULT_FAMILY: &str = "Arial";
pub const DEFAULT_SIZE_PX: f64 = 16.0;
pub const DEFAULT_COLOR: &str = "#000000";

// =============================================================
// Alignment
// =============================================================

/// Horizontal alignment in attribute vocabulary (`text-anchor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
    Justify,
}

/// Horizontal alignment in style vocabulary (`text-align`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAnchor {
    /// Parse an anchor keyword; unknown input gives [`TextAnchor::Start`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "middle" => Self::Middle,
            "end" => Self::End,
            "justify" => Self::Justify,
            _ => Self::Start,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
            Self::Justify => "justify",
        }
    }
}

impl TextAlign {
    /// Parse an alignment keyword; unknown input gives [`TextAlign::Left`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "center" => Self::Center,
            "right" => Self::Right,
            "justify" => Self::Justify,
            _ => Self::Left,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

impl From<TextAnchor> for TextAlign {
    fn from(anchor: TextAnchor) -> Self {
        match anchor {
            TextAnchor::Start => Self::Left,
            TextAnchor::Middle => Self::Center,
            TextAnchor::End => Self::Right,
            TextAnchor::Justify => Self::Justify,
        }
    }
}

impl From<TextAlign> for TextAnchor {
    fn from(align: TextAlign) -> Self {
        match align {
            TextAlign::Left => Self::Start,
            TextAlign::Center => Self::Middle,
            TextAlign::Right => Self::End,
            TextAlign::Justify => Self::Justify,
        }
    }
}

/// `text-anchor` keyword → `text-align` keyword. Unknown → `"left"`.
#[must_use]
pub fn anchor_to_align(anchor: &str) -> &'static str {
    TextAlign::from(TextAnchor::parse(anchor)).as_str()
}

/// `text-align` keyword → `text-anchor` keyword. Unknown → `"start"`.
#[must_use]
pub fn align_to_anchor(align: &str) -> &'static str {
    TextAnchor::from(TextAlign::parse(align)).as_str()
}

// =============================================================
// Identity facets
// =============================================================

/// Validate a font weight. Unknown → `"normal"`.
#[must_use]
pub fn map_weight(value: &str) -> &'static str {
    lookup(&WEIGHTS, value).unwrap_or(DEFAULT_WEIGHT)
}

/// Validate a font slant. Unknown → `"normal"`.
#[must_use]
pub fn map_slant(value: &str) -> &'static str {
    lookup(&SLANTS, value).unwrap_or(DEFAULT_SLANT)
}

/// Normalize a decoration token list: known tokens only, first occurrence
/// kept, authored order preserved, `none` dropped when anything else is
/// present. Empty → `"none"`.
#[must_use]
pub fn map_decoration(value: &str) -> String {
    let mut tokens: Vec<&'static str> = Vec::new();
    for raw in value.split_whitespace() {
        if let Some(token) = lookup(&DECORATIONS, raw) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    if tokens.len() > 1 {
        tokens.retain(|t| *t != DEFAULT_DECORATION);
    }
    if tokens.is_empty() {
        return DEFAULT_DECORATION.to_owned();
    }
    tokens.join(" ")
}

/// Strip quotes from a font family list. Empty → `"Arial"`.
#[must_use]
pub fn map_family(value: &str) -> String {
    let family: String = declaration_value(value).chars().filter(|c| *c != '"' && *c != '\'').collect();
    let family = family.trim();
    if family.is_empty() {
        return DEFAULT_FAMILY.to_owned();
    }
    family.to_owned()
}

/// Parse a font size in pixels. Unparseable or non-positive → `16`.
#[must_use]
pub fn map_size(value: &str) -> f64 {
    match parse_number(value) {
        Some(n) if n > 0.0 => n,
        _ => DEFAULT_SIZE_PX,
    }
}

/// Validate a color. Blank → `"#000000"`; anything else passes through.
#[must_use]
pub fn map_color(value: &str) -> String {
    let value = declaration_value(value).trim();
    if value.is_empty() {
        return DEFAULT_COLOR.to_owned();
    }
    value.to_owned()
}

/// The part of a free-form value before anything that would end or escape
/// its declaration (`;`, `{`, `}`, `!`).
fn declaration_value(value: &str) -> &str {
    value.split([';', '{', '}', '!']).next().unwrap_or_default()
}

/// Format a pixel size the way inline style writes it, e.g. `24px`.
#[must_use]
pub fn size_to_style(px: f64) -> String {
    format!("{}px", format_number(px))
}

/// Format a number for markup: `24`, `12.5`.
#[must_use]
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

fn lookup(table: &[&'static str], value: &str) -> Option<&'static str> {
    let value = value.trim().to_ascii_lowercase();
    table.iter().copied().find(|t| *t == value)
}

// =============================================================
// Facets
// =============================================================

/// One of the seven style facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Alignment,
    Weight,
    Slant,
    Family,
    Size,
    Color,
    Decoration,
}

impl Facet {
    /// All facets, in a fixed order.
    pub const ALL: [Facet; 7] = [
        Facet::Alignment,
        Facet::Weight,
        Facet::Slant,
        Facet::Family,
        Facet::Size,
        Facet::Color,
        Facet::Decoration,
    ];

    /// CSS property carrying this facet on a styled box.
    #[must_use]
    pub fn css_property(self) -> &'static str {
        match self {
            Self::Alignment => "text-align",
            Self::Weight => "font-weight",
            Self::Slant => "font-style",
            Self::Family => "font-family",
            Self::Size => "font-size",
            Self::Color => "color",
            Self::Decoration => "text-decoration",
        }
    }

    /// Presentational attribute carrying this facet on primitive text.
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Alignment => "text-anchor",
            Self::Weight => "font-weight",
            Self::Slant => "font-style",
            Self::Family => "font-family",
            Self::Size => "font-size",
            Self::Color => "fill",
            Self::Decoration => "text-decoration",
        }
    }

    /// Default value in style vocabulary.
    #[must_use]
    pub fn default_style_value(self) -> String {
        match self {
            Self::Alignment => DEFAULT_ALIGN.to_owned(),
            Self::Weight => DEFAULT_WEIGHT.to_owned(),
            Self::Slant => DEFAULT_SLANT.to_owned(),
            Self::Family => DEFAULT_FAMILY.to_owned(),
            Self::Size => size_to_style(DEFAULT_SIZE_PX),
            Self::Color => DEFAULT_COLOR.to_owned(),
            Self::Decoration => DEFAULT_DECORATION.to_owned(),
        }
    }

    /// Whether an ancestor's declaration of this facet applies to a box.
    #[must_use]
    pub fn inherited(self) -> bool {
        !matches!(self, Self::Decoration)
    }

    /// Convert an attribute value into style vocabulary.
    #[must_use]
    pub fn to_style_value(self, attr_value: &str) -> String {
        match self {
            Self::Alignment => anchor_to_align(attr_value).to_owned(),
            Self::Size => size_to_style(map_size(attr_value)),
            _ => self.normalize(attr_value),
        }
    }

    /// Convert a style value into attribute vocabulary.
    #[must_use]
    pub fn to_attribute_value(self, style_value: &str) -> String {
        match self {
            Self::Alignment => align_to_anchor(style_value).to_owned(),
            Self::Size => format_number(map_size(style_value)),
            _ => self.normalize(style_value),
        }
    }

    /// Validate a style-vocabulary value, mapping unknown input to the
    /// facet default.
    #[must_use]
    pub fn normalize(self, value: &str) -> String {
        match self {
            Self::Alignment => TextAlign::parse(value).as_str().to_owned(),
            Self::Weight => map_weight(value).to_owned(),
            Self::Slant => map_slant(value).to_owned(),
            Self::Family => map_family(value),
            Self::Size => size_to_style(map_size(value)),
            Self::Color => map_color(value),
            Self::Decoration => map_decoration(value),
        }
    }
}

//! Typed access to the style facts of a styled box.
//!
//! A styled box keeps its styling only in its inline style. Reads prefer an
//! explicit inline declaration, then the effective value inherited from the
//! box's ancestors, then the facet default, so a getter never fails. Writes
//! touch the inline declaration only and never the container.

#[cfg(test)]
#[path = "accessor_test.rs"]
mod accessor_test;

use serde::{Deserialize, Serialize};

use crate::mapping::{
    DEFAULT_COLOR, DEFAULT_DECORATION, DEFAULT_FAMILY, DEFAULT_SIZE_PX, DEFAULT_SLANT, DEFAULT_WEIGHT, Facet,
    TextAlign, TextAnchor, map_family, map_size,
};
use crate::markup::Element;
use crate::style::StyleDeclaration;

/// Snapshot of all seven style facts, in style vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub align: TextAlign,
    pub weight: String,
    pub slant: String,
    pub family: String,
    /// Font size in pixels.
    pub size: f64,
    pub color: String,
    pub decoration: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            align: TextAlign::default(),
            weight: DEFAULT_WEIGHT.to_owned(),
            slant: DEFAULT_SLANT.to_owned(),
            family: DEFAULT_FAMILY.to_owned(),
            size: DEFAULT_SIZE_PX,
            color: DEFAULT_COLOR.to_owned(),
            decoration: DEFAULT_DECORATION.to_owned(),
        }
    }
}

impl TextStyle {
    /// Value of one facet in style vocabulary.
    #[must_use]
    pub fn get(&self, facet: Facet) -> String {
        match facet {
            Facet::Alignment => self.align.as_str().to_owned(),
            Facet::Weight => self.weight.clone(),
            Facet::Slant => self.slant.clone(),
            Facet::Family => self.family.clone(),
            Facet::Size => crate::mapping::size_to_style(self.size),
            Facet::Color => self.color.clone(),
            Facet::Decoration => self.decoration.clone(),
        }
    }
}

/// Values that defer to the effective style instead of stating one.
fn is_explicit(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "initial" | "inherit")
}

// =============================================================
// Read view
// =============================================================

/// Read view over a styled box.
#[derive(Debug, Clone, Copy)]
pub struct TextBoxStyle<'a> {
    div: Option<&'a Element>,
    effective: Option<&'a StyleDeclaration>,
}

impl<'a> TextBoxStyle<'a> {
    /// Wrap a box (if there is one) and its effective inherited
    /// declarations (if known).
    #[must_use]
    pub fn new(div: Option<&'a Element>, effective: Option<&'a StyleDeclaration>) -> Self {
        Self { div, effective }
    }

    /// Value of `facet` in style vocabulary, normalized.
    #[must_use]
    pub fn get(&self, facet: Facet) -> String {
        let property = facet.css_property();
        let inline = self.div.and_then(|d| d.style().get(property)).filter(|v| is_explicit(v));
        let effective = self
            .effective
            .and_then(|s| s.get(property))
            .filter(|v| is_explicit(v));
        match inline.or(effective) {
            Some(value) => facet.normalize(value),
            None => facet.default_style_value(),
        }
    }

    #[must_use]
    pub fn text_align(&self) -> TextAlign {
        TextAlign::parse(&self.get(Facet::Alignment))
    }

    /// Alignment in attribute vocabulary.
    #[must_use]
    pub fn text_anchor(&self) -> TextAnchor {
        self.text_align().into()
    }

    #[must_use]
    pub fn font_weight(&self) -> String {
        self.get(Facet::Weight)
    }

    #[must_use]
    pub fn font_style(&self) -> String {
        self.get(Facet::Slant)
    }

    /// Font family with quotes stripped.
    #[must_use]
    pub fn font_family(&self) -> String {
        map_family(&self.get(Facet::Family))
    }

    /// Font size in pixels.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        map_size(&self.get(Facet::Size))
    }

    #[must_use]
    pub fn color(&self) -> String {
        self.get(Facet::Color)
    }

    #[must_use]
    pub fn text_decoration(&self) -> String {
        self.get(Facet::Decoration)
    }

    /// All seven facts at once.
    #[must_use]
    pub fn snapshot(&self) -> TextStyle {
        TextStyle {
            align: self.text_align(),
            weight: self.font_weight(),
            slant: self.font_style(),
            family: self.font_family(),
            size: self.font_size(),
            color: self.color(),
            decoration: self.text_decoration(),
        }
    }
}

// =============================================================
// Write view
// =============================================================

/// Write view over a styled box. Every write lands in the box's live
/// style model and is reflected into its literal `style` attribute.
#[derive(Debug)]
pub struct TextBoxStyleMut<'a> {
    div: &'a mut Element,
}

impl<'a> TextBoxStyleMut<'a> {
    #[must_use]
    pub fn new(div: &'a mut Element) -> Self {
        Self { div }
    }

    /// Read view of the same box, without effective fallback.
    #[must_use]
    pub fn view(&self) -> TextBoxStyle<'_> {
        TextBoxStyle::new(Some(self.div), None)
    }

    /// Write `facet` from a style-vocabulary value. Unknown values are
    /// written as the facet default.
    pub fn set(&mut self, facet: Facet, value: &str) {
        let value = facet.normalize(value);
        self.div.set_style_property(facet.css_property(), &value);
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.set(Facet::Alignment, align.as_str());
    }

    /// Write alignment from attribute vocabulary.
    pub fn set_text_anchor(&mut self, anchor: TextAnchor) {
        self.set_text_align(anchor.into());
    }

    pub fn set_font_size(&mut self, px: f64) {
        self.set(Facet::Size, &crate::mapping::size_to_style(px));
    }

    /// Write all seven facts.
    pub fn apply(&mut self, style: &TextStyle) {
        for facet in Facet::ALL {
            self.set(facet, &style.get(facet));
        }
    }
}

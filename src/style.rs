//! Live inline style declarations.
//!
//! A [`StyleDeclaration`] is the object model behind an element's `style`
//! attribute: an ordered list of `property: value` pairs. It is parsed
//! leniently with `cssparser` so a broken declaration only loses itself, never
//! its neighbours. Values are kept as authored text; no cascade or value
//! normalization happens here.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use cssparser::{Delimiter, ParseError, Parser, ParserInput};
use serde::{Deserialize, Serialize};

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Lowercase property name, e.g. `"text-align"`.
    pub name: String,
    /// Value text as authored, trimmed.
    pub value: String,
}

/// Ordered set of inline style declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDeclaration {
    decls: Vec<Declaration>,
}

impl StyleDeclaration {
    /// Create an empty declaration set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse inline style text. Malformed declarations are dropped; the rest
    /// are kept in source order, later duplicates overriding earlier ones.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut out = Self::new();
        out.set_css_text(text);
        out
    }

    /// Replace every declaration with the ones parsed from `text`.
    pub fn set_css_text(&mut self, text: &str) {
        self.decls.clear();
        for (name, value) in parse_declarations(text) {
            self.set(&name, &value);
        }
    }

    /// Render the declarations as inline style text, `name: value;` pairs
    /// separated by single spaces.
    #[must_use]
    pub fn css_text(&self) -> String {
        self.decls
            .iter()
            .map(|d| format!("{}: {};", d.name, d.value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value of `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.decls
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Declare `name: value`, replacing an existing declaration in place.
    /// A blank value removes the property, as the CSS object model does.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            self.remove(&name);
            return;
        }
        if let Some(existing) = self.decls.iter_mut().find(|d| d.name == name) {
            value.clone_into(&mut existing.value);
        } else {
            self.decls.push(Declaration { name, value: value.to_owned() });
        }
    }

    /// Remove `name`, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let pos = self.decls.iter().position(|d| d.name == name)?;
        Some(self.decls.remove(pos).value)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Drop every declaration.
    pub fn clear(&mut self) {
        self.decls.clear();
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether no property is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Iterate over declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }
}

/// Split inline style text into `(name, value)` pairs.
///
/// Each declaration is parsed up to and including its `;`. A declaration
/// without a property name, a colon or a value is skipped. A trailing
/// `!important` is accepted and dropped.
fn parse_declarations(text: &str) -> Vec<(String, String)> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut out = Vec::new();

    while !parser.is_exhausted() {
        let before = parser.position().byte_index();
        let result: Result<(String, String), ParseError<'_, ()>> =
            parser.parse_until_after(Delimiter::Semicolon, |p| {
                let name = p.expect_ident()?.to_ascii_lowercase();
                p.expect_colon()?;
                p.skip_whitespace();
                let start = p.position();
                p.parse_until_before(Delimiter::Bang, |p| {
                    while p.next().is_ok() {}
                    Ok::<(), ParseError<'_, ()>>(())
                })?;
                let value = p.slice_from(start).trim().to_owned();
                if value.is_empty() {
                    return Err(p.new_custom_error(()));
                }
                if !p.is_exhausted() {
                    cssparser::parse_important(p)?;
                }
                Ok((name, value))
            });
        match result {
            Ok(pair) => out.push(pair),
            Err(err) => {
                tracing::debug!(?err, "skipping malformed style declaration");
                if parser.position().byte_index() == before {
                    break;
                }
            }
        }
    }

    out
}

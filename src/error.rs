//! Error types.
//!
//! Only structural problems are errors here. Style drift, inaccurate glyph
//! geometry and empty text are absorbed where they occur.

/// Error returned when markup cannot be turned into an element tree, or a
/// tree cannot be written back out.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// The XML reader rejected the input.
    #[error("malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be decoded.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    /// Writing the tree failed.
    #[error("failed to write markup: {0}")]
    Write(#[from] std::io::Error),
    /// The input ended while an element was still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),
    /// A closing tag appeared with no element open.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),
    /// The input contains no root element.
    #[error("no root element")]
    NoRoot,
    /// The input contains more than one top-level element.
    #[error("more than one root element")]
    MultipleRoots,
}

/// Error returned by document load and export.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The markup itself is structurally broken.
    #[error(transparent)]
    Markup(#[from] MarkupError),
    /// The root element is not an `<svg>` element.
    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
}

/// Error returned when editor configuration cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be deserialized.
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),
    /// A numeric setting is out of range.
    #[error("invalid editor config: {field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

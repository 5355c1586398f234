#![allow(clippy::float_cmp)]

use super::*;

fn text(x: f64, y: f64, size: f64, anchor: &str, content: &str) -> Element {
    Element::new("text")
        .with_attr("x", x.to_string())
        .with_attr("y", y.to_string())
        .with_attr("font-size", size.to_string())
        .with_attr("text-anchor", anchor)
        .with_text(content)
}

#[test]
fn estimate_lays_out_fixed_advance() {
    let layout = EstimatedGlyphs.layout(&text(10.0, 50.0, 10.0, "start", "abc"));
    assert_eq!(layout.len(), 3);
    assert_eq!(layout.starts[0].x, 10.0);
    assert_eq!(layout.ends[0].x, 16.0);
    assert_eq!(layout.starts[2].x, 22.0);
    assert_eq!(layout.ends[2].x, 28.0);
    assert!(layout.accurate);
}

#[test]
fn estimate_bbox_spans_text() {
    let layout = EstimatedGlyphs.layout(&text(10.0, 50.0, 10.0, "start", "abcd"));
    assert_eq!(layout.bbox, Rect::new(10.0, 42.0, 24.0, 10.0));
}

#[test]
fn estimate_honors_middle_anchor() {
    let layout = EstimatedGlyphs.layout(&text(100.0, 0.0, 10.0, "middle", "ab"));
    assert_eq!(layout.starts[0].x, 94.0);
    assert_eq!(layout.ends[1].x, 106.0);
}

#[test]
fn estimate_honors_end_anchor() {
    let layout = EstimatedGlyphs.layout(&text(100.0, 0.0, 10.0, "end", "ab"));
    assert_eq!(layout.ends[1].x, 100.0);
}

#[test]
fn estimate_empty_text() {
    let layout = EstimatedGlyphs.layout(&text(5.0, 5.0, 20.0, "start", ""));
    assert!(layout.is_empty());
    assert_eq!(layout.bbox.width, 0.0);
    assert_eq!(layout.bbox.x, 5.0);
}

#[test]
fn estimate_defaults_without_attributes() {
    let layout = EstimatedGlyphs.layout(&Element::new("text").with_text("x"));
    assert_eq!(layout.starts[0], Point::new(0.0, 0.0));
    assert_eq!(layout.bbox.height, 16.0);
}

#[test]
fn estimate_counts_chars_not_bytes() {
    let layout = EstimatedGlyphs.layout(&text(0.0, 0.0, 10.0, "start", "héllo"));
    assert_eq!(layout.len(), 5);
}

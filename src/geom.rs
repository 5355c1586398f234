//! Geometry: points, rectangles, affine transforms and the zoom viewport.
//!
//! Shape coordinates live in the user space of the drawing. A text shape may
//! carry an SVG `transform` attribute, and the whole drawing is shown at a
//! zoom factor. Screen space is what the overlay canvas draws in.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `pt` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }
}

// =============================================================
// Transform
// =============================================================

/// 2-D affine matrix in SVG order: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// Rotation by `deg` degrees about the origin.
    #[must_use]
    pub fn rotate(deg: f64) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    #[must_use]
    pub fn skew_x(deg: f64) -> Self {
        Self { c: deg.to_radians().tan(), ..Self::IDENTITY }
    }

    #[must_use]
    pub fn skew_y(deg: f64) -> Self {
        Self { b: deg.to_radians().tan(), ..Self::IDENTITY }
    }

    /// `self × other`: applying the result applies `other` first, then `self`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[must_use]
    pub fn apply(&self, pt: Point) -> Point {
        Point {
            x: self.a * pt.x + self.c * pt.y + self.e,
            y: self.b * pt.x + self.d * pt.y + self.f,
        }
    }

    /// The inverse matrix, or `None` when the matrix is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Parse an SVG `transform` attribute list.
    ///
    /// Supports `matrix`, `translate`, `scale`, `rotate` (with optional
    /// center), `skewX` and `skewY`. Entries that cannot be read are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut out = Self::IDENTITY;
        for item in text.split(')') {
            let Some((name, args)) = item.split_once('(') else {
                continue;
            };
            let name = name.trim().trim_start_matches(',').trim();
            let args: Vec<f64> = args
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .filter_map(crate::markup::parse_number)
                .collect();
            if let Some(step) = Self::from_function(name, &args) {
                out = out.multiply(&step);
            } else {
                tracing::debug!(name, ?args, "skipping unreadable transform entry");
            }
        }
        out
    }

    fn from_function(name: &str, args: &[f64]) -> Option<Self> {
        match (name, args) {
            ("matrix", [a, b, c, d, e, f]) => Some(Self { a: *a, b: *b, c: *c, d: *d, e: *e, f: *f }),
            ("translate", [tx]) => Some(Self::translate(*tx, 0.0)),
            ("translate", [tx, ty]) => Some(Self::translate(*tx, *ty)),
            ("scale", [s]) => Some(Self::scale(*s, *s)),
            ("scale", [sx, sy]) => Some(Self::scale(*sx, *sy)),
            ("rotate", [deg]) => Some(Self::rotate(*deg)),
            ("rotate", [deg, cx, cy]) => Some(
                Self::translate(*cx, *cy)
                    .multiply(&Self::rotate(*deg))
                    .multiply(&Self::translate(-cx, -cy)),
            ),
            ("skewX", [deg]) => Some(Self::skew_x(*deg)),
            ("skewY", [deg]) => Some(Self::skew_y(*deg)),
            _ => None,
        }
    }
}

// =============================================================
// Viewport
// =============================================================

/// Zoom state of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Scale factor (1.0 = no zoom).
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl Viewport {
    /// Screen point → user space of a shape with local transform `matrix`.
    #[must_use]
    pub fn screen_to_pt(&self, screen: Point, matrix: &Transform) -> Point {
        let unzoomed = Point::new(screen.x / self.zoom, screen.y / self.zoom);
        match matrix.inverse() {
            Some(inv) if !matrix.is_identity() => inv.apply(unzoomed),
            _ => unzoomed,
        }
    }

    /// User-space point of a shape with local transform `matrix` → screen.
    #[must_use]
    pub fn pt_to_screen(&self, pt: Point, matrix: &Transform) -> Point {
        let out = matrix.apply(pt);
        Point::new(out.x * self.zoom, out.y * self.zoom)
    }

    /// Convert a screen-space distance (pixels) to user-space distance.
    #[must_use]
    pub fn screen_dist_to_user(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}

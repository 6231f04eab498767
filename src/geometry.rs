//! Small geometry helpers shared by the passes.

use crate::color::Color;

/// An axis-aligned rectangle in user-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rect from its edges. Returns `None` if the edges are inverted
    /// or not finite.
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Option<Self> {
        if left <= right && top <= bottom && (right - left).is_finite() && (bottom - top).is_finite()
        {
            Some(Rect {
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
            })
        } else {
            None
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Euclidean length of the diagonal.
    pub fn diagonal(&self) -> f64 {
        diagonal(self)
    }
}

/// Accumulates points into a tight bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BoundsBuilder {
    ltrb: Option<[f64; 4]>,
}

impl BoundsBuilder {
    pub(crate) fn include(&mut self, x: f64, y: f64) {
        self.ltrb = Some(match self.ltrb {
            None => [x, y, x, y],
            Some([l, t, r, b]) => [l.min(x), t.min(y), r.max(x), b.max(y)],
        });
    }

    pub(crate) fn finish(self) -> Option<Rect> {
        let [l, t, r, b] = self.ltrb?;
        Rect::from_ltrb(l, t, r, b)
    }
}

/// Replace the alpha channel of a color, keeping r/g/b.
pub fn with_alpha(color: Color, alpha: u8) -> Color {
    Color { a: alpha, ..color }
}

/// `sqrt(width² + height²)` of a bounding box.
pub fn diagonal(rect: &Rect) -> f64 {
    (rect.width.powi(2) + rect.height.powi(2)).sqrt()
}

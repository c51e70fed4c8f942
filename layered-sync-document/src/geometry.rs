//! Page geometry: points, rectangles and positioned glyphs.
//!
//! Coordinates are page units with `y` growing downwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `(x0, y0)` top-left and `(x1, y1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Build from two corners in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.x0..=self.x1).contains(&point.x) && (self.y0..=self.y1).contains(&point.y)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Empty vertical space between the two rectangles; zero when they
    /// overlap vertically.
    pub fn vertical_gap(&self, other: &Rect) -> f64 {
        (other.y0 - self.y1).max(self.y0 - other.y1).max(0.0)
    }
}

/// A rectangle on a given page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub page: usize,
    pub rect: Rect,
}

impl PageRect {
    pub fn new(page: usize, rect: Rect) -> Self {
        Self { page, rect }
    }
}

/// One rendered character with its position in the page text stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    /// Character index in the page's extracted text.
    pub index: usize,
    pub rect: Rect,
}

impl Glyph {
    pub fn new(ch: char, index: usize, rect: Rect) -> Self {
        Self { ch, index, rect }
    }
}

/// Merge consecutive rectangles on the same page whose vertical gap is
/// below `tolerance`. Order is kept.
pub fn merge_rects(rects: &[PageRect], tolerance: f64) -> Vec<PageRect> {
    let mut merged: Vec<PageRect> = Vec::with_capacity(rects.len());
    for next in rects {
        match merged.last_mut() {
            Some(last)
                if last.page == next.page && last.rect.vertical_gap(&next.rect) < tolerance =>
            {
                last.rect = last.rect.union(&next.rect);
            }
            _ => merged.push(*next),
        }
    }
    merged
}

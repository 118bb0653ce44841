//! Viewport-space geometry
//!
//! All coordinates are CSS-style viewport pixels: origin at the top-left
//! corner of the viewport, `y` growing downward.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a viewport or element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An element bounding rectangle, as returned by a geometry query
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Right edge (`left + width`)
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`)
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Check whether a point lies inside the rectangle
    ///
    /// Edges are inclusive on the top/left side and exclusive on the
    /// bottom/right side, so two adjacent rectangles never both claim a point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Check whether the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Rectangle with every edge moved by `(dx, dy)`
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            top: self.top + dy,
            left: self.left + dx,
            ..*self
        }
    }

    /// Linear interpolation between two rectangles (`t = 0` is `self`)
    pub fn lerp(&self, other: &Rect, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            top: mix(self.top, other.top),
            left: mix(self.left, other.left),
            width: mix(self.width, other.width),
            height: mix(self.height, other.height),
        }
    }

    /// Check two rectangles are equal within `epsilon` on every field
    pub fn approx_eq(&self, other: &Rect, epsilon: f32) -> bool {
        (self.top - other.top).abs() <= epsilon
            && (self.left - other.left).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

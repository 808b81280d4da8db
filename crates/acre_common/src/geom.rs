//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its lower-left and upper-right corners.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Lower x coordinate.
    pub lx: f64,
    /// Lower y coordinate.
    pub ly: f64,
    /// Upper x coordinate.
    pub ux: f64,
    /// Upper y coordinate.
    pub uy: f64,
}

impl Rect {
    /// Creates a rectangle from its corner coordinates.
    pub fn new(lx: f64, ly: f64, ux: f64, uy: f64) -> Self {
        Self { lx, ly, ux, uy }
    }

    /// Creates a rectangle from its lower-left corner and its size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Returns the extent along x.
    pub fn width(&self) -> f64 {
        self.ux - self.lx
    }

    /// Returns the extent along y.
    pub fn height(&self) -> f64 {
        self.uy - self.ly
    }

    /// Returns the rectangle area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.lx + self.ux) / 2.0, (self.ly + self.uy) / 2.0)
    }

    /// Returns the area shared with `other`, or zero when they only touch or
    /// are disjoint.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let width = self.ux.min(other.ux) - self.lx.max(other.lx);
        let height = self.uy.min(other.uy) - self.ly.max(other.ly);
        if width <= 0.0 || height <= 0.0 {
            0.0
        } else {
            width * height
        }
    }

    /// Returns `true` if the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlap_area(other) > 0.0
    }
}

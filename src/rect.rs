// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rectangle.

use crate::{Point, Size};

/// A rectangle.
///
/// Used both for element bounding boxes and for SVG `viewBox` values.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// The minimum x coordinate (left edge).
    pub x0: f64,
    /// The minimum y coordinate (top edge in y-down spaces).
    pub y0: f64,
    /// The maximum x coordinate (right edge).
    pub x1: f64,
    /// The maximum y coordinate (bottom edge in y-down spaces).
    pub y1: f64,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Rect = Rect::new(0., 0., 0., 0.);

    /// A new rectangle from minimum and maximum coordinates.
    #[inline]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect { x0, y0, x1, y1 }
    }

    /// A new rectangle from two points.
    ///
    /// The result will have non-negative width and height.
    #[inline]
    pub fn from_points(p0: impl Into<Point>, p1: impl Into<Point>) -> Rect {
        let p0 = p0.into();
        let p1 = p1.into();
        Rect {
            x0: p0.x.min(p1.x),
            y0: p0.y.min(p1.y),
            x1: p0.x.max(p1.x),
            y1: p0.y.max(p1.y),
        }
    }

    /// A new rectangle from origin and size.
    ///
    /// The result will have non-negative width and height.
    #[inline]
    pub fn from_origin_size(origin: impl Into<Point>, size: impl Into<Size>) -> Rect {
        let origin = origin.into();
        Rect::from_points(origin, origin + size.into().to_vec2())
    }

    /// The width of the rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// The height of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// The origin of the rectangle.
    ///
    /// This is the top left corner in a y-down space.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// The size of the rectangle.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Compute the union with one point.
    #[inline]
    pub fn union_pt(&self, pt: Point) -> Rect {
        Rect::new(
            self.x0.min(pt.x),
            self.y0.min(pt.y),
            self.x1.max(pt.x),
            self.y1.max(pt.y),
        )
    }

    /// Whether `pt` lies inside the rectangle, expanded by `slop` on every side.
    #[inline]
    pub fn contains_within(&self, pt: Point, slop: f64) -> bool {
        pt.x >= self.x0 - slop
            && pt.x <= self.x1 + slop
            && pt.y >= self.y0 - slop
            && pt.y <= self.y1 + slop
    }
}

impl From<(Point, Size)> for Rect {
    fn from(params: (Point, Size)) -> Rect {
        Rect::from_origin_size(params.0, params.1)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Point, Rect, Size};

    #[test]
    fn from_points_normalizes() {
        let r = Rect::from_points((10.0, 12.0), (5.0, 2.0));
        assert_eq!(r, Rect::new(5.0, 2.0, 10.0, 12.0));
        assert_eq!(r.size(), Size::new(5.0, 10.0));
    }

    #[test]
    fn union_and_contains() {
        let r = Rect::from_origin_size(Point::ORIGIN, (1.0, 1.0)).union_pt(Point::new(3.0, -1.0));
        assert_eq!(r, Rect::new(0.0, -1.0, 3.0, 1.0));
        assert!(r.contains_within(Point::new(3.0, 0.0), 0.0));
        assert!(!r.contains_within(Point::new(3.1, 0.0), 0.0));
        assert!(r.contains_within(Point::new(3.1, 0.0), 0.2));
    }
}

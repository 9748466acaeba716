// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::{Mul, Range};

use crate::{Affine, Point, Vec2};

/// A single cubic Bézier segment.
///
/// This is the only curve type a [`RawPath`](crate::RawPath) stores; lines,
/// quadratics and arcs are all raised to cubics when a path is normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start anchor.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end anchor.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Create a segment from eight consecutive numbers,
    /// `[x0, y0, x1, y1, x2, y2, x3, y3]`.
    #[inline]
    pub fn from_coeffs(c: [f64; 8]) -> CubicBez {
        CubicBez::new((c[0], c[1]), (c[2], c[3]), (c[4], c[5]), (c[6], c[7]))
    }

    /// The control points as eight consecutive numbers.
    #[inline]
    pub fn to_coeffs(&self) -> [f64; 8] {
        [
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y,
        ]
    }

    /// A straight line raised to a cubic.
    ///
    /// Control points sit at one and two thirds of the chord, so the curve
    /// parameter is proportional to distance along the line.
    #[inline]
    pub fn from_line(p0: Point, p1: Point) -> CubicBez {
        CubicBez::new(p0, p0.lerp(p1, 1.0 / 3.0), p0.lerp(p1, 2.0 / 3.0), p1)
    }

    /// Raise a quadratic Bézier to an exactly equivalent cubic.
    #[inline]
    pub fn from_quad(p0: Point, p1: Point, p2: Point) -> CubicBez {
        CubicBez::new(p0, p0.lerp(p1, 2.0 / 3.0), p2.lerp(p1, 2.0 / 3.0), p2)
    }

    /// A zero-length segment sitting at `p`.
    #[inline]
    pub fn point(p: Point) -> CubicBez {
        CubicBez::new(p, p, p, p)
    }

    /// Evaluate the curve at parameter `t`, using the Bernstein form.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }

    /// The first derivative at parameter `t`.
    #[inline]
    pub fn deriv(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        3.0 * (d0 * (mt * mt) + d1 * (2.0 * mt * t) + d2 * (t * t))
    }

    /// The start anchor.
    #[inline]
    pub fn start(&self) -> Point {
        self.p0
    }

    /// The end anchor.
    #[inline]
    pub fn end(&self) -> Point {
        self.p3
    }

    /// Split the curve at `t` using de Casteljau subdivision.
    pub fn split(&self, t: f64) -> (CubicBez, CubicBez) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        // Reuse eval so the split point matches `eval(t)` bit for bit.
        let pm = self.eval(t);
        (
            CubicBez::new(self.p0, p01, p012, pm),
            CubicBez::new(pm, p123, p23, self.p3),
        )
    }

    /// The portion of the curve between two parameter values.
    ///
    /// `range.start` may exceed `range.end`, in which case the result runs
    /// backwards.
    pub fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        if t0 > t1 {
            return self.subsegment(t1..t0).reverse();
        }
        let tail = if t0 <= 0.0 { *self } else { self.split(t0).1 };
        if t1 >= 1.0 {
            return tail;
        }
        // Rescale t1 into the tail's parameter space.
        let t = (t1 - t0.max(0.0)) / (1.0 - t0.max(0.0));
        let mut head = tail.split(t).0;
        // Pin the cut to the original curve so slices start exactly where
        // position lookups land.
        head.p3 = self.eval(t1);
        head
    }

    /// The same curve traversed in the opposite direction.
    #[inline]
    #[must_use]
    pub fn reverse(&self) -> CubicBez {
        CubicBez::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// Whether both control points coincide with their anchors.
    ///
    /// Such a curve traces a straight line but with a non-uniform speed that
    /// vanishes at both ends.
    #[inline]
    pub fn has_collapsed_handles(&self) -> bool {
        self.p1 == self.p0 && self.p2 == self.p3
    }
}

impl Mul<CubicBez> for Affine {
    type Output = CubicBez;

    #[inline]
    fn mul(self, c: CubicBez) -> CubicBez {
        CubicBez {
            p0: self * c.p0,
            p1: self * c.p1,
            p2: self * c.p2,
            p3: self * c.p3,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Affine, CubicBez, Point, Vec2};

    fn assert_near(p0: Point, p1: Point) {
        assert!((p1 - p0).hypot() < 1e-9, "{p0:?} != {p1:?}");
    }

    #[test]
    fn cubicbez_eval() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        assert_near(c.eval(0.0), Point::new(0.0, 0.0));
        assert_near(c.eval(1.0), Point::new(1.0, 0.0));
        assert_near(c.eval(0.5), Point::new(0.5, 0.75));
    }

    #[test]
    fn line_is_parameterized_by_distance() {
        let c = CubicBez::from_line(Point::new(0.0, 0.0), Point::new(90.0, 0.0));
        for i in 0..=9 {
            let t = i as f64 / 9.0;
            assert_near(c.eval(t), Point::new(90.0 * t, 0.0));
        }
    }

    #[test]
    fn quad_elevation_is_exact() {
        let (q0, q1, q2) = (Point::new(0.0, 0.0), Point::new(5.0, 10.0), Point::new(10.0, 0.0));
        let c = CubicBez::from_quad(q0, q1, q2);
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            let mt = 1.0 - t;
            let expected = (q0.to_vec2() * (mt * mt)
                + q1.to_vec2() * (2.0 * mt * t)
                + q2.to_vec2() * (t * t))
                .to_point();
            assert_near(c.eval(t), expected);
        }
    }

    #[test]
    fn split_and_subsegment() {
        let c = CubicBez::new((0.0, 0.0), (10.0, 30.0), (40.0, -20.0), (50.0, 0.0));
        let (a, b) = c.split(0.3);
        assert_near(a.eval(1.0), c.eval(0.3));
        assert_near(a.eval(0.5), c.eval(0.15));
        assert_near(b.eval(0.5), c.eval(0.65));

        let s = c.subsegment(0.2..0.7);
        assert_near(s.start(), c.eval(0.2));
        assert_near(s.end(), c.eval(0.7));
        assert_near(s.eval(0.5), c.eval(0.45));

        let r = c.subsegment(0.7..0.2);
        assert_near(r.start(), c.eval(0.7));
        assert_near(r.end(), c.eval(0.2));
    }

    #[test]
    fn deriv_matches_chord() {
        let c = CubicBez::from_line(Point::new(0.0, 0.0), Point::new(3.0, 6.0));
        let d = c.deriv(0.4);
        assert!((d - Vec2::new(3.0, 6.0)).hypot() < 1e-9);
    }

    #[test]
    fn coeffs_and_transform() {
        let c = CubicBez::from_coeffs([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(c.to_coeffs(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let moved = Affine::translate((1.0, -1.0)) * c;
        assert_eq!(moved.p3, Point::new(7.0, 6.0));
        assert!(CubicBez::point(Point::new(2.0, 2.0)).has_collapsed_handles());
    }
}

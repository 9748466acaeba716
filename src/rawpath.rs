// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canonical path representation: measured runs of cubic Béziers.

use core::ops::Mul;

use crate::{Affine, CubicBez, Point, Rect};

/// Polyline subdivisions per segment used when nothing else is requested.
pub const DEFAULT_RESOLUTION: usize = 12;

/// Subdivisions per segment for curves built with zero curviness.
///
/// Those curves have control points sitting on their anchors, which makes the
/// curve speed vanish at both ends; evenly spaced parameter samples then
/// approximate arc length less well, so they get a finer default.
pub const STRAIGHT_RESOLUTION: usize = 20;

/// One polyline vertex of a measured segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Position on the curve.
    pub point: Point,
    /// Distance travelled from the start of the segment.
    pub length: f64,
    /// Direction towards the next sample, in degrees.
    pub angle: f64,
}

/// A cubic Bézier together with its arc-length table.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    bez: CubicBez,
    samples: Vec<Sample>,
    length: f64,
    closes: bool,
}

/// The result of a lookup along a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPosition {
    /// The position on the path.
    pub point: Point,
    /// The direction of travel in degrees, when requested.
    pub angle: Option<f64>,
}

/// A path made of cubic Bézier segments, with cached length measurements.
///
/// Segments are stored in travel order. Consecutive segments that do not
/// touch belong to different subpaths; the jump between them has no length.
///
/// Every `RawPath` is measured: constructors measure at
/// [`DEFAULT_RESOLUTION`], and anything that changes the geometry measures
/// again at the path's current resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPath {
    segments: Vec<Segment>,
    total_length: f64,
    closed: bool,
    resolution: usize,
}

impl Segment {
    fn new(bez: CubicBez, closes: bool) -> Segment {
        Segment {
            bez,
            samples: Vec::new(),
            length: 0.0,
            closes,
        }
    }

    /// The curve of this segment.
    #[inline]
    pub fn bez(&self) -> &CubicBez {
        &self.bez
    }

    /// The measured polyline, `resolution + 1` samples long.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The measured length of this segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Whether a `Z` follows this segment.
    #[inline]
    pub fn closes_subpath(&self) -> bool {
        self.closes
    }

    fn measure(&mut self, resolution: usize) {
        let step = (resolution as f64).recip();
        self.samples.clear();
        self.samples.reserve(resolution + 1);
        let mut length = 0.0;
        let mut prev = self.bez.p0;
        for i in 0..=resolution {
            let point = if i == 0 {
                self.bez.p0
            } else if i == resolution {
                self.bez.p3
            } else {
                self.bez.eval(i as f64 * step)
            };
            length += point.distance(prev);
            self.samples.push(Sample {
                point,
                length,
                angle: 0.0,
            });
            prev = point;
        }
        self.length = length;

        // Each sample faces the next one. Zero-length spans inherit the
        // nearest defined direction, looking backwards first.
        let mut known = None;
        for i in 0..resolution {
            let d = self.samples[i + 1].point - self.samples[i].point;
            if d.hypot2() > 0.0 {
                known = Some(d.atan2().to_degrees());
            }
            if let Some(angle) = known {
                self.samples[i].angle = angle;
            }
        }
        let first_known = self.samples[..resolution]
            .iter()
            .zip(self.samples[1..].iter())
            .find(|(a, b)| a.point != b.point)
            .map(|(a, _)| a.angle);
        let fallback = match first_known {
            Some(angle) => angle,
            None => {
                // No chord has length; fall back to the control polygon.
                let d = self.bez.p3 - self.bez.p0;
                let d = if d.hypot2() > 0.0 {
                    d
                } else {
                    self.bez.p2 - self.bez.p1
                };
                if d.hypot2() > 0.0 {
                    d.atan2().to_degrees()
                } else {
                    0.0
                }
            }
        };
        // Leading spans with no length take the first real direction.
        let lead = self.samples[..resolution]
            .iter()
            .zip(self.samples[1..].iter())
            .take_while(|(a, b)| a.point == b.point)
            .count();
        for sample in &mut self.samples[..lead] {
            sample.angle = fallback;
        }
        self.samples[resolution].angle = self.samples[resolution - 1].angle;
    }

    /// Find the parameter and direction at `local` units along the segment.
    fn lookup(&self, local: f64) -> (f64, f64) {
        let n = self.samples.len() - 1;
        let local = local.clamp(0.0, self.length);
        let mut i = 1;
        while i < n && self.samples[i].length < local {
            i += 1;
        }
        let lo = &self.samples[i - 1];
        let hi = &self.samples[i];
        let span = hi.length - lo.length;
        let frac = if span > 0.0 {
            ((local - lo.length) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((i as f64 - 1.0 + frac) / n as f64, lo.angle)
    }
}

impl RawPath {
    /// Build a path from cubic segments, measured at [`DEFAULT_RESOLUTION`].
    ///
    /// An empty iterator yields a zero-length path at the origin.
    pub fn from_cubics(cubics: impl IntoIterator<Item = CubicBez>) -> RawPath {
        let segments = cubics
            .into_iter()
            .map(|bez| Segment::new(bez, false))
            .collect();
        RawPath::from_segments(segments, false)
    }

    /// A single zero-length segment at `p`.
    pub fn degenerate(p: Point) -> RawPath {
        RawPath::from_segments(vec![Segment::new(CubicBez::point(p), false)], false)
    }

    pub(crate) fn from_segments(segments: Vec<Segment>, closed: bool) -> RawPath {
        let segments = if segments.is_empty() {
            tracing::debug!("empty path input, using a zero-length path at the origin");
            vec![Segment::new(CubicBez::point(Point::ORIGIN), false)]
        } else {
            segments
        };
        let mut path = RawPath {
            segments,
            total_length: 0.0,
            closed,
            resolution: DEFAULT_RESOLUTION,
        };
        path.measure(DEFAULT_RESOLUTION);
        path
    }

    /// The segments of this path, in travel order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterate over the curves of this path.
    pub fn cubics(&self) -> impl Iterator<Item = CubicBez> + '_ {
        self.segments.iter().map(|s| s.bez)
    }

    /// The number of segments. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether every segment has zero length.
    ///
    /// A path can have segments and still be zero length.
    #[inline]
    pub fn is_zero_length(&self) -> bool {
        !(self.total_length > 0.0)
    }

    /// The sum of the segment lengths.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Whether the path data closed a subpath.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The resolution the current measurements were taken at.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// The first anchor of the path.
    #[inline]
    pub fn start(&self) -> Point {
        self.segments[0].bez.p0
    }

    /// The last anchor of the path.
    #[inline]
    pub fn end(&self) -> Point {
        self.segments[self.segments.len() - 1].bez.p3
    }

    /// Measure every segment as a polyline of `resolution` pieces.
    ///
    /// A resolution of zero is raised to one. Measuring is deterministic, so
    /// measuring twice at the same resolution gives identical tables.
    pub fn measure(&mut self, resolution: usize) -> &mut Self {
        let resolution = resolution.max(1);
        let mut total = 0.0;
        for segment in &mut self.segments {
            segment.measure(resolution);
            total += segment.length;
        }
        self.total_length = total;
        self.resolution = resolution;
        self
    }

    /// Map `ratio` to a segment index and curve parameter, plus the direction there.
    fn locate(&self, ratio: f64) -> (usize, f64, f64) {
        let last = self.segments.len() - 1;
        if ratio >= 1.0 {
            let segment = &self.segments[last];
            return (last, 1.0, segment.samples[segment.samples.len() - 1].angle);
        }
        let target = ratio.max(0.0) * self.total_length;
        let mut acc = 0.0;
        for (i, segment) in self.segments.iter().enumerate() {
            if i == last || target <= acc + segment.length {
                let (t, angle) = segment.lookup(target - acc);
                return (i, t, angle);
            }
            acc += segment.length;
        }
        unreachable!("the last segment always matches")
    }

    /// The position at `ratio` of the way along the path.
    ///
    /// `ratio` is clamped to `[0, 1]`. Zero yields the first anchor and one
    /// the last. The lookup walks the segments and their sample tables
    /// linearly, interpolating the curve parameter between the two samples
    /// that bracket the target length. The angle, if requested, is the
    /// direction of that polyline span in degrees.
    pub fn position_at(&self, ratio: f64, want_angle: bool) -> PathPosition {
        let (i, t, angle) = self.locate(ratio);
        let bez = &self.segments[i].bez;
        let point = if t <= 0.0 {
            bez.p0
        } else if t >= 1.0 {
            bez.p3
        } else {
            bez.eval(t)
        };
        PathPosition {
            point,
            angle: want_angle.then_some(angle),
        }
    }

    /// Extract the part of the path between two ratios.
    ///
    /// The result is a new, independently measured path at the same
    /// resolution. If `start > end` the slice runs backwards. `0..1` returns an
    /// unchanged copy.
    pub fn slice(&self, start: f64, end: f64) -> RawPath {
        let start = start.clamp(0.0, 1.0);
        let end = end.clamp(0.0, 1.0);
        if start == 0.0 && end == 1.0 {
            return self.clone();
        }
        if start > end {
            let mut reversed = self.slice(end, start);
            reversed.reverse();
            return reversed;
        }
        let (i0, t0, _) = self.locate(start);
        let (i1, t1, _) = self.locate(end);
        let mut segments = Vec::with_capacity(i1 - i0 + 1);
        if i0 == i1 {
            segments.push(Segment::new(self.segments[i0].bez.subsegment(t0..t1), false));
        } else {
            segments.push(Segment::new(
                self.segments[i0].bez.subsegment(t0..1.0),
                self.segments[i0].closes,
            ));
            for segment in &self.segments[i0 + 1..i1] {
                segments.push(Segment::new(segment.bez, segment.closes));
            }
            segments.push(Segment::new(self.segments[i1].bez.subsegment(0.0..t1), false));
        }
        let mut sliced = RawPath {
            segments,
            total_length: 0.0,
            closed: false,
            resolution: self.resolution,
        };
        sliced.measure(self.resolution);
        sliced
    }

    /// Reverse the direction of travel.
    ///
    /// Subpath closing markers are dropped; the closing segments themselves
    /// remain, so the geometry is unchanged.
    pub fn reverse(&mut self) -> &mut Self {
        self.segments.reverse();
        for segment in &mut self.segments {
            segment.bez = segment.bez.reverse();
            segment.closes = false;
        }
        self.measure(self.resolution)
    }

    /// Transform every control point by `m`, then measure again.
    pub fn apply_affine(&mut self, m: Affine) -> &mut Self {
        for segment in &mut self.segments {
            segment.bez = m * segment.bez;
        }
        self.measure(self.resolution)
    }

    /// The bounding box of all control points.
    ///
    /// Every point on the path lies inside it.
    pub fn bounding_box(&self) -> Rect {
        let first = self.start();
        self.cubics()
            .flat_map(|c| [c.p0, c.p1, c.p2, c.p3])
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
    }
}

impl Mul<&RawPath> for Affine {
    type Output = RawPath;

    fn mul(self, path: &RawPath) -> RawPath {
        let mut path = path.clone();
        path.apply_affine(self);
        path
    }
}

/// Incrementally assembles a [`RawPath`] from pen movements.
#[derive(Debug, Default)]
pub(crate) struct RawPathBuilder {
    segments: Vec<Segment>,
    pen: Point,
    subpath_start: Point,
    subpath_len: usize,
    closed: bool,
}

impl RawPathBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn pen(&self) -> Point {
        self.pen
    }

    pub(crate) fn move_to(&mut self, p: Point) {
        self.pen = p;
        self.subpath_start = p;
        self.subpath_len = 0;
    }

    pub(crate) fn line_to(&mut self, p: Point) {
        self.push(CubicBez::from_line(self.pen, p));
    }

    pub(crate) fn quad_to(&mut self, ctrl: Point, p: Point) {
        self.push(CubicBez::from_quad(self.pen, ctrl, p));
    }

    pub(crate) fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.push(CubicBez::new(self.pen, p1, p2, p3));
    }

    pub(crate) fn push(&mut self, bez: CubicBez) {
        self.pen = bez.p3;
        self.subpath_len += 1;
        self.segments.push(Segment::new(bez, false));
    }

    /// Close the current subpath with a straight segment back to its start.
    pub(crate) fn close(&mut self) {
        if self.pen != self.subpath_start {
            self.line_to(self.subpath_start);
        }
        if self.subpath_len > 0 {
            if let Some(last) = self.segments.last_mut() {
                last.closes = true;
            }
            self.closed = true;
        }
        self.pen = self.subpath_start;
    }

    pub(crate) fn finish(self) -> RawPath {
        RawPath::from_segments(self.segments, self.closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> CubicBez {
        CubicBez::from_line(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn wiggle() -> RawPath {
        RawPath::from_cubics([
            CubicBez::new((0.0, 0.0), (30.0, 60.0), (70.0, -60.0), (100.0, 0.0)),
            CubicBez::new((100.0, 0.0), (120.0, 20.0), (140.0, 80.0), (100.0, 100.0)),
        ])
    }

    #[test]
    fn straight_line_length() {
        let path = RawPath::from_cubics([line(0.0, 0.0, 100.0, 0.0)]);
        assert!((path.total_length() - 100.0).abs() < 1e-9);
        let segment = &path.segments()[0];
        assert_eq!(segment.samples().len(), DEFAULT_RESOLUTION + 1);
        assert_eq!(segment.samples()[0].length, 0.0);
    }

    #[test]
    fn endpoints() {
        let path = wiggle();
        assert_eq!(path.position_at(0.0, false).point, Point::new(0.0, 0.0));
        assert_eq!(path.position_at(1.0, false).point, Point::new(100.0, 100.0));
        // Out of range ratios clamp.
        assert_eq!(path.position_at(-3.0, false).point, path.start());
        assert_eq!(path.position_at(7.0, false).point, path.end());
    }

    #[test]
    fn positions_stay_in_envelope() {
        let path = wiggle();
        let bbox = path.bounding_box();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let r: f64 = rng.random();
            let p = path.position_at(r, false).point;
            assert!(bbox.contains_within(p, 1e-9), "{p:?} outside {bbox:?}");
        }
    }

    #[test]
    fn travel_is_monotonic_on_a_line() {
        let path = RawPath::from_cubics([
            line(0.0, 0.0, 50.0, 0.0),
            line(50.0, 0.0, 50.0, 0.0),
            line(50.0, 0.0, 80.0, 0.0),
        ]);
        let mut last = -1.0;
        for i in 0..=200 {
            let x = path.position_at(i as f64 / 200.0, false).point.x;
            assert!(x >= last, "{x} < {last}");
            last = x;
        }
        assert!((path.position_at(0.5, false).point.x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn measure_is_idempotent() {
        let mut path = wiggle();
        path.measure(16);
        let first = path.clone();
        path.measure(16);
        assert_eq!(path, first);
        assert_eq!(path.resolution(), 16);
        path.measure(0);
        assert_eq!(path.resolution(), 1);
    }

    #[test]
    fn horizontal_angle() {
        let path = RawPath::from_cubics([line(0.0, 0.0, 10.0, 0.0)]);
        let angle = path.position_at(0.5, true).angle.unwrap();
        assert!(angle.abs() < 1e-9);
        let mut back = path.clone();
        back.reverse();
        let angle = back.position_at(0.5, true).angle.unwrap();
        assert!((angle.abs() - 180.0).abs() < 1e-9);
        assert_eq!(back.position_at(0.5, false).angle, None);
    }

    #[test]
    fn collapsed_handles_have_a_direction_at_the_ends() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 0.0), (0.0, 10.0), (0.0, 10.0));
        let mut path = RawPath::from_cubics([c]);
        path.measure(STRAIGHT_RESOLUTION);
        for r in [0.0, 0.5, 1.0] {
            let angle = path.position_at(r, true).angle.unwrap();
            assert!((angle - 90.0).abs() < 1e-9, "{angle} at {r}");
        }
    }

    #[test]
    fn degenerate_path() {
        let path = RawPath::from_cubics([]);
        assert_eq!(path.len(), 1);
        assert!(!path.is_empty());
        assert!(path.is_zero_length());
        assert_eq!(path.total_length(), 0.0);
        for r in [0.0, 0.3, 1.0] {
            let pos = path.position_at(r, true);
            assert_eq!(pos.point, Point::ORIGIN);
            assert_eq!(pos.angle, Some(0.0));
        }
    }

    #[test]
    fn slice_starts_where_lookup_lands() {
        let path = wiggle();
        let sliced = path.slice(0.5, 1.0);
        assert_near(
            sliced.position_at(0.0, false).point,
            path.position_at(0.5, false).point,
            1e-12,
        );
        assert_near(sliced.end(), path.end(), 1e-12);
        let half = path.total_length() * 0.5;
        assert!((sliced.total_length() - half).abs() < path.total_length() * 0.02);

        let inner = path.slice(0.2, 0.3);
        assert_eq!(inner.len(), 1);
        assert_near(inner.start(), path.position_at(0.2, false).point, 1e-12);
        assert_near(inner.end(), path.position_at(0.3, false).point, 1e-9);
    }

    #[test]
    fn reversed_slice() {
        let path = wiggle();
        let sliced = path.slice(0.75, 0.25);
        assert_near(sliced.start(), path.position_at(0.75, false).point, 1e-9);
        assert_near(sliced.end(), path.position_at(0.25, false).point, 1e-9);
        assert_eq!(path.slice(0.0, 1.0), path);
        let point = path.slice(0.4, 0.4);
        assert!(point.total_length() < 1e-9);
    }

    #[test]
    fn affine_remeasures() {
        let mut path = RawPath::from_cubics([line(0.0, 0.0, 10.0, 0.0)]);
        path.measure(5);
        path.apply_affine(Affine::scale(3.0).then_translate((1.0, 1.0).into()));
        assert_eq!(path.resolution(), 5);
        assert!((path.total_length() - 30.0).abs() < 1e-9);
        assert_eq!(path.start(), Point::new(1.0, 1.0));
    }

    #[test]
    fn builder_closes_subpaths() {
        let mut b = RawPathBuilder::new();
        b.move_to(Point::new(0.0, 0.0));
        b.line_to(Point::new(10.0, 0.0));
        b.line_to(Point::new(10.0, 10.0));
        b.close();
        let path = b.finish();
        assert!(path.is_closed());
        assert_eq!(path.len(), 3);
        assert!(path.segments()[2].closes_subpath());
        assert_eq!(path.end(), Point::new(0.0, 0.0));
        assert!((path.total_length() - (20.0 + 200f64.sqrt())).abs() < 1e-9);
    }
}

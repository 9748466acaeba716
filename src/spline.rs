// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth curves through sequences of points.

use core::f64::consts::PI;

use crate::{CubicBez, Point};

/// The default spline tension.
pub const DEFAULT_CURVINESS: f64 = 1.0;

/// Corners sharper than this (in radians) keep their handles on their own
/// sides instead of aligning them with the neighbouring chord.
pub const CORNER_THRESHOLD: f64 = PI / 10.0;

/// Leading points closer than this are merged.
const DUPLICATE_EPSILON: f64 = 1e-4;

/// End points closer than this make a closed loop.
const CLOSED_EPSILON: f64 = 1e-3;

/// Build a smooth cubic spline passing through every point.
///
/// At each interior point both handles are laid along the line joining its
/// neighbours, each as long as the adjacent side times `curviness` times the
/// interior angle as a fraction of π: a point on a straight run gets full
/// length handles, and a sharp reversal gets almost none. Corners sharper
/// than [`CORNER_THRESHOLD`] point each handle along its own side instead.
///
/// With a `curviness` of zero every control point sits on its anchor and the
/// result traces the polyline. When the last point returns to the first, the
/// loop is smoothed across the seam too.
///
/// Returns no curves for fewer than two distinct points.
pub fn points_to_cubics(points: &[Point], curviness: f64) -> Vec<CubicBez> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len() + 2);
    for &p in points {
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    if pts.len() > 2 && pts[0].near(pts[1], DUPLICATE_EPSILON) {
        pts.remove(0);
    }
    let n = pts.len();
    if n < 2 {
        return Vec::new();
    }
    let closed = n > 2 && pts[0].near(pts[n - 1], CLOSED_EPSILON);
    // Pad with the wrapped neighbours so every original point is interior.
    if closed {
        let before = pts[n - 2];
        let after = pts[1];
        pts.insert(0, before);
        pts.push(after);
    }
    let first = usize::from(closed);
    let anchors = &pts[first..first + n];

    // (incoming handle, outgoing handle) for each anchor.
    let mut handles: Vec<(Point, Point)> = anchors.iter().map(|&p| (p, p)).collect();
    for i in 0..n {
        let ix = first + i;
        if ix == 0 || ix + 1 == pts.len() {
            continue;
        }
        handles[i] = smooth_handles(pts[ix - 1], pts[ix], pts[ix + 1], curviness);
    }

    anchors
        .windows(2)
        .zip(handles.windows(2))
        .map(|(a, h)| CubicBez::new(a[0], h[0].1, h[1].0, a[1]))
        .collect()
}

fn smooth_handles(prev: Point, p: Point, next: Point, curviness: f64) -> (Point, Point) {
    let d_in = p - prev;
    let d_out = next - p;
    let chord = next - prev;
    let a = d_in.hypot2();
    let b = d_out.hypot2();
    let c = chord.hypot2();
    let angle = ((a + b - c) / (4.0 * a * b).sqrt()).clamp(-1.0, 1.0).acos();
    let scale = angle / PI * curviness;
    let len_in = a.sqrt() * scale;
    let len_out = b.sqrt() * scale;
    let (dir_in, dir_out) = if angle > CORNER_THRESHOLD {
        let sl = chord.atan2();
        (sl, sl)
    } else {
        (d_in.atan2(), d_out.atan2())
    };
    let (sin_in, cos_in) = dir_in.sin_cos();
    let (sin_out, cos_out) = dir_out.sin_cos();
    (
        Point::new(p.x - cos_in * len_in, p.y - sin_in * len_in),
        Point::new(p.x + cos_out * len_out, p.y + sin_out * len_out),
    )
}

/// Build a curve for a single animated value.
///
/// The x coordinate of each anchor is the value; the y coordinate grows with
/// each step by half its size times `curviness`, giving the path a length
/// that follows the distance travelled. Only x is meant to be read back.
pub fn values_to_cubics(values: &[f64], curviness: f64) -> Vec<CubicBez> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    let mut pen = Point::new(first, 0.0);
    rest.iter()
        .map(|&v| {
            let y = (v - pen.x) * curviness / 2.0;
            let anchor = Point::new(v, y);
            let c = CubicBez::new(pen, pen, anchor, anchor);
            pen = anchor;
            c
        })
        .collect()
}

/// Interpret points as consecutive cubic control points.
///
/// The sequence is anchor, control, control, anchor, control, control,
/// anchor and so on. Points left over after the last complete curve are
/// ignored.
pub fn cubic_chain(points: &[Point]) -> Vec<CubicBez> {
    if points.is_empty() {
        return Vec::new();
    }
    points[1..]
        .chunks_exact(3)
        .scan(points[0], |pen, c| {
            let bez = CubicBez::new(*pen, c[0], c[1], c[2]);
            *pen = c[2];
            Some(bez)
        })
        .collect()
}

/// Turn a start point followed by offsets into absolute points.
///
/// Each point after the first is taken relative to the one before it, once
/// that one has itself been made absolute.
pub fn relativize(points: &mut [Point]) {
    for i in 1..points.len() {
        let prev = points[i - 1].to_vec2();
        points[i] += prev;
    }
}

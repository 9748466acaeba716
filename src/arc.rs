// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elliptical arcs, as they appear in SVG path data, and their conversion to cubics.

use core::f64::consts::{FRAC_PI_2, PI};

use arrayvec::ArrayVec;

use crate::{CubicBez, Point, Vec2};

/// The largest number of cubics a single arc is split into (one per quadrant).
pub const MAX_ARC_CUBICS: usize = 4;

// Note: the SVG arc logic is heavily adapted from https://github.com/nical/lyon

/// A single SVG arc segment, in endpoint parameterization.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvgArc {
    /// The arc's start point.
    pub from: Point,
    /// The arc's end point.
    pub to: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
    /// Does this arc sweep through more than π radians?
    pub large_arc: bool,
    /// Determines if the arc should begin moving at positive angles.
    pub sweep: bool,
}

/// A single elliptical arc segment, in center parameterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arc {
    /// The arc's centre point.
    pub center: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc, in radians.
    pub sweep_angle: f64,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
}

impl SvgArc {
    /// Checks that arc is actually a straight line.
    ///
    /// In this case, it can be replaced with a `LineTo`.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= 1e-5 || self.radii.y.abs() <= 1e-5 || self.from == self.to
    }

    /// Convert the arc into at most [`MAX_ARC_CUBICS`] cubic segments.
    ///
    /// A degenerate arc (zero radius) becomes a straight line, and an arc
    /// whose endpoints coincide produces nothing, as SVG specifies.
    pub fn to_cubics(&self) -> ArrayVec<CubicBez, MAX_ARC_CUBICS> {
        let mut out = ArrayVec::new();
        if self.from == self.to {
            return out;
        }
        match Arc::from_svg_arc(self) {
            Some(arc) => {
                out = arc.to_cubics();
                // Pin the ends so consecutive segments stay exactly connected.
                if let Some(first) = out.first_mut() {
                    first.p0 = self.from;
                }
                if let Some(last) = out.last_mut() {
                    last.p3 = self.to;
                }
            }
            None => out.push(CubicBez::from_line(self.from, self.to)),
        }
        out
    }
}

impl Arc {
    /// Creates an `Arc` from a `SvgArc`.
    ///
    /// Returns `None` if `arc` is actually a straight line.
    pub fn from_svg_arc(arc: &SvgArc) -> Option<Arc> {
        // Have to check this first, otherwise `sum_of_sq` will be 0.
        if arc.is_straight_line() {
            return None;
        }

        let mut rx = arc.radii.x.abs();
        let mut ry = arc.radii.y.abs();

        let xr = arc.x_rotation % (2.0 * PI);
        let (sin_phi, cos_phi) = xr.sin_cos();
        let hd_x = (arc.from.x - arc.to.x) * 0.5;
        let hd_y = (arc.from.y - arc.to.y) * 0.5;
        let hs_x = (arc.from.x + arc.to.x) * 0.5;
        let hs_y = (arc.from.y + arc.to.y) * 0.5;

        // F6.5.1
        let p = Vec2::new(
            cos_phi * hd_x + sin_phi * hd_y,
            -sin_phi * hd_x + cos_phi * hd_y,
        );

        // If rf > 1 the radii are too small for the arc to connect the end
        // points, so scale them up (F6.6.2).
        let rf = p.x * p.x / (rx * rx) + p.y * p.y / (ry * ry);
        if rf > 1.0 {
            let scale = rf.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;
        if sum_of_sq == 0.0 {
            return None;
        }

        // F6.5.2
        let sign_coe = if arc.large_arc == arc.sweep {
            -1.0
        } else {
            1.0
        };
        let coe = sign_coe * ((rxry * rxry - sum_of_sq) / sum_of_sq).abs().sqrt();
        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        // F6.5.3
        let center = Point::new(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
        );

        let start_v = Vec2::new((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let end_v = Vec2::new((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

        let start_angle = start_v.atan2();

        let mut sweep_angle = (end_v.atan2() - start_angle) % (2.0 * PI);

        if arc.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        } else if !arc.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        }

        Some(Arc {
            center,
            radii: Vec2::new(rx, ry),
            start_angle,
            sweep_angle,
            x_rotation: xr,
        })
    }

    /// Approximate the arc with one cubic per started quadrant.
    pub fn to_cubics(&self) -> ArrayVec<CubicBez, MAX_ARC_CUBICS> {
        let mut out = ArrayVec::new();
        let n = (self.sweep_angle.abs() / FRAC_PI_2 - 1e-9)
            .ceil()
            .clamp(1.0, MAX_ARC_CUBICS as f64) as usize;
        let angle_step = self.sweep_angle / n as f64;
        let arm_len = (4.0 / 3.0) * (0.25 * angle_step).tan();
        let mut angle0 = self.start_angle;
        let mut p0 = self.center + sample_ellipse(self.radii, self.x_rotation, angle0);
        for _ in 0..n {
            let angle1 = angle0 + angle_step;
            let p1 = p0 + arm_len * sample_ellipse(self.radii, self.x_rotation, angle0 + FRAC_PI_2);
            let p3 = self.center + sample_ellipse(self.radii, self.x_rotation, angle1);
            let p2 = p3 - arm_len * sample_ellipse(self.radii, self.x_rotation, angle1 + FRAC_PI_2);
            out.push(CubicBez::new(p0, p1, p2, p3));
            angle0 = angle1;
            p0 = p3;
        }
        out
    }
}

fn sample_ellipse(radii: Vec2, x_rotation: f64, angle: f64) -> Vec2 {
    let (angle_sin, angle_cos) = angle.sin_cos();
    let u = radii.x * angle_cos;
    let v = radii.y * angle_sin;
    rotate_pt(Vec2::new(u, v), x_rotation)
}

fn rotate_pt(pt: Vec2, angle: f64) -> Vec2 {
    let (angle_sin, angle_cos) = angle.sin_cos();
    Vec2::new(
        pt.x * angle_cos - pt.y * angle_sin,
        pt.x * angle_sin + pt.y * angle_cos,
    )
}

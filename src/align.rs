// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placing a path relative to elements.

use crate::matrix::{global_transform, parent_inverse, ResolveOptions};
use crate::scene::read_number;
use crate::svg::first_point;
use crate::{Affine, MotionOptions, Point, PropertyAccess, RawPath, Scene, Size, Vec2};

/// A reference point on an element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    /// The top left corner, or for a `path` element the start of its data.
    #[default]
    Auto,
    /// Fractions of the element's width and height, `(0.5, 0.5)` being the centre.
    Fraction(f64, f64),
    /// A point in the element's local space, relative to its top left corner.
    Point(Point),
}

/// What a path should be aligned with.
#[derive(Clone, Debug, PartialEq)]
pub enum Align<E> {
    /// The animated element itself: the path is moved to start where the
    /// element currently is.
    SelfTarget,
    /// Another element, whose coordinate space the path is drawn in.
    Element(E),
    /// A selector resolved through the host; unresolved selectors act like
    /// [`Align::SelfTarget`].
    Selector(String),
}

/// The point `origin` designates on `el`, in the frame `parent` maps into.
fn origin_to_point<S: Scene + ?Sized>(
    scene: &S,
    el: &S::Element,
    origin: Origin,
    parent: Affine,
) -> Point {
    let m = global_transform(scene, el, ResolveOptions::default());
    let (base, size) = if scene.tag_name(el) == "svg" {
        let vb = scene.view_box(el);
        let base = vb.map(|r| r.origin()).unwrap_or(Point::ORIGIN);
        let size = match vb {
            Some(r) if r.width() != 0.0 => r.size(),
            _ => scene.viewport_size(el).unwrap_or(Size::ZERO),
        };
        (base, size)
    } else {
        match scene.bounding_box(el) {
            Some(r) => (r.origin(), r.size()),
            None => (Point::ORIGIN, scene.layout_size(el)),
        }
    };
    let offset = match origin {
        Origin::Auto => Vec2::ZERO,
        Origin::Fraction(fx, fy) => Vec2::new(fx * size.width, fy * size.height),
        Origin::Point(p) => p.to_vec2(),
    };
    parent * (m * (base + offset))
}

/// The transform that carries `to`'s local space onto `from`.
///
/// The result maps points in `to`'s local space into the frame of `from`'s
/// parent, keeping `to`'s rotation, scale and skew relative to that frame.
/// Its translation is the vector from `from_origin` on `from` to `to_origin`
/// on `to`, both measured in the parent frame. An [`Origin::Auto`] on a
/// `path` element refers to the first point of its data.
///
/// Parent frames that cannot be inverted are treated as the identity, and
/// elements without a bounding box use their local origin.
pub fn compute_align_matrix<S: Scene + ?Sized>(
    scene: &S,
    from: &S::Element,
    to: &S::Element,
    from_origin: Origin,
    to_origin: Origin,
) -> Affine {
    let parent = parent_inverse(scene, from);
    let m = parent * global_transform(scene, to, ResolveOptions::default());
    let linear = m.with_translation(Vec2::ZERO);
    let from_point = origin_to_point(scene, from, from_origin, parent);
    let mut to_point = origin_to_point(scene, to, to_origin, parent);

    let path_start = (to_origin == Origin::Auto && scene.tag_name(to) == "path")
        .then(|| scene.path_data(to))
        .flatten()
        .and_then(|data| first_point(&data));
    match path_start {
        Some(start) => to_point = m * start,
        None => {
            // Within one svg, origins are measured from the local origin
            // rather than from the bounding box corner.
            if let (Some(to_box), Some(_)) = (scene.bounding_box(to), scene.bounding_box(from)) {
                if scene.owner_svg(to) == scene.owner_svg(from) {
                    to_point -= linear.apply_vec(to_box.origin().to_vec2());
                }
            }
        }
    }
    linear.with_translation(to_point - from_point)
}

/// The offset from `from_origin` on `from` to `to_origin` on `to`, in the
/// frame of `from`'s parent.
pub fn resolve_relative_position<S: Scene + ?Sized>(
    scene: &S,
    from: &S::Element,
    to: &S::Element,
    from_origin: Origin,
    to_origin: Origin,
) -> Point {
    compute_align_matrix(scene, from, to, from_origin, to_origin)
        .translation()
        .to_point()
}

/// Move a path into position for animating `target`.
///
/// With [`Align::SelfTarget`] (or an align target that is `target` itself)
/// the path is translated so it starts at the target's current `x` and `y`.
/// With another element, the path is carried from that element's space into
/// the target's frame by [`compute_align_matrix`] and re-anchored on the
/// target's current position. The target's origin is `align_origin` if
/// given, which is also passed to the host as the transform origin;
/// otherwise it is derived from the `xPercent` and `yPercent` properties.
///
/// Afterwards an explicit `matrix` is applied if present, or else the
/// `offset_x` and `offset_y` translation.
pub fn align_path<H: PropertyAccess + ?Sized>(
    host: &mut H,
    path: &mut RawPath,
    target: &H::Element,
    options: &MotionOptions<H::Element>,
) {
    let first = path.start().to_vec2();
    let current = Vec2::new(
        read_number(host, target, "x", "px"),
        read_number(host, target, "y", "px"),
    );
    if let Some(align) = &options.align {
        let other = match align {
            Align::SelfTarget => None,
            Align::Element(el) => Some(el.clone()),
            Align::Selector(selector) => host.resolve_targets(selector).into_iter().next(),
        }
        .filter(|el| el != target);
        match other {
            None => {
                tracing::debug!("aligning path with the target itself");
                path.apply_affine(Affine::translate(current - first));
            }
            Some(other) => {
                let from_origin = match options.align_origin {
                    Some((fx, fy)) => {
                        host.set_transform_origin(target, (fx, fy));
                        Origin::Fraction(fx, fy)
                    }
                    None => Origin::Fraction(
                        read_number(host, target, "xPercent", "%") / -100.0,
                        read_number(host, target, "yPercent", "%") / -100.0,
                    ),
                };
                tracing::debug!(?other, ?from_origin, "aligning path with element");
                let m = compute_align_matrix(host, target, &other, from_origin, Origin::Auto);
                let linear = m.with_translation(Vec2::ZERO);
                let shift = current + m.translation() - linear.apply_vec(first);
                path.apply_affine(linear.with_translation(shift));
            }
        }
    }
    apply_offsets(path, options);
}

/// Apply the explicit `matrix` of `options`, or else its offsets.
pub(crate) fn apply_offsets<E>(path: &mut RawPath, options: &MotionOptions<E>) {
    if let Some(matrix) = options.matrix {
        path.apply_affine(matrix);
    } else if options.offset_x != 0.0 || options.offset_y != 0.0 {
        path.apply_affine(Affine::translate((options.offset_x, options.offset_y)));
    }
}

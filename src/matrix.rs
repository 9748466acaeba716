// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulative transforms of elements in a [`Scene`].

use crate::{Affine, Point, Scene};

/// Which content offsets [`global_transform`] folds in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Shift children of scrolled ancestors by the scroll offset.
    pub include_scroll: bool,
    /// Map `svg` user space through the `viewBox` into the viewport.
    pub include_view_box: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            include_scroll: true,
            include_view_box: true,
        }
    }
}

/// The transform from an element's local space into document space.
///
/// Walks from the element to the top-level frame, composing each local
/// transform. For `svg` elements the `viewBox` mapping is included, so
/// coordinates in the element's user space map to the document; a `viewBox`
/// without size maps with a scale of one. The result is not cached, since the
/// host's layout may change between calls.
pub fn global_transform<S: Scene + ?Sized>(
    scene: &S,
    el: &S::Element,
    options: ResolveOptions,
) -> Affine {
    let mut m = scene.transform(el) * view_box_transform(scene, el, options);
    let mut cur = scene.parent(el);
    while let Some(parent) = cur {
        let content = if options.include_scroll {
            Affine::translate(-scene.scroll_offset(&parent))
        } else {
            Affine::IDENTITY
        };
        m = scene.transform(&parent) * view_box_transform(scene, &parent, options) * content * m;
        cur = scene.parent(&parent);
    }
    m
}

/// The inverse of [`global_transform`] for the parent frame of `el`.
///
/// Maps document coordinates into the space `el` is positioned in. An
/// element without a parent, or a parent frame that cannot be inverted,
/// gives the identity.
pub fn parent_inverse<S: Scene + ?Sized>(scene: &S, el: &S::Element) -> Affine {
    let Some(parent) = scene.parent(el) else {
        return Affine::IDENTITY;
    };
    let m = global_transform(scene, &parent, ResolveOptions::default());
    m.try_inverse().unwrap_or_else(|| {
        tracing::warn!(?parent, "singular parent transform, using identity");
        Affine::IDENTITY
    })
}

/// The `viewBox` to viewport mapping of an `svg` element, or the identity.
pub(crate) fn view_box_transform<S: Scene + ?Sized>(
    scene: &S,
    el: &S::Element,
    options: ResolveOptions,
) -> Affine {
    if !options.include_view_box || scene.tag_name(el) != "svg" {
        return Affine::IDENTITY;
    }
    let Some(vb) = scene.view_box(el) else {
        return Affine::IDENTITY;
    };
    let viewport = scene.viewport_size(el);
    let scale = |vp: Option<f64>, vb: f64| match vp {
        Some(vp) if vb != 0.0 => vp / vb,
        _ => 1.0,
    };
    if vb.width() == 0.0 || vb.height() == 0.0 {
        tracing::debug!(?el, "viewBox has no size, mapping with unit scale");
    }
    let sx = scale(viewport.map(|s| s.width), vb.width());
    let sy = scale(viewport.map(|s| s.height), vb.height());
    Affine::scale_non_uniform(sx, sy) * Affine::translate(-vb.origin().to_vec2())
}

/// The transform from `from`'s local space into `to`'s local space.
///
/// If `to`'s frame cannot be inverted, only `from`'s global transform is
/// returned.
pub fn convert_coordinates<S: Scene + ?Sized>(
    scene: &S,
    from: &S::Element,
    to: &S::Element,
) -> Affine {
    let to_global = global_transform(scene, to, ResolveOptions::default());
    let from_global = global_transform(scene, from, ResolveOptions::default());
    match to_global.try_inverse() {
        Some(inv) => inv * from_global,
        None => {
            tracing::warn!(?to, "singular target transform, converting to document space");
            from_global
        }
    }
}

/// Map a point from `from`'s local space into `to`'s local space.
pub fn convert_point<S: Scene + ?Sized>(
    scene: &S,
    from: &S::Element,
    to: &S::Element,
    point: Point,
) -> Point {
    convert_coordinates(scene, from, to) * point
}

/// The document position of an element's local origin, or of its bounding
/// box corner when it has one.
pub(crate) fn element_position<S: Scene + ?Sized>(scene: &S, el: &S::Element) -> Point {
    let local = scene
        .bounding_box(el)
        .map(|r| r.origin())
        .unwrap_or(Point::ORIGIN);
    global_transform(scene, el, ResolveOptions::default()) * local
}

// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driving element properties along motion paths.
//!
//! A [`MotionPathPlugin`] owns the host it animates. [`MotionPathPlugin::init`]
//! turns a set of [`MotionOptions`] into a [`MotionState`], doing all of the
//! parsing, alignment and measuring up front; afterwards
//! [`MotionPathPlugin::render`] only looks up positions and writes properties,
//! and can be called with any ratio in any order.

use core::f64::consts::PI;

use smallvec::SmallVec;

use crate::align::{align_path, apply_offsets};
use crate::matrix::parent_inverse;
use crate::normalize::{default_resolution, normalize, X_PROPS, Y_PROPS};
use crate::scene::read_number;
use crate::spline::{cubic_chain, points_to_cubics, relativize, values_to_cubics, DEFAULT_CURVINESS};
use crate::{
    Affine, Align, MotionError, MotionResult, PathInput, PathKind, PathPosition, Point,
    PropertyAccess, RawPath, SvgParseError, Waypoint, DEFAULT_RESOLUTION,
};

/// Everything that configures a motion.
///
/// Built with [`Default`] and the `with_*` methods:
///
/// ```
/// use motionpath::{MotionOptions, NodeId, PathInput};
///
/// let options: MotionOptions<NodeId> = MotionOptions::default()
///     .with_path(PathInput::Svg("M0,0 C50,100 150,-100 200,0".into()))
///     .with_auto_rotate(0.0)
///     .with_end(0.75);
/// assert_eq!(options.start, 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MotionOptions<E> {
    /// The path to follow.
    pub path: Option<PathInput<E>>,
    /// Where along the path the motion begins, as a ratio.
    pub start: f64,
    /// Where along the path the motion ends, as a ratio.
    ///
    /// An `end` before `start` runs the path backwards.
    pub end: f64,
    /// What to align the path with.
    pub align: Option<Align<E>>,
    /// A transform applied to the path after alignment.
    pub matrix: Option<Affine>,
    /// Horizontal translation applied when there is no `matrix`.
    pub offset_x: f64,
    /// Vertical translation applied when there is no `matrix`.
    pub offset_y: f64,
    /// The point of the target, as fractions of its size, that follows the path.
    pub align_origin: Option<(f64, f64)>,
    /// Rotate the target along the path, adding this many degrees.
    pub auto_rotate: Option<f64>,
    /// The property receiving the rotation, `"rotation"` by default.
    pub rotation: Option<String>,
    /// Write the rotation in radians.
    pub use_radians: bool,
    /// Spline tension for waypoint paths, [`DEFAULT_CURVINESS`] by default.
    pub curviness: Option<f64>,
    /// Subdivisions per segment when measuring.
    pub resolution: Option<usize>,
    /// Treat each waypoint as an offset from the one before.
    pub relative: bool,
    /// The unit written with the horizontal coordinate.
    pub unit_x: Option<String>,
    /// The unit written with the vertical coordinate.
    pub unit_y: Option<String>,
    /// The property receiving the horizontal coordinate.
    pub x: Option<String>,
    /// The property receiving the vertical coordinate.
    pub y: Option<String>,
    /// How waypoints become curves.
    pub kind: PathKind,
}

impl<E> Default for MotionOptions<E> {
    fn default() -> Self {
        MotionOptions {
            path: None,
            start: 0.0,
            end: 1.0,
            align: None,
            matrix: None,
            offset_x: 0.0,
            offset_y: 0.0,
            align_origin: None,
            auto_rotate: None,
            rotation: None,
            use_radians: false,
            curviness: None,
            resolution: None,
            relative: false,
            unit_x: None,
            unit_y: None,
            x: None,
            y: None,
            kind: PathKind::Thru,
        }
    }
}

impl<E> MotionOptions<E> {
    /// Set the path.
    #[must_use]
    pub fn with_path(mut self, path: PathInput<E>) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the start ratio.
    #[must_use]
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Set the end ratio.
    #[must_use]
    pub fn with_end(mut self, end: f64) -> Self {
        self.end = end;
        self
    }

    /// Align the path.
    #[must_use]
    pub fn with_align(mut self, align: Align<E>) -> Self {
        self.align = Some(align);
        self
    }

    /// Transform the path after alignment.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Affine) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Translate the path after alignment.
    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Set the point of the target that follows the path.
    #[must_use]
    pub fn with_align_origin(mut self, fx: f64, fy: f64) -> Self {
        self.align_origin = Some((fx, fy));
        self
    }

    /// Rotate the target along the path, plus `offset` degrees.
    #[must_use]
    pub fn with_auto_rotate(mut self, offset: f64) -> Self {
        self.auto_rotate = Some(offset);
        self
    }

    /// Write the rotation to another property.
    #[must_use]
    pub fn with_rotation(mut self, property: &str) -> Self {
        self.rotation = Some(property.to_owned());
        self
    }

    /// Write the rotation in radians.
    #[must_use]
    pub fn with_use_radians(mut self, use_radians: bool) -> Self {
        self.use_radians = use_radians;
        self
    }

    /// Set the spline tension.
    #[must_use]
    pub fn with_curviness(mut self, curviness: f64) -> Self {
        self.curviness = Some(curviness);
        self
    }

    /// Set the measuring resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Treat waypoints as offsets.
    #[must_use]
    pub fn with_relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    /// Set the horizontal unit.
    #[must_use]
    pub fn with_unit_x(mut self, unit: &str) -> Self {
        self.unit_x = Some(unit.to_owned());
        self
    }

    /// Set the vertical unit.
    #[must_use]
    pub fn with_unit_y(mut self, unit: &str) -> Self {
        self.unit_y = Some(unit.to_owned());
        self
    }

    /// Set the horizontal property.
    #[must_use]
    pub fn with_x(mut self, property: &str) -> Self {
        self.x = Some(property.to_owned());
        self
    }

    /// Set the vertical property.
    #[must_use]
    pub fn with_y(mut self, property: &str) -> Self {
        self.y = Some(property.to_owned());
        self
    }

    /// Set how waypoints become curves.
    #[must_use]
    pub fn with_kind(mut self, kind: PathKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A coordinate of a path position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The horizontal coordinate.
    X,
    /// The vertical coordinate.
    Y,
}

/// A property written from one coordinate of one path.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyBinding {
    /// Index of the path in [`MotionState::paths`].
    pub path: usize,
    /// The coordinate that is written.
    pub axis: Axis,
    /// The property name.
    pub property: String,
    /// The unit written with the value.
    pub unit: Option<String>,
}

/// The property receiving the direction of travel.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationBinding {
    /// The property name.
    pub property: String,
    /// The unit written with the value.
    pub unit: Option<String>,
    /// Added to the angle, after any conversion to radians.
    pub offset: f64,
    /// Whether the angle is written in radians.
    pub radians: bool,
}

/// A motion ready to be rendered, produced by [`MotionPathPlugin::init`].
#[derive(Clone, Debug)]
pub struct MotionState<E> {
    target: E,
    paths: Vec<RawPath>,
    bindings: SmallVec<[PropertyBinding; 2]>,
    rotation: Option<RotationBinding>,
}

impl<E> MotionState<E> {
    /// The animated element.
    pub fn target(&self) -> &E {
        &self.target
    }

    /// The measured paths. The first one drives the rotation.
    pub fn paths(&self) -> &[RawPath] {
        &self.paths
    }

    /// The properties written on each frame, in writing order.
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    /// The rotation written after the other properties, if any.
    pub fn rotation(&self) -> Option<&RotationBinding> {
        self.rotation.as_ref()
    }

    /// Write every bound property for `ratio` of the way along the paths.
    ///
    /// `ratio` is clamped to `[0, 1]`, and NaN is treated as zero. The
    /// rotation is written last.
    pub fn render<H>(&self, ratio: f64, host: &mut H)
    where
        H: PropertyAccess<Element = E> + ?Sized,
    {
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };
        let want_angle = self.rotation.is_some();
        let positions: SmallVec<[PathPosition; 4]> = self
            .paths
            .iter()
            .enumerate()
            .map(|(i, path)| path.position_at(ratio, want_angle && i == 0))
            .collect();
        for binding in &self.bindings {
            let point = positions[binding.path].point;
            let value = match binding.axis {
                Axis::X => point.x,
                Axis::Y => point.y,
            };
            host.write_property(&self.target, &binding.property, value, binding.unit.as_deref());
        }
        if let Some(rotation) = &self.rotation {
            let angle = positions
                .first()
                .and_then(|p| p.angle)
                .unwrap_or(0.0);
            let scale = if rotation.radians { PI / 180.0 } else { 1.0 };
            host.write_property(
                &self.target,
                &rotation.property,
                angle * scale + rotation.offset,
                rotation.unit.as_deref(),
            );
        }
    }
}

/// Sets up and renders motions against a registered host.
///
/// The host must be registered before [`init`](Self::init) is called.
///
/// ```
/// use motionpath::{MotionOptions, MotionPathPlugin, Node, PathInput, SceneTree};
///
/// let mut tree = SceneTree::new();
/// let dot = tree.insert(None, Node::new("div"));
/// let mut plugin = MotionPathPlugin::new();
/// plugin.register(tree);
///
/// let options = MotionOptions::default().with_path(PathInput::Svg("M0,0 L100,0".into()));
/// let state = plugin.init(&dot, &options).unwrap();
/// plugin.render(0.25, &state);
/// let tree = plugin.host().unwrap();
/// assert!((tree.property(dot, "x").unwrap() - 25.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct MotionPathPlugin<H> {
    host: Option<H>,
}

impl<H> Default for MotionPathPlugin<H> {
    fn default() -> Self {
        MotionPathPlugin { host: None }
    }
}

impl<H: PropertyAccess> MotionPathPlugin<H> {
    /// A plugin without a host.
    pub fn new() -> Self {
        MotionPathPlugin::default()
    }

    /// A plugin with `host` registered.
    pub fn with_host(host: H) -> Self {
        MotionPathPlugin { host: Some(host) }
    }

    /// Register the host, replacing any previous one.
    pub fn register(&mut self, host: H) {
        self.host = Some(host);
    }

    /// Remove and return the registered host.
    pub fn unregister(&mut self) -> Option<H> {
        self.host.take()
    }

    /// Whether a host is registered.
    pub fn is_registered(&self) -> bool {
        self.host.is_some()
    }

    /// The registered host.
    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// The registered host, mutably.
    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    /// Build the paths and property bindings for animating `target`.
    ///
    /// A waypoint path becomes one curve for its positional properties (the
    /// first of [`X_PROPS`] and [`Y_PROPS`] present in the first waypoint),
    /// starting from their current values, plus one single-axis curve for
    /// every other property. Single-axis curves take the `matrix` or offsets
    /// but are not aligned with an element. Any other path is normalized,
    /// aligned, sliced to `start..end` and bound to the `x` and `y` properties.
    ///
    /// # Errors
    ///
    /// Fails with [`MotionError::NotRegistered`] without a host, with
    /// [`MotionError::NoPath`] without a path, and with the errors of
    /// [`normalize`] for path data that cannot be read.
    #[tracing::instrument(skip_all, fields(target = ?target))]
    pub fn init(
        &mut self,
        target: &H::Element,
        options: &MotionOptions<H::Element>,
    ) -> MotionResult<MotionState<H::Element>> {
        let Some(host) = self.host.as_mut() else {
            tracing::warn!("init called before a host was registered");
            return Err(MotionError::NotRegistered);
        };
        let Some(input) = &options.path else {
            tracing::warn!("init called without a path");
            return Err(MotionError::NoPath);
        };

        let rotation = options.auto_rotate.map(|offset| {
            let property = options.rotation.as_deref().unwrap_or("rotation").to_owned();
            let unit = host.property_unit(target, &property);
            RotationBinding {
                property,
                unit,
                offset,
                radians: options.use_radians,
            }
        });
        let mut state = MotionState {
            target: target.clone(),
            paths: Vec::new(),
            bindings: SmallVec::new(),
            rotation,
        };

        match input {
            PathInput::Waypoints(waypoints) => {
                init_waypoints(host, &mut state, waypoints, options);
                tracing::debug!(
                    shape = "waypoints",
                    paths = state.paths.len(),
                    resolution = default_resolution(options),
                    "motion initialized"
                );
            }
            _ => {
                let mut path = normalize(&*host, input, options)?;
                if matches!(input, PathInput::Elements(_)) {
                    path.apply_affine(parent_inverse(&*host, target));
                }
                align_path(host, &mut path, target, options);
                let mut path = slice_to(path, options);
                let resolution = options.resolution.unwrap_or(DEFAULT_RESOLUTION);
                path.measure(resolution);
                let unit_x = options.unit_x.as_deref().unwrap_or("px");
                let unit_y = options.unit_y.as_deref().unwrap_or("px");
                state.push(path);
                let x_prop = options.x.as_deref().unwrap_or("x");
                let y_prop = options.y.as_deref().unwrap_or("y");
                state.bind(0, Axis::X, x_prop, Some(unit_x.to_owned()));
                state.bind(0, Axis::Y, y_prop, Some(unit_y.to_owned()));
                tracing::debug!(shape = "path", paths = 1, resolution, "motion initialized");
            }
        }
        Ok(state)
    }

    /// Write the properties of `state` for `ratio` of the way along.
    ///
    /// Does nothing if no host is registered.
    pub fn render(&mut self, ratio: f64, state: &MotionState<H::Element>) {
        if let Some(host) = self.host.as_mut() {
            state.render(ratio, host);
        }
    }

    /// The length of a path, measured at [`DEFAULT_RESOLUTION`].
    ///
    /// # Errors
    ///
    /// Fails with [`MotionError::NotRegistered`] without a host, or if the
    /// path cannot be read.
    pub fn get_length(&self, input: &PathInput<H::Element>) -> MotionResult<f64> {
        let host = self.host.as_ref().ok_or(MotionError::NotRegistered)?;
        let path = normalize(host, input, &MotionOptions::default())?;
        Ok(path.total_length())
    }
}

impl<E> MotionState<E> {
    fn push(&mut self, path: RawPath) -> usize {
        self.paths.push(path);
        self.paths.len() - 1
    }

    fn bind(&mut self, path: usize, axis: Axis, property: &str, unit: Option<String>) {
        self.bindings.push(PropertyBinding {
            path,
            axis,
            property: property.to_owned(),
            unit,
        });
    }
}

fn slice_to<E>(path: RawPath, options: &MotionOptions<E>) -> RawPath {
    if options.start != 0.0 || options.end != 1.0 {
        path.slice(options.start, options.end)
    } else {
        path
    }
}

/// The unit of a waypoint property: the forced one, or the current one.
fn waypoint_unit<H: PropertyAccess + ?Sized>(
    host: &H,
    target: &H::Element,
    property: &str,
    forced: Option<&str>,
) -> Option<String> {
    match forced {
        Some(unit) => Some(unit.to_owned()),
        None => host.property_unit(target, property),
    }
}

fn init_waypoints<H: PropertyAccess + ?Sized>(
    host: &mut H,
    state: &mut MotionState<H::Element>,
    waypoints: &[Waypoint],
    options: &MotionOptions<H::Element>,
) {
    let target = state.target.clone();
    let resolution = default_resolution(options);
    let Some(first) = waypoints.first() else {
        tracing::debug!("no waypoints, using a zero-length path at the origin");
        state.push(RawPath::degenerate(Point::ORIGIN));
        state.bind(0, Axis::X, options.x.as_deref().unwrap_or("x"), options.unit_x.clone());
        state.bind(0, Axis::Y, options.y.as_deref().unwrap_or("y"), options.unit_y.clone());
        return;
    };
    let axes = match (first.find_axis(&X_PROPS), first.find_axis(&Y_PROPS)) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };
    let unit_x = options.unit_x.as_deref();
    let unit_y = options.unit_y.as_deref();

    if let Some((x, y)) = axes {
        let x_prop = options.x.as_deref().unwrap_or(x);
        let y_prop = options.y.as_deref().unwrap_or(y);
        let mut points: Vec<Point> = waypoints
            .iter()
            .map(|w| Point::new(w.get(x).unwrap_or(0.0), w.get(y).unwrap_or(0.0)))
            .collect();
        let cubics = match options.kind {
            PathKind::Cubic => cubic_chain(&points),
            PathKind::Thru => {
                let current = Point::new(
                    read_number(host, &target, x_prop, unit_x.unwrap_or("px")),
                    read_number(host, &target, y_prop, unit_y.unwrap_or("px")),
                );
                points.insert(0, current);
                if options.relative {
                    relativize(&mut points);
                }
                points_to_cubics(&points, options.curviness.unwrap_or(DEFAULT_CURVINESS))
            }
        };
        let mut path = RawPath::from_cubics(cubics);
        align_path(host, &mut path, &target, options);
        let mut path = slice_to(path, options);
        path.measure(resolution);
        let index = state.push(path);
        let x_unit = waypoint_unit(host, &target, x_prop, unit_x);
        let y_unit = waypoint_unit(host, &target, y_prop, unit_y);
        state.bind(index, Axis::X, x_prop, x_unit);
        state.bind(index, Axis::Y, y_prop, y_unit);
    }

    for name in first.names() {
        if axes.is_some_and(|(x, y)| name == x || name == y) {
            continue;
        }
        let mut values: Vec<f64> = waypoints.iter().map(|w| w.get(name).unwrap_or(0.0)).collect();
        let cubics = match options.kind {
            PathKind::Cubic => {
                let points: Vec<Point> = values.iter().map(|v| Point::new(*v, 0.0)).collect();
                cubic_chain(&points)
            }
            PathKind::Thru => {
                values.insert(0, read_number(host, &target, name, unit_x.unwrap_or("px")));
                if options.relative {
                    for i in 1..values.len() {
                        values[i] += values[i - 1];
                    }
                }
                values_to_cubics(&values, options.curviness.unwrap_or(DEFAULT_CURVINESS))
            }
        };
        let mut path = RawPath::from_cubics(cubics);
        apply_offsets(&mut path, options);
        let mut path = slice_to(path, options);
        path.measure(resolution);
        let index = state.push(path);
        let unit = waypoint_unit(host, &target, name, unit_x);
        state.bind(index, Axis::X, name, unit);
    }
}

/// The length of a path given as SVG path data, measured at
/// [`DEFAULT_RESOLUTION`].
///
/// # Errors
///
/// Fails if the path data cannot be parsed.
pub fn measure_length(data: &str) -> Result<f64, SvgParseError> {
    Ok(RawPath::from_svg(data)?.total_length())
}

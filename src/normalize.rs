// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning the accepted path descriptions into a [`RawPath`].

use smallvec::SmallVec;

use crate::matrix::element_position;
use crate::spline::{cubic_chain, points_to_cubics, relativize, DEFAULT_CURVINESS};
use crate::{
    CubicBez, MotionError, MotionOptions, MotionResult, Point, RawPath, Scene, DEFAULT_RESOLUTION,
    STRAIGHT_RESOLUTION,
};

/// Something a motion path can be built from.
#[derive(Clone, Debug, PartialEq)]
pub enum PathInput<E> {
    /// SVG path data.
    Svg(String),
    /// A path-shaped element, whose path data is used.
    Element(E),
    /// Either SVG path data or a selector naming a path-shaped element.
    Selector(String),
    /// Elements to pass through, in order.
    Elements(Vec<E>),
    /// Values of animated properties to pass through, in order.
    Waypoints(Vec<Waypoint>),
    /// Ready-made cubic segments, used as they are.
    Cubic(Vec<CubicBez>),
}

/// How a list of waypoints is turned into curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathKind {
    /// A smooth spline through every waypoint.
    #[default]
    Thru,
    /// Waypoints are the anchors and control points of consecutive cubics.
    Cubic,
}

/// One stop along a motion: property names and the values they reach.
///
/// Properties keep the order they were added in.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    props: SmallVec<[(String, f64); 2]>,
}

/// Properties that supply the horizontal coordinate of a waypoint.
pub const X_PROPS: [&str; 4] = ["x", "translateX", "left", "marginLeft"];

/// Properties that supply the vertical coordinate of a waypoint.
pub const Y_PROPS: [&str; 4] = ["y", "translateY", "top", "marginTop"];

impl Waypoint {
    /// An empty waypoint.
    pub fn new() -> Waypoint {
        Waypoint::default()
    }

    /// Add or replace a property value.
    #[must_use]
    pub fn with(mut self, name: &str, value: f64) -> Waypoint {
        self.set(name, value);
        self
    }

    /// Add or replace a property value.
    pub fn set(&mut self, name: &str, value: f64) {
        match self.props.iter_mut().find(|(n, _)| n == name) {
            Some(prop) => prop.1 = value,
            None => self.props.push((name.to_owned(), value)),
        }
    }

    /// The value of a property.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.props.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// The property names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.props.iter().map(|(n, _)| n.as_str())
    }

    /// The property whose name is in `candidates`, if any.
    ///
    /// The last matching property wins.
    pub(crate) fn find_axis(&self, candidates: &[&str]) -> Option<&str> {
        self.names().filter(|n| candidates.contains(n)).last()
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((x, y): (f64, f64)) -> Waypoint {
        Waypoint::new().with("x", x).with("y", y)
    }
}

impl From<Point> for Waypoint {
    fn from(p: Point) -> Waypoint {
        Waypoint::from((p.x, p.y))
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for Waypoint {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Waypoint {
        let mut waypoint = Waypoint::new();
        for (name, value) in iter {
            waypoint.set(name.as_ref(), value);
        }
        waypoint
    }
}

/// The measuring resolution for curves built with `options`.
pub(crate) fn default_resolution<E>(options: &MotionOptions<E>) -> usize {
    options.resolution.unwrap_or(if options.curviness == Some(0.0) {
        STRAIGHT_RESOLUTION
    } else {
        DEFAULT_RESOLUTION
    })
}

/// Build a path from waypoints.
///
/// The `x` and `y` options name the properties read for the two coordinates
/// (by default `"x"` and `"y"`); waypoints missing one read it as zero. With
/// `relative` each waypoint is an offset from the previous one. The points
/// are joined by a spline of the configured curviness, or used as cubic
/// control points for [`PathKind::Cubic`].
pub fn waypoints_to_path<E>(waypoints: &[Waypoint], options: &MotionOptions<E>) -> RawPath {
    let x = options.x.as_deref().unwrap_or("x");
    let y = options.y.as_deref().unwrap_or("y");
    let mut points: Vec<Point> = waypoints
        .iter()
        .map(|w| Point::new(w.get(x).unwrap_or(0.0), w.get(y).unwrap_or(0.0)))
        .collect();
    if options.relative {
        relativize(&mut points);
    }
    let cubics = match options.kind {
        PathKind::Cubic => cubic_chain(&points),
        PathKind::Thru => points_to_cubics(&points, options.curviness.unwrap_or(DEFAULT_CURVINESS)),
    };
    let mut path = RawPath::from_cubics(cubics);
    path.measure(default_resolution(options));
    path
}

/// Build a path from any [`PathInput`].
///
/// Element positions and path data are read from `scene`. Positions of
/// [`PathInput::Elements`] are in document space. The result is measured at
/// [`DEFAULT_RESOLUTION`]; empty or single point input gives a zero-length
/// path at the origin.
///
/// # Errors
///
/// Fails if SVG path data cannot be parsed, or if an element given as the
/// path has no path data.
pub fn normalize<S: Scene + ?Sized>(
    scene: &S,
    input: &PathInput<S::Element>,
    options: &MotionOptions<S::Element>,
) -> MotionResult<RawPath> {
    let path = match input {
        PathInput::Svg(data) => RawPath::from_svg(data)?,
        PathInput::Element(el) => element_path(scene, el)?,
        PathInput::Selector(selector) => match RawPath::from_svg(selector) {
            Ok(path) => path,
            Err(_) => {
                let el = scene
                    .resolve_targets(selector)
                    .into_iter()
                    .next()
                    .ok_or(MotionError::MissingPathData)?;
                element_path(scene, &el)?
            }
        },
        PathInput::Elements(elements) => {
            let points: Vec<Point> = elements
                .iter()
                .map(|el| element_position(scene, el))
                .collect();
            let curviness = options.curviness.unwrap_or(DEFAULT_CURVINESS);
            RawPath::from_cubics(points_to_cubics(&points, curviness))
        }
        PathInput::Waypoints(waypoints) => waypoints_to_path(waypoints, options),
        PathInput::Cubic(cubics) => RawPath::from_cubics(cubics.iter().copied()),
    };
    Ok(path)
}

fn element_path<S: Scene + ?Sized>(scene: &S, el: &S::Element) -> MotionResult<RawPath> {
    let data = scene.path_data(el).ok_or(MotionError::MissingPathData)?;
    Ok(RawPath::from_svg(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Affine, Node, Rect, SceneTree, SvgParseError};

    fn opts() -> MotionOptions<crate::NodeId> {
        MotionOptions::default()
    }

    #[test]
    fn waypoint_properties() {
        let mut w = Waypoint::new().with("left", 3.0).with("opacity", 1.0);
        w.set("left", 4.0);
        assert_eq!(w.get("left"), Some(4.0));
        assert_eq!(w.names().collect::<Vec<_>>(), ["left", "opacity"]);
        assert_eq!(w.find_axis(&X_PROPS), Some("left"));
        assert_eq!(w.find_axis(&Y_PROPS), None);
        let w: Waypoint = [("top", 1.0), ("x", 2.0)].into_iter().collect();
        assert_eq!(w.find_axis(&Y_PROPS), Some("top"));
        assert_eq!(Waypoint::from((1.0, 2.0)).get("y"), Some(2.0));
    }

    #[test]
    fn svg_and_cubic_inputs() {
        let tree = SceneTree::new();
        let path = normalize(&tree, &PathInput::Svg("M0,0 L100,0".into()), &opts()).unwrap();
        assert!((path.total_length() - 100.0).abs() < 1e-9);

        let c = CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0));
        let path = normalize(&tree, &PathInput::Cubic(vec![c, c]), &opts()).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[0].bez(), &c);

        let err = normalize(&tree, &PathInput::Svg("M0 0 L".into()), &opts()).unwrap_err();
        assert_eq!(err, MotionError::InvalidPath(SvgParseError::UnexpectedEof));
    }

    #[test]
    fn element_and_selector_inputs() {
        let mut tree = SceneTree::new();
        let root = tree.insert(None, Node::new("svg"));
        let path_el = tree.insert(
            Some(root),
            Node::new("path").with_id("p").with_path_data("M0,0 L0,50"),
        );
        let path = normalize(&tree, &PathInput::Element(path_el), &opts()).unwrap();
        assert!((path.total_length() - 50.0).abs() < 1e-9);

        let path = normalize(&tree, &PathInput::Selector("#p".into()), &opts()).unwrap();
        assert!((path.total_length() - 50.0).abs() < 1e-9);

        // Strings that parse as path data are path data.
        let path = normalize(&tree, &PathInput::Selector("M0,0 H20".into()), &opts()).unwrap();
        assert!((path.total_length() - 20.0).abs() < 1e-9);

        let err = normalize(&tree, &PathInput::Element(root), &opts()).unwrap_err();
        assert_eq!(err, MotionError::MissingPathData);
        let err = normalize(&tree, &PathInput::Selector("#nope".into()), &opts()).unwrap_err();
        assert_eq!(err, MotionError::MissingPathData);
    }

    #[test]
    fn elements_as_waypoints() {
        let mut tree = SceneTree::new();
        let root = tree.insert(None, Node::new("div"));
        let els: Vec<_> = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]
            .into_iter()
            .map(|p| {
                tree.insert(
                    Some(root),
                    Node::new("div").with_transform(Affine::translate(p)),
                )
            })
            .collect();
        let path = normalize(&tree, &PathInput::Elements(els.clone()), &opts()).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.end(), Point::new(100.0, 100.0));

        // Graphical elements are located by their bounding box corner.
        tree.node_mut(els[2]).bounding_box = Some(Rect::new(5.0, 5.0, 10.0, 10.0));
        let path = normalize(&tree, &PathInput::Elements(els), &opts()).unwrap();
        assert_eq!(path.end(), Point::new(105.0, 105.0));

        let path = normalize(&tree, &PathInput::Elements(vec![root]), &opts()).unwrap();
        assert_eq!(path.total_length(), 0.0);
        assert_eq!(path.start(), Point::ORIGIN);
    }

    #[test]
    fn waypoint_paths() {
        let waypoints: Vec<Waypoint> =
            vec![(0.0, 0.0).into(), (100.0, 0.0).into(), (100.0, 100.0).into()];
        let path = waypoints_to_path(&waypoints, &opts());
        assert_eq!(path.len(), 2);
        assert_eq!(path.resolution(), DEFAULT_RESOLUTION);
        let len = path.total_length();
        assert!((200.0..=240.0).contains(&len), "length {len}");

        let straight = waypoints_to_path(&waypoints, &opts().with_curviness(0.0));
        assert_eq!(straight.resolution(), STRAIGHT_RESOLUTION);
        assert!((straight.total_length() - 200.0).abs() < 1e-9);

        let relative = waypoints_to_path(&waypoints, &opts().with_relative(true));
        assert_eq!(relative.end(), Point::new(200.0, 100.0));

        let named: Vec<Waypoint> = vec![
            Waypoint::new().with("left", 0.0).with("top", 0.0),
            Waypoint::new().with("left", 30.0).with("top", 40.0),
        ];
        let path = waypoints_to_path(&named, &opts().with_x("left").with_y("top"));
        assert!((path.total_length() - 50.0).abs() < 1e-9);

        let cubic = waypoints_to_path(&waypoints[..1], &opts().with_kind(PathKind::Cubic));
        assert_eq!(cubic.total_length(), 0.0);
    }
}

// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motion along 2D paths.
//!
//! The motionpath library turns path descriptions into measured runs of cubic
//! Béziers and answers, for any ratio between 0 and 1, where along the path
//! that ratio lands and which way the path is heading there. It can align a
//! path with elements living in nested coordinate frames, and it drives
//! element properties from the result once per animation frame.
//!
//! Paths can be given as SVG path data, as path-shaped elements, as elements
//! or property values to pass through, or as ready-made cubic segments. The
//! element tree is supplied by the host through the [`Scene`] and
//! [`PropertyAccess`] traits; [`SceneTree`] is an in-memory implementation.
//!
//! # Examples
//!
//! Sampling a path directly:
//! ```
//! use motionpath::{Point, RawPath};
//!
//! let path = RawPath::from_svg("M0,0 L100,0 L100,100").unwrap();
//! assert!((path.total_length() - 200.0).abs() < 1e-9);
//! let pos = path.position_at(0.75, true);
//! assert!((pos.point - Point::new(100.0, 50.0)).hypot() < 1e-9);
//! assert!((pos.angle.unwrap() - 90.0).abs() < 1e-9);
//! ```
//!
//! Driving an element through waypoints:
//! ```
//! use motionpath::{MotionOptions, MotionPathPlugin, Node, PathInput, SceneTree, Waypoint};
//!
//! let mut tree = SceneTree::new();
//! let dot = tree.insert(None, Node::new("div"));
//! let mut plugin = MotionPathPlugin::with_host(tree);
//!
//! let waypoints: Vec<Waypoint> = vec![(100.0, 0.0).into(), (100.0, 100.0).into()];
//! let options = MotionOptions::default()
//!     .with_path(PathInput::Waypoints(waypoints))
//!     .with_auto_rotate(0.0);
//! let state = plugin.init(&dot, &options).unwrap();
//! plugin.render(1.0, &state);
//! assert_eq!(plugin.host().unwrap().property(dot, "y"), Some(100.0));
//! ```
//!
//! # Features
//!
//! * `serde` derives `Serialize` and `Deserialize` for the value types.
//! * `schemars` derives `JsonSchema` for the geometry types.
//! * `mint` adds conversions to and from the [`mint`] types.
//!
//! [`mint`]: https://docs.rs/mint

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(clippy::many_single_char_names, clippy::excessive_precision)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod affine;
mod align;
mod arc;
mod cubicbez;
mod error;
pub mod matrix;
mod motion;
mod normalize;
mod point;
mod rawpath;
mod rect;
mod scene;
mod size;
pub mod spline;
mod svg;
mod vec2;

pub use crate::affine::*;
pub use crate::align::*;
pub use crate::arc::*;
pub use crate::cubicbez::*;
pub use crate::error::*;
pub use crate::matrix::{
    convert_coordinates, convert_point, global_transform, parent_inverse, ResolveOptions,
};
pub use crate::motion::*;
pub use crate::normalize::*;
pub use crate::point::*;
pub use crate::rawpath::*;
pub use crate::rect::*;
pub use crate::scene::*;
pub use crate::size::*;
pub use crate::svg::*;
pub use crate::vec2::*;

// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while setting up a motion.

use crate::SvgParseError;

/// Convenience alias for results of fallible setup operations.
pub type MotionResult<T> = Result<T, MotionError>;

/// Why a motion could not be set up.
///
/// These are only ever produced by [`init`](crate::MotionPathPlugin::init)
/// and related setup calls. Per-frame rendering never fails.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    /// No host was registered with the plugin before `init`.
    #[error("driver not registered")]
    NotRegistered,

    /// The options did not contain a path.
    #[error("no path supplied")]
    NoPath,

    /// The path was given as SVG path data that could not be parsed.
    #[error("invalid path data: {0}")]
    InvalidPath(#[from] SvgParseError),

    /// An element or selector was given as the path, but has no path data.
    #[error("element has no path data")]
    MissingPathData,
}

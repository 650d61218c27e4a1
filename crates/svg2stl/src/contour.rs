//! Contour building - path commands to a flat list of line segments.
//!
//! A contour is what one `<path>` becomes before it is emitted: every line
//! command kept as-is, every cubic curve replaced by its flattened
//! polyline, and a flag saying whether the path was closed.
//!
//! Only lines and cubic curves are supported. Quadratic curves and
//! elliptical arcs are rejected with [`UnsupportedSegmentError`] rather
//! than approximated.

use std::num::NonZeroU32;

use thiserror::Error;

use crate::flatten::{CubicCurve, flatten};
use crate::geometry::{Line, Point};

/// One path command with absolute coordinates.
///
/// Every drawing command carries its own start point, so commands can be
/// converted independently of one another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath. Contributes no geometry.
    MoveTo(Point),
    LineTo { start: Point, end: Point },
    CubicCurveTo(CubicCurve),
    QuadraticCurveTo { start: Point, ctrl: Point, end: Point },
    EllipticalArc {
        start: Point,
        end: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
    },
    /// End the subpath, `end` being the subpath's first point.
    ClosePath { start: Point, end: Point },
}

impl PathCommand {
    /// Human-readable command name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PathCommand::MoveTo(_) => "move",
            PathCommand::LineTo { .. } => "line",
            PathCommand::CubicCurveTo(_) => "cubic curve",
            PathCommand::QuadraticCurveTo { .. } => "quadratic curve",
            PathCommand::EllipticalArc { .. } => "elliptical arc",
            PathCommand::ClosePath { .. } => "close path",
        }
    }

    /// Where the command starts drawing from.
    pub fn start(&self) -> Point {
        match *self {
            PathCommand::MoveTo(p) => p,
            PathCommand::LineTo { start, .. }
            | PathCommand::QuadraticCurveTo { start, .. }
            | PathCommand::EllipticalArc { start, .. }
            | PathCommand::ClosePath { start, .. } => start,
            PathCommand::CubicCurveTo(curve) => curve.start,
        }
    }
}

/// A path command the converter can't turn into line segments.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {x}, {y} is not a supported path segment")]
pub struct UnsupportedSegmentError {
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
}

impl UnsupportedSegmentError {
    fn new(command: &PathCommand) -> Self {
        let at = command.start();
        Self {
            kind: command.kind(),
            x: at.x,
            y: at.y,
        }
    }
}

/// The flattened outline of one path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    /// Segments in command order. Never reordered or deduplicated.
    pub segments: Vec<Line>,
    /// Whether any close-path command was seen.
    pub closed: bool,
}

impl Contour {
    /// Segment endpoints, two per segment, in order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments
            .iter()
            .flat_map(|line| [line.start(), line.end()])
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Build a contour from a path's commands.
///
/// Fails on the first quadratic curve or elliptical arc; nothing is
/// returned for the path in that case.
pub fn build_contour(
    commands: &[PathCommand],
    curve_steps: NonZeroU32,
) -> Result<Contour, UnsupportedSegmentError> {
    let mut contour = Contour::default();

    for command in commands {
        match command {
            // Coordinates are already absolute, so a move adds nothing.
            PathCommand::MoveTo(_) => {}
            PathCommand::LineTo { start, end } => {
                contour.segments.push(Line::between(*start, *end));
            }
            PathCommand::CubicCurveTo(curve) => {
                contour.segments.extend(flatten(curve, curve_steps).lines());
            }
            PathCommand::ClosePath { .. } => {
                contour.closed = true;
            }
            PathCommand::QuadraticCurveTo { .. } | PathCommand::EllipticalArc { .. } => {
                return Err(UnsupportedSegmentError::new(command));
            }
        }
    }

    Ok(contour)
}

// ============================================================================
// TESTS
// ============================================================================

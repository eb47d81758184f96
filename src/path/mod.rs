//! Stroke outline paths: parsing, canonical text form and kurbo output.
//!
//! Only the command subset used by the stroke datasets is handled:
//! `M L H V C S Q A Z` in both cases. Arcs must be circular and
//! unrotated.

pub mod arc;
mod parse;
mod tokenize;

use std::fmt;

use kurbo::{BezPath, Point};

pub use arc::{circle_centers, resolve_arc, ResolvedArc};
pub use parse::{parse_path, parse_path_with};
pub use tokenize::{parse_num_sequence, tokenize, RawCommand};

/// Flattening tolerance used when appending arcs to a `BezPath`.
const ARC_TOLERANCE: f64 = 1e-4;

/// One absolute outline drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo {
        control: Point,
        to: Point,
    },
    CurveTo {
        control1: Point,
        control2: Point,
        to: Point,
    },
    ArcTo {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    ClosePath,
}

impl PathCommand {
    /// End point of the command, `None` for `ClosePath`.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::QuadTo { to, .. }
            | PathCommand::CurveTo { to, .. }
            | PathCommand::ArcTo { to, .. } => Some(to),
            PathCommand::ClosePath => None,
        }
    }
}

/// Canonical two-decimal form, e.g. `Q 0.10 0.20 0.30 0.40`.
/// Arc flags print as `0`/`1`.
impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo(p) => write!(f, "M {:.2} {:.2}", p.x, p.y),
            PathCommand::LineTo(p) => write!(f, "L {:.2} {:.2}", p.x, p.y),
            PathCommand::QuadTo { control, to } => write!(
                f,
                "Q {:.2} {:.2} {:.2} {:.2}",
                control.x, control.y, to.x, to.y
            ),
            PathCommand::CurveTo {
                control1,
                control2,
                to,
            } => write!(
                f,
                "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                control1.x, control1.y, control2.x, control2.y, to.x, to.y
            ),
            PathCommand::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => write!(
                f,
                "A {:.2} {} {} {:.2} {:.2}",
                radius, large_arc as u8, sweep as u8, to.x, to.y
            ),
            PathCommand::ClosePath => write!(f, "Z"),
        }
    }
}

/// Space-separated canonical form of a whole outline.
pub fn serialize_outline(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert an outline to a `kurbo::BezPath`.
///
/// Arcs go through `resolve_arc` from the running current point and are
/// appended as cubic approximations. An arc that no longer resolves
/// (possible only through float drift after remapping) degrades to a
/// straight line to its end point.
pub fn to_bezpath(commands: &[PathCommand]) -> BezPath {
    let mut path = BezPath::new();
    let mut current = Point::ZERO;
    let mut subpath_start = Point::ZERO;

    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                path.move_to(p);
                subpath_start = p;
            }
            PathCommand::LineTo(p) => path.line_to(p),
            PathCommand::QuadTo { control, to } => path.quad_to(control, to),
            PathCommand::CurveTo {
                control1,
                control2,
                to,
            } => path.curve_to(control1, control2, to),
            PathCommand::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => match resolve_arc(current, to, radius, large_arc, sweep) {
                Some(arc) => path.extend(arc.to_kurbo().append_iter(ARC_TOLERANCE)),
                None => path.line_to(to),
            },
            PathCommand::ClosePath => {
                path.close_path();
                current = subpath_start;
                continue;
            }
        }
        if let Some(p) = command.end_point() {
            current = p;
        }
    }
    path
}

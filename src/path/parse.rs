//! Path interpreter: raw commands → absolute `PathCommand`s.
//!
//! Tracks the current point, the subpath start and the last cubic
//! control point (for `s`/`S` reflection) while walking the commands.
//! Every emitted point goes through a caller-supplied remapping, so the
//! interpreter never assumes a coordinate system.

use kurbo::Point;

use super::arc::resolve_arc;
use super::tokenize::{tokenize, RawCommand};
use super::PathCommand;
use crate::error::PathError;

/// Parse a path string with the identity mapping.
pub fn parse_path(path: &str) -> Result<Vec<PathCommand>, PathError> {
    parse_path_with(path, |p| p)
}

/// Parse a path string, passing every output point through `remap`.
///
/// `remap` must be a similarity transform (uniform scale, translation,
/// optional mirror); arc radii are scaled by its scale factor and the
/// sweep flag is flipped when it mirrors.
pub fn parse_path_with<F>(path: &str, remap: F) -> Result<Vec<PathCommand>, PathError>
where
    F: Fn(Point) -> Point,
{
    let raw = tokenize(path)?;
    let frame = RemapFrame::probe(&remap);
    let mut state = ParseState::default();
    let mut commands = Vec::new();

    for command in &raw {
        check_arity(command)?;
        interpret(command, &mut state, &remap, frame, &mut commands)?;
    }

    match commands.first() {
        None => Err(PathError::Empty),
        Some(PathCommand::MoveTo(_)) => Ok(commands),
        Some(_) => Err(PathError::MissingMoveTo),
    }
}

/// Running interpreter state.
#[derive(Debug, Default, Clone, Copy)]
struct ParseState {
    current: Point,
    subpath_start: Point,
    /// Second control point of the previous command, if it was a cubic.
    last_cubic_control: Option<Point>,
}

impl ParseState {
    /// Resolve a coordinate against the current point for lowercase codes.
    fn absolute(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    /// First control point of a smooth cubic: the previous cubic's second
    /// control point mirrored through the current point, or the current
    /// point itself when there is nothing to mirror.
    fn reflected_control(&self) -> Point {
        match self.last_cubic_control {
            Some(control) => (self.current.to_vec2() * 2.0 - control.to_vec2()).to_point(),
            None => self.current,
        }
    }
}

/// Scale and handedness of the remapping, measured once per path.
#[derive(Debug, Clone, Copy)]
struct RemapFrame {
    scale: f64,
    mirrored: bool,
}

impl RemapFrame {
    fn probe<F: Fn(Point) -> Point>(remap: &F) -> Self {
        let origin = remap(Point::ZERO);
        let ex = remap(Point::new(1.0, 0.0)) - origin;
        let ey = remap(Point::new(0.0, 1.0)) - origin;
        Self {
            scale: ex.hypot(),
            mirrored: ex.cross(ey) < 0.0,
        }
    }
}

/// Number of arguments consumed per repetition of a command.
fn stride(code: char) -> usize {
    match code.to_ascii_lowercase() {
        'm' | 'l' => 2,
        'h' | 'v' => 1,
        'q' | 's' => 4,
        'c' => 6,
        'a' => 7,
        _ => 0,
    }
}

fn check_arity(command: &RawCommand) -> Result<(), PathError> {
    let count = command.args.len();
    let ok = match stride(command.code) {
        0 => count == 0,
        n => count > 0 && count % n == 0,
    };
    if ok {
        Ok(())
    } else {
        Err(PathError::ArgumentCount {
            command: command.code,
            count,
        })
    }
}

fn interpret<F: Fn(Point) -> Point>(
    command: &RawCommand,
    state: &mut ParseState,
    remap: &F,
    frame: RemapFrame,
    out: &mut Vec<PathCommand>,
) -> Result<(), PathError> {
    let relative = command.code.is_ascii_lowercase();
    let args = &command.args;

    match command.code.to_ascii_lowercase() {
        'm' => {
            for (i, pair) in args.chunks_exact(2).enumerate() {
                let p = state.absolute(relative, pair[0], pair[1]);
                if i == 0 {
                    out.push(PathCommand::MoveTo(remap(p)));
                    state.subpath_start = p;
                } else {
                    // Extra pairs after a moveto are implicit linetos.
                    out.push(PathCommand::LineTo(remap(p)));
                }
                state.current = p;
            }
            state.last_cubic_control = None;
        }
        'l' => {
            for pair in args.chunks_exact(2) {
                let p = state.absolute(relative, pair[0], pair[1]);
                out.push(PathCommand::LineTo(remap(p)));
                state.current = p;
            }
            state.last_cubic_control = None;
        }
        'h' => {
            for &x in args {
                let x = if relative { state.current.x + x } else { x };
                let p = Point::new(x, state.current.y);
                out.push(PathCommand::LineTo(remap(p)));
                state.current = p;
            }
            state.last_cubic_control = None;
        }
        'v' => {
            for &y in args {
                let y = if relative { state.current.y + y } else { y };
                let p = Point::new(state.current.x, y);
                out.push(PathCommand::LineTo(remap(p)));
                state.current = p;
            }
            state.last_cubic_control = None;
        }
        'c' => {
            for seg in args.chunks_exact(6) {
                let control1 = state.absolute(relative, seg[0], seg[1]);
                let control2 = state.absolute(relative, seg[2], seg[3]);
                let to = state.absolute(relative, seg[4], seg[5]);
                out.push(PathCommand::CurveTo {
                    control1: remap(control1),
                    control2: remap(control2),
                    to: remap(to),
                });
                state.current = to;
                state.last_cubic_control = Some(control2);
            }
        }
        's' => {
            for seg in args.chunks_exact(4) {
                let control1 = state.reflected_control();
                let control2 = state.absolute(relative, seg[0], seg[1]);
                let to = state.absolute(relative, seg[2], seg[3]);
                out.push(PathCommand::CurveTo {
                    control1: remap(control1),
                    control2: remap(control2),
                    to: remap(to),
                });
                state.current = to;
                state.last_cubic_control = Some(control2);
            }
        }
        'q' => {
            for seg in args.chunks_exact(4) {
                let control = state.absolute(relative, seg[0], seg[1]);
                let to = state.absolute(relative, seg[2], seg[3]);
                out.push(PathCommand::QuadTo {
                    control: remap(control),
                    to: remap(to),
                });
                state.current = to;
            }
            state.last_cubic_control = None;
        }
        'a' => {
            for seg in args.chunks_exact(7) {
                let (rx, ry, rotation) = (seg[0], seg[1], seg[2]);
                if rx != ry {
                    return Err(PathError::UnequalRadius { rx, ry });
                }
                if rotation != 0.0 {
                    return Err(PathError::ArcRotation(rotation));
                }
                let radius = rx.abs();
                let large_arc = seg[3] != 0.0;
                let sweep = seg[4] != 0.0;
                let to = state.absolute(relative, seg[5], seg[6]);
                if resolve_arc(state.current, to, radius, large_arc, sweep).is_none() {
                    return Err(PathError::NoArcCircle { radius });
                }
                out.push(PathCommand::ArcTo {
                    radius: radius * frame.scale,
                    large_arc,
                    sweep: sweep != frame.mirrored,
                    to: remap(to),
                });
                state.current = to;
            }
            state.last_cubic_control = None;
        }
        'z' => {
            out.push(PathCommand::ClosePath);
            state.current = state.subpath_start;
            state.last_cubic_control = None;
        }
        // `tokenize` only produces known command letters.
        _ => unreachable!("unknown path command {:?}", command.code),
    }
    Ok(())
}

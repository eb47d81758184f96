//! Circular arc resolution: two endpoints + radius → center and angles.
//!
//! A circle of radius `r` through two points has its center on the
//! chord's perpendicular bisector, at distance `sqrt(r² − (chord/2)²)`
//! from the chord midpoint, on either side. The `large_arc`/`sweep`
//! flag pair picks the side.

use std::f64::consts::TAU;

use kurbo::{Point, Vec2};

/// Relative slack when comparing the radius against half the chord, so
/// a radius written to exactly half the chord survives rounding.
const RADIUS_TOLERANCE: f64 = 1e-9;

/// A circular arc expressed around its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedArc {
    pub center: Point,
    pub radius: f64,
    /// Angle of the start point around `center`, radians.
    pub start_angle: f64,
    /// Signed angular extent; positive runs toward increasing angle.
    pub sweep_angle: f64,
}

impl ResolvedArc {
    /// Same arc as a `kurbo::Arc`, ready to flatten or append.
    pub fn to_kurbo(&self) -> kurbo::Arc {
        kurbo::Arc {
            center: self.center,
            radii: Vec2::new(self.radius, self.radius),
            start_angle: self.start_angle,
            sweep_angle: self.sweep_angle,
            x_rotation: 0.0,
        }
    }
}

/// Both centers of the circles of `radius` through `start` and `end`.
///
/// The first center lies to the left of the chord direction
/// (chord rotated by +90°), the second to the right; they coincide when
/// the chord is a diameter. `None` when the endpoints coincide or the
/// radius is shorter than half the chord.
pub fn circle_centers(start: Point, end: Point, radius: f64) -> Option<(Point, Point)> {
    let chord = end - start;
    let length = chord.hypot();
    if length == 0.0 || !radius.is_finite() || radius <= 0.0 {
        return None;
    }
    let half = length / 2.0;
    if radius < half * (1.0 - RADIUS_TOLERANCE) {
        return None;
    }
    let offset = (radius * radius - half * half).max(0.0).sqrt();
    // Unit normal of the chord. Works for vertical chords too: no slope
    // is ever formed.
    let normal = Vec2::new(-chord.y, chord.x) / length;
    let mid = start.midpoint(end);
    Some((mid + normal * offset, mid - normal * offset))
}

/// Resolve a `large_arc`/`sweep` arc from `start` to `end`.
///
/// Picks the center so that traversing in the `sweep` direction covers
/// more than half the circle exactly when `large_arc` is set.
pub fn resolve_arc(
    start: Point,
    end: Point,
    radius: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<ResolvedArc> {
    let (left, right) = circle_centers(start, end, radius)?;
    let center = if large_arc != sweep { left } else { right };

    let start_angle = (start - center).atan2();
    let end_angle = (end - center).atan2();
    let mut delta = (end_angle - start_angle).rem_euclid(TAU);
    if !sweep && delta != 0.0 {
        delta -= TAU;
    }

    Some(ResolvedArc {
        center,
        radius,
        start_angle,
        sweep_angle: delta,
    })
}

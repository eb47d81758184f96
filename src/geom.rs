//! Shared geometry utilities.

use kurbo::{Affine, Point, Vec2};

/// Mean of a point set. `Point::ZERO` for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f64).to_point()
}

/// Rigid rotation of every point about the origin by `angle` radians.
pub fn rotate(points: &[Point], angle: f64) -> Vec<Point> {
    let rotation = Affine::rotate(angle);
    points.iter().map(|&p| rotation * p).collect()
}

/// Drop consecutive repeats, keeping the first of each run.
pub fn dedup_consecutive(points: &[Point]) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if result.last() != Some(&p) {
            result.push(p);
        }
    }
    result
}

/// Consecutive-difference vectors of a polyline.
pub fn edge_vectors(points: &[Point]) -> Vec<Vec2> {
    points.windows(2).map(|w| w[1] - w[0]).collect()
}

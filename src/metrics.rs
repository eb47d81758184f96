//! Stroke similarity metrics.
//!
//! All functions are pure and operate on point sequences; they do not
//! normalize their inputs.

use kurbo::{Point, Vec2};

use crate::geom::edge_vectors;
pub use crate::geom::rotate;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Total polyline length.
pub fn length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Mean, over `to`, of each point's nearest distance into `from`.
///
/// Directional: `average_distance(a, b)` and `average_distance(b, a)`
/// generally differ. Infinite when either side is empty.
pub fn average_distance(from: &[Point], to: &[Point]) -> f64 {
    if from.is_empty() || to.is_empty() {
        return f64::INFINITY;
    }
    let sum: f64 = to
        .iter()
        .map(|b| {
            from.iter()
                .map(|a| a.distance(*b))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    sum / to.len() as f64
}

/// Cosine of the angle between two vectors; 0 if either has no length.
pub fn cosine_similarity(a: Vec2, b: Vec2) -> f64 {
    let norms = a.hypot() * b.hypot();
    if norms == 0.0 {
        0.0
    } else {
        a.dot(b) / norms
    }
}

/// Direction agreement between two polylines.
///
/// For every edge of `canonical`, the best cosine similarity against any
/// edge of `user`, averaged over the canonical edges. Positive when the
/// strokes broadly run the same way. 0 when either has no edges.
pub fn tangent_similarity(canonical: &[Point], user: &[Point]) -> f64 {
    let canonical_edges = edge_vectors(canonical);
    let user_edges = edge_vectors(user);
    if canonical_edges.is_empty() || user_edges.is_empty() {
        return 0.0;
    }
    let sum: f64 = canonical_edges
        .iter()
        .map(|&c| {
            user_edges
                .iter()
                .map(|&u| cosine_similarity(c, u))
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .sum();
    sum / canonical_edges.len() as f64
}

/// Discrete Fréchet distance.
///
/// Dynamic programming over the (long × short) coupling grid, one column
/// at a time, so memory is O(min(|a|, |b|)). Symmetric in its arguments.
/// Infinite when either curve is empty.
pub fn frechet_distance(a: &[Point], b: &[Point]) -> f64 {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return f64::INFINITY;
    }

    // column[j] holds f(i, j) for the row of `long` being processed.
    let mut column = Vec::with_capacity(short.len());
    let mut running = 0.0f64;
    for &q in short {
        running = running.max(long[0].distance(q));
        column.push(running);
    }

    for &p in &long[1..] {
        let mut diagonal = column[0];
        column[0] = column[0].max(p.distance(short[0]));
        for j in 1..short.len() {
            let above = column[j];
            let reachable = above.min(diagonal).min(column[j - 1]);
            column[j] = reachable.max(p.distance(short[j]));
            diagonal = above;
        }
    }

    column[short.len() - 1]
}

//! Curve normalization: makes two strokes comparable by shape alone.
//!
//! 1. Resample to a fixed number of arc-length-spaced points
//! 2. Center on the centroid, scale by the endpoints' RMS radius
//! 3. Subdivide segments longer than the maximum segment length

use kurbo::Point;

use crate::config::NormalizeConfig;
use crate::geom::centroid;
use crate::metrics::length;

/// Scale below which a stroke is treated as having no size; such
/// strokes are centered but left unscaled.
const MIN_SCALE: f64 = 1e-12;

/// Upper bound on the pieces a single segment is split into.
const MAX_PIECES: usize = 10_000;

/// Run all three stages on a polyline.
///
/// Callers must reject degenerate strokes (fewer than two distinct
/// points) first; a zero-length input comes back as `sample_count`
/// copies of the origin.
pub fn normalize_curve(points: &[Point], config: &NormalizeConfig) -> Vec<Point> {
    let resampled = resample(points, config.sample_count);
    let framed = center_and_scale(&resampled);
    subdivide(&framed, config.max_segment_length)
}

/// Resample to exactly `count` points evenly spaced by arc length.
///
/// The first and last points are copied unchanged; everything in
/// between is linearly interpolated along the original segments.
pub fn resample(points: &[Point], count: usize) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if count < 2 {
        return vec![first; count];
    }

    let total = length(points);
    if total == 0.0 {
        return vec![first; count];
    }
    let spacing = total / (count - 1) as f64;

    let mut result = Vec::with_capacity(count);
    result.push(first);

    // Walk the segments, carrying the distance already covered.
    let mut segment = 0;
    let mut segment_start = 0.0;
    for i in 1..count - 1 {
        let target = spacing * i as f64;
        while segment + 1 < points.len() - 1
            && segment_start + points[segment].distance(points[segment + 1]) < target
        {
            segment_start += points[segment].distance(points[segment + 1]);
            segment += 1;
        }
        let a = points[segment];
        let b = points[segment + 1];
        let seg_len = a.distance(b);
        let t = if seg_len > 0.0 {
            ((target - segment_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        result.push(a.lerp(b, t));
    }

    result.push(last);
    result
}

/// Translate the centroid to the origin and scale so the first and last
/// points have an RMS distance of 1 from it.
///
/// Only the endpoints feed the scale: a cheap stand-in for stroke size.
pub fn center_and_scale(points: &[Point]) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let center = centroid(points).to_vec2();
    let first = first.to_vec2() - center;
    let last = last.to_vec2() - center;
    let scale = ((first.hypot2() + last.hypot2()) / 2.0).sqrt();
    let inv = if scale > MIN_SCALE { 1.0 / scale } else { 1.0 };
    points
        .iter()
        .map(|&p| ((p.to_vec2() - center) * inv).to_point())
        .collect()
}

/// Split every segment longer than `max_length` into equal pieces no
/// longer than `max_length`, at most `MAX_PIECES` per segment.
pub fn subdivide(points: &[Point], max_length: f64) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if max_length <= 0.0 {
        return points.to_vec();
    }
    let mut result = vec![first];
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let pieces = ((a.distance(b) / max_length).ceil().max(1.0) as usize).min(MAX_PIECES);
        for k in 1..pieces {
            result.push(a.lerp(b, k as f64 / pieces as f64));
        }
        result.push(b);
    }
    result
}

//! Stroke matching: decides whether a user-drawn stroke is an
//! acceptable rendition of a canonical stroke.
//!
//! The decision is an ordered chain of gates over a shared context.
//! The first gate that fails rejects the stroke; later gates are not
//! evaluated, so their metrics stay `None` in the report.

use std::fmt;

use kurbo::Point;
use rayon::prelude::*;

use crate::config::MatchConfig;
use crate::geom::{dedup_consecutive, rotate};
use crate::metrics::{average_distance, frechet_distance, length, tangent_similarity};
use crate::normalize::normalize_curve;

/// One stage of the decision procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Fewer than two distinct user points, or no canonical points.
    Degenerate,
    /// User stroke much shorter than the canonical stroke.
    LengthRatio,
    /// Normalized shapes too far apart under every candidate rotation.
    ShapeFit,
    /// User stroke drawn away from the canonical stroke.
    AverageDistance,
    StartPoint,
    EndPoint,
    /// Stroke drawn in reverse or across the canonical direction.
    Direction,
}

impl Gate {
    /// Evaluation order.
    pub const ORDER: [Gate; 7] = [
        Gate::Degenerate,
        Gate::LengthRatio,
        Gate::ShapeFit,
        Gate::AverageDistance,
        Gate::StartPoint,
        Gate::EndPoint,
        Gate::Direction,
    ];

    /// Run this gate, recording its metric. `true` means pass.
    fn check(self, ctx: &mut MatchContext<'_>) -> bool {
        let config = ctx.config;
        let leniency = config.leniency;
        let metrics = &mut ctx.metrics;
        let user = &ctx.user;
        let canonical = ctx.canonical;

        match self {
            Gate::Degenerate => user.len() > 1 && !canonical.is_empty(),
            Gate::LengthRatio => {
                let eps = config.length_epsilon;
                let ratio = (length(user) + eps) / (length(canonical) + eps);
                metrics.length_ratio = Some(ratio);
                ratio * leniency >= config.min_length_ratio
            }
            Gate::ShapeFit => {
                let fit = shape_fit(user, canonical, config);
                metrics.shape_fit = Some(fit);
                fit <= config.shape_fit_threshold * leniency
            }
            Gate::AverageDistance => {
                let avg = average_distance(user, canonical);
                metrics.average_distance = Some(avg);
                avg < config.avg_distance_threshold * leniency
            }
            Gate::StartPoint => {
                let d = user[0].distance(canonical[0]);
                metrics.start_distance = Some(d);
                d <= config.endpoint_threshold * leniency
            }
            Gate::EndPoint => {
                let d = user[user.len() - 1].distance(canonical[canonical.len() - 1]);
                metrics.end_distance = Some(d);
                d <= config.endpoint_threshold * leniency
            }
            Gate::Direction => {
                let similarity = tangent_similarity(canonical, user);
                metrics.direction = Some(similarity);
                similarity > 0.0
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gate::Degenerate => "degenerate stroke",
            Gate::LengthRatio => "length ratio",
            Gate::ShapeFit => "shape fit",
            Gate::AverageDistance => "average distance",
            Gate::StartPoint => "start point",
            Gate::EndPoint => "end point",
            Gate::Direction => "direction",
        };
        f.write_str(name)
    }
}

/// Outcome of a match attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// Rejected by the named gate.
    Reject(Gate),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Metric values computed on the way to a verdict.
/// A gate that was never reached leaves its metric as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchMetrics {
    /// `(user + ε) / (canonical + ε)` length ratio.
    pub length_ratio: Option<f64>,
    /// Best discrete Fréchet distance over the candidate rotations.
    pub shape_fit: Option<f64>,
    pub average_distance: Option<f64>,
    pub start_distance: Option<f64>,
    pub end_distance: Option<f64>,
    /// Average best tangent cosine similarity.
    pub direction: Option<f64>,
}

/// Full result of `StrokeMatcher::evaluate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    pub verdict: Verdict,
    pub metrics: MatchMetrics,
    /// The stroke was rejected, but its reversal would have been
    /// accepted.
    pub backwards: bool,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        self.verdict.is_accept()
    }
}

/// Shared state threaded through the gates.
struct MatchContext<'a> {
    config: &'a MatchConfig,
    /// User stroke with consecutive duplicates removed.
    user: Vec<Point>,
    canonical: &'a [Point],
    metrics: MatchMetrics,
}

/// Runs the gate chain with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StrokeMatcher {
    config: MatchConfig,
}

impl StrokeMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Accept/reject only.
    pub fn matches(&self, user: &[Point], canonical: &[Point]) -> bool {
        self.run_gates(user, canonical).0.is_accept()
    }

    /// Verdict plus the metrics behind it.
    ///
    /// Both sequences must already be in the glyph's unit-square space.
    /// `canonical` may be several graphical strokes' medians
    /// concatenated into one logical stroke.
    pub fn evaluate(&self, user: &[Point], canonical: &[Point]) -> MatchReport {
        let (verdict, metrics) = self.run_gates(user, canonical);
        let backwards = !verdict.is_accept()
            && self.config.check_backwards
            && {
                let reversed: Vec<Point> = user.iter().rev().copied().collect();
                self.run_gates(&reversed, canonical).0.is_accept()
            };
        MatchReport {
            verdict,
            metrics,
            backwards,
        }
    }

    fn run_gates(&self, user: &[Point], canonical: &[Point]) -> (Verdict, MatchMetrics) {
        let mut ctx = MatchContext {
            config: &self.config,
            user: dedup_consecutive(user),
            canonical,
            metrics: MatchMetrics::default(),
        };
        for gate in Gate::ORDER {
            if !gate.check(&mut ctx) {
                tracing::debug!(%gate, metrics = ?ctx.metrics, "stroke rejected");
                return (Verdict::Reject(gate), ctx.metrics);
            }
        }
        (Verdict::Accept, ctx.metrics)
    }
}

/// Minimum Fréchet distance between the normalized user stroke and the
/// normalized canonical stroke, trying each configured rotation of the
/// canonical stroke.
pub fn shape_fit(user: &[Point], canonical: &[Point], config: &MatchConfig) -> f64 {
    let user_norm = normalize_curve(user, &config.normalize);
    let canonical_norm = normalize_curve(canonical, &config.normalize);
    let rotations: &[f64] = if config.rotations.is_empty() {
        &[0.0]
    } else {
        &config.rotations
    };
    rotations
        .par_iter()
        .map(|&angle| {
            let distance = frechet_distance(&user_norm, &rotate(&canonical_norm, angle));
            tracing::trace!(angle, distance, "shape fit candidate");
            distance
        })
        .reduce(|| f64::INFINITY, f64::min)
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn value(v: Option<f64>) -> String {
            v.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
        }
        let m = &self.metrics;
        writeln!(f, "  Length ratio  {}", value(m.length_ratio))?;
        writeln!(f, "  Shape fit     {}", value(m.shape_fit))?;
        writeln!(f, "  Avg distance  {}", value(m.average_distance))?;
        writeln!(f, "  Start         {}", value(m.start_distance))?;
        writeln!(f, "  End           {}", value(m.end_distance))?;
        writeln!(f, "  Direction     {}", value(m.direction))?;
        writeln!(f)?;
        match self.verdict {
            Verdict::Accept => writeln!(f, "  Verdict       \u{2713} match")?,
            Verdict::Reject(gate) => writeln!(f, "  Verdict       \u{2717} rejected ({})", gate)?,
        }
        if self.backwards {
            writeln!(f, "  Note          stroke appears to be drawn backwards")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A gently curving canonical stroke in the unit square.
    fn canonical() -> Vec<Point> {
        vec![
            Point::new(0.20, 0.30),
            Point::new(0.35, 0.33),
            Point::new(0.50, 0.38),
            Point::new(0.65, 0.45),
            Point::new(0.80, 0.55),
        ]
    }

    fn reversed(points: &[Point]) -> Vec<Point> {
        points.iter().rev().copied().collect()
    }

    #[test]
    fn identical_stroke_is_accepted() {
        let matcher = StrokeMatcher::default();
        let report = matcher.evaluate(&canonical(), &canonical());
        assert_eq!(report.verdict, Verdict::Accept);
        assert!(!report.backwards);
        assert!(report.metrics.shape_fit.unwrap() < 1e-9);
        assert!(report.metrics.direction.unwrap() > 0.9);
    }

    #[test]
    fn reversed_stroke_is_rejected_and_flagged_backwards() {
        let matcher = StrokeMatcher::default();
        let report = matcher.evaluate(&reversed(&canonical()), &canonical());
        assert!(!report.is_match());
        assert!(report.backwards);
    }

    #[test]
    fn reversed_straight_stroke_fails_direction_gate() {
        // On a straight line the other gates are symmetric enough that
        // only the direction check can catch the reversal.
        let line: Vec<Point> = (0..=10)
            .map(|i| Point::new(0.2 + 0.06 * i as f64, 0.5))
            .collect();
        let config = MatchConfig {
            rotations: vec![0.0],
            endpoint_threshold: 1.0,
            shape_fit_threshold: 10.0,
            ..MatchConfig::default()
        };
        let matcher = StrokeMatcher::new(config);
        let report = matcher.evaluate(&reversed(&line), &line);
        assert_eq!(report.verdict, Verdict::Reject(Gate::Direction));
        assert!(report.metrics.direction.unwrap() < 0.0);
    }

    #[test]
    fn half_length_stroke_fails_length_gate() {
        let canonical = vec![Point::new(0.0, 0.5), Point::new(1.0, 0.5)];
        let user = vec![Point::new(0.0, 0.5), Point::new(0.5, 0.5)];
        let report = StrokeMatcher::default().evaluate(&user, &canonical);
        assert_eq!(report.verdict, Verdict::Reject(Gate::LengthRatio));
        let ratio = report.metrics.length_ratio.unwrap();
        assert!((ratio - 0.524 / 1.024).abs() < 1e-12);
        assert_eq!(report.metrics.shape_fit, None);
    }

    #[test]
    fn leniency_loosens_length_gate() {
        let canonical = vec![Point::new(0.0, 0.5), Point::new(1.0, 0.5)];
        let user = vec![Point::new(0.0, 0.5), Point::new(0.5, 0.5)];
        let config = MatchConfig {
            leniency: 1.5,
            ..MatchConfig::default()
        };
        let report = StrokeMatcher::new(config).evaluate(&user, &canonical);
        assert_ne!(report.verdict, Verdict::Reject(Gate::LengthRatio));
    }

    #[test]
    fn single_point_and_repeated_points_are_degenerate() {
        let matcher = StrokeMatcher::default();
        let p = Point::new(0.5, 0.5);
        assert_eq!(
            matcher.evaluate(&[p], &canonical()).verdict,
            Verdict::Reject(Gate::Degenerate)
        );
        assert_eq!(
            matcher.evaluate(&[p, p, p], &canonical()).verdict,
            Verdict::Reject(Gate::Degenerate)
        );
        assert!(!matcher.matches(&[], &canonical()));
    }

    #[test]
    fn wrong_shape_fails_shape_gate() {
        // Same length, but a sharp hook instead of a gentle curve.
        let user = vec![
            Point::new(0.20, 0.30),
            Point::new(0.60, 0.30),
            Point::new(0.60, 0.70),
        ];
        let report = StrokeMatcher::default().evaluate(&user, &canonical());
        assert_eq!(report.verdict, Verdict::Reject(Gate::ShapeFit));
    }

    #[test]
    fn shifted_stroke_fails_average_distance_gate() {
        let user: Vec<Point> = canonical()
            .iter()
            .map(|p| Point::new(p.x, p.y + 0.3))
            .collect();
        let report = StrokeMatcher::default().evaluate(&user, &canonical());
        assert_eq!(report.verdict, Verdict::Reject(Gate::AverageDistance));
    }

    #[test]
    fn end_point_is_compared_to_end_point() {
        // Starts on the canonical stroke and ends well past its end.
        let canonical = vec![Point::new(0.2, 0.5), Point::new(0.6, 0.5)];
        let user = vec![Point::new(0.2, 0.5), Point::new(0.8, 0.5)];
        let config = MatchConfig {
            avg_distance_threshold: 1.0,
            ..MatchConfig::default()
        };
        let report = StrokeMatcher::new(config).evaluate(&user, &canonical);
        assert_eq!(report.verdict, Verdict::Reject(Gate::EndPoint));
        assert_eq!(report.metrics.start_distance, Some(0.0));
        assert!((report.metrics.end_distance.unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn late_start_fails_start_gate() {
        let canonical = vec![Point::new(0.2, 0.5), Point::new(0.8, 0.5)];
        let user = vec![Point::new(0.4, 0.5), Point::new(0.8, 0.5)];
        let config = MatchConfig {
            avg_distance_threshold: 1.0,
            ..MatchConfig::default()
        };
        let report = StrokeMatcher::new(config).evaluate(&user, &canonical);
        assert_eq!(report.verdict, Verdict::Reject(Gate::StartPoint));
    }

    #[test]
    fn verdict_is_deterministic() {
        let matcher = StrokeMatcher::default();
        let user: Vec<Point> = canonical()
            .iter()
            .map(|p| Point::new(p.x + 0.01, p.y - 0.02))
            .collect();
        let first = matcher.evaluate(&user, &canonical());
        for _ in 0..5 {
            assert_eq!(matcher.evaluate(&user, &canonical()), first);
        }
        assert!(first.is_match());
    }

    #[test]
    fn rotation_search_absorbs_slight_tilt() {
        let original = canonical();
        let center = crate::geom::centroid(&original).to_vec2();
        let centered: Vec<Point> = original.iter().map(|&p| p - center).collect();
        let tilted: Vec<Point> = rotate(&centered, 0.17)
            .into_iter()
            .map(|p| p + center)
            .collect();

        let config = MatchConfig::default();
        let searched = shape_fit(&tilted, &original, &config);
        let upright_only = shape_fit(
            &tilted,
            &original,
            &MatchConfig {
                rotations: vec![0.0],
                ..MatchConfig::default()
            },
        );
        assert!(searched <= config.shape_fit_threshold, "searched {searched}");
        assert!(
            searched < upright_only,
            "searched {searched} vs upright {upright_only}"
        );
    }

    #[test]
    fn scaled_and_translated_copy_has_zero_shape_fit() {
        let config = MatchConfig::default();
        let moved: Vec<Point> = canonical()
            .iter()
            .map(|p| Point::new(p.x * 0.5 + 0.1, p.y * 0.5 + 0.2))
            .collect();
        assert!(shape_fit(&moved, &canonical(), &config) < 1e-9);
    }
}

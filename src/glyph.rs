//! Glyph model: parsed stroke outlines plus median skeletons.
//!
//! A `RawGlyphRecord` is the decoded dataset entry (coordinates in font
//! units). `GlyphModel::build` validates it, remaps every coordinate into
//! the unit square and parses each outline string.

use kurbo::{BezPath, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

use crate::config::CoordinateConvention;
use crate::error::GlyphError;
use crate::matcher::{MatchReport, StrokeMatcher};
use crate::path::{self, PathCommand};

/// Em size assumed when a record does not declare its dimensions.
pub const DEFAULT_EM: f64 = 1024.0;

/// Baseline height used by the legacy inverted-axis datasets.
const LEGACY_BASELINE: f64 = 900.0;

/// One dataset entry, as decoded from JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGlyphRecord {
    pub character: String,
    /// One outline path string per graphical stroke.
    pub strokes: Vec<String>,
    /// One median polyline per graphical stroke, `[x, y]` pairs.
    pub medians: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub x_offset: Option<f64>,
    #[serde(default)]
    pub y_offset: Option<f64>,
    /// Logical stroke id of each graphical stroke.
    #[serde(default)]
    pub stroke_map: Option<Vec<usize>>,
}

/// One graphical stroke of a glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeRecord {
    pub id: usize,
    pub outline: Vec<PathCommand>,
    pub medians: Vec<Point>,
}

impl StrokeRecord {
    /// Outline as a kurbo path.
    pub fn to_bezpath(&self) -> BezPath {
        path::to_bezpath(&self.outline)
    }
}

/// A parsed, immutable glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphModel {
    character: String,
    strokes: Vec<StrokeRecord>,
    stroke_map: Vec<usize>,
}

impl GlyphModel {
    /// Validate and parse a raw record.
    ///
    /// Any malformed stroke fails the whole glyph; no partial model is
    /// returned.
    pub fn build(
        record: &RawGlyphRecord,
        convention: CoordinateConvention,
    ) -> Result<Self, GlyphError> {
        let stroke_count = record.strokes.len();
        if record.medians.len() != stroke_count {
            return Err(GlyphError::MediansMismatch {
                strokes: stroke_count,
                medians: record.medians.len(),
            });
        }

        let stroke_map = match &record.stroke_map {
            Some(map) if map.len() != stroke_count => {
                return Err(GlyphError::StrokeMapMismatch {
                    strokes: stroke_count,
                    map: map.len(),
                });
            }
            Some(map) => map.clone(),
            None => (0..stroke_count).collect(),
        };

        let transform = Remap::for_record(record, convention)?;

        let mut strokes = Vec::with_capacity(stroke_count);
        for (id, (outline, median)) in record.strokes.iter().zip(&record.medians).enumerate() {
            if median.len() < 2 {
                return Err(GlyphError::ShortMedian {
                    stroke: id,
                    points: median.len(),
                });
            }
            let outline = path::parse_path_with(outline, |p| transform.apply(p))
                .map_err(|source| GlyphError::Path { stroke: id, source })?;
            let medians = median
                .iter()
                .map(|&[x, y]| transform.apply(Point::new(x, y)))
                .collect();
            strokes.push(StrokeRecord {
                id,
                outline,
                medians,
            });
        }

        tracing::debug!(
            character = %record.character,
            strokes = stroke_count,
            logical = count_distinct(&stroke_map),
            "built glyph"
        );

        Ok(Self {
            character: record.character.clone(),
            strokes,
            stroke_map,
        })
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn strokes(&self) -> &[StrokeRecord] {
        &self.strokes
    }

    pub fn stroke_map(&self) -> &[usize] {
        &self.stroke_map
    }

    /// Number of distinct logical strokes.
    pub fn logical_stroke_count(&self) -> usize {
        count_distinct(&self.stroke_map)
    }

    /// Whether any graphical stroke maps to logical stroke `id`.
    /// Ids need not be contiguous.
    pub fn has_logical_stroke(&self, id: usize) -> bool {
        self.stroke_map.contains(&id)
    }

    /// Concatenated medians of every graphical stroke mapped to `id`,
    /// in graphical order. Empty when no stroke carries that id.
    pub fn logical_stroke_points(&self, id: usize) -> Vec<Point> {
        self.strokes
            .iter()
            .zip(&self.stroke_map)
            .filter(|(_, &logical)| logical == id)
            .flat_map(|(stroke, _)| stroke.medians.iter().copied())
            .collect()
    }

    /// Match a user-drawn stroke against logical stroke `id`.
    pub fn match_stroke(&self, matcher: &StrokeMatcher, id: usize, user: &[Point]) -> MatchReport {
        matcher.evaluate(user, &self.logical_stroke_points(id))
    }

    /// Union of every stroke outline's bounding box.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(|s| s.to_bezpath().bounding_box())
            .reduce(|a, b| a.union(b))
    }
}

fn count_distinct(ids: &[usize]) -> usize {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

/// Font units → unit square.
#[derive(Debug, Clone, Copy)]
struct Remap {
    convention: CoordinateConvention,
    size: f64,
    x_offset: f64,
    y_offset: f64,
}

impl Remap {
    fn for_record(
        record: &RawGlyphRecord,
        convention: CoordinateConvention,
    ) -> Result<Self, GlyphError> {
        // A single declared dimension applies to both axes; scaling is
        // always isotropic.
        let size = match (record.width, record.height) {
            (Some(width), Some(height)) if width != height => {
                return Err(GlyphError::UnequalDimensions { width, height });
            }
            (Some(size), _) | (None, Some(size)) => size,
            (None, None) => DEFAULT_EM,
        };
        if !size.is_finite() || size <= 0.0 {
            return Err(GlyphError::InvalidDimensions { size });
        }
        Ok(Self {
            convention,
            size,
            x_offset: record.x_offset.unwrap_or(0.0),
            y_offset: record.y_offset.unwrap_or(0.0),
        })
    }

    fn apply(&self, p: Point) -> Point {
        match self.convention {
            CoordinateConvention::Standard => Point::new(
                (p.x + self.x_offset) / self.size,
                (p.y + self.y_offset) / self.size,
            ),
            CoordinateConvention::LegacyInverted => Point::new(
                (p.x + self.x_offset) / DEFAULT_EM,
                (LEGACY_BASELINE - p.y - self.y_offset) / DEFAULT_EM,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;

    fn record() -> RawGlyphRecord {
        RawGlyphRecord {
            character: "二".to_string(),
            strokes: vec![
                "M 100 300 L 900 300 L 900 350 L 100 350 Z".to_string(),
                "M 50 700 L 950 700 L 950 760 L 50 760 Z".to_string(),
            ],
            medians: vec![
                vec![[100.0, 325.0], [900.0, 325.0]],
                vec![[50.0, 730.0], [950.0, 730.0]],
            ],
            ..Default::default()
        }
    }

    #[test]
    fn builds_with_default_em_and_identity_map() {
        let glyph = GlyphModel::build(&record(), CoordinateConvention::Standard).unwrap();
        assert_eq!(glyph.character(), "二");
        assert_eq!(glyph.stroke_map(), &[0, 1]);
        assert_eq!(glyph.strokes()[1].id, 1);
        assert_eq!(
            glyph.strokes()[0].medians[0],
            Point::new(100.0 / 1024.0, 325.0 / 1024.0)
        );
        assert_eq!(
            glyph.strokes()[0].outline[0],
            PathCommand::MoveTo(Point::new(100.0 / 1024.0, 300.0 / 1024.0))
        );
    }

    #[test]
    fn declared_size_and_offsets_are_applied() {
        let mut raw = record();
        raw.width = Some(2000.0);
        raw.height = Some(2000.0);
        raw.x_offset = Some(100.0);
        raw.y_offset = Some(-25.0);
        let glyph = GlyphModel::build(&raw, CoordinateConvention::Standard).unwrap();
        assert_eq!(glyph.strokes()[0].medians[0], Point::new(0.1, 0.15));
    }

    #[test]
    fn legacy_convention_flips_y() {
        let glyph = GlyphModel::build(&record(), CoordinateConvention::LegacyInverted).unwrap();
        assert_eq!(
            glyph.strokes()[0].medians[0],
            Point::new(100.0 / 1024.0, 575.0 / 1024.0)
        );
    }

    #[test]
    fn unequal_dimensions_are_rejected() {
        let mut raw = record();
        raw.width = Some(1024.0);
        raw.height = Some(900.0);
        assert_eq!(
            GlyphModel::build(&raw, CoordinateConvention::Standard),
            Err(GlyphError::UnequalDimensions {
                width: 1024.0,
                height: 900.0
            })
        );
    }

    #[test]
    fn zero_negative_and_infinite_sizes_are_rejected() {
        for size in [0.0, -1024.0, f64::INFINITY] {
            let mut raw = record();
            raw.width = Some(size);
            raw.height = Some(size);
            assert_eq!(
                GlyphModel::build(&raw, CoordinateConvention::Standard),
                Err(GlyphError::InvalidDimensions { size })
            );
        }

        let mut raw = record();
        raw.height = Some(f64::NAN);
        assert!(matches!(
            GlyphModel::build(&raw, CoordinateConvention::Standard),
            Err(GlyphError::InvalidDimensions { size }) if size.is_nan()
        ));
    }

    #[test]
    fn median_count_must_match_strokes() {
        let mut raw = record();
        raw.medians.pop();
        assert_eq!(
            GlyphModel::build(&raw, CoordinateConvention::Standard),
            Err(GlyphError::MediansMismatch {
                strokes: 2,
                medians: 1
            })
        );
    }

    #[test]
    fn stroke_map_length_must_match() {
        let mut raw = record();
        raw.stroke_map = Some(vec![0]);
        assert_eq!(
            GlyphModel::build(&raw, CoordinateConvention::Standard),
            Err(GlyphError::StrokeMapMismatch { strokes: 2, map: 1 })
        );
    }

    #[test]
    fn bad_outline_names_the_stroke() {
        let mut raw = record();
        raw.strokes[1] = "M 0 0 L 1 1 1".to_string();
        assert_eq!(
            GlyphModel::build(&raw, CoordinateConvention::Standard),
            Err(GlyphError::Path {
                stroke: 1,
                source: PathError::ArgumentCount {
                    command: 'L',
                    count: 3
                }
            })
        );
    }

    #[test]
    fn single_point_median_is_rejected() {
        let mut raw = record();
        raw.medians[0] = vec![[1.0, 1.0]];
        assert_eq!(
            GlyphModel::build(&raw, CoordinateConvention::Standard),
            Err(GlyphError::ShortMedian {
                stroke: 0,
                points: 1
            })
        );
    }

    #[test]
    fn grouped_strokes_concatenate_medians() {
        let mut raw = record();
        raw.stroke_map = Some(vec![0, 0]);
        let glyph = GlyphModel::build(&raw, CoordinateConvention::Standard).unwrap();
        assert_eq!(glyph.logical_stroke_count(), 1);
        let points = glyph.logical_stroke_points(0);
        assert_eq!(points.len(), 4);
        assert_eq!(points[2], glyph.strokes()[1].medians[0]);
        assert!(glyph.logical_stroke_points(1).is_empty());
    }

    #[test]
    fn logical_ids_may_have_gaps() {
        let mut raw = record();
        raw.stroke_map = Some(vec![0, 2]);
        let glyph = GlyphModel::build(&raw, CoordinateConvention::Standard).unwrap();
        assert_eq!(glyph.logical_stroke_count(), 2);
        assert!(glyph.has_logical_stroke(2));
        assert!(!glyph.has_logical_stroke(1));
        assert_eq!(glyph.logical_stroke_points(2), glyph.strokes()[1].medians);
    }

    #[test]
    fn deserializes_camel_case_record() {
        let json = r#"{
            "character": "一",
            "strokes": ["M 0 500 L 1024 500 L 1024 540 L 0 540 Z"],
            "medians": [[[0, 520], [1024, 520]]],
            "strokeMap": [0],
            "xOffset": 0
        }"#;
        let raw: RawGlyphRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.stroke_map, Some(vec![0]));
        let glyph = GlyphModel::build(&raw, CoordinateConvention::Standard).unwrap();
        let bbox = glyph.bounding_box().unwrap();
        assert!((bbox.width() - 1.0).abs() < 1e-12);
    }
}

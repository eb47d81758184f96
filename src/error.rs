use thiserror::Error;

/// Errors raised while parsing a single outline path string.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PathError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("command '{command}' cannot take {count} arguments")]
    ArgumentCount { command: char, count: usize },

    #[error("number found before any command")]
    NumberBeforeCommand,

    #[error("empty path")]
    Empty,

    #[error("path must start with a moveto")]
    MissingMoveTo,

    #[error("arc radii must be equal (rx={rx}, ry={ry})")]
    UnequalRadius { rx: f64, ry: f64 },

    #[error("arc rotation must be zero (got {0})")]
    ArcRotation(f64),

    #[error("no circle of radius {radius} passes through both arc endpoints")]
    NoArcCircle { radius: f64 },
}

impl PathError {
    /// True for geometry the parser understands but does not support
    /// (elliptical or rotated arcs, impossible radii), as opposed to
    /// malformed path text.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            PathError::UnequalRadius { .. } | PathError::ArcRotation(_) | PathError::NoArcCircle { .. }
        )
    }
}

/// Errors that can occur while building a glyph model from a raw record.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GlyphError {
    #[error("glyph has {strokes} strokes but {medians} median arrays")]
    MediansMismatch { strokes: usize, medians: usize },

    #[error("width {width} and height {height} differ; asymmetric scaling is not supported")]
    UnequalDimensions { width: f64, height: f64 },

    #[error("glyph size {size} must be positive and finite")]
    InvalidDimensions { size: f64 },

    #[error("stroke map has {map} entries for {strokes} strokes")]
    StrokeMapMismatch { strokes: usize, map: usize },

    #[error("median of stroke {stroke} has {points} points (need at least 2)")]
    ShortMedian { stroke: usize, points: usize },

    #[error("stroke {stroke}: {source}")]
    Path {
        stroke: usize,
        #[source]
        source: PathError,
    },
}

/// Threshold presets that would make matching meaningless or unbounded.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("sample count {0} is below 2")]
    SampleCount(usize),

    #[error("max segment length {value} must be finite and at least {min}")]
    SegmentLength { value: f64, min: f64 },

    #[error("{name} must be finite and non-negative (got {value})")]
    Threshold { name: &'static str, value: f64 },
}

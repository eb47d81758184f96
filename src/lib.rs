//! strokecheck: glyph stroke data → handwriting stroke verdicts.
//!
//! Parses glyph records (stroke outline paths plus median skeletons)
//! into an immutable model, and decides whether a freehand stroke is
//! close enough to one of the glyph's strokes to count as correct.
//!
//! # Example
//!
//! ```no_run
//! use strokecheck::{CoordinateConvention, GlyphModel, RawGlyphRecord, StrokeMatcher};
//! use strokecheck::kurbo::Point;
//!
//! let json = std::fs::read_to_string("glyph.json")?;
//! let record: RawGlyphRecord = serde_json::from_str(&json)?;
//! let glyph = GlyphModel::build(&record, CoordinateConvention::Standard)?;
//!
//! let user = vec![Point::new(0.1, 0.5), Point::new(0.9, 0.5)];
//! let report = glyph.match_stroke(&StrokeMatcher::default(), 0, &user);
//! println!("{}", report.is_match());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod geom;
mod glyph;

pub mod error;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod path;

// Re-export kurbo so callers build points with the same version.
pub use kurbo;

pub use config::{CoordinateConvention, MatchConfig, NormalizeConfig};
pub use error::{ConfigError, GlyphError, PathError};
pub use glyph::{GlyphModel, RawGlyphRecord, StrokeRecord, DEFAULT_EM};
pub use matcher::{Gate, MatchMetrics, MatchReport, StrokeMatcher, Verdict};
pub use path::{parse_num_sequence, parse_path, serialize_outline, PathCommand};

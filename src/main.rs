use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use strokecheck::kurbo::Point;
use strokecheck::{
    parse_num_sequence, serialize_outline, CoordinateConvention, GlyphModel, MatchConfig,
    RawGlyphRecord, StrokeMatcher,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strokecheck", about = "Glyph stroke parsing and handwriting stroke matching")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical outline of every stroke
    Outline(GlyphArgs),

    /// Check a drawn stroke against one logical stroke of the glyph
    Check {
        #[command(flatten)]
        glyph: GlyphArgs,

        /// Logical stroke id to match against
        #[arg(short, long)]
        stroke: usize,

        /// Drawn points in unit-square coordinates, e.g. "0.1,0.5 0.9,0.5"
        #[arg(short, long, allow_hyphen_values = true)]
        points: String,

        /// JSON file with threshold overrides
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct GlyphArgs {
    /// Glyph record (JSON)
    input: PathBuf,

    /// Use the legacy inverted-Y coordinate convention
    #[arg(long)]
    legacy: bool,
}

impl GlyphArgs {
    fn load(&self) -> anyhow::Result<GlyphModel> {
        let text = fs::read_to_string(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))?;
        let record: RawGlyphRecord = serde_json::from_str(&text)
            .with_context(|| format!("decoding {}", self.input.display()))?;
        let convention = if self.legacy {
            CoordinateConvention::LegacyInverted
        } else {
            CoordinateConvention::Standard
        };
        Ok(GlyphModel::build(&record, convention)?)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Outline(args) => outline(&args),
        Command::Check {
            glyph,
            stroke,
            points,
            config,
        } => check(&glyph, stroke, &points, config.as_deref()),
    }
}

fn outline(args: &GlyphArgs) -> anyhow::Result<()> {
    let glyph = args.load()?;
    eprintln!();
    eprintln!("  strokecheck \u{00b7} {}", glyph.character());
    eprintln!();
    for (stroke, logical) in glyph.strokes().iter().zip(glyph.stroke_map()) {
        println!("{}\t{}\t{}", stroke.id, logical, serialize_outline(&stroke.outline));
    }
    Ok(())
}

fn check(args: &GlyphArgs, stroke: usize, points: &str, config: Option<&Path>) -> anyhow::Result<()> {
    let glyph = args.load()?;
    if !glyph.has_logical_stroke(stroke) {
        bail!(
            "glyph has no logical stroke {} (stroke map {:?})",
            stroke,
            glyph.stroke_map()
        );
    }

    let config = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<MatchConfig>(&text)
                .with_context(|| format!("decoding {}", path.display()))?
                .validated()
                .with_context(|| format!("checking {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    let numbers = parse_num_sequence(points).context("parsing --points")?;
    if numbers.len() % 2 != 0 {
        bail!("--points needs x,y pairs (got {} numbers)", numbers.len());
    }
    let user: Vec<Point> = numbers
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect();

    let matcher = StrokeMatcher::new(config);
    let report = glyph.match_stroke(&matcher, stroke, &user);

    eprintln!();
    eprintln!(
        "  strokecheck \u{00b7} {} stroke {} ({} points drawn)",
        glyph.character(),
        stroke,
        user.len()
    );
    eprintln!();
    eprint!("{}", report);
    eprintln!();

    if !report.is_match() {
        std::process::exit(1);
    }
    Ok(())
}

//! Trackaug: synthetic training examples for single-object trackers.
//!
//! A regression tracker learns to find an object in the current frame given
//! a crop of it from the previous frame. Trackaug turns one annotated frame
//! pair into many such examples by randomly perturbing the crop window and
//! re-expressing the ground truth in each crop's coordinate frame.
//!
//! # Modules
//!
//! - [`bbox`]: Bounding boxes, frame transforms and the crop-window sampler
//! - [`cyclic`]: Wrap-around scalars encoded as `(sin, cos)` pairs
//! - [`generator`]: Per-frame-pair training-example generation
//! - [`image`]: Image-size and crop/pad collaborators
//! - [`sampling`]: Random draws used by the sampler
//! - [`validation`]: Request validation and error reporting
//! - [`stats`]: Summaries of generated targets
//! - [`config`]: File-based run configuration
//! - [`error`]: Error types for trackaug operations

pub mod bbox;
pub mod config;
pub mod cyclic;
pub mod error;
pub mod generator;
pub mod image;
pub mod sampling;
pub mod stats;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, RngExt, SeedableRng};
use serde::Serialize;
use tracing::{info, warn, Level};

pub use bbox::{BBParams, BoundingBox, Region, ShiftMode, VectorLayout};
pub use config::AugmentConfig;
pub use cyclic::CyclicEncodable;
pub use error::TrackaugError;
pub use generator::{ExampleGenerator, TrainingExample};
pub use image::{Crop, CropPad, CropWindow, Frame, GeometryCropper, ImageSize};
pub use sampling::Sampler;

/// The trackaug CLI application.
#[derive(Parser)]
#[command(name = "trackaug")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate randomized training examples for a frame pair.
    Augment(AugmentArgs),
    /// Build the non-randomized example for a frame pair.
    TrueExample(PairArgs),
    /// Encode a cyclic value as (sin, cos) or decode one back.
    Cyclic(CyclicArgs),
}

/// Frame pair inputs shared by the generating subcommands.
#[derive(clap::Args)]
struct PairArgs {
    /// Current frame size, e.g. 640x480.
    #[arg(long)]
    frame: Frame,

    /// Previous frame size (defaults to --frame).
    #[arg(long)]
    prev_frame: Option<Frame>,

    /// Previous ground-truth box: x1,y1,x2,y2[,rot_speed].
    #[arg(long, value_parser = parse_box, allow_hyphen_values = true)]
    prev_box: BoundingBox,

    /// Current ground-truth box: x1,y1,x2,y2[,rot_speed].
    #[arg(long, value_parser = parse_box, allow_hyphen_values = true)]
    curr_box: BoundingBox,

    /// YAML or JSON config file with sampling parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Layout of the emitted target vectors.
    #[arg(long, value_enum)]
    layout: Option<VectorLayout>,

    /// Treat validation warnings as errors.
    #[arg(long)]
    strict: bool,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the augment subcommand.
#[derive(clap::Args)]
struct AugmentArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// Number of examples to generate.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Sampling distribution for the crop perturbation.
    #[arg(long, value_enum)]
    mode: Option<ShiftMode>,
}

/// Arguments for the cyclic subcommand.
#[derive(clap::Args)]
struct CyclicArgs {
    /// Lower end of the range (inclusive).
    #[arg(long, allow_negative_numbers = true)]
    min: f64,

    /// Upper end of the range (wraps to --min).
    #[arg(long, allow_negative_numbers = true)]
    max: f64,

    /// Value to encode.
    #[arg(
        long,
        allow_negative_numbers = true,
        conflicts_with = "decode",
        required_unless_present = "decode"
    )]
    value: Option<f64>,

    /// Encoded pair to decode: sin,cos.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    decode: Option<Vec<f32>>,
}

/// Run the trackaug CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), TrackaugError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Augment(args)) => run_augment(args),
        Some(Commands::TrueExample(args)) => run_true_example(args),
        Some(Commands::Cyclic(args)) => run_cyclic(args),
        None => {
            println!("trackaug {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Synthetic training examples for single-object trackers.");
            println!();
            println!("Run 'trackaug --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs a stderr subscriber. Verbosity 0 logs warnings only.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parses `x1,y1,x2,y2` or `x1,y1,x2,y2,rot_speed`.
fn parse_box(s: &str) -> Result<BoundingBox, TrackaugError> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TrackaugError::InvalidArgument(format!("box '{}': {}", s, e)))?;

    match values.as_slice() {
        &[x1, y1, x2, y2] => Ok(BoundingBox::from_xyxy(x1, y1, x2, y2)),
        &[x1, y1, x2, y2, rot] => Ok(BoundingBox::new(x1, y1, x2, y2, rot)),
        _ => Err(TrackaugError::InvalidArgument(format!(
            "box '{}' must have 4 or 5 comma-separated values",
            s
        ))),
    }
}

/// Settings resolved from the config file and command-line overrides.
struct Resolved {
    config: AugmentConfig,
    prev_frame: Frame,
    curr_frame: Frame,
}

fn resolve(pair: &PairArgs) -> Result<Resolved, TrackaugError> {
    let mut config = match &pair.config {
        Some(path) => AugmentConfig::from_path(path)?,
        None => AugmentConfig::default(),
    };
    if let Some(layout) = pair.layout {
        config.layout = layout;
    }

    Ok(Resolved {
        config,
        prev_frame: pair.prev_frame.unwrap_or(pair.frame),
        curr_frame: pair.frame,
    })
}

/// A failed validation as emitted with `--output json`.
#[derive(Serialize)]
struct ReportOutput<'a> {
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

/// Validates the request, failing on errors (and on warnings when strict).
fn check_request(pair: &PairArgs, resolved: &Resolved) -> Result<(), TrackaugError> {
    let request = validation::AugmentRequest {
        prev_image: &resolved.prev_frame,
        curr_image: &resolved.curr_frame,
        prev_box: &pair.prev_box,
        curr_box: &pair.curr_box,
        params: &resolved.config.params,
    };
    let opts = validation::ValidateOptions {
        strict: pair.strict,
    };
    let report = validation::validate_request(&request, &opts);

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        match pair.output.as_str() {
            "json" => {
                let output = ReportOutput {
                    error_count: report.error_count(),
                    warning_count: report.warning_count(),
                    issues: &report.issues,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => eprint!("{}", report),
        }
        return Err(TrackaugError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        });
    }

    for issue in &report.issues {
        warn!("{}", issue);
    }
    Ok(())
}

/// One generated example as emitted by the CLI.
#[derive(Serialize)]
struct ExampleRecord {
    search_region: Frame,
    target: Frame,
    window: CropWindow,
    target_vector: Vec<f32>,
}

impl ExampleRecord {
    fn new(example: &TrainingExample<Frame>, layout: VectorLayout) -> Self {
        Self {
            search_region: example.search_region,
            target: example.target,
            window: example.window,
            target_vector: example.bbox_gt_scaled.to_vector(layout),
        }
    }
}

impl std::fmt::Display for ExampleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vector = self
            .target_vector
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "search {} at ({:.1}, {:.1}), target {}, vector [{}]",
            self.search_region,
            self.window.location.x1,
            self.window.location.y1,
            self.target,
            vector
        )
    }
}

#[derive(Serialize)]
struct AugmentOutput {
    seed: u64,
    mode: ShiftMode,
    layout: VectorLayout,
    examples: Vec<ExampleRecord>,
    stats: stats::AugmentationStats,
}

/// Execute the augment subcommand.
fn run_augment(args: AugmentArgs) -> Result<(), TrackaugError> {
    let mut resolved = resolve(&args.pair)?;
    if let Some(mode) = args.mode {
        resolved.config.mode = mode;
    }
    if let Some(seed) = args.seed {
        resolved.config.seed = Some(seed);
    }
    check_request(&args.pair, &resolved)?;

    let config = resolved.config;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random::<u64>());
    info!(seed, count = args.count, mode = ?config.mode, "augmenting frame pair");

    let mut generator =
        ExampleGenerator::new(GeometryCropper, config.params)?.with_mode(config.mode);
    generator.reset(
        &args.pair.prev_box,
        &args.pair.curr_box,
        &resolved.prev_frame,
        &resolved.curr_frame,
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let examples = generator.make_training_examples(args.count, &mut rng)?;

    let stats = stats::stats_targets(
        examples.iter().map(|e| &e.bbox_gt_scaled),
        &stats::StatsOptions::default(),
    );
    let records: Vec<ExampleRecord> = examples
        .iter()
        .map(|e| ExampleRecord::new(e, config.layout))
        .collect();

    match args.pair.output.as_str() {
        "json" => {
            let output = AugmentOutput {
                seed,
                mode: config.mode,
                layout: config.layout,
                examples: records,
                stats,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("seed: {}", seed);
            for (i, record) in records.iter().enumerate() {
                println!("#{:<4} {}", i, record);
            }
            println!();
            print!("{}", stats);
        }
    }

    Ok(())
}

/// Execute the true-example subcommand.
fn run_true_example(args: PairArgs) -> Result<(), TrackaugError> {
    let resolved = resolve(&args)?;
    check_request(&args, &resolved)?;

    let mut generator = ExampleGenerator::new(GeometryCropper, resolved.config.params)?;
    generator.reset(
        &args.prev_box,
        &args.curr_box,
        &resolved.prev_frame,
        &resolved.curr_frame,
    );
    let record = ExampleRecord::new(&generator.make_true_example()?, resolved.config.layout);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&record)?),
        _ => println!("{}", record),
    }

    Ok(())
}

/// Execute the cyclic subcommand.
fn run_cyclic(args: CyclicArgs) -> Result<(), TrackaugError> {
    let mut cyclic = CyclicEncodable::new(args.min, args.min, args.max)?;

    match (args.value, args.decode) {
        (Some(value), _) => {
            cyclic.set_value(value)?;
            let mut features = [0.0f32; 2];
            cyclic.encode_vector(&mut features, 0)?;
            println!("{},{}", features[0], features[1]);
        }
        (None, Some(features)) => {
            if features.len() != 2 {
                return Err(TrackaugError::InvalidArgument(format!(
                    "--decode takes exactly 2 values (sin,cos), got {}",
                    features.len()
                )));
            }
            cyclic.decode_vector(&features, 0)?;
            println!("{}", cyclic.value());
        }
        (None, None) => {
            return Err(TrackaugError::InvalidArgument(
                "one of --value or --decode is required".to_string(),
            ))
        }
    }

    Ok(())
}

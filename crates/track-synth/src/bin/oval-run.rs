//! Standalone activity generator.
//!
//! Run with:
//! ```
//! cargo run -p track-synth --bin oval-run -- generate --start 2023-03-08T12:15:04 --laps 5 --lap-seconds 200
//! cargo run -p track-synth --bin oval-run -- inspect run_20230308_121504.tcx
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use rand::{SeedableRng, rngs::StdRng};
use track_synth::prelude::*;
use track_synth::reader::parse_timestamp;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Synthetic oval-track running activities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one TCX activity
    Generate(GenerateArgs),
    /// Summarize an existing TCX file as JSON
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Start time, e.g. 2023-03-08T12:15:04
    #[arg(long)]
    start: String,

    /// Exact lap count (random between 5 and 6 when omitted)
    #[arg(long)]
    laps: Option<f64>,

    /// Seconds per lap (random between 120 and 200 when omitted)
    #[arg(long)]
    lap_seconds: Option<u32>,

    /// Heart rate curve: cosine or linear
    #[arg(long, default_value = "cosine")]
    heart_rate: HeartRatePolicy,

    /// Timestamp convention: naive or utc
    #[arg(long, default_value = "naive")]
    timestamps: TimestampStyle,

    /// Sample points per lap
    #[arg(long, default_value_t = 100)]
    points_per_lap: u32,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output path (defaults to run_<YYYYMMDD_HHMMSS>.tcx)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// TCX file to read
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Generate(args) => generate(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let start = parse_timestamp(&args.start)
        .with_context(|| format!("invalid --start '{}'", args.start))?;

    let mut generator = TrajectoryGenerator::new(GeneratorConfig::default())
        .with_heart_rate(args.heart_rate)
        .with_timestamps(args.timestamps)
        .with_points_per_lap(args.points_per_lap);
    if let Some(laps) = args.laps {
        generator = generator.with_laps(LapCount::Fixed(laps));
    }
    if let Some(seconds) = args.lap_seconds {
        generator = generator.with_pace(LapPace::fixed(seconds));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let activity = generator.generate(start, &mut rng)?;
    let document = write_tcx(&activity, args.timestamps);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(file_name_for(start)));

    fs::write(&output, document)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        path = %output.display(),
        laps = activity.plan.laps,
        distance_m = activity.plan.total_distance_m,
        seconds = activity.plan.total_seconds,
        points = activity.points.len(),
        "Activity written"
    );

    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let activity = parse_tcx(&bytes)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    println!("{}", serde_json::to_string_pretty(&activity.summary())?);

    Ok(())
}

//! volscreen CLI — screen 4D scans for outlier volumes.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::Ix4;
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use sha1::{Digest, Sha1};

use volscreen::{
    sliding_dispersion, CentroidExtractor, FeatureExtractor, Scan, ScreenConfig, ScreenResult,
    Screener, SliceAxis,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "volscreen")]
#[command(about = "Flag motion- and artifact-corrupted volumes in 4D scans")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a scan, or every .nii scan in a directory, for outlier volumes.
    Screen(ScreenArgs),

    /// Print the centroid dispersion series of a scan for external plotting.
    Dispersion(DispersionArgs),

    /// Check data files against a data_hashes.txt manifest.
    Validate {
        /// Directory containing data files and data_hashes.txt.
        #[arg(long)]
        dir: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct ScreenArgs {
    /// Path to a .nii file or a directory of .nii files.
    #[arg(long)]
    input: PathBuf,

    /// Path to write screening results (JSON, keyed by file name).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Half-width of the dispersion window, in volumes.
    #[arg(long, default_value = "1")]
    window: usize,

    /// Tukey fence multiplier for both detector paths.
    #[arg(long, default_value = "1.5")]
    fence: f64,

    /// Slicing axis for the template path.
    #[arg(long, value_enum, default_value_t = AxisArg::Z)]
    axis: AxisArg,

    /// Fraction of flagged slices above which a volume is an outlier.
    #[arg(long, default_value = "0.25")]
    slice_fraction: f64,
}

#[derive(Debug, Clone, Args)]
struct DispersionArgs {
    /// Path to a .nii file.
    #[arg(long)]
    input: PathBuf,

    /// Half-width of the dispersion window, in volumes.
    #[arg(long, default_value = "1")]
    window: usize,

    /// Path to write the series (JSON); printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for SliceAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => SliceAxis::X,
            AxisArg::Y => SliceAxis::Y,
            AxisArg::Z => SliceAxis::Z,
        }
    }
}

fn load_scan(path: &Path) -> CliResult<Scan> {
    let obj = ReaderOptions::new().read_file(path)?;
    let data = obj.into_volume().into_ndarray::<f64>()?;
    let data = data.into_dimensionality::<Ix4>()?;
    Ok(Scan::new(data))
}

fn nii_files(input: &Path) -> CliResult<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "nii"))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(format!("no .nii files in {}", input.display()).into());
    }
    Ok(files)
}

fn run_screen(args: &ScreenArgs) -> CliResult<()> {
    let config = ScreenConfig {
        window_halfwidth: args.window,
        fence_multiplier: args.fence,
        slicing_axis: args.axis.into(),
        slice_outlier_fraction: args.slice_fraction,
    };
    let screener = Screener::with_config(config);

    let mut results: BTreeMap<String, ScreenResult> = BTreeMap::new();
    for path in nii_files(&args.input)? {
        tracing::info!("screening {}", path.display());
        let scan = load_scan(&path)?;
        let result = screener.screen(&scan)?;
        println!("{} outlier volumes: {:?}", path.display(), result.flagged_volumes);
        if !result.is_complete() {
            println!("  (incomplete: zero-mass volumes {:?})", result.degenerate_volumes);
        }
        results.insert(path.display().to_string(), result);
    }

    if let Some(out) = &args.out {
        std::fs::write(out, serde_json::to_string_pretty(&results)?)?;
        tracing::info!("wrote {} results to {}", results.len(), out.display());
    }
    Ok(())
}

fn run_dispersion(args: &DispersionArgs) -> CliResult<()> {
    let scan = load_scan(&args.input)?;
    let features = CentroidExtractor.extract(&scan)?;
    let series = sliding_dispersion(features.values.view(), args.window)?;
    let json = serde_json::to_string_pretty(&series)?;
    match &args.out {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok(())
}

fn run_validate(dir: &Path) -> CliResult<()> {
    let manifest = dir.join("data_hashes.txt");
    let listing = std::fs::read_to_string(&manifest)?;
    let mut checked = 0usize;
    for line in listing.lines() {
        let mut parts = line.split_whitespace();
        let (Some(expected), Some(name)) = (parts.next(), parts.next()) else {
            continue;
        };
        let bytes = std::fs::read(dir.join(name))?;
        let digest = hex::encode(Sha1::digest(&bytes));
        if digest != expected {
            return Err(format!("hash mismatch in file: {}", name).into());
        }
        checked += 1;
    }
    println!("{} files validated.", checked);
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Screen(args) => run_screen(args),
        Commands::Dispersion(args) => run_dispersion(args),
        Commands::Validate { dir } => run_validate(dir),
    }
}

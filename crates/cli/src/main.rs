//! fieldsurf CLI - spatial analysis of geotagged field samples

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fieldsurf_algorithms::run_analysis_with_progress;
use fieldsurf_core::{
    demo_dataset, AnalysisConfig, AnalysisResult, ClassMethod, Dataset, ExtentMode, HullTest,
    Progress, RpeMethod, SamplePoint, Stage,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "fieldsurf")]
#[command(author, version, about = "Spatial analysis of geotagged field samples", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a dataset file
    Info {
        /// Input dataset (JSON)
        input: PathBuf,
    },
    /// Run the analysis on a dataset file
    Run {
        /// Input dataset (JSON)
        input: PathBuf,
        /// Target variable to interpolate
        #[arg(short, long)]
        target: Option<String>,
        /// Predictor variable (repeatable)
        #[arg(short, long = "predictor")]
        predictors: Vec<String>,
        #[command(flatten)]
        options: AnalysisOptions,
    },
    /// Run the analysis on the bundled demo dataset
    Demo {
        /// Select rainfall, soil pH and elevation as predictors
        #[arg(long)]
        predictors: bool,
        #[command(flatten)]
        options: AnalysisOptions,
    },
}

/// Flags shared by `run` and `demo`. Each one overrides the loaded or
/// default configuration only when given.
#[derive(clap::Args)]
struct AnalysisOptions {
    /// Full configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// IDW power
    #[arg(long)]
    power: Option<f64>,
    /// Requested cell size in meters
    #[arg(long)]
    cell_size: Option<f64>,
    /// Cross-validation folds
    #[arg(long)]
    folds: Option<usize>,
    /// Number of classes
    #[arg(long)]
    classes: Option<usize>,
    /// Class breaks: equal, quantile, jenks
    #[arg(long)]
    method: Option<ClassMethod>,
    /// Extent mode: auto, manual, upload
    #[arg(long)]
    extent: Option<ExtentMode>,
    /// Skip the classified layer
    #[arg(long)]
    no_classify: bool,
    /// Use exact hull containment for the reliable extent
    #[arg(long)]
    exact_hull: bool,
    /// Reliable extent rule: combined, distance, kernel-density
    #[arg(long, value_parser = parse_rpe_method)]
    rpe: Option<RpeMethod>,
    /// Output file for the result (JSON); stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl AnalysisOptions {
    fn to_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => read_json::<AnalysisConfig>(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(power) = self.power {
            config.idw_power = power;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size_meters = cell_size;
        }
        if let Some(folds) = self.folds {
            config.cv_folds = folds;
        }
        if let Some(classes) = self.classes {
            config.num_classes = classes;
        }
        if let Some(method) = self.method {
            config.class_method = method;
        }
        if let Some(extent) = self.extent {
            config.extent_mode = extent;
        }
        if self.no_classify {
            config.classify = false;
        }
        if self.exact_hull {
            config.rpe.hull_test = HullTest::Polygon;
        }
        if let Some(method) = self.rpe {
            config.rpe.method = method;
        }
        Ok(config)
    }
}

/// A dataset file holds either a full [`Dataset`] or a bare list of samples
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Dataset(Dataset),
    Points(Vec<SamplePoint>),
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{pos:>3}%] {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn parse_rpe_method(s: &str) -> Result<RpeMethod> {
    match s.to_lowercase().as_str() {
        "combined" => Ok(RpeMethod::Combined),
        "distance" => Ok(RpeMethod::Distance),
        "kernel-density" | "density" | "kde" => Ok(RpeMethod::KernelDensity),
        _ => anyhow::bail!("Unknown RPE method: {}. Use combined, distance, or kernel-density.", s),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_dataset(path: &Path, target: Option<String>, predictors: Vec<String>) -> Result<Dataset> {
    let mut dataset = match read_json::<DatasetFile>(path)? {
        DatasetFile::Dataset(ds) => ds,
        DatasetFile::Points(points) => {
            let Some(target) = target.clone() else {
                anyhow::bail!("{} holds bare samples; pass --target", path.display());
            };
            Dataset::new(points, target)
        }
    };
    if let Some(target) = target {
        dataset.target_variable = target;
    }
    if !predictors.is_empty() {
        dataset = dataset.with_predictors(predictors);
    }
    Ok(dataset)
}

fn write_result(result: &AnalysisResult, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, result).context("Failed to write result")?;
            writer.flush()?;
            println!("Result saved to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, result).context("Failed to write result")?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn print_summary(result: &AnalysisResult, elapsed: std::time::Duration) {
    let m = &result.metrics;
    eprintln!(
        "{} analysis of '{}': {} cells ({:.2} .. {:.2}), {} reliable",
        result.analysis_type,
        result.target_variable,
        result.continuous.len(),
        result.continuous.min_val,
        result.continuous.max_val,
        result.rpe.len()
    );
    eprintln!("  RMSE: {:.4}", m.rmse);
    eprintln!("  MAE:  {:.4}", m.mae);
    eprintln!("  R²:   {:.4}", m.r2);
    eprintln!("  Bias: {:.4}", m.bias);
    eprintln!("  Held-out points: {}", m.n);
    eprintln!("  Processing time: {:.2?}", elapsed);
}

/// Drives the spinner from pipeline stage notifications
struct SpinnerProgress(ProgressBar);

impl Progress for SpinnerProgress {
    fn stage(&self, stage: Stage) {
        self.0.set_position(stage.percent() as u64);
        self.0.set_message(stage.label());
    }
}

fn analyse(dataset: &Dataset, options: &AnalysisOptions) -> Result<()> {
    let config = options.to_config()?;
    info!(
        "Target '{}', {} predictor(s), {} points",
        dataset.target_variable,
        dataset.predictor_variables.len(),
        dataset.len()
    );

    let progress = SpinnerProgress(spinner("Starting analysis...")?);
    let start = Instant::now();
    let result = run_analysis_with_progress(dataset, &config, &progress);
    progress.0.finish_and_clear();
    let result = result.context("Analysis failed")?;
    let elapsed = start.elapsed();

    write_result(&result, options.output.as_deref())?;
    print_summary(&result, elapsed);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let dataset = read_dataset(&input, None, Vec::new()).or_else(|_| {
                // Bare samples carry no target; summarize them anyway
                read_json::<Vec<SamplePoint>>(&input).map(|points| Dataset::new(points, ""))
            })?;
            let summary = dataset.summary();

            println!("File: {}", input.display());
            println!("Points: {}", summary.points);
            if !dataset.target_variable.is_empty() {
                println!("Target: {}", dataset.target_variable);
                println!("Analysis type: {}", dataset.analysis_type());
            }
            println!("\nVariables:");
            for name in &summary.variables {
                let kind = if summary.numeric_variables.contains(name) {
                    "numeric"
                } else {
                    "text"
                };
                println!("  {} ({})", name, kind);
            }
        }

        Commands::Run {
            input,
            target,
            predictors,
            options,
        } => {
            let dataset = read_dataset(&input, target, predictors)?;
            analyse(&dataset, &options)?;
        }

        Commands::Demo {
            predictors,
            options,
        } => {
            let mut dataset = demo_dataset();
            if predictors {
                dataset = dataset.with_predictors(["rainfall_mm", "soil_ph", "elevation_m"]);
            }
            analyse(&dataset, &options)?;
        }
    }

    Ok(())
}

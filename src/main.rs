//! skylog - drone-control telemetry log analyzer
//!
//! # Usage
//!
//! ```bash
//! # Reconcile the attitude series of one recording day (logs/2025_09_17.log)
//! skylog attitude 17
//!
//! # Chain the position deltas of a velocity-change log
//! skylog position --log logs/drone_headset_velocity_changes_2025_10_02_16_00.log
//!
//! # Reconstruct a GPS track and dump it as JSON, without charts
//! skylog gps 37427597_2025_08_06_15_51_43.csv --json track.json --no-plot
//!
//! # Compare questionnaire groups found in ./survey
//! skylog stats --dir survey
//! ```
//!
//! # Environment Variables
//!
//! - `SKYLOG_CONFIG`: Path to a TOML config file (default: ./skylog.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use skylog::config::{self, AnalysisConfig};
use skylog::gps::read_gps_csv;
use skylog::plotting::{
    plot_attitude_series, plot_gps_track, plot_group_boxplot, plot_position_track, ChartSize,
};
use skylog::stats::GroupDataset;
use skylog::types::position_track;
use skylog::{
    compare_all, extract_attitude_series, extract_position_deltas, reconstruct_track, summarize,
    tracking_error, Thresholds,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "skylog")]
#[command(about = "Drone-control telemetry log analyzer")]
#[command(version)]
struct CliArgs {
    /// Config file; overrides SKYLOG_CONFIG and ./skylog.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for SVG charts (default: plot.out_dir from the config)
    #[arg(long, global = true, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Also write the results as pretty-printed JSON
    #[arg(long, global = true, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long, global = true)]
    no_plot: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Reconcile drone/target/headset/expected attitude series for one day
    Attitude {
        /// Day identifier appended to the attitude log prefix, e.g. "17"
        day: String,
    },

    /// Chain position deltas from a velocity-change log into a track
    Position {
        /// Log file (default: logs.position_log from the config)
        #[arg(long, value_name = "PATH")]
        log: Option<PathBuf>,
    },

    /// Reconstruct a planar track from a GPS tracking CSV export
    Gps {
        /// GPS CSV file
        csv: PathBuf,
    },

    /// Compare questionnaire groups dimension by dimension
    Stats {
        /// Directory holding the group CSV files
        #[arg(long, default_value = ".", value_name = "DIR")]
        dir: PathBuf,
    },
}

/// Where results go, resolved once from flags and config.
struct Output {
    json: Option<PathBuf>,
    plot_dir: Option<PathBuf>,
    size: ChartSize,
}

impl Output {
    fn chart(&self, name: &str) -> Option<PathBuf> {
        self.plot_dir.as_ref().map(|dir| dir.join(name))
    }

    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let Some(path) = &self.json else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(value).context("serializing results")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing JSON results to {}", path.display()))?;
        info!(path = %path.display(), "JSON results written");
        Ok(())
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_attitude(day: &str, out: &Output) -> Result<()> {
    let path = config::get().logs.attitude_log(day);
    info!(day, path = %path.display(), "Reconciling attitude series");

    let run = extract_attitude_series(&path)
        .with_context(|| format!("extracting attitude series from {}", path.display()))?;
    info!("{}", run.report);

    let summaries = summarize(&run.series);
    for s in &summaries {
        info!(
            kind = %s.kind,
            count = s.count,
            min = ?s.min,
            max = ?s.max,
            mean_abs = ?s.mean_magnitude.map(|m| (m * 100.0).round() / 100.0),
            "Series summary"
        );
    }
    let errors = tracking_error(&run.series);

    out.write_json(&json!({
        "log": path,
        "series": run.series,
        "summary": summaries,
        "tracking_error": errors,
        "discarded": run.discarded,
        "report": run.report,
    }))?;

    if let Some(chart) = out.chart(&format!("attitude_{day}.svg")) {
        plot_attitude_series(&run.series, &format!("Attitude {day}"), &chart, out.size)?;
    }
    Ok(())
}

fn run_position(log: Option<&Path>, out: &Output) -> Result<()> {
    let path = log.map_or_else(|| config::get().logs.position_log.clone(), Path::to_path_buf);
    info!(path = %path.display(), "Collecting position deltas");

    let run = extract_position_deltas(&path)
        .with_context(|| format!("extracting position deltas from {}", path.display()))?;
    info!("{}", run.report);
    let track = position_track(&run.deltas);
    info!(deltas = run.deltas.len(), points = track.len(), "Position track built");

    out.write_json(&json!({
        "log": path,
        "deltas": run.deltas,
        "track": track,
        "report": run.report,
    }))?;

    if let Some(chart) = out.chart("position_track.svg") {
        plot_position_track(&track, &chart, out.size)?;
    }
    Ok(())
}

fn run_gps(csv: &Path, out: &Output) -> Result<()> {
    let fixes = read_gps_csv(csv).with_context(|| format!("reading {}", csv.display()))?;
    let track = reconstruct_track(&fixes, config::get().gps.max_points)
        .with_context(|| format!("reconstructing GPS track from {}", csv.display()))?;

    out.write_json(&track)?;

    if let Some(chart) = out.chart("gps_radial_map.svg") {
        plot_gps_track(&track, &chart, out.size)?;
    }
    Ok(())
}

fn run_stats(dir: &Path, out: &Output) -> Result<()> {
    let cfg = &config::get().stats;
    let dataset = GroupDataset::load(dir, &cfg.group_files, &cfg.dimensions)
        .with_context(|| format!("loading questionnaire groups from {}", dir.display()))?;
    let thresholds = Thresholds {
        normality_alpha: cfg.normality_alpha,
        group_alpha: cfg.group_alpha,
    };
    let reports = compare_all(&dataset, &cfg.dimensions, thresholds)?;

    for report in &reports {
        for pair in &report.pairwise {
            info!(
                dimension = %report.dimension,
                pair = %format!("{} vs {}", pair.group_a, pair.group_b),
                u = pair.u_statistic,
                p_adjusted = %format!("{:.4}", pair.p_adjusted),
                stars = %pair.stars,
                "Mann-Whitney U"
            );
        }
    }

    out.write_json(&reports)?;

    if out.plot_dir.is_some() {
        for report in &reports {
            let file = format!("{}.svg", report.dimension.replace(' ', "_").to_lowercase());
            if let Some(chart) = out.chart(&file) {
                plot_group_boxplot(&dataset, report, &chart, out.size)?;
            }
        }
    }
    Ok(())
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let analysis_config = match &args.config {
        Some(path) => AnalysisConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::load(),
    };
    config::init(analysis_config);
    let cfg = config::get();

    let out = Output {
        json: args.json.clone(),
        plot_dir: (!args.no_plot).then(|| args.out.clone().unwrap_or_else(|| cfg.plot.out_dir.clone())),
        size: ChartSize::new(cfg.plot.width, cfg.plot.height),
    };

    match &args.command {
        SubCommand::Attitude { day } => run_attitude(day, &out),
        SubCommand::Position { log } => run_position(log.as_deref(), &out),
        SubCommand::Gps { csv } => run_gps(csv, &out),
        SubCommand::Stats { dir } => run_stats(dir, &out),
    }
}

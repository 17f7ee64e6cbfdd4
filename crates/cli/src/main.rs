//! address-bundler - cluster geocoded addresses and assign bundle keys
//!
//! Reads a JSON point file, groups located points into geographic clusters
//! and capacity-bounded bundles, and writes `cluster_key`/`bundle_key` back.

mod config;
mod store;
mod summary;

use std::path::{Path, PathBuf};

use address_bundler_core::{BundleEngine, BundleParams, RunOutcome};
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::ProjectConfig;
use crate::store::JsonFileStore;
use crate::summary::{MAX_TOWN_ROWS, ProjectSummary};

const DEFAULT_MODE: &str = "KMEANS";

#[derive(Parser, Debug)]
#[command(name = "address-bundler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use debug logging level
    #[arg(short = 'd', long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster geocoded points and assign bundle keys
    Cluster(ClusterArgs),
    /// Print totals and existing assignments for a point file
    Summary {
        /// Path to the JSON point file
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct ClusterArgs {
    /// Path to the JSON point file
    file: PathBuf,

    /// Bundling mode: STREET or KMEANS (case-insensitive)
    #[arg(short = 'm', long)]
    mode: Option<String>,

    /// Number of geographic clusters (0 = single cluster)
    #[arg(short = 'k', long = "cluster-count", conflicts_with = "single_cluster")]
    cluster_count: Option<usize>,

    /// Treat all points as one cluster
    #[arg(long = "single-cluster", action = ArgAction::SetTrue)]
    single_cluster: bool,

    /// Maximum points per bundle
    #[arg(short = 'b', long = "bundle-size")]
    bundle_size: Option<usize>,

    /// Bundles smaller than this are merged when possible
    #[arg(long = "min-bundle-size")]
    min_bundle_size: Option<usize>,

    /// Seed for k-means initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// Number of seeded k-means runs to pick the best of
    #[arg(long)]
    restarts: Option<usize>,

    /// TOML project file with default settings
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the updated point file here instead of in place
    #[arg(short = 'o', long = "outfile")]
    outfile: Option<PathBuf>,
}

/// Merges defaults, the project file, then flags. Returns params and mode.
fn resolve(args: &ClusterArgs, config: &ProjectConfig) -> (BundleParams, String) {
    let defaults = BundleParams::default();
    let cluster_count = if args.single_cluster {
        None
    } else {
        match args.cluster_count.or(config.cluster_count) {
            Some(0) => None,
            Some(n) => Some(n),
            None => defaults.cluster_count,
        }
    };
    let params = BundleParams {
        cluster_count,
        bundle_size: args
            .bundle_size
            .or(config.bundle_size)
            .unwrap_or(defaults.bundle_size),
        min_bundle_size: args
            .min_bundle_size
            .or(config.min_bundle_size)
            .unwrap_or(defaults.min_bundle_size),
        seed: args.seed.or(config.seed).unwrap_or(defaults.seed),
        restarts: args.restarts.unwrap_or(defaults.restarts),
        ..defaults
    };
    let mode = args
        .mode
        .clone()
        .or_else(|| config.mode.clone())
        .unwrap_or_else(|| DEFAULT_MODE.to_string());
    (params, mode)
}

fn cmd_cluster(args: &ClusterArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::default(),
    };
    let (params, mode) = resolve(args, &config);
    let engine = BundleEngine::with_mode_str(params, &mode).context("Invalid bundling settings")?;
    debug!(
        mode = %engine.mode(),
        cluster_count = ?engine.params().cluster_count,
        bundle_size = engine.params().bundle_size,
        min_bundle_size = engine.params().min_bundle_size,
        seed = engine.params().seed,
        "resolved settings"
    );

    let mut store = JsonFileStore::open(&args.file)
        .with_context(|| format!("Failed to load point file {}", args.file.display()))?;
    if let Some(outfile) = &args.outfile {
        store = store.with_output(outfile);
    }

    match engine.run(&mut store).context("Bundling failed")? {
        RunOutcome::NoPoints => println!("No geocoded points found, nothing to bundle."),
        RunOutcome::Completed(report) => println!("{}", report),
    }
    Ok(())
}

fn cmd_summary(file: &Path) -> Result<()> {
    let store = JsonFileStore::open(file)
        .with_context(|| format!("Failed to load point file {}", file.display()))?;
    for line in ProjectSummary::from_records(store.records()).lines(MAX_TOWN_ROWS) {
        println!("{}", line);
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match &cli.command {
        Command::Cluster(args) => cmd_cluster(args),
        Command::Summary { file } => cmd_summary(file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_over_defaults() {
        let config = ProjectConfig {
            cluster_count: Some(3),
            bundle_size: Some(12),
            min_bundle_size: Some(4),
            seed: None,
            mode: Some("street".into()),
        };
        let args = ClusterArgs {
            bundle_size: Some(30),
            seed: Some(9),
            ..ClusterArgs::default()
        };
        let (params, mode) = resolve(&args, &config);
        assert_eq!(params.cluster_count, Some(3));
        assert_eq!(params.bundle_size, 30);
        assert_eq!(params.min_bundle_size, 4);
        assert_eq!(params.seed, 9);
        assert_eq!(mode, "street");
    }

    #[test]
    fn zero_or_flag_selects_single_cluster() {
        let config = ProjectConfig {
            cluster_count: Some(0),
            ..ProjectConfig::default()
        };
        let (params, mode) = resolve(&ClusterArgs::default(), &config);
        assert_eq!(params.cluster_count, None);
        assert_eq!(mode, DEFAULT_MODE);

        let args = ClusterArgs {
            single_cluster: true,
            ..ClusterArgs::default()
        };
        let (params, _) = resolve(&args, &ProjectConfig::default());
        assert_eq!(params.cluster_count, None);
    }

    #[test]
    fn cli_parses_cluster_flags() {
        let cli = Cli::try_parse_from([
            "address-bundler",
            "cluster",
            "points.json",
            "--mode",
            "street",
            "--single-cluster",
            "-b",
            "15",
            "-d",
        ])
        .unwrap();
        assert!(cli.debug);
        let Command::Cluster(args) = cli.command else {
            panic!("expected cluster subcommand");
        };
        assert!(args.single_cluster);
        assert_eq!(args.bundle_size, Some(15));
        assert_eq!(args.mode.as_deref(), Some("street"));
    }

    #[test]
    fn cluster_count_conflicts_with_single_cluster() {
        let result = Cli::try_parse_from([
            "address-bundler",
            "cluster",
            "points.json",
            "-k",
            "3",
            "--single-cluster",
        ]);
        assert!(result.is_err());
    }
}

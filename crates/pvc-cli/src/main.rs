//! CLI entry point for the product version catalogue.
//!
//! Reads the legacy control-panel catalog, the per-region release catalog, or
//! the merged view of both, and prints it as JSON or text.
//!
//! # Usage
//!
//! ```bash
//! pvc [OPTIONS] <COMMAND>
//!
//! # Merged catalog for Japan as JSON
//! pvc --root /var/lib/c1/version_data --legacy-dir ./legacy --region JP merged
//!
//! # Release catalog as text, written to a file
//! pvc --root /var/lib/c1/version_data new --format text --output us.txt
//!
//! # Which releases need downloading
//! pvc --root /var/lib/c1/version_data status
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fmt::Write as _;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use pvc_core::{Config, Product};
use pvc_reader::{CatalogService, CatalogSummary, LocalSync, ReleaseSync, SkippedRelease, SyncPlan};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Reads and reconciles product version catalogs.
///
/// Legacy documents are read per locale (US, JP, KR); release documents are
/// read from `{root}/{region}/ReleaseVersion.json` and the releases it lists.
#[derive(Parser)]
#[command(name = "pvc", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "PVC_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Root directory holding one sub-directory per region.
    #[arg(long, global = true, env = "PVC_ROOT")]
    root: Option<Utf8PathBuf>,

    /// Region (or locale) key, e.g. US, JP, KR.
    ///
    /// Defaults to the configured region, or `US`.
    #[arg(long, global = true, env = "PVC_REGION")]
    region: Option<String>,

    /// Directory containing the legacy `c1ControlPanel*.json` documents.
    #[arg(long, global = true, env = "PVC_LEGACY_DIR")]
    legacy_dir: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the legacy catalog of the region's locale.
    Legacy(OutputArgs),

    /// Print the release catalog of the region.
    New(OutputArgs),

    /// Print the merged catalog of the region.
    Merged(OutputArgs),

    /// Show which releases of the region are current locally.
    Status,
}

/// Output options shared by the catalog commands.
#[derive(Args)]
struct OutputArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (defaults to stdout).
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,
}

/// Catalog output format.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Human-readable listing with a summary line.
    Text,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set; otherwise `debug` with `--verbose`, else
/// `info`. Logs go to stderr so catalog output on stdout stays parseable.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the merged
/// configuration is invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.catalog.local_root.clone_from(root);
    }
    if let Some(region) = &cli.region {
        config.catalog.region.clone_from(region);
    }
    if let Some(dir) = &cli.legacy_dir {
        config.legacy.directory.clone_from(dir);
    }

    config.validate()?;
    Ok(config)
}

/// The release root, which only the release-backed commands need.
fn require_root(config: &Config) -> color_eyre::Result<&Utf8Path> {
    let root = config.catalog.local_root.as_path();
    if root.as_str().trim().is_empty() {
        return Err(eyre!("No release root configured; pass --root or set PVC_ROOT"));
    }
    Ok(root)
}

/// Creates the catalog service, checking local release data before reads.
fn create_service(config: &Config) -> color_eyre::Result<CatalogService> {
    Ok(CatalogService::from_config(config)?.with_sync(LocalSync::from_config(&config.sync)))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Prints the legacy catalog.
fn run_legacy(config: &Config, args: &OutputArgs) -> color_eyre::Result<()> {
    info!(region = %config.catalog.region, dir = %config.legacy.directory, "Reading legacy catalog");

    let products = create_service(config)?.read_legacy_catalog(&config.catalog.region)?;
    emit(&render(args.format, &products, &[])?, args.output.as_deref())
}

/// Prints the release catalog, including skipped releases.
fn run_new(config: &Config, args: &OutputArgs) -> color_eyre::Result<()> {
    let root = require_root(config)?;
    info!(root = %root, region = %config.catalog.region, "Reading release catalog");

    let read = create_service(config)?.read_new_catalog_with_report(root, &config.catalog.region)?;
    emit(
        &render(args.format, &read.products, &read.skipped)?,
        args.output.as_deref(),
    )
}

/// Prints the merged catalog.
fn run_merged(config: &Config, args: &OutputArgs) -> color_eyre::Result<()> {
    let root = require_root(config)?;
    info!(root = %root, region = %config.catalog.region, "Reading merged catalog");

    let products = create_service(config)?.read_merged_catalog(root, &config.catalog.region)?;
    emit(&render(args.format, &products, &[])?, args.output.as_deref())
}

/// Prints the local sync plan.
fn run_status(config: &Config) -> color_eyre::Result<()> {
    let root = require_root(config)?;
    let plan = LocalSync::from_config(&config.sync).ensure_current(root, &config.catalog.region)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{}", render_plan(&config.catalog.region, &plan))?;
    Ok(())
}

/// Writes `content` to `output`, or stdout.
fn emit(content: &str, output: Option<&Utf8Path>) -> color_eyre::Result<()> {
    if let Some(path) = output {
        std::fs::write(path.as_std_path(), content)
            .wrap_err_with(|| format!("Failed to write {path}"))?;
        info!(path = %path, "Catalog written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{content}")?;
    }
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn render(format: OutputFormat, products: &[Product], skipped: &[SkippedRelease]) -> color_eyre::Result<String> {
    match format {
        OutputFormat::Json => render_json(products, skipped),
        OutputFormat::Text => Ok(render_text(products, skipped)),
    }
}

/// Renders the catalog as JSON with its summary.
fn render_json(products: &[Product], skipped: &[SkippedRelease]) -> color_eyre::Result<String> {
    #[derive(Serialize)]
    struct Report<'a> {
        summary: CatalogSummary,
        products: &'a [Product],
        #[serde(skip_serializing_if = "Option::is_none")]
        skipped: Option<&'a [SkippedRelease]>,
    }

    let report = Report {
        summary: CatalogSummary::from_products(products),
        products,
        skipped: (!skipped.is_empty()).then_some(skipped),
    };
    let mut json = serde_json::to_string_pretty(&report)
        .map_err(|e| eyre!("Failed to serialize JSON: {}", e))?;
    json.push('\n');
    Ok(json)
}

/// Renders each product and its versions, then the summary.
fn render_text(products: &[Product], skipped: &[SkippedRelease]) -> String {
    let mut out = String::new();

    for product in products {
        let _ = writeln!(out, "{} ({})", product.name, product.id);
        if let Some(description) = &product.description {
            let _ = writeln!(out, "  {description}");
        }
        for version in &product.versions {
            let _ = write!(
                out,
                "  - {} [{}]",
                version.version.as_deref().unwrap_or("-"),
                version.source
            );
            let fields = [
                ("display", &version.display_version),
                ("toolbox", &version.tool_box_version),
                ("c1live", &version.c1_live_version),
                ("frameworks", &version.framework_versions),
                ("default", &version.default_check_frameworks),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    let _ = write!(out, " {label}={value}");
                }
            }
            out.push('\n');
        }
    }

    if !skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped releases ({}):", skipped.len());
        for skip in skipped {
            let _ = writeln!(out, "  {} - {} ({})", skip.id, skip.reason, skip.path);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", CatalogSummary::from_products(products));
    out
}

/// Renders a sync plan.
fn render_plan(region: &str, plan: &SyncPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Release data for {}: {} releases", region.trim(), plan.total());
    let _ = writeln!(out, "  Up to date: {}", plan.up_to_date.len());
    let _ = writeln!(out, "  Stale:      {}", plan.stale.len());
    let _ = writeln!(out, "  Missing:    {}", plan.missing.len());

    if plan.is_current() {
        let _ = writeln!(out, "All releases are current.");
    } else {
        let _ = writeln!(out);
        let _ = writeln!(out, "Needs download:");
        for id in plan.pending() {
            let _ = writeln!(out, "  {id}");
        }
    }
    out
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let config = build_config(&cli)?;
    match &cli.command {
        Commands::Legacy(args) => run_legacy(&config, args),
        Commands::New(args) => run_new(&config, args),
        Commands::Merged(args) => run_merged(&config, args),
        Commands::Status => run_status(&config),
    }
}

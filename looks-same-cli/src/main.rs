//! looks-same CLI - visual regression image comparison
//!
//! Compare a reference screenshot against a current one, optionally writing
//! a highlighted diff image.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, ColorChoice, Parser, ValueEnum};
use colored::Colorize;
use log::{debug, LevelFilter};
use looks_same::io::{load_pair, save_diff};
use looks_same::{
    create_diff, looks_same, CompareOptions, DiffArea, DiffOptions, LooksSameError, RGB8,
};
use serde::Serialize;

/// Perceptual image comparison for visual regression tests
///
/// Decides whether two images look the same to a human observer. Colors are
/// compared with CIEDE2000; antialiasing, a blinking text caret and isolated
/// single-pixel noise are ignored by default.
#[derive(Parser, Debug)]
#[command(name = "looks-same")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Compare two screenshots:
        looks-same reference.png current.png

    Write a highlighted diff when they differ:
        looks-same --diff diff.png reference.png current.png

    Exact pixel comparison:
        looks-same --strict reference.png current.png

    Retina screenshots, JSON report with clusters:
        looks-same --pixel-ratio 2 --cluster --json reference.png current.png

EXIT CODES:
    0 - Images look the same
    1 - Images differ
    2 - Error (file not found, invalid image, invalid options, etc.)")]
struct Cli {
    /// Reference image (expected)
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Current image (actual)
    #[arg(value_name = "CURRENT")]
    current: PathBuf,

    /// Save highlighted diff image (PNG) if the images differ
    #[arg(short, long, value_name = "FILE")]
    diff: Option<PathBuf>,

    /// CIEDE2000 tolerance (default: 2.3, the just-noticeable difference)
    #[arg(short, long, value_name = "DELTA_E", conflicts_with = "strict")]
    tolerance: Option<f64>,

    /// Require exact channel equality
    #[arg(long)]
    strict: bool,

    /// Brightness tolerance of antialiasing detection
    #[arg(long, default_value = "0.0", value_name = "DELTA")]
    antialiasing_tolerance: f64,

    /// Treat antialiasing artifacts as differences
    #[arg(long)]
    no_ignore_antialiasing: bool,

    /// Treat a blinking text caret as a difference
    #[arg(long)]
    no_ignore_caret: bool,

    /// Device pixel ratio of the screenshots
    #[arg(long, default_value = "1.0", value_name = "RATIO")]
    pixel_ratio: f64,

    /// Diff highlight color
    #[arg(long, default_value = "#ff00ff", value_name = "#RRGGBB", value_parser = parse_hex_color)]
    highlight_color: RGB8,

    /// Reference image of a pair whose differing pixels are ignored
    #[arg(long, value_name = "FILE", requires = "ignore_current")]
    ignore_reference: Option<PathBuf>,

    /// Current image of a pair whose differing pixels are ignored
    #[arg(long, value_name = "FILE", requires = "ignore_reference")]
    ignore_current: Option<PathBuf>,

    /// Group differences into clusters
    #[arg(long)]
    cluster: bool,

    /// Cluster radius in pixels
    #[arg(long, default_value = "10", value_name = "PIXELS")]
    clusters_size: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output JSON (shorthand for --format json)
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Quiet mode - no output, only the exit code
    #[arg(long, short = 'q', action = ArgAction::SetTrue)]
    quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human readable verdict
    Text,
    /// JSON report
    Json,
}

#[derive(Serialize)]
struct JsonOutput {
    equal: bool,
    reference: String,
    current: String,
    different_pixels: u64,
    total_pixels: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff_bounds: Option<JsonArea>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diff_clusters: Vec<JsonArea>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff_image: Option<String>,
    options: JsonOptions,
}

#[derive(Serialize)]
struct JsonArea {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

impl From<DiffArea> for JsonArea {
    fn from(area: DiffArea) -> Self {
        Self {
            left: area.left,
            top: area.top,
            width: area.width,
            height: area.height,
        }
    }
}

#[derive(Serialize)]
struct JsonOptions {
    strict: bool,
    tolerance: f64,
    antialiasing_tolerance: f64,
    ignore_antialiasing: bool,
    ignore_caret: bool,
    pixel_ratio: f64,
}

/// Everything reported for one comparison.
struct Report {
    equal: bool,
    different_pixels: u64,
    total_pixels: u64,
    diff_bounds: Option<DiffArea>,
    diff_clusters: Vec<DiffArea>,
    diff_image: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(&cli);
    setup_colors(&cli);

    match run(&cli) {
        Ok(report) => {
            if let Err(e) = output_report(&cli, &report) {
                print_error(&cli, &e);
                return ExitCode::from(2);
            }
            if report.equal {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            print_error(&cli, &e);
            ExitCode::from(2)
        }
    }
}

fn setup_logging(cli: &Cli) {
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    // -v overrides RUST_LOG
    if cli.verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

fn setup_colors(cli: &Cli) {
    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            // Disable colors if not a terminal
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}

fn print_error(cli: &Cli, error: &dyn std::fmt::Display) {
    if !cli.quiet {
        eprintln!("{}: {}", "error".red().bold(), error);
    }
}

fn get_format(cli: &Cli) -> OutputFormat {
    if cli.json {
        OutputFormat::Json
    } else {
        cli.format
    }
}

fn compare_options(cli: &Cli) -> CompareOptions {
    let mut options = CompareOptions::new()
        .with_strict(cli.strict)
        .with_ignore_antialiasing(!cli.no_ignore_antialiasing)
        .with_antialiasing_tolerance(cli.antialiasing_tolerance)
        .with_ignore_caret(!cli.no_ignore_caret)
        .with_pixel_ratio(cli.pixel_ratio)
        .with_should_cluster(cli.cluster)
        .with_clusters_size(cli.clusters_size);
    if let Some(tolerance) = cli.tolerance {
        options = options.with_tolerance(tolerance);
    }
    options
}

fn run(cli: &Cli) -> Result<Report, LooksSameError> {
    let options = compare_options(cli);
    options.validate()?;

    let (reference, current) = load_pair(&cli.reference, &cli.current)?;
    debug!(
        "comparing {}x{} against {}x{}",
        reference.width(),
        reference.height(),
        current.width(),
        current.height()
    );

    let ignore = match (&cli.ignore_reference, &cli.ignore_current) {
        (Some(r), Some(c)) => Some(load_pair(r, c)?),
        _ => None,
    };

    // Without a diff to write or a mask to apply, skip rendering.
    if cli.diff.is_none() && ignore.is_none() {
        let result = looks_same(&reference, &current, &options)?;
        return Ok(Report {
            equal: result.equal,
            different_pixels: result.different_pixels,
            total_pixels: result.total_pixels,
            diff_bounds: result.diff_bounds,
            diff_clusters: result.diff_clusters,
            diff_image: None,
        });
    }

    let mut diff_options = DiffOptions::new(options).with_highlight_color(cli.highlight_color);
    if let Some((ignore_reference, ignore_current)) = &ignore {
        diff_options = diff_options
            .with_ignore_different_pixels(ignore_reference.as_ref(), ignore_current.as_ref());
    }

    let outcome = create_diff(&reference, &current, &diff_options)?;
    let diff_image = match &cli.diff {
        Some(diff_path) if !outcome.equal => {
            save_diff(&outcome.image, diff_path)?;
            Some(diff_path.clone())
        }
        _ => None,
    };
    Ok(Report {
        equal: outcome.equal,
        different_pixels: outcome.different_pixels,
        total_pixels: outcome.total_pixels,
        diff_bounds: outcome.diff_bounds,
        diff_clusters: outcome.diff_clusters,
        diff_image,
    })
}

/// Parses `#rrggbb` (the `#` is optional).
fn parse_hex_color(s: &str) -> Result<RGB8, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected a color like #ff00ff, got '{s}'"));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    Ok(RGB8::new(channel(0)?, channel(2)?, channel(4)?))
}

fn format_area(area: &DiffArea) -> String {
    format!(
        "{}x{} at ({}, {})",
        area.width, area.height, area.left, area.top
    )
}

fn output_report(cli: &Cli, report: &Report) -> Result<(), String> {
    if cli.quiet {
        return Ok(());
    }

    match get_format(cli) {
        OutputFormat::Text => {
            if report.equal {
                println!("{}", "Images look the same".green().bold());
            } else {
                let percent = if report.total_pixels == 0 {
                    0.0
                } else {
                    report.different_pixels as f64 * 100.0 / report.total_pixels as f64
                };
                println!("{}", "Images differ".red().bold());
                println!(
                    "  Different pixels: {} of {} ({:.2}%)",
                    report.different_pixels, report.total_pixels, percent
                );
                if let Some(bounds) = &report.diff_bounds {
                    println!("  Diff area: {}", format_area(bounds));
                }
                for (i, cluster) in report.diff_clusters.iter().enumerate() {
                    println!("  Cluster {}: {}", i + 1, format_area(cluster));
                }
                if let Some(path) = &report.diff_image {
                    println!("  Diff saved to: {}", path.display());
                }
            }
        }
        OutputFormat::Json => {
            let options = compare_options(cli);
            let output = JsonOutput {
                equal: report.equal,
                reference: cli.reference.display().to_string(),
                current: cli.current.display().to_string(),
                different_pixels: report.different_pixels,
                total_pixels: report.total_pixels,
                diff_bounds: report.diff_bounds.map(JsonArea::from),
                diff_clusters: report
                    .diff_clusters
                    .iter()
                    .copied()
                    .map(JsonArea::from)
                    .collect(),
                diff_image: report
                    .diff_image
                    .as_ref()
                    .map(|p| p.display().to_string()),
                options: JsonOptions {
                    strict: options.strict(),
                    tolerance: options.effective_tolerance(),
                    antialiasing_tolerance: options.antialiasing_tolerance(),
                    ignore_antialiasing: options.ignore_antialiasing(),
                    ignore_caret: options.ignore_caret(),
                    pixel_ratio: options.pixel_ratio(),
                },
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }

    // Flush stdout
    let _ = io::stdout().flush();

    Ok(())
}

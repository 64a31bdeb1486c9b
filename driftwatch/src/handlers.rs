use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use driftwatch_core::config::{PipelineConfig, ReportPaths, ScanConfig};
use driftwatch_core::matcher::Reconciliation;
use driftwatch_core::pipeline::{
    CompareOutcome, run_compare, run_mappings, run_process, run_scan,
};
use driftwatch_core::report::ReportFormat;
use driftwatch_scanner::fetch_actuator_mappings;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install the stderr log subscriber. RUST_LOG wins over the verbosity flag.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand a leading `~` to the home directory
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn reports_dir(args: &ArgMatches) -> PathBuf {
    args.get_one::<String>("reports-dir")
        .map(|dir| expand_path(dir))
        .unwrap_or_else(|| PipelineConfig::default().reports_dir)
}

/// Scan options from `--frontend`, `--backend` and `--api-prefix`
pub fn scan_config(args: &ArgMatches) -> ScanConfig {
    let mut config = ScanConfig {
        frontend_root: args.get_one::<String>("frontend").map(|d| expand_path(d)),
        backend_root: args.get_one::<String>("backend").map(|d| expand_path(d)),
        ..ScanConfig::default()
    };
    if let Some(prefix) = args.get_one::<String>("api-prefix") {
        config.api_prefix = prefix.clone();
    }
    config
}

/// Pipeline options from the global reports directory and the report flags
pub fn pipeline_config(args: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::new(reports_dir(args));

    if let Some(dir) = args.get_one::<String>("output-dir") {
        config = config.with_output_dir(expand_path(dir));
    }
    if let Some(name) = args.get_one::<String>("report-name") {
        config = config.with_report_name(name.as_str());
    }
    if let Some(format) = args.get_one::<String>("format") {
        let format = ReportFormat::from_str(format)
            .ok_or_else(|| anyhow!("Unsupported report format '{}'", format))?;
        config = config.with_format(format);
    }

    debug!("Pipeline configuration: {:?}", config);
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_written(path: &Path) {
    println!(
        "  {} {}",
        "→".blue(),
        path.display().to_string().bright_white()
    );
}

fn print_summary(outcome: &CompareOutcome) {
    let Reconciliation {
        matched,
        missing,
        used,
        unused,
        infrastructure,
    } = &outcome.reconciliation;

    print_divider();
    println!("{}", "  INTEGRATION SUMMARY".bright_white().bold());
    print_divider();
    println!("  {} {} matched", "✓".green().bold(), matched.len());
    println!(
        "  {} {} frontend calls missing in backend",
        "✗".red().bold(),
        missing.len()
    );
    println!(
        "  {} {} backend endpoints used, {} unused, {} infrastructure",
        "•".yellow(),
        used.len(),
        unused.len(),
        infrastructure.len()
    );
    println!();
    println!(
        "{} Report written to {}",
        "✓".green().bold(),
        outcome.report_path.display().to_string().bright_white()
    );
}

pub fn handle_scan(args: &ArgMatches) -> Result<()> {
    let config = scan_config(args);
    let paths = ReportPaths::new(&reports_dir(args));

    let progress = spinner("Scanning sources...");
    let summary = run_scan(&config, &paths);
    progress.finish_and_clear();
    let summary = summary.context("Source scan failed")?;

    println!(
        "{} {} API hits, {} route hits, {} mapping hits",
        "✓".green().bold(),
        summary.api_hits,
        summary.route_hits,
        summary.backend_hits
    );
    print_written(&paths.frontend_api_hits());
    print_written(&paths.frontend_route_hits());
    print_written(&paths.backend_mapping_hits());
    Ok(())
}

pub fn handle_process(args: &ArgMatches) -> Result<()> {
    let paths = ReportPaths::new(&reports_dir(args));
    let summary = run_process(&paths).context("Processing hit files failed")?;

    println!(
        "{} {} frontend calls, {} routes, {} backend endpoints (source: {})",
        "✓".green().bold(),
        summary.frontend_endpoints,
        summary.routes,
        summary.backend_endpoints,
        summary.backend_source.as_str().bright_white()
    );
    print_written(&paths.frontend_json());
    print_written(&paths.frontend_md());
    print_written(&paths.frontend_routes_md());
    print_written(&paths.backend_json());
    print_written(&paths.backend_md());
    Ok(())
}

pub fn handle_mappings(args: &ArgMatches) -> Result<()> {
    let paths = ReportPaths::new(&reports_dir(args));
    let endpoints = run_mappings(&paths).context("Converting actuator mappings failed")?;

    println!(
        "{} Generated inventory with {} endpoints",
        "✓".green().bold(),
        endpoints.len()
    );
    print_written(&paths.backend_json());
    print_written(&paths.backend_md());
    Ok(())
}

pub async fn handle_fetch_mappings(args: &ArgMatches) -> Result<()> {
    let url = args
        .get_one::<Url>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let timeout = args.get_one::<u64>("timeout").copied().unwrap_or(10);
    let paths = ReportPaths::new(&reports_dir(args));

    let progress = spinner(&format!("Fetching {}", url));
    let document = fetch_actuator_mappings(url.as_str(), timeout).await;
    progress.finish_and_clear();
    let document = document.with_context(|| format!("Fetching actuator mappings from {}", url))?;

    let target = paths.actuator_mappings();
    fs::create_dir_all(paths.dir())
        .with_context(|| format!("Creating {}", paths.dir().display()))?;
    fs::write(&target, document).with_context(|| format!("Writing {}", target.display()))?;

    println!("{} Saved actuator mappings", "✓".green().bold());
    print_written(&target);
    Ok(())
}

pub fn handle_compare(args: &ArgMatches) -> Result<()> {
    let config = pipeline_config(args)?;
    let outcome = run_compare(&config).context("Comparison failed")?;
    print_summary(&outcome);
    Ok(())
}

pub fn handle_run(args: &ArgMatches) -> Result<()> {
    handle_scan(args)?;
    handle_process(args)?;
    println!();
    handle_compare(args)
}

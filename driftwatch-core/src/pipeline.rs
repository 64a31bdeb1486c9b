// Pipeline stages: scan, process, mappings, compare. Each reads and writes files
// under the configured directories and fully overwrites its outputs.

use crate::actuator::{actuator_endpoints, parse_actuator};
use crate::backend::{process_static_hits, sort_endpoints};
use crate::config::{PipelineConfig, ReportPaths, ScanConfig};
use crate::error::{PipelineError, Result};
use crate::frontend::{process_frontend_hits, process_route_hits};
use crate::matcher::{Matcher, Reconciliation};
use crate::model::{BackendEndpoint, BackendSource, FrontendEndpoint};
use crate::report::{
    generate_backend_inventory, generate_frontend_inventory, generate_handler_inventory,
    generate_report, generate_route_inventory,
};
use driftwatch_scanner::result::render_hits;
use driftwatch_scanner::{BackendScanner, FrontendScanner, Hit};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Counts from the extraction stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub api_hits: usize,
    pub route_hits: usize,
    pub backend_hits: usize,
}

/// Counts from the processing stage
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSummary {
    pub frontend_endpoints: usize,
    pub routes: usize,
    pub backend_endpoints: usize,
    pub backend_source: BackendSource,
}

/// Outcome of the comparison stage
#[derive(Debug, Clone)]
pub struct CompareOutcome {
    pub reconciliation: Reconciliation,
    pub report_path: PathBuf,
}

// ============================================================================
// File helpers
// ============================================================================

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// `None` when the file does not exist; other read failures are still errors
fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    read_text(path).map(Some)
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, what: &'static str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| PipelineError::Serialize { what, source })?;
    write_text(path, &json)
}

/// Read a required JSON input. A missing file and malformed JSON are both fatal.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(PipelineError::MissingInput(path.to_path_buf()));
    }
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_hits(path: &Path) -> Result<Vec<Hit>> {
    Ok(read_optional(path)?
        .map(|content| Hit::parse_lines(&content))
        .unwrap_or_default())
}

// ============================================================================
// Stage 1: extraction
// ============================================================================

/// Scan the configured source trees and write the three hit files.
/// A side without a configured root writes an empty hit file.
pub fn run_scan(scan: &ScanConfig, paths: &ReportPaths) -> Result<ScanSummary> {
    let frontend = FrontendScanner::with_options(scan.frontend_extensions.clone(), &scan.api_prefix)?;
    let backend = BackendScanner::with_suffixes(scan.controller_suffixes.clone())?;

    let frontend_scan = scan
        .frontend_root
        .as_deref()
        .map(|root| frontend.scan(root))
        .unwrap_or_default();
    let backend_hits = scan
        .backend_root
        .as_deref()
        .map(|root| backend.scan(root))
        .unwrap_or_default();

    write_text(&paths.frontend_api_hits(), &render_hits(&frontend_scan.api_hits))?;
    write_text(&paths.frontend_route_hits(), &render_hits(&frontend_scan.route_hits))?;
    write_text(&paths.backend_mapping_hits(), &render_hits(&backend_hits))?;

    let summary = ScanSummary {
        api_hits: frontend_scan.api_hits.len(),
        route_hits: frontend_scan.route_hits.len(),
        backend_hits: backend_hits.len(),
    };
    info!("Scan wrote hit files to {}: {:?}", paths.dir().display(), summary);
    Ok(summary)
}

// ============================================================================
// Stage 2: processing
// ============================================================================

/// Backend inventory from the best available source: the actuator dump when it
/// exists and parses to at least one endpoint, then the static hits, then nothing.
pub fn load_backend(paths: &ReportPaths) -> Result<(Vec<BackendEndpoint>, BackendSource)> {
    let actuator_path = paths.actuator_mappings();
    if let Some(text) = read_optional(&actuator_path)? {
        info!("Using actuator mappings from {}", actuator_path.display());
        match parse_actuator(&text) {
            Ok(doc) => match actuator_endpoints(&doc) {
                Some(endpoints) if !endpoints.is_empty() => {
                    return Ok((endpoints, BackendSource::Actuator));
                }
                _ => warn!(
                    "No dispatcher mappings in {}, falling back to static scan",
                    actuator_path.display()
                ),
            },
            Err(e) => error!("Actuator parse error in {}: {}", actuator_path.display(), e),
        }
    }

    let hits_path = paths.backend_mapping_hits();
    if hits_path.exists() {
        info!("Using static backend scan from {}", hits_path.display());
        let endpoints = process_static_hits(&read_hits(&hits_path)?);
        return Ok((endpoints, BackendSource::Static));
    }

    warn!("No backend source available, backend inventory will be empty");
    Ok((Vec::new(), BackendSource::None))
}

/// Turn hit files (and the actuator dump) into endpoint inventories.
/// Missing inputs degrade to empty inventories instead of failing.
pub fn run_process(paths: &ReportPaths) -> Result<ProcessSummary> {
    let frontend = process_frontend_hits(&read_hits(&paths.frontend_api_hits())?);
    write_json(&paths.frontend_json(), &frontend, "frontend endpoints")?;
    write_text(&paths.frontend_md(), &generate_frontend_inventory(&frontend))?;

    let routes = process_route_hits(&read_hits(&paths.frontend_route_hits())?);
    write_text(&paths.frontend_routes_md(), &generate_route_inventory(&routes))?;

    let (mut backend, backend_source) = load_backend(paths)?;
    sort_endpoints(&mut backend);
    write_json(&paths.backend_json(), &backend, "backend endpoints")?;
    write_text(&paths.backend_md(), &generate_backend_inventory(&backend))?;

    let summary = ProcessSummary {
        frontend_endpoints: frontend.len(),
        routes: routes.len(),
        backend_endpoints: backend.len(),
        backend_source,
    };
    info!("Processed inventories: {:?}", summary);
    Ok(summary)
}

/// Strict actuator conversion: the dump must exist, parse, and carry dispatcher mappings
pub fn run_mappings(paths: &ReportPaths) -> Result<Vec<BackendEndpoint>> {
    let actuator_path = paths.actuator_mappings();
    if !actuator_path.exists() {
        return Err(PipelineError::MissingInput(actuator_path));
    }
    let text = read_text(&actuator_path)?;
    let doc = parse_actuator(&text).map_err(|source| PipelineError::Json {
        path: actuator_path.clone(),
        source,
    })?;
    let mut endpoints =
        actuator_endpoints(&doc).ok_or_else(|| PipelineError::NoDispatcherMappings(actuator_path))?;

    sort_endpoints(&mut endpoints);
    write_json(&paths.backend_json(), &endpoints, "backend endpoints")?;
    write_text(&paths.backend_md(), &generate_handler_inventory(&endpoints))?;

    info!("Converted {} actuator mappings", endpoints.len());
    Ok(endpoints)
}

// ============================================================================
// Stage 3: comparison
// ============================================================================

/// Classify both inventories and write the integration report.
/// Both inventories are required; any read or parse failure aborts the run.
pub fn run_compare(config: &PipelineConfig) -> Result<CompareOutcome> {
    let paths = config.paths();
    let backend: Vec<BackendEndpoint> = read_json(&paths.backend_json())?;
    let frontend: Vec<FrontendEndpoint> = read_json(&paths.frontend_json())?;

    let matcher = Matcher::new(config.infrastructure_prefixes.clone());
    let reconciliation = matcher.reconcile(&backend, &frontend);

    let report = generate_report(&reconciliation, config.format).map_err(|source| {
        PipelineError::Serialize {
            what: "integration report",
            source,
        }
    })?;
    let report_path = config.report_path();
    write_text(&report_path, &report)?;

    info!("Generated integration report at {}", report_path.display());
    Ok(CompareOutcome {
        reconciliation,
        report_path,
    })
}

/// Run every stage in order
pub fn run_all(scan: &ScanConfig, config: &PipelineConfig) -> Result<CompareOutcome> {
    let paths = config.paths();
    run_scan(scan, &paths)?;
    run_process(&paths)?;
    run_compare(config)
}

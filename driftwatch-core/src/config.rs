// Explicit configuration threaded through every pipeline stage

use crate::report::ReportFormat;
use driftwatch_scanner::backend::DEFAULT_CONTROLLER_SUFFIXES;
use driftwatch_scanner::frontend::{DEFAULT_API_PREFIX, DEFAULT_FRONTEND_EXTENSIONS};
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_REPORT_NAME: &str = "integration-report.md";
pub const DEFAULT_INFRASTRUCTURE_PREFIXES: &[&str] = &["/actuator", "/error"];

/// Options for the extraction stage
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub frontend_root: Option<PathBuf>,
    pub backend_root: Option<PathBuf>,
    pub frontend_extensions: Vec<String>,
    pub controller_suffixes: Vec<String>,
    pub api_prefix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frontend_root: None,
            backend_root: None,
            frontend_extensions: DEFAULT_FRONTEND_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            controller_suffixes: DEFAULT_CONTROLLER_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

/// Options for the processing and comparison stages
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Where hit files, actuator dumps and inventories are read and written
    pub reports_dir: PathBuf,
    /// Where the integration report is written
    pub output_dir: PathBuf,
    pub report_name: String,
    pub format: ReportFormat,
    /// Backend paths with these prefixes never count as unused
    pub infrastructure_prefixes: Vec<String>,
}

impl PipelineConfig {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        let reports_dir = reports_dir.into();
        Self {
            output_dir: reports_dir.clone(),
            reports_dir,
            report_name: DEFAULT_REPORT_NAME.to_string(),
            format: ReportFormat::Markdown,
            infrastructure_prefixes: DEFAULT_INFRASTRUCTURE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_report_name(mut self, report_name: impl Into<String>) -> Self {
        self.report_name = report_name.into();
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn paths(&self) -> ReportPaths {
        ReportPaths::new(&self.reports_dir)
    }

    /// Full path of the integration report, with the extension matching the format
    pub fn report_path(&self) -> PathBuf {
        self.output_dir
            .join(&self.report_name)
            .with_extension(self.format.file_extension())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REPORTS_DIR)
    }
}

/// File layout inside the reports directory
#[derive(Debug, Clone)]
pub struct ReportPaths {
    dir: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frontend_api_hits(&self) -> PathBuf {
        self.dir.join("frontend-api-hits.txt")
    }

    pub fn frontend_route_hits(&self) -> PathBuf {
        self.dir.join("frontend-route-hits.txt")
    }

    pub fn backend_mapping_hits(&self) -> PathBuf {
        self.dir.join("backend-mapping-hits.txt")
    }

    pub fn actuator_mappings(&self) -> PathBuf {
        self.dir.join("actuator-mappings.json")
    }

    pub fn frontend_json(&self) -> PathBuf {
        self.dir.join("frontend-endpoints.json")
    }

    pub fn frontend_md(&self) -> PathBuf {
        self.dir.join("frontend-endpoints.md")
    }

    pub fn frontend_routes_md(&self) -> PathBuf {
        self.dir.join("frontend-routes.md")
    }

    pub fn backend_json(&self) -> PathBuf {
        self.dir.join("backend-endpoints.json")
    }

    pub fn backend_md(&self) -> PathBuf {
        self.dir.join("backend-endpoints.md")
    }
}

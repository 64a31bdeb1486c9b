// End-to-end tests for the file-based pipeline stages

use driftwatch_core::config::{PipelineConfig, ReportPaths, ScanConfig};
use driftwatch_core::error::PipelineError;
use driftwatch_core::model::{
    BackendEndpoint, BackendSource, Context, FrontendEndpoint, HttpMethod,
};
use driftwatch_core::pipeline::{
    load_backend, read_json, run_all, run_compare, run_mappings, run_process, run_scan,
};
use driftwatch_core::report::ReportFormat;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TICKETS_PAGE: &str = r#"import { api } from '../api';

export function Tickets({ id }) {
  const load = () => api.get(`/api/tickets/${id}`);
  // api.delete(`/api/tickets/${id}`);
  const create = () =>
    fetch('/api/widgets', {
      method: 'POST',
    });
  return <Route path="/app/tickets" element={<List />} />;
}
"#;

const ADMIN_PAGE: &str = r#"export const loadUsers = () => api.get('/api/admin/users');
"#;

const TICKET_CONTROLLER: &str = r#"@RestController
@RequestMapping("/api/tickets")
public class TicketController {
    @GetMapping("/{id}")
    public Ticket get(@PathVariable Long id) { return null; }

    @DeleteMapping("/{id}")
    public void delete(@PathVariable Long id) {}
}
"#;

const WIDGET_CONTROLLER: &str = r#"@RestController
@RequestMapping("/api/widgets")
public class WidgetController {
    @GetMapping
    public List<Widget> list() { return null; }
}
"#;

const ACTUATOR_DUMP: &str = r#"{"contexts":{"application":{"mappings":{"dispatcherServlets":{"dispatcherServlet":[
  {"handler":"TicketController#get(Long)","details":{"requestMappingConditions":{"methods":["GET"],"patterns":["/api/tickets/{id}"]}}},
  {"handler":"HealthEndpoint","details":{"requestMappingConditions":{"methods":["GET"],"patterns":["/actuator/health"]}}}
]}}}}}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

struct Fixture {
    _dir: TempDir,
    scan: ScanConfig,
    config: PipelineConfig,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let frontend = dir.path().join("frontend");
    let backend = dir.path().join("backend");
    write(&frontend, "src/pages/Tickets.jsx", TICKETS_PAGE);
    write(&frontend, "src/admin/Users.ts", ADMIN_PAGE);
    write(&backend, "src/main/java/TicketController.java", TICKET_CONTROLLER);
    write(&backend, "src/main/java/WidgetController.java", WIDGET_CONTROLLER);

    let scan = ScanConfig {
        frontend_root: Some(frontend),
        backend_root: Some(backend),
        ..ScanConfig::default()
    };
    let config = PipelineConfig::new(dir.path().join("reports"));
    Fixture {
        _dir: dir,
        scan,
        config,
    }
}

// ============================================================================
// Scan Stage Tests
// ============================================================================

#[test]
fn test_scan_writes_hit_files() {
    let f = fixture();
    let paths = f.config.paths();
    let summary = run_scan(&f.scan, &paths).unwrap();

    assert_eq!(summary.api_hits, 3);
    assert_eq!(summary.route_hits, 1);
    assert_eq!(summary.backend_hits, 5);

    let api_hits = fs::read_to_string(paths.frontend_api_hits()).unwrap();
    assert_eq!(api_hits.lines().count(), 3);
    assert!(api_hits.contains(":4 => api.get(`/api/tickets/${id}`"));
    assert!(api_hits.contains(":7 => fetch('/api/widgets', { method: 'POST'"));
    assert!(!api_hits.contains("api.delete"));
    assert!(paths.frontend_route_hits().exists());
    assert!(paths.backend_mapping_hits().exists());
}

#[test]
fn test_scan_without_roots_writes_empty_files() {
    let dir = TempDir::new().unwrap();
    let paths = ReportPaths::new(dir.path());
    let summary = run_scan(&ScanConfig::default(), &paths).unwrap();

    assert_eq!(summary.api_hits, 0);
    assert_eq!(fs::read_to_string(paths.frontend_api_hits()).unwrap(), "");
    assert_eq!(fs::read_to_string(paths.backend_mapping_hits()).unwrap(), "");
}

// ============================================================================
// Process Stage Tests
// ============================================================================

#[test]
fn test_process_builds_inventories_from_static_hits() {
    let f = fixture();
    let paths = f.config.paths();
    run_scan(&f.scan, &paths).unwrap();
    let summary = run_process(&paths).unwrap();

    assert_eq!(summary.frontend_endpoints, 3);
    assert_eq!(summary.routes, 1);
    assert_eq!(summary.backend_source, BackendSource::Static);

    let backend: Vec<BackendEndpoint> = read_json(&paths.backend_json()).unwrap();
    let pairs: Vec<(HttpMethod, &str)> =
        backend.iter().map(|e| (e.method, e.path.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            (HttpMethod::Get, "/api/tickets/{id}"),
            (HttpMethod::Delete, "/api/tickets/{id}"),
            (HttpMethod::Get, "/api/widgets"),
        ]
    );

    let frontend: Vec<FrontendEndpoint> = read_json(&paths.frontend_json()).unwrap();
    assert_eq!(frontend.len(), 3);
    assert!(fs::read_to_string(paths.frontend_routes_md()).unwrap().contains("- `/app/tickets`"));
    assert!(fs::read_to_string(paths.backend_md()).unwrap().contains("| Static |"));
}

#[test]
fn test_process_degrades_without_inputs() {
    let dir = TempDir::new().unwrap();
    let paths = ReportPaths::new(dir.path());
    let summary = run_process(&paths).unwrap();

    assert_eq!(summary.frontend_endpoints, 0);
    assert_eq!(summary.backend_endpoints, 0);
    assert_eq!(summary.backend_source, BackendSource::None);
    assert_eq!(fs::read_to_string(paths.backend_json()).unwrap(), "[]");
}

#[test]
fn test_load_backend_prefers_actuator() {
    let f = fixture();
    let paths = f.config.paths();
    run_scan(&f.scan, &paths).unwrap();
    fs::write(paths.actuator_mappings(), ACTUATOR_DUMP).unwrap();

    let (endpoints, source) = load_backend(&paths).unwrap();
    assert_eq!(source, BackendSource::Actuator);
    assert_eq!(endpoints.len(), 2);
}

#[test]
fn test_load_backend_falls_back_on_malformed_actuator() {
    let f = fixture();
    let paths = f.config.paths();
    run_scan(&f.scan, &paths).unwrap();
    fs::write(paths.actuator_mappings(), "{ truncated").unwrap();

    let (endpoints, source) = load_backend(&paths).unwrap();
    assert_eq!(source, BackendSource::Static);
    assert_eq!(endpoints.len(), 3);
}

#[test]
fn test_load_backend_falls_back_without_dispatcher_mappings() {
    let f = fixture();
    let paths = f.config.paths();
    run_scan(&f.scan, &paths).unwrap();
    fs::write(paths.actuator_mappings(), r#"{"contexts":{}}"#).unwrap();

    let (_, source) = load_backend(&paths).unwrap();
    assert_eq!(source, BackendSource::Static);
}

// ============================================================================
// Mappings Stage Tests
// ============================================================================

#[test]
fn test_mappings_writes_handler_inventory() {
    let dir = TempDir::new().unwrap();
    let paths = ReportPaths::new(dir.path());
    fs::write(paths.actuator_mappings(), ACTUATOR_DUMP).unwrap();

    let endpoints = run_mappings(&paths).unwrap();
    assert_eq!(endpoints[0].path, "/actuator/health");
    assert_eq!(endpoints[1].handler.as_deref(), Some("TicketController#get(Long)"));

    let md = fs::read_to_string(paths.backend_md()).unwrap();
    assert!(md.contains("| GET | `/api/tickets/{id}` | `TicketController#get(Long)` |"));
}

#[test]
fn test_mappings_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = run_mappings(&ReportPaths::new(dir.path()));
    assert!(matches!(result, Err(PipelineError::MissingInput(_))));
}

#[test]
fn test_mappings_malformed_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let paths = ReportPaths::new(dir.path());
    fs::write(paths.actuator_mappings(), "not json").unwrap();
    assert!(matches!(run_mappings(&paths), Err(PipelineError::Json { .. })));
}

#[test]
fn test_mappings_without_dispatcher_is_fatal() {
    let dir = TempDir::new().unwrap();
    let paths = ReportPaths::new(dir.path());
    fs::write(paths.actuator_mappings(), r#"{"contexts":{"app":{}}}"#).unwrap();
    assert!(matches!(
        run_mappings(&paths),
        Err(PipelineError::NoDispatcherMappings(_))
    ));
}

// ============================================================================
// Compare Stage Tests
// ============================================================================

#[test]
fn test_run_all_classifies_and_writes_report() {
    let f = fixture();
    let outcome = run_all(&f.scan, &f.config).unwrap();
    let result = &outcome.reconciliation;

    let matched: Vec<&str> = result.matched.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(matched, vec!["/api/tickets/${id}"]);

    let missing: Vec<(&str, Option<&str>)> = result
        .missing
        .iter()
        .map(|m| (m.endpoint.path.as_str(), m.note.as_deref()))
        .collect();
    assert_eq!(
        missing,
        vec![
            ("/api/admin/users", None),
            ("/api/widgets", Some("Method mismatch or partial match")),
        ]
    );

    let unused: Vec<(HttpMethod, &str)> =
        result.unused.iter().map(|e| (e.method, e.path.as_str())).collect();
    assert_eq!(
        unused,
        vec![
            (HttpMethod::Delete, "/api/tickets/{id}"),
            (HttpMethod::Get, "/api/widgets"),
        ]
    );

    assert_eq!(outcome.report_path, f.config.reports_dir.join("integration-report.md"));
    let report = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(report.starts_with("# Integration Report"));
    assert!(report.contains("| DELETE | `/api/tickets/{id}` | Static |"));
}

#[test]
fn test_rerun_is_byte_identical() {
    let f = fixture();
    let paths = f.config.paths();

    run_all(&f.scan, &f.config).unwrap();
    let outputs = [
        paths.frontend_api_hits(),
        paths.frontend_route_hits(),
        paths.backend_mapping_hits(),
        paths.frontend_json(),
        paths.frontend_md(),
        paths.frontend_routes_md(),
        paths.backend_json(),
        paths.backend_md(),
        f.config.report_path(),
    ];
    let first: Vec<Vec<u8>> = outputs.iter().map(|p| fs::read(p).unwrap()).collect();

    run_all(&f.scan, &f.config).unwrap();
    let second: Vec<Vec<u8>> = outputs.iter().map(|p| fs::read(p).unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_compare_custom_output_and_json_format() {
    let f = fixture();
    let out = f.config.reports_dir.parent().unwrap().join("docs");
    let config = f
        .config
        .clone()
        .with_output_dir(&out)
        .with_report_name("ENDPOINTS-MATCH-REPORT.md")
        .with_format(ReportFormat::Json);

    run_scan(&f.scan, &config.paths()).unwrap();
    run_process(&config.paths()).unwrap();
    let outcome = run_compare(&config).unwrap();

    assert_eq!(outcome.report_path, out.join("ENDPOINTS-MATCH-REPORT.json"));
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outcome.report_path).unwrap()).unwrap();
    assert_eq!(value["report"]["summary"]["matched"], 1);
}

#[test]
fn test_compare_missing_inventory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());
    let result = run_compare(&config);
    assert!(matches!(result, Err(PipelineError::MissingInput(_))));
    assert!(!config.report_path().exists());
}

#[test]
fn test_compare_malformed_inventory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());
    let paths = config.paths();
    fs::write(paths.backend_json(), "[]").unwrap();
    fs::write(paths.frontend_json(), "[{\"method\":").unwrap();
    assert!(matches!(run_compare(&config), Err(PipelineError::Json { .. })));
}

#[test]
fn test_compare_accepts_free_text_context() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(dir.path());
    let paths = config.paths();
    fs::write(paths.backend_json(), r#"[{"method":"GET","path":"/api/users"}]"#).unwrap();
    fs::write(
        paths.frontend_json(),
        r#"[
            {"method":"GET","path":"/api/users","context":"admin"},
            {"method":"GET","path":"/api/users","context":""},
            {"method":"GET","path":"/api/users","context":"Ops"},
            {"method":"GET","path":"/api/users","context":null}
        ]"#,
    )
    .unwrap();

    let frontend: Vec<FrontendEndpoint> = read_json(&paths.frontend_json()).unwrap();
    let contexts: Vec<Option<Context>> = frontend.iter().map(|e| e.context).collect();
    assert_eq!(contexts, vec![Some(Context::Admin), None, None, None]);

    let outcome = run_compare(&config).unwrap();
    assert_eq!(outcome.reconciliation.matched.len(), 4);
}

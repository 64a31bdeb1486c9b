// Tests for the frontend extractor

use driftwatch_scanner::FrontendScanner;
use std::fs;
use tempfile::TempDir;

fn scanner() -> FrontendScanner {
    FrontendScanner::new().expect("default patterns compile")
}

// ============================================================================
// API Call Site Tests
// ============================================================================

#[test]
fn test_client_call_detected() {
    let scan = scanner().scan_text("src/api.js", "const r = await axios.get('/api/users');");
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].line, 1);
    assert_eq!(scan.api_hits[0].text, "axios.get('/api/users'");
}

#[test]
fn test_client_call_verbs() {
    let text = "api.post('/api/a', body);\napi.put(\"/api/b\");\napi.patch(`/api/c`);\napi.delete('/api/d');";
    let scan = scanner().scan_text("src/api.js", text);
    let texts: Vec<&str> = scan.api_hits.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "api.post('/api/a'",
            "api.put(\"/api/b\"",
            "api.patch(`/api/c`",
            "api.delete('/api/d'"
        ]
    );
    let lines: Vec<usize> = scan.api_hits.iter().map(|h| h.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4]);
}

#[test]
fn test_multiline_client_call() {
    let text = "function load() {\n  return this.http.get(\n    `/api/tickets/${id}`\n  );\n}";
    let scan = scanner().scan_text("src/tickets.ts", text);
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].line, 2);
    assert_eq!(scan.api_hits[0].text, "http.get( `/api/tickets/${id}`");
}

#[test]
fn test_map_get_with_plain_key_ignored() {
    let scan = scanner().scan_text("src/a.js", "const id = params.get('id');");
    assert!(scan.api_hits.is_empty());
}

#[test]
fn test_fetch_call_detected() {
    let scan = scanner().scan_text("src/a.js", "fetch('/api/health').then(r => r.json());");
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].text, "fetch('/api/health'");
}

#[test]
fn test_fetch_call_with_method_option() {
    let text = "await fetch('/api/tickets', {\n  method: 'POST',\n  body\n});";
    let scan = scanner().scan_text("src/a.js", text);
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].text, "fetch('/api/tickets', { method: 'POST'");
}

#[test]
fn test_fetch_method_after_nested_headers() {
    let text = "fetch('/api/tickets', { headers: { 'Content-Type': 'application/json' }, method: 'POST', body })";
    let scan = scanner().scan_text("src/a.js", text);
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(
        scan.api_hits[0].text,
        "fetch('/api/tickets', { headers: { 'Content-Type': 'application/json' }, method: 'POST'"
    );
}

#[test]
fn test_bare_api_literal_detected() {
    let scan = scanner().scan_text("src/const.js", "export const USERS = '/api/users?active=true';");
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].text, "'/api/users?active=true'");
}

#[test]
fn test_literal_inside_call_not_reported_twice() {
    let scan = scanner().scan_text("src/a.js", "axios.get('/api/users'); fetch('/api/me');");
    assert_eq!(scan.api_hits.len(), 2);
}

#[test]
fn test_non_api_literal_ignored() {
    let scan = scanner().scan_text("src/a.js", "const logo = '/static/logo.png'; const x = '/apiary';");
    assert!(scan.api_hits.is_empty());
}

#[test]
fn test_commented_call_ignored() {
    let text = "// axios.get('/api/old')\n/* fetch('/api/older') */\naxios.get('/api/new');";
    let scan = scanner().scan_text("src/a.js", text);
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].line, 3);
}

#[test]
fn test_hits_ordered_by_position() {
    let text = "const A = '/api/a';\naxios.get('/api/b');";
    let scan = scanner().scan_text("src/a.js", text);
    let lines: Vec<usize> = scan.api_hits.iter().map(|h| h.line).collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn test_custom_api_prefix() {
    let scanner = FrontendScanner::with_options(vec!["js".to_string()], "/rest/").unwrap();
    let scan = scanner.scan_text("src/a.js", "const a = '/rest/items'; const b = '/api/items';");
    assert_eq!(scan.api_hits.len(), 1);
    assert_eq!(scan.api_hits[0].text, "'/rest/items'");
}

// ============================================================================
// Route Declaration Tests
// ============================================================================

#[test]
fn test_jsx_route_attribute() {
    let text = "<Routes>\n  <Route path=\"/app/tickets\" element={<TicketList />} />\n  <Route path='/login' />\n</Routes>";
    let scan = scanner().scan_text("src/App.jsx", text);
    assert_eq!(scan.route_hits.len(), 2);
    assert_eq!(scan.route_hits[0].text, "path=\"/app/tickets\"");
    assert_eq!(scan.route_hits[0].line, 2);
    assert_eq!(scan.route_hits[1].text, "path='/login'");
}

#[test]
fn test_route_object_entries() {
    let text = "const routes = [{ path: '/app/admin', component: Admin }];";
    let scan = scanner().scan_text("src/routes.js", text);
    assert_eq!(scan.route_hits.len(), 1);
    assert_eq!(scan.route_hits[0].text, "path: '/app/admin'");
}

#[test]
fn test_api_path_object_is_not_a_route() {
    let text = "const req = { path: '/api/tickets', method: 'GET' };";
    let scan = scanner().scan_text("src/req.js", text);
    assert!(scan.route_hits.is_empty());
}

// ============================================================================
// Directory Scan Tests
// ============================================================================

#[test]
fn test_scan_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("src/components"))?;
    fs::create_dir_all(dir.path().join("node_modules/axios"))?;
    fs::write(
        dir.path().join("src/components/AdminUsers.jsx"),
        "axios.delete(`/api/admin/users/${id}`);",
    )?;
    fs::write(dir.path().join("src/App.jsx"), "<Route path=\"/app\" />")?;
    fs::write(dir.path().join("src/notes.txt"), "axios.get('/api/ignored')")?;
    fs::write(
        dir.path().join("node_modules/axios/index.js"),
        "axios.get('/api/vendor')",
    )?;

    let scan = scanner().scan(dir.path());
    assert_eq!(scan.api_hits.len(), 1);
    assert!(scan.api_hits[0].file.ends_with("src/components/AdminUsers.jsx"));
    assert_eq!(scan.route_hits.len(), 1);

    Ok(())
}

#[test]
fn test_scan_missing_directory_is_empty() {
    let scan = scanner().scan(std::path::Path::new("/no/such/frontend"));
    assert!(scan.api_hits.is_empty());
    assert!(scan.route_hits.is_empty());
}

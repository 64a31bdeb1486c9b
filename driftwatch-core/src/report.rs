// Report generation: endpoint inventories and the integration report

use crate::matcher::Reconciliation;
use crate::model::{BackendEndpoint, FrontendEndpoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

// Keep user text from breaking out of a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn generate_frontend_inventory(endpoints: &[FrontendEndpoint]) -> String {
    let mut md = String::from(
        "# Frontend API Calls\n\n| Method | Path | Location | Context |\n|---|---|---|---|\n",
    );
    for ep in endpoints {
        md.push_str(&format!(
            "| {} | `{}` | `{}` | {} |\n",
            ep.method,
            cell(&ep.path),
            cell(ep.location.as_deref().unwrap_or("")),
            ep.context.map(|c| c.as_str()).unwrap_or("")
        ));
    }
    md
}

pub fn generate_route_inventory(routes: &[String]) -> String {
    let mut md = String::from("# Frontend Routes\n\n");
    for route in routes {
        md.push_str(&format!("- `{}`\n", route));
    }
    md
}

pub fn generate_backend_inventory(endpoints: &[BackendEndpoint]) -> String {
    let mut md =
        String::from("# Backend Endpoints (Inventory)\n\n| Method | Path | Source |\n|---|---|---|\n");
    for ep in endpoints {
        md.push_str(&format!(
            "| {} | `{}` | {} |\n",
            ep.method,
            cell(&ep.path),
            cell(ep.source.as_deref().unwrap_or(""))
        ));
    }
    md
}

/// Inventory straight from actuator mappings, listing the handler of each route
pub fn generate_handler_inventory(endpoints: &[BackendEndpoint]) -> String {
    let mut md =
        String::from("# Backend Endpoints Inventory\n\n| Method | Path | Handler |\n|---|---|---|\n");
    for ep in endpoints {
        md.push_str(&format!(
            "| {} | `{}` | `{}` |\n",
            ep.method,
            cell(&ep.path),
            cell(ep.handler.as_deref().unwrap_or(""))
        ));
    }
    md
}

pub fn generate_markdown_report(data: &Reconciliation) -> String {
    let mut report = String::from("# Integration Report\n\n");

    report.push_str("## ✅ Matched endpoints\n\n");
    report.push_str("| Method | Path | Frontend Context |\n|---|---|---|\n");
    for m in &data.matched {
        report.push_str(&format!(
            "| {} | `{}` | {} |\n",
            m.method,
            cell(&m.path),
            m.context.map(|c| c.as_str()).unwrap_or("")
        ));
    }

    report.push_str("\n## ❌ Frontend calls missing in backend (Potential 404s)\n\n");
    report.push_str("| Method | Path | Location | Note |\n|---|---|---|---|\n");
    for m in &data.missing {
        report.push_str(&format!(
            "| {} | `{}` | `{}` | {} |\n",
            m.endpoint.method,
            cell(&m.endpoint.path),
            cell(m.endpoint.location.as_deref().unwrap_or("")),
            m.note.as_deref().unwrap_or("")
        ));
    }

    report.push_str("\n## ❌ Backend endpoints unused by frontend\n\n");
    report.push_str("| Method | Path | Source |\n|---|---|---|\n");
    for u in &data.unused {
        report.push_str(&format!(
            "| {} | `{}` | {} |\n",
            u.method,
            cell(&u.path),
            cell(u.source.as_deref().unwrap_or(""))
        ));
    }

    report.push_str("\n## 🔐 Auth/Route Issues\n\n");
    report.push_str("- Check these potential issues manually:\n");
    report.push_str("  - Frontend calls to `/api/auth/me` should handle 401 gracefully.\n");
    report.push_str("  - Routes should generally follow `/app/**` structure.\n");

    report
}

pub fn generate_json_report(data: &Reconciliation) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "driftwatch",
                "version": env!("CARGO_PKG_VERSION"),
                "format": "json"
            },
            "summary": {
                "matched": data.matched.len(),
                "missing_in_backend": data.missing.len(),
                "backend_used": data.used.len(),
                "backend_unused": data.unused.len(),
                "infrastructure_excluded": data.infrastructure.len()
            },
            "matched": data.matched,
            "missing_in_backend": data.missing,
            "unused_by_frontend": data.unused
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_report(data: &Reconciliation, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
        ReportFormat::Json => generate_json_report(data),
    }
}

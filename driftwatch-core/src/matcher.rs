// Matching frontend call sites against backend routes

use crate::model::{BackendEndpoint, FrontendEndpoint, HttpMethod};
use crate::normalize::{endpoint_key, normalize_path, path_matches};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

pub const METHOD_MISMATCH_NOTE: &str = "Method mismatch or partial match";

/// A frontend call with no compatible backend route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEndpoint {
    #[serde(flatten)]
    pub endpoint: FrontendEndpoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Classification of both inventories. Every frontend record lands in exactly one
/// of `matched`/`missing`; every backend record lands in exactly one of
/// `used`/`unused`/`infrastructure`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub matched: Vec<FrontendEndpoint>,
    pub missing: Vec<MissingEndpoint>,
    pub used: Vec<BackendEndpoint>,
    pub unused: Vec<BackendEndpoint>,
    pub infrastructure: Vec<BackendEndpoint>,
}

/// A record reduced to what matching looks at
struct Route {
    method: HttpMethod,
    path: String,
}

impl Route {
    fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: normalize_path(path),
        }
    }
}

/// A backend verb accepts a frontend verb when they are equal, when the backend
/// mapping is generic (ALL/VARIOUS), or when the frontend verb is unknown
pub fn methods_compatible(frontend: HttpMethod, backend: HttpMethod) -> bool {
    frontend == backend
        || matches!(backend, HttpMethod::All | HttpMethod::Various)
        || frontend == HttpMethod::Unknown
}

fn routes_match(frontend: &Route, backend: &Route) -> bool {
    methods_compatible(frontend.method, backend.method) && path_matches(&backend.path, &frontend.path)
}

pub struct Matcher {
    infrastructure_prefixes: Vec<String>,
}

impl Matcher {
    pub fn new(infrastructure_prefixes: Vec<String>) -> Self {
        Self {
            infrastructure_prefixes: infrastructure_prefixes
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Framework routes (health, error pages) that never count as unused
    pub fn is_infrastructure(&self, path: &str) -> bool {
        let normalized = normalize_path(path);
        self.infrastructure_prefixes
            .iter()
            .any(|prefix| normalized.starts_with(prefix.as_str()))
    }

    pub fn reconcile(
        &self,
        backend: &[BackendEndpoint],
        frontend: &[FrontendEndpoint],
    ) -> Reconciliation {
        let backend_keys: HashSet<String> = backend
            .iter()
            .map(|e| endpoint_key(e.method, &e.path))
            .collect();
        let frontend_keys: HashSet<String> = frontend
            .iter()
            .map(|e| endpoint_key(e.method, &e.path))
            .collect();

        let backend_routes: Vec<Route> = backend.iter().map(|e| Route::new(e.method, &e.path)).collect();
        let frontend_routes: Vec<Route> = frontend
            .iter()
            .map(|e| Route::new(e.method, &e.path))
            .collect();

        let mut result = Reconciliation::default();

        for (fe, route) in frontend.iter().zip(&frontend_routes) {
            let key = endpoint_key(fe.method, &fe.path);
            if backend_keys.contains(&key) || backend_routes.iter().any(|be| routes_match(route, be)) {
                result.matched.push(fe.clone());
            } else {
                // Path exists as a GET or POST route
                let note = backend_routes
                    .iter()
                    .any(|be| {
                        matches!(be.method, HttpMethod::Get | HttpMethod::Post)
                            && path_matches(&be.path, &route.path)
                    })
                    .then(|| METHOD_MISMATCH_NOTE.to_string());
                result.missing.push(MissingEndpoint {
                    endpoint: fe.clone(),
                    note,
                });
            }
        }

        for (be, route) in backend.iter().zip(&backend_routes) {
            if self.is_infrastructure(&be.path) {
                result.infrastructure.push(be.clone());
                continue;
            }

            let key = endpoint_key(be.method, &be.path);
            if frontend_keys.contains(&key) || frontend_routes.iter().any(|fe| routes_match(fe, route)) {
                result.used.push(be.clone());
            } else {
                result.unused.push(be.clone());
            }
        }

        debug!(
            "Reconciled: {} matched, {} missing, {} used, {} unused, {} infrastructure",
            result.matched.len(),
            result.missing.len(),
            result.used.len(),
            result.unused.len(),
            result.infrastructure.len()
        );

        result
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_INFRASTRUCTURE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

// Backend aggregation from static mapping hits: class prefix + method fragment composition

use crate::model::{BackendEndpoint, HttpMethod};
use crate::normalize::collapse_slashes;
use driftwatch_scanner::Hit;
use driftwatch_scanner::backend::annotation_end;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, trace};

pub const STATIC_SOURCE: &str = "Static";

static MAPPING_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(Request|Get|Post|Put|Delete|Patch)Mapping\b")
        .expect("MAPPING_NAME is a valid regex pattern")
});

static PATH_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:value|path)\s*=\s*(\{[^}]*\}|\[[^\]]*\]|"[^"]*"|'[^']*')"#)
        .expect("PATH_ATTRIBUTE is a valid regex pattern")
});

static POSITIONAL_PATHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(\{[^}]*\}|\[[^\]]*\]|"[^"]*"|'[^']*')"#)
        .expect("POSITIONAL_PATHS is a valid regex pattern")
});

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("STRING_LITERAL is a valid regex pattern")
});

static METHOD_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bmethod\s*=\s*(\{[^}]*\}|\[[^\]]*\]|[\w.]+)")
        .expect("METHOD_ATTRIBUTE is a valid regex pattern")
});

static METHOD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS|TRACE)\b")
        .expect("METHOD_NAME is a valid regex pattern")
});

/// One parsed mapping annotation
#[derive(Debug, Clone, PartialEq)]
pub struct MappingAnnotation {
    pub method: HttpMethod,
    /// Declared paths; a single empty string when none is given
    pub paths: Vec<String>,
    /// `@RequestMapping` without a `method` restriction
    pub generic: bool,
}

/// Parse the text of a mapping hit such as `@GetMapping(value = "/{id}")`.
/// Returns `None` when the text holds no mapping annotation.
pub fn parse_mapping(text: &str) -> Option<MappingAnnotation> {
    let m = MAPPING_NAME.captures(text)?;
    let whole = m.get(0)?;
    let kind = m.get(1)?.as_str();

    let end = annotation_end(text, whole.end());
    let args = text[whole.end()..end]
        .trim()
        .strip_prefix('(')
        .and_then(|a| a.strip_suffix(')'))
        .unwrap_or("");

    let mut paths = declared_paths(args);
    if paths.is_empty() {
        paths.push(String::new());
    }

    let (method, generic) = match kind {
        "Get" => (HttpMethod::Get, false),
        "Post" => (HttpMethod::Post, false),
        "Put" => (HttpMethod::Put, false),
        "Delete" => (HttpMethod::Delete, false),
        "Patch" => (HttpMethod::Patch, false),
        _ => {
            let restricted = restricted_methods(args);
            match restricted.as_slice() {
                [] => (HttpMethod::All, true),
                [single] => (*single, false),
                _ => (HttpMethod::Various, false),
            }
        }
    };

    Some(MappingAnnotation {
        method,
        paths,
        generic,
    })
}

fn declared_paths(args: &str) -> Vec<String> {
    let group = PATH_ATTRIBUTE
        .captures(args)
        .or_else(|| POSITIONAL_PATHS.captures(args))
        .and_then(|caps| caps.get(1));

    let Some(group) = group else {
        return Vec::new();
    };

    STRING_LITERAL
        .captures_iter(group.as_str())
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

fn restricted_methods(args: &str) -> Vec<HttpMethod> {
    let Some(caps) = METHOD_ATTRIBUTE.captures(args) else {
        return Vec::new();
    };

    let mut methods: Vec<HttpMethod> = METHOD_NAME
        .captures_iter(&caps[1])
        .map(|c| HttpMethod::parse_lenient(&c[1]))
        .collect();
    methods.dedup();
    methods
}

/// Join a class-level prefix and a method-level fragment. A doubled slash at the
/// join collapses to one and a slash is inserted when neither side has one.
pub fn join_paths(prefix: &str, fragment: &str) -> String {
    let mut full = prefix.to_string();
    if !fragment.is_empty() {
        match (full.ends_with('/'), fragment.starts_with('/')) {
            (true, true) => full.push_str(&fragment[1..]),
            (false, false) => {
                full.push('/');
                full.push_str(fragment);
            }
            _ => full.push_str(fragment),
        }
    }

    let full = collapse_slashes(&full);
    if full.is_empty() { "/".to_string() } else { full }
}

/// Index of the class-level declaration: the first generic mapping whose
/// first path is non-empty
fn prefix_position(mappings: &[MappingAnnotation]) -> Option<usize> {
    mappings
        .iter()
        .position(|m| m.generic && m.paths.first().is_some_and(|p| !p.is_empty()))
}

/// The class-level prefix of one controller file: the first path of the first
/// generic mapping that declares one
pub fn controller_prefix(mappings: &[MappingAnnotation]) -> &str {
    prefix_position(mappings)
        .and_then(|i| mappings[i].paths.first())
        .map(String::as_str)
        .unwrap_or("")
}

/// Build backend endpoints from static mapping hits, grouped by controller file
pub fn process_static_hits(hits: &[Hit]) -> Vec<BackendEndpoint> {
    let mut by_file: BTreeMap<&str, Vec<MappingAnnotation>> = BTreeMap::new();
    for hit in hits {
        match parse_mapping(&hit.text) {
            Some(mapping) => by_file.entry(hit.file.as_str()).or_default().push(mapping),
            None => trace!("No mapping annotation in {}", hit),
        }
    }

    let mut endpoints = Vec::new();
    for (file, mappings) in &by_file {
        let prefix_at = prefix_position(mappings);
        let prefix = controller_prefix(mappings);
        debug!("{}: prefix '{}', {} mappings", file, prefix, mappings.len());

        for (i, mapping) in mappings.iter().enumerate() {
            // The class-level declaration itself is not an endpoint, whatever paths it lists
            if prefix_at == Some(i) {
                continue;
            }
            for fragment in &mapping.paths {
                // A repeated class-level declaration
                if mapping.generic && fragment == prefix {
                    continue;
                }
                endpoints.push(BackendEndpoint {
                    method: mapping.method,
                    path: join_paths(prefix, fragment),
                    source: Some(STATIC_SOURCE.to_string()),
                    handler: None,
                });
            }
        }
    }

    endpoints
}

/// Sort by path, then method, so inventories are stable between runs
pub fn sort_endpoints(endpoints: &mut [BackendEndpoint]) {
    endpoints.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));
}

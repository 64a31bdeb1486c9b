// Frontend aggregation: API hits to endpoint records, route hits to a route inventory

use crate::model::{Context, FrontendEndpoint, HttpMethod};
use crate::normalize::clean_path;
use driftwatch_scanner::Hit;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::trace;

static CLIENT_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\s*(?i:(get|post|put|patch|delete))\s*\(")
        .expect("CLIENT_VERB is a valid regex pattern")
});

static FETCH_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfetch\s*\(").expect("FETCH_CALL is a valid regex pattern"));

static FETCH_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bmethod\s*:\s*["'`]([A-Za-z]+)["'`]"#)
        .expect("FETCH_METHOD is a valid regex pattern")
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["'`]([^"'`]+)["'`]"#).expect("QUOTED is a valid regex pattern")
});

static ROUTE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bpath\s*[=:]\s*\{?\s*["'`]([^"'`]+)["'`]"#)
        .expect("ROUTE_PATH is a valid regex pattern")
});

/// Verb of a call site: `.post(` and friends give their verb, `fetch(` gives its
/// `method:` option or GET, and a bare literal gives `Unknown`.
pub fn infer_method(text: &str) -> HttpMethod {
    if let Some(caps) = CLIENT_VERB.captures(text) {
        return HttpMethod::parse_lenient(&caps[1]);
    }
    if FETCH_CALL.is_match(text) {
        return FETCH_METHOD
            .captures(text)
            .map(|caps| HttpMethod::parse_lenient(&caps[1]))
            .unwrap_or(HttpMethod::Get);
    }
    HttpMethod::Unknown
}

/// URL literal of a call site: the first literal after the call's opening
/// parenthesis, otherwise the first literal anywhere in the text
pub fn extract_url(text: &str) -> Option<String> {
    let call_end = CLIENT_VERB
        .find(text)
        .or_else(|| FETCH_CALL.find(text))
        .map(|m| m.end());

    let caps = match call_end {
        Some(end) => QUOTED.captures_at(text, end).or_else(|| QUOTED.captures(text)),
        None => QUOTED.captures(text),
    }?;
    Some(caps[1].to_string())
}

/// Advisory tag from the file path
pub fn infer_context(location: &str) -> Context {
    if location.to_lowercase().contains("admin") {
        Context::Admin
    } else {
        Context::User
    }
}

/// Convert API hits into endpoint records, in hit order
pub fn process_frontend_hits(hits: &[Hit]) -> Vec<FrontendEndpoint> {
    let mut endpoints = Vec::new();

    for hit in hits {
        let Some(url) = extract_url(&hit.text) else {
            trace!("No URL literal in {}", hit);
            continue;
        };
        let path = clean_path(&url);
        if path.is_empty() {
            continue;
        }

        let location = hit.location();
        endpoints.push(FrontendEndpoint {
            method: infer_method(&hit.text),
            path,
            context: Some(infer_context(&location)),
            location: Some(location),
        });
    }

    endpoints
}

/// Distinct page routes, sorted
pub fn process_route_hits(hits: &[Hit]) -> Vec<String> {
    hits.iter()
        .filter_map(|hit| ROUTE_PATH.captures(&hit.text))
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

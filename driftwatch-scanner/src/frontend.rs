// Frontend extractor: HTTP call sites, bare API literals and page route declarations

use crate::error::Result;
use crate::result::Hit;
use crate::source::{
    LineIndex, collapse_whitespace, display_path, has_extension, mask_comments, read_source,
    walk_sources,
};
use regex::Regex;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_FRONTEND_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "vue", "html"];
pub const DEFAULT_API_PREFIX: &str = "/api";

// A quoted literal that looks like a URL: absolute path, full URL or `${base}`-prefixed
const URL_LITERAL: &str = r#"(?:"(?:/|https?:|\$\{)[^"\n]*"|'(?:/|https?:|\$\{)[^'\n]*'|`(?:/|https?:|\$\{)[^`]*`)"#;
const ANY_LITERAL: &str = r#"(?:"[^"\n]*"|'[^'\n]*'|`[^`]*`)"#;

/// Hits found in a frontend tree
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrontendScan {
    /// API call sites and bare API literals
    pub api_hits: Vec<Hit>,
    /// Page route declarations
    pub route_hits: Vec<Hit>,
}

pub struct FrontendScanner {
    extensions: Vec<String>,
    api_prefix: String,
    client_call: Regex,
    fetch_call: Regex,
    api_literal: Regex,
    route_attr: Regex,
    route_object: Regex,
}

impl FrontendScanner {
    pub fn new() -> Result<Self> {
        Self::with_options(
            DEFAULT_FRONTEND_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_API_PREFIX,
        )
    }

    pub fn with_options(extensions: Vec<String>, api_prefix: &str) -> Result<Self> {
        let api_prefix = api_prefix.trim_end_matches('/').to_string();
        let p = regex::escape(&api_prefix);

        let client_call = Regex::new(&format!(
            r"[A-Za-z_$][\w$]*\s*\.\s*(?i:get|post|put|patch|delete)\s*\(\s*{URL_LITERAL}"
        ))?;
        let fetch_call = Regex::new(&format!(
            r#"\bfetch\s*\(\s*{ANY_LITERAL}(?:\s*,\s*\{{(?:[^{{}}]|\{{[^{{}}]*\}})*?\bmethod\s*:\s*["'`][A-Za-z]+["'`])?"#
        ))?;
        let api_literal = Regex::new(&format!(
            r#"(?:"(?:\$\{{[^}}"\n]*\}})?{p}(?:[/?#][^"\n]*)?"|'(?:\$\{{[^}}'\n]*\}})?{p}(?:[/?#][^'\n]*)?'|`(?:\$\{{[^}}`]*\}})?{p}(?:[/?#][^`]*)?`)"#
        ))?;
        let route_attr = Regex::new(&format!(
            r#"\bpath\s*=\s*(?:"[^"\n]*"|'[^'\n]*'|\{{\s*{ANY_LITERAL}\s*\}})"#
        ))?;
        let route_object = Regex::new(r#"\bpath\s*:\s*(?:"/[^"\n]*"|'/[^'\n]*'|`/[^`]*`)"#)?;

        Ok(Self {
            extensions,
            api_prefix,
            client_call,
            fetch_call,
            api_literal,
            route_attr,
            route_object,
        })
    }

    /// Scan every matching file under `root`. Unreadable files are skipped.
    pub fn scan(&self, root: &Path) -> FrontendScan {
        info!("Scanning frontend sources under {}", root.display());
        let mut scan = FrontendScan::default();

        for path in walk_sources(root, |p| has_extension(p, &self.extensions)) {
            let text = match read_source(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };
            let file_scan = self.scan_text(&display_path(&path), &text);
            debug!(
                "{}: {} api hits, {} route hits",
                path.display(),
                file_scan.api_hits.len(),
                file_scan.route_hits.len()
            );
            scan.api_hits.extend(file_scan.api_hits);
            scan.route_hits.extend(file_scan.route_hits);
        }

        info!(
            "Frontend scan found {} api hits and {} route hits",
            scan.api_hits.len(),
            scan.route_hits.len()
        );
        scan
    }

    /// Scan the full text of one file. Matching runs on the comment-masked text,
    /// so calls split across lines are found and commented-out calls are not.
    pub fn scan_text(&self, file: &str, text: &str) -> FrontendScan {
        let masked = mask_comments(text);
        let index = LineIndex::new(&masked);

        let mut api: Vec<(usize, Hit)> = Vec::new();
        let mut covered: Vec<Range<usize>> = Vec::new();

        for regex in [&self.client_call, &self.fetch_call] {
            for m in regex.find_iter(&masked) {
                if overlaps(&covered, &m.range()) {
                    continue;
                }
                covered.push(m.range());
                api.push((
                    m.start(),
                    Hit::new(file, index.line_of(m.start()), collapse_whitespace(m.as_str())),
                ));
            }
        }

        for m in self.api_literal.find_iter(&masked) {
            if overlaps(&covered, &m.range()) {
                continue;
            }
            api.push((
                m.start(),
                Hit::new(file, index.line_of(m.start()), collapse_whitespace(m.as_str())),
            ));
        }
        api.sort_by_key(|(start, _)| *start);

        let mut routes: Vec<(usize, Hit)> = Vec::new();
        for regex in [&self.route_attr, &self.route_object] {
            for m in regex.find_iter(&masked) {
                if self.is_api_route_value(m.as_str()) {
                    continue;
                }
                routes.push((
                    m.start(),
                    Hit::new(file, index.line_of(m.start()), collapse_whitespace(m.as_str())),
                ));
            }
        }
        routes.sort_by_key(|(start, _)| *start);

        FrontendScan {
            api_hits: api.into_iter().map(|(_, hit)| hit).collect(),
            route_hits: routes.into_iter().map(|(_, hit)| hit).collect(),
        }
    }

    // `{ path: '/api/...' }` objects are request descriptors, not page routes
    fn is_api_route_value(&self, matched: &str) -> bool {
        matched
            .find(['"', '\'', '`'])
            .is_some_and(|i| matched[i + 1..].starts_with(&self.api_prefix))
    }
}

fn overlaps(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|span| span.start < range.end && range.start < span.end)
}

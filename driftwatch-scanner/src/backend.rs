// Backend extractor: route mapping annotations in controller sources

use crate::error::Result;
use crate::result::Hit;
use crate::source::{
    LineIndex, collapse_whitespace, display_path, mask_comments, read_source, walk_sources,
};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_CONTROLLER_SUFFIXES: &[&str] = &["Controller.java", "Controller.kt"];

pub struct BackendScanner {
    controller_suffixes: Vec<String>,
    mapping: Regex,
}

impl BackendScanner {
    pub fn new() -> Result<Self> {
        Self::with_suffixes(
            DEFAULT_CONTROLLER_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    pub fn with_suffixes(controller_suffixes: Vec<String>) -> Result<Self> {
        Ok(Self {
            controller_suffixes,
            mapping: Regex::new(r"@(?:Request|Get|Post|Put|Delete|Patch)Mapping\b")?,
        })
    }

    /// True when the file name carries one of the controller suffixes
    pub fn is_controller(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.controller_suffixes.iter().any(|s| name.ends_with(s.as_str())))
    }

    /// Scan every controller file under `root`. Unreadable files are skipped.
    pub fn scan(&self, root: &Path) -> Vec<Hit> {
        info!("Scanning backend controllers under {}", root.display());
        let mut hits = Vec::new();

        for path in walk_sources(root, |p| self.is_controller(p)) {
            match read_source(&path) {
                Ok(text) => {
                    let file_hits = self.scan_text(&display_path(&path), &text);
                    debug!("{}: {} mapping hits", path.display(), file_hits.len());
                    hits.extend(file_hits);
                }
                Err(e) => warn!("{}", e),
            }
        }

        info!("Backend scan found {} mapping hits", hits.len());
        hits
    }

    /// Find mapping annotations together with their argument lists, which may span lines
    pub fn scan_text(&self, file: &str, text: &str) -> Vec<Hit> {
        let masked = mask_comments(text);
        let index = LineIndex::new(&masked);

        self.mapping
            .find_iter(&masked)
            .map(|m| {
                let end = annotation_end(&masked, m.end());
                Hit::new(
                    file,
                    index.line_of(m.start()),
                    collapse_whitespace(&masked[m.start()..end]),
                )
            })
            .collect()
    }
}

/// End offset of an annotation whose name ends at `name_end`: past the balanced
/// argument list when there is one, otherwise the name itself.
pub fn annotation_end(text: &str, name_end: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = name_end;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'(') {
        return name_end;
    }

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    // Unbalanced argument list: keep just the annotation name
    name_end
}

// Source tree walking and text helpers shared by the frontend and backend scanners

use crate::error::{Result, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", "dist", "build", "target", ".git"];

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// Walk `root` recursively in file-name order and return every file accepted by `filter`.
/// A missing root is not an error: it yields no files.
pub fn walk_sources<F>(root: &Path, filter: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    if !root.exists() {
        warn!("Source root {} does not exist, skipping", root.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() && filter(entry.path()) => {
                files.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry under {}: {}", root.display(), e),
        }
    }

    debug!("Found {} candidate files under {}", files.len(), root.display());
    files
}

/// Read a source file, replacing invalid UTF-8 rather than failing
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ScanError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Path as printed in hit lines (always forward slashes)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// True when the file extension is one of `extensions` (case-insensitive, no leading dot)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

#[derive(Clone, Copy)]
enum MaskState {
    Code,
    LineComment,
    BlockComment,
    Literal(u8),
}

/// Blank out `//` and `/* */` comments, keeping every byte offset and newline in place.
/// String, char and template literals are left untouched, so `'http://host'` survives.
pub fn mask_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = MaskState::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            MaskState::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = MaskState::LineComment;
                    i += 2;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = MaskState::BlockComment;
                    i += 2;
                    continue;
                }
                (b'"' | b'\'' | b'`', _) => state = MaskState::Literal(b),
                _ => {}
            },
            MaskState::LineComment => {
                if b == b'\n' {
                    state = MaskState::Code;
                } else {
                    out[i] = b' ';
                }
            }
            MaskState::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = MaskState::Code;
                    i += 2;
                    continue;
                }
                if b != b'\n' {
                    out[i] = b' ';
                }
            }
            MaskState::Literal(quote) => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                // An unterminated quote (an apostrophe in JSX text) ends at the line break
                if b == quote || (b == b'\n' && quote != b'`') {
                    state = MaskState::Code;
                }
            }
        }
        i += 1;
    }

    // Only ASCII bytes were replaced with spaces, so this cannot fail in practice
    String::from_utf8(out).unwrap_or_else(|_| text.to_string())
}

/// Maps byte offsets to 1-based line numbers
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Path normalization: the comparison form of every endpoint path

use crate::model::HttpMethod;
use regex::Regex;
use std::sync::LazyLock;

/// Canonical token for a variable path segment
pub const PLACEHOLDER: &str = "*";

static TEMPLATE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{[^}]*\}").expect("TEMPLATE_VAR is a valid regex pattern")
});

static BRACE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("BRACE_VAR is a valid regex pattern"));

static COLON_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|/):[A-Za-z0-9_]+").expect("COLON_VAR is a valid regex pattern")
});

static MULTI_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("MULTI_SLASH is a valid regex pattern"));

static SCHEME_AND_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?)://[^/]*").expect("SCHEME_AND_HOST is a valid regex pattern")
});

static LEADING_BASE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{[^}]*\}/").expect("LEADING_BASE_VAR is a valid regex pattern")
});

/// Remove every quote character and surrounding whitespace
pub fn strip_quotes(raw: &str) -> String {
    raw.replace(['"', '\'', '`'], "").trim().to_string()
}

/// Collapse runs of slashes into one
pub fn collapse_slashes(path: &str) -> String {
    MULTI_SLASH.replace_all(path, "/").into_owned()
}

/// Display form of a path taken from a call site: quotes removed, scheme and host
/// of absolute URLs dropped, and a leading `${BASE_URL}` dropped when a path follows it.
/// Casing and placeholders are kept.
pub fn clean_path(raw: &str) -> String {
    let path = strip_quotes(raw);
    let path = match SCHEME_AND_HOST.find(&path) {
        Some(m) if m.end() == path.len() => "/".to_string(),
        Some(m) => path[m.end()..].to_string(),
        None => path,
    };
    LEADING_BASE_VAR.replace(&path, "/").into_owned()
}

/// Comparison form of a path:
/// 1. quotes stripped
/// 2. `${x}`, `{x}` and `:x` segments replaced with [`PLACEHOLDER`]
/// 3. query string and fragment dropped
/// 4. lower-cased
///
/// Repeated slashes are collapsed and trailing slashes and whitespace dropped. Applying it twice
/// gives the same result as applying it once.
pub fn normalize_path(raw: &str) -> String {
    let path = strip_quotes(raw);
    if path.is_empty() {
        return path;
    }

    // `${x}` first, otherwise the brace rule would leave a stray `$`
    let path = TEMPLATE_VAR.replace_all(&path, PLACEHOLDER);
    let path = BRACE_VAR.replace_all(&path, PLACEHOLDER);
    let path = COLON_VAR.replace_all(&path, "${1}*");

    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let mut path = collapse_slashes(path);
    // Whitespace left in front of a cut query string counts as trailing
    while path.len() > 1 && path.ends_with(|c: char| c == '/' || c.is_whitespace()) {
        path.pop();
    }

    path.to_lowercase()
}

/// `METHOD:normalized_path`, the key both endpoint sets are built from
pub fn endpoint_key(method: HttpMethod, path: &str) -> String {
    format!("{}:{}", method.as_str(), normalize_path(path))
}

/// Segment-wise match of two normalized paths. [`PLACEHOLDER`] on either side
/// matches any single segment; `**` in the pattern matches everything after it.
pub fn path_matches(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let candidate: Vec<&str> = candidate.split('/').collect();
    segments_match(&pattern, &candidate)
}

fn segments_match(pattern: &[&str], candidate: &[&str]) -> bool {
    match (pattern.split_first(), candidate.split_first()) {
        (Some((&"**", _)), _) => true,
        (None, None) => true,
        (Some((p, p_rest)), Some((c, c_rest))) => {
            (p == c || *p == PLACEHOLDER || *c == PLACEHOLDER) && segments_match(p_rest, c_rest)
        }
        _ => false,
    }
}

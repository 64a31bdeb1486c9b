use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the location and the matched text in a hit line
pub const HIT_SEPARATOR: &str = " => ";

/// A single matched source location, rendered as `<file>:<line> => <text>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hit {
    pub file: String,
    pub line: usize,
    pub text: String,
}

impl Hit {
    pub fn new(file: impl Into<String>, line: usize, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            text: text.into(),
        }
    }

    /// The `<file>:<line>` part of the hit line
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }

    /// Parse a hit line. The location is split at its last `:`, so file
    /// names containing colons survive. A location without a numeric line
    /// suffix is kept whole with line 0.
    pub fn parse_line(line: &str) -> Result<Self> {
        let (location, text) = line
            .split_once(HIT_SEPARATOR)
            .ok_or_else(|| ScanError::ParseError(format!("missing '=>' in hit line: {}", line)))?;

        let location = location.trim();
        let (file, line_no) = match location.rsplit_once(':') {
            Some((file, n)) if !file.is_empty() => match n.trim().parse::<usize>() {
                Ok(n) => (file, n),
                Err(_) => (location, 0),
            },
            _ => (location, 0),
        };

        Ok(Self::new(file, line_no, text.trim()))
    }

    /// Parse every well-formed line of a hits file, skipping blank and malformed lines
    pub fn parse_lines(content: &str) -> Vec<Self> {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| Self::parse_line(line).ok())
            .collect()
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.location(), HIT_SEPARATOR, self.text)
    }
}

/// Render hits as the newline-terminated text of a hits file
pub fn render_hits(hits: &[Hit]) -> String {
    let mut out = String::new();
    for hit in hits {
        out.push_str(&hit.to_string());
        out.push('\n');
    }
    out
}

// Canonical endpoint records shared by every pipeline stage

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Generic mapping with no method restriction
    All,
    /// Verb could not be determined from the call site
    Unknown,
    /// Generic mapping restricted to several methods
    Various,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::All => "ALL",
            HttpMethod::Unknown => "UNKNOWN",
            HttpMethod::Various => "VARIOUS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "ALL" => Some(HttpMethod::All),
            "UNKNOWN" => Some(HttpMethod::Unknown),
            "VARIOUS" => Some(HttpMethod::Various),
            _ => None,
        }
    }

    /// Like `from_str`, but verbs outside the enumeration (HEAD, OPTIONS, ...) become `Unknown`
    pub fn parse_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or(HttpMethod::Unknown)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for HttpMethod {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Coarse, advisory classification of where a frontend call lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Context {
    Admin,
    User,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Admin => "Admin",
            Context::User => "User",
        }
    }

    /// Case-insensitive; anything other than admin/user gives `None`
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Context::Admin),
            "user" => Some(Context::User),
            _ => None,
        }
    }
}

// The tag is advisory, so hand-edited inventories with odd values still load
fn deserialize_context<'de, D>(deserializer: D) -> Result<Option<Context>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Context::from_str))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendEndpoint {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_context",
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<Context>,
}

impl FrontendEndpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            location: None,
            context: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEndpoint {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl BackendEndpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            source: None,
            handler: None,
        }
    }
}

/// Where the backend inventory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSource {
    Actuator,
    Static,
    None,
}

impl BackendSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendSource::Actuator => "Actuator",
            BackendSource::Static => "Static",
            BackendSource::None => "none",
        }
    }
}

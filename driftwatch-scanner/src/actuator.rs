// Live introspection source: downloads a Spring Boot actuator mappings document

use crate::error::{Result, ScanError};
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetch the mappings document at `url` and return it pretty-printed.
/// The body must be JSON; its schema is checked later by the backend aggregator.
pub async fn fetch_actuator_mappings(url: &str, timeout_secs: u64) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScanError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            url,
            parsed.scheme()
        )));
    }

    let client = Client::builder()
        .user_agent(concat!("driftwatch/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    info!("Fetching actuator mappings from {}", parsed);
    let response = client
        .get(parsed.clone())
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::UnexpectedStatus {
            url: parsed.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    debug!("Received {} bytes from {}", body.len(), parsed);

    let document: serde_json::Value =
        serde_json::from_str(&body).map_err(|source| ScanError::InvalidJson {
            url: parsed.to_string(),
            source,
        })?;

    serde_json::to_string_pretty(&document).map_err(|source| ScanError::InvalidJson {
        url: parsed.to_string(),
        source,
    })
}

// Backend aggregation from a Spring Boot actuator mappings document

use crate::model::{BackendEndpoint, HttpMethod};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

pub const ACTUATOR_SOURCE: &str = "Actuator";

#[derive(Debug, Deserialize)]
pub struct ActuatorDocument {
    #[serde(default)]
    pub contexts: BTreeMap<String, ActuatorContext>,
}

#[derive(Debug, Deserialize)]
pub struct ActuatorContext {
    #[serde(default)]
    pub mappings: Option<ContextMappings>,
}

#[derive(Debug, Deserialize)]
pub struct ContextMappings {
    #[serde(rename = "dispatcherServlets", default)]
    pub dispatcher_servlets: Option<BTreeMap<String, Vec<DispatcherMapping>>>,
}

#[derive(Debug, Deserialize)]
pub struct DispatcherMapping {
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub details: Option<MappingDetails>,
}

#[derive(Debug, Deserialize)]
pub struct MappingDetails {
    #[serde(rename = "requestMappingConditions", default)]
    pub request_mapping_conditions: Option<RequestMappingConditions>,
}

#[derive(Debug, Deserialize)]
pub struct RequestMappingConditions {
    #[serde(default)]
    pub methods: Option<Vec<String>>,
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
}

pub fn parse_actuator(text: &str) -> serde_json::Result<ActuatorDocument> {
    serde_json::from_str(text)
}

/// Expand every dispatcher mapping into one endpoint per method and pattern.
/// A mapping without method conditions counts as `ALL`; mappings without
/// request conditions (static resources, functional routes) are skipped.
/// Returns `None` when no context carries dispatcher servlet mappings at all.
pub fn actuator_endpoints(doc: &ActuatorDocument) -> Option<Vec<BackendEndpoint>> {
    let mut found_dispatcher = false;
    let mut endpoints = Vec::new();

    for (context_name, context) in &doc.contexts {
        let Some(servlets) = context
            .mappings
            .as_ref()
            .and_then(|m| m.dispatcher_servlets.as_ref())
        else {
            continue;
        };
        found_dispatcher = true;

        for (servlet, mappings) in servlets {
            debug!(
                "Context '{}', servlet '{}': {} mappings",
                context_name,
                servlet,
                mappings.len()
            );
            for mapping in mappings {
                let Some(conditions) = mapping
                    .details
                    .as_ref()
                    .and_then(|d| d.request_mapping_conditions.as_ref())
                else {
                    continue;
                };

                let methods: Vec<HttpMethod> = match conditions.methods.as_deref() {
                    Some(methods) if !methods.is_empty() => methods
                        .iter()
                        .map(|m| HttpMethod::parse_lenient(m))
                        .collect(),
                    _ => vec![HttpMethod::All],
                };
                let patterns = conditions.patterns.as_deref().unwrap_or_default();

                for method in &methods {
                    for pattern in patterns {
                        endpoints.push(BackendEndpoint {
                            method: *method,
                            path: pattern.clone(),
                            source: Some(ACTUATOR_SOURCE.to_string()),
                            handler: mapping.handler.clone(),
                        });
                    }
                }
            }
        }
    }

    found_dispatcher.then_some(endpoints)
}

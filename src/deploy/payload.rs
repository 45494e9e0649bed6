//! Request bodies for Azure ML asset versions.
//!
//! Definition files use the CLI v2 YAML schema. The REST API wants a
//! different shape:
//!
//! - environments: `image`, `condaFile` (the file's content, not its path),
//!   `build.contextUri`
//! - components: the whole definition under `componentSpec`
//!
//! Local artifacts (a `code:` directory, a local build context, a pipeline
//! job pointing at a component file) need an upload step this client does
//! not perform. They are rejected up front and must be registered first and
//! referenced as `azureml:<name>:<version>`.

use super::AssetDefinition;
use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use std::path::Path;

/// Fields carried over unchanged into `properties`.
const SHARED_FIELDS: &[&str] = &["description", "tags"];

/// Body for `PUT .../environments/{name}/versions/{version}`.
pub fn environment_body(definition: &AssetDefinition) -> Result<Value> {
    let document = &definition.document;
    let mut properties = shared_properties(document);

    if let Some(image) = document.get("image").and_then(Value::as_str) {
        properties.insert("image".to_string(), json!(image));
    }

    if let Some(conda) = document.get("conda_file") {
        let content = conda_content(&definition.path, conda)?;
        properties.insert("condaFile".to_string(), json!(content));
    }

    if let Some(build) = document.get("build") {
        let context_uri = build.get("path").and_then(Value::as_str).unwrap_or_default();
        if !is_remote(context_uri) {
            bail!(
                "{}: local build context '{}' is not supported; upload it and use its URI",
                definition.path.display(),
                context_uri
            );
        }
        let mut build_properties = Map::new();
        build_properties.insert("contextUri".to_string(), json!(context_uri));
        if let Some(dockerfile) = build.get("dockerfile_path").and_then(Value::as_str) {
            build_properties.insert("dockerfilePath".to_string(), json!(dockerfile));
        }
        properties.insert("build".to_string(), Value::Object(build_properties));
    }

    if !properties.contains_key("image") && !properties.contains_key("build") {
        bail!(
            "{}: environment needs an 'image' or a 'build' context",
            definition.path.display()
        );
    }

    if let Some(os_type) = document.get("os_type").and_then(Value::as_str) {
        properties.insert("osType".to_string(), json!(capitalize(os_type)));
    }

    Ok(json!({ "properties": properties }))
}

/// Body for `PUT .../components/{name}/versions/{version}`.
pub fn component_body(definition: &AssetDefinition) -> Result<Value> {
    let document = &definition.document;

    if let Some(code) = document.get("code").and_then(Value::as_str)
        && !is_registered(code)
    {
        bail!(
            "{}: local code path '{}' is not uploaded; register it and reference it as azureml:<name>:<version>",
            definition.path.display(),
            code
        );
    }

    for (job, component) in job_components(document) {
        if !is_registered(component) {
            bail!(
                "{}: job '{}' references local component '{}'; deploy it first and reference it as azureml:<name>:<version>",
                definition.path.display(),
                job,
                component
            );
        }
    }

    let mut properties = shared_properties(document);
    properties.insert("componentSpec".to_string(), document.clone());
    Ok(json!({ "properties": properties }))
}

fn shared_properties(document: &Value) -> Map<String, Value> {
    SHARED_FIELDS
        .iter()
        .filter_map(|field| document.get(*field).map(|v| (field.to_string(), v.clone())))
        .collect()
}

/// The conda specification as text. A path is resolved next to the
/// definition file; an inline mapping is serialized back to YAML.
fn conda_content(definition_path: &Path, conda: &Value) -> Result<String> {
    match conda {
        Value::String(relative) => {
            let base = definition_path.parent().unwrap_or_else(|| Path::new("."));
            let path = base.join(relative);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read conda file {}", path.display()))
        }
        Value::Object(_) => serde_yaml::to_string(conda).context("failed to serialize inline conda file"),
        other => bail!(
            "{}: conda_file must be a path or a mapping (found {})",
            definition_path.display(),
            other
        ),
    }
}

/// `(job name, component reference)` for every pipeline job with a string
/// `component`. Jobs may be a mapping keyed by name or a list.
fn job_components<'a>(document: &'a Value) -> Vec<(String, &'a str)> {
    let component = |job: &'a Value| job.get("component").and_then(Value::as_str);
    match document.get("jobs") {
        Some(Value::Object(jobs)) => jobs
            .iter()
            .filter_map(|(name, job)| component(job).map(|c| (name.clone(), c)))
            .collect(),
        Some(Value::Array(jobs)) => jobs
            .iter()
            .enumerate()
            .filter_map(|(i, job)| {
                let name = job
                    .get("name")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| i.to_string());
                component(job).map(|c| (name, c))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn is_registered(reference: &str) -> bool {
    reference.starts_with("azureml:") || is_remote(reference)
}

fn is_remote(uri: &str) -> bool {
    ["https://", "http://", "azureml://", "git+"]
        .iter()
        .any(|scheme| uri.starts_with(scheme))
}

fn capitalize(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

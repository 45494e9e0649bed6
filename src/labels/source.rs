//! Where PR labels come from.
//!
//! Two conventions exist in CI workflows: a JSON array dumped from the
//! triggering event (`toJson(github.event.pull_request.labels)`), and a plain
//! whitespace-separated list. [`LabelSource`] accepts both and always yields a
//! [`LabelSet`].

use super::LabelSet;
use serde_json::Value;
use tracing::warn;

/// Whitespace-separated label names (shell-style quoting allowed).
pub const PR_LABEL_NAMES_VAR: &str = "PR_LABEL_NAMES";

/// JSON array of label objects or strings.
pub const PR_LABELS_VAR: &str = "PR_LABELS";

/// Alternate JSON variable name.
pub const PR_LABELS_JSON_VAR: &str = "PR_LABELS_JSON";

/// A raw label payload and its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSource {
    /// `dev train "needs review"`
    Names(String),
    /// `[{"name": "dev"}, "train"]`
    Json(String),
}

impl LabelSource {
    /// Pick the label source from an explicit `--labels` value or the process
    /// environment.
    pub fn resolve(explicit: Option<&str>) -> Self {
        Self::resolve_with(explicit, |key| std::env::var(key).ok())
    }

    /// Pick the label source using `lookup` for environment variables.
    ///
    /// Precedence: explicit names, `PR_LABELS`, `PR_LABELS_JSON`. Blank
    /// values count as unset.
    pub fn resolve_with<F>(explicit: Option<&str>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(names) = explicit.filter(|names| !names.trim().is_empty()) {
            return LabelSource::Names(names.to_string());
        }
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        lookup(PR_LABELS_VAR)
            .or_else(|| lookup(PR_LABELS_JSON_VAR))
            .map(LabelSource::Json)
            .unwrap_or_else(|| LabelSource::Json("[]".to_string()))
    }

    /// Parse the payload. Malformed input yields an empty set and a warning.
    pub fn labels(&self) -> LabelSet {
        match self {
            LabelSource::Names(raw) => parse_names(raw),
            LabelSource::Json(raw) => parse_json(raw),
        }
    }
}

fn parse_names(raw: &str) -> LabelSet {
    match shell_words::split(raw) {
        Ok(words) => LabelSet::from_names(words),
        Err(e) => {
            warn!(error = %e, "could not split label list; treating as no labels");
            LabelSet::default()
        }
    }
}

fn parse_json(raw: &str) -> LabelSet {
    if raw.trim().is_empty() {
        return LabelSet::default();
    }
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(items) => items.iter().filter_map(label_name).collect(),
        Err(e) => {
            warn!(error = %e, "could not parse label JSON; treating as no labels");
            LabelSet::default()
        }
    }
}

/// `{"name": "dev", ...}` or `"dev"`. Anything else has no name.
fn label_name(item: &Value) -> Option<String> {
    match item {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => fields.get("name")?.as_str().map(String::from),
        _ => None,
    }
}

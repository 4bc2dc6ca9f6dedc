//! Run resources as reported by the platform.
//!
//! A Run is the custom resource created for each experiment run; its `spec`
//! carries the submitted parameters, reported metrics and the pod count
//! derived from the pack values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Queued,
    Running,
    Complete,
    Cancelled,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Queued => "QUEUED",
            RunStatus::Running => "RUNNING",
            RunStatus::Complete => "COMPLETE",
            RunStatus::Cancelled => "CANCELLED",
            RunStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodSelector {
    #[serde(rename = "matchLabels", default)]
    pub match_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub name: String,
    pub experiment_name: String,
    pub parameters: Vec<String>,
    pub metrics: serde_json::Map<String, Value>,
    pub pod_count: i64,
    pub pod_selector: PodSelector,
    pub state: RunStatus,
    /// Namespace the run was submitted from.
    pub submitter: Option<String>,
    pub creation_timestamp: Option<String>,
    /// Pack template the run was created from (`matchLabels.app`).
    pub template_name: Option<String>,
}

#[derive(Deserialize)]
struct RunResource {
    metadata: RunMetadata,
    spec: RunSpec,
}

#[derive(Deserialize)]
struct RunMetadata {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(rename = "creationTimestamp", default)]
    creation_timestamp: Option<String>,
}

#[derive(Deserialize)]
struct RunSpec {
    #[serde(default)]
    parameters: Option<Vec<String>>,
    state: RunStatus,
    #[serde(rename = "pod-count")]
    pod_count: i64,
    #[serde(rename = "pod-selector")]
    pod_selector: PodSelector,
    #[serde(rename = "experiment-name")]
    experiment_name: String,
    #[serde(default)]
    metrics: Option<serde_json::Map<String, Value>>,
}

/// One row of `run-info` output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunRow {
    pub name: String,
    pub parameters: String,
    pub metrics: String,
    pub submission_date: String,
    pub submitter: String,
    pub status: String,
    pub template_name: String,
}

/// [`RunRow`] without the template name, for compact listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunShortRow {
    pub name: String,
    pub parameters: String,
    pub metrics: String,
    pub submission_date: String,
    pub submitter: String,
    pub status: String,
}

impl From<RunRow> for RunShortRow {
    fn from(row: RunRow) -> Self {
        Self {
            name: row.name,
            parameters: row.parameters,
            metrics: row.metrics,
            submission_date: row.submission_date,
            submitter: row.submitter,
            status: row.status,
        }
    }
}

impl Run {
    /// Build from a Run resource as returned by the Kubernetes API.
    pub fn from_k8s_value(value: Value) -> Result<Self, serde_json::Error> {
        let resource: RunResource = serde_json::from_value(value)?;
        Ok(Self::from_resource(resource))
    }

    pub fn from_k8s_str(text: &str) -> Result<Self, serde_json::Error> {
        let resource: RunResource = serde_json::from_str(text)?;
        Ok(Self::from_resource(resource))
    }

    fn from_resource(resource: RunResource) -> Self {
        let RunResource { metadata, spec } = resource;
        let template_name = spec.pod_selector.match_labels.get("app").cloned();
        Self {
            name: metadata.name,
            experiment_name: spec.experiment_name,
            parameters: spec.parameters.unwrap_or_default(),
            metrics: spec.metrics.unwrap_or_default(),
            pod_count: spec.pod_count,
            pod_selector: spec.pod_selector,
            state: spec.state,
            submitter: metadata.namespace,
            creation_timestamp: metadata.creation_timestamp,
            template_name,
        }
    }

    /// Flatten into display strings: parameters space-joined, metrics as `key: value` pairs.
    pub fn cli_row(&self) -> RunRow {
        let metrics: Vec<String> = self
            .metrics
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect();
        RunRow {
            name: self.name.clone(),
            parameters: self.parameters.join(" "),
            metrics: metrics.join(" "),
            submission_date: self.creation_timestamp.clone().unwrap_or_default(),
            submitter: self.submitter.clone().unwrap_or_default(),
            status: self.state.to_string(),
            template_name: self.template_name.clone().unwrap_or_default(),
        }
    }

    pub fn cli_short_row(&self) -> RunShortRow {
        self.cli_row().into()
    }
}

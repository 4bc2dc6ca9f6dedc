//! User parameter overrides (`-p key value`) applied to a values mapping.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::error::{yaml_kind, PackError};
use super::literal::parse_literal;

pub const WORKERS_COUNT_KEY: &str = "workersCount";
pub const PSERVERS_COUNT_KEY: &str = "pServersCount";
pub const POD_COUNT_KEY: &str = "podCount";

/// Values that look like a list or dict literal.
static COLLECTION_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\[{]").expect("static regex"));

/// Turn a raw override string into the value stored in the mapping.
///
/// Only exact lowercase `true`/`false` become booleans; numbers stay strings.
pub fn coerce_override(raw: &str) -> Result<Value, PackError> {
    if COLLECTION_LITERAL.is_match(raw) {
        return parse_literal(raw).map_err(|source| PackError::OverrideValue {
            value: raw.to_string(),
            source,
        });
    }
    Ok(match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    })
}

/// Set `value` at the dotted `key` path, creating intermediate mappings.
///
/// A numeric segment may index into an existing sequence. Descending through
/// any other non-mapping value is an error.
pub fn set_dotted(values: &mut Mapping, key: &str, value: Value) -> Result<(), PackError> {
    let path_error = |reason: String| PackError::OverridePath {
        key: key.to_string(),
        reason,
    };
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(path_error("path has an empty segment".to_string()));
    }
    let Some((last, parents)) = segments.split_last() else {
        return Err(path_error("path is empty".to_string()));
    };

    let mut current: &mut Value = values
        .entry(Value::String(parents.first().unwrap_or(last).to_string()))
        .or_insert(Value::Null);
    if parents.is_empty() {
        *current = value;
        return Ok(());
    }
    for segment in parents[1..].iter().chain(std::iter::once(last)) {
        current = descend(current, segment).map_err(path_error)?;
    }
    *current = value;
    Ok(())
}

/// Step into `segment` of `node`, turning a null node into a mapping first.
fn descend<'v>(node: &'v mut Value, segment: &str) -> Result<&'v mut Value, String> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(map) => Ok(map
            .entry(Value::String(segment.to_string()))
            .or_insert(Value::Null)),
        Value::Sequence(seq) => {
            let len = seq.len();
            let index: usize = segment
                .parse()
                .map_err(|_| format!("'{segment}' is not an index into a sequence"))?;
            seq.get_mut(index)
                .ok_or_else(|| format!("index {index} is out of range for a sequence of {len}"))
        }
        other => Err(format!("'{segment}' is below a {}", yaml_kind(other))),
    }
}

/// Replica counts given on the command line, remembered for the `podCount` rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicaOverrides {
    pub workers: Option<Value>,
    pub pservers: Option<Value>,
}

/// Apply overrides in input order, then derive `podCount` once.
pub fn apply_overrides(
    values: &mut Mapping,
    overrides: &[(String, String)],
) -> Result<(), PackError> {
    let mut replicas = ReplicaOverrides::default();
    for (key, raw) in overrides {
        let value = coerce_override(raw)?;
        match key.as_str() {
            WORKERS_COUNT_KEY => replicas.workers = Some(value.clone()),
            PSERVERS_COUNT_KEY => replicas.pservers = Some(value.clone()),
            _ => {}
        }
        tracing::debug!(key = %key, "Applying pack parameter");
        set_dotted(values, key, value)?;
    }
    derive_pod_count(values, &replicas)
}

/// `podCount = workersCount + pServersCount` when both resolve; otherwise
/// `podCount` is left as it is.
pub fn derive_pod_count(values: &mut Mapping, replicas: &ReplicaOverrides) -> Result<(), PackError> {
    let resolve = |remembered: &Option<Value>, key: &str| -> Option<Value> {
        remembered
            .clone()
            .or_else(|| values.get(key).cloned())
            .filter(|v| !v.is_null())
    };
    let (Some(workers), Some(pservers)) = (
        resolve(&replicas.workers, WORKERS_COUNT_KEY),
        resolve(&replicas.pservers, PSERVERS_COUNT_KEY),
    ) else {
        return Ok(());
    };

    let workers = count_as_i64(WORKERS_COUNT_KEY, &workers)?;
    let pservers = count_as_i64(PSERVERS_COUNT_KEY, &pservers)?;
    let pods = workers
        .checked_add(pservers)
        .ok_or_else(|| PackError::InvalidCount {
            key: POD_COUNT_KEY,
            value: format!("{workers} + {pservers}"),
        })?;
    tracing::debug!(workers, pservers, pods, "Derived pod count");
    values.insert(Value::String(POD_COUNT_KEY.to_string()), Value::from(pods));
    Ok(())
}

/// Integer view of a replica count stored as a number or a numeric string.
pub(crate) fn count_as_i64(key: &'static str, value: &Value) -> Result<i64, PackError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| PackError::InvalidCount {
        key,
        value: serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| yaml_kind(value).to_string()),
    })
}

//! The chart values document: parsing, serialization and the `env` list.

use serde_yaml::{Mapping, Value};

use super::error::{yaml_kind, PackError};
use super::overrides::{count_as_i64, POD_COUNT_KEY};

pub const ENV_KEY: &str = "env";

/// Parse rendered text into a values mapping. An empty document is an empty mapping.
pub fn parse(rendered_text: &str) -> Result<Mapping, PackError> {
    match serde_yaml::from_str::<Value>(rendered_text)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(PackError::NotAMapping(yaml_kind(&other))),
    }
}

/// Serialize a values mapping; keys keep their insertion order.
pub fn serialize(values: &Mapping) -> Result<String, PackError> {
    Ok(serde_yaml::to_string(values)?)
}

/// Split `NAME=value` on the first `=`.
pub fn parse_env_assignment(assignment: &str) -> Result<(&str, &str), PackError> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(PackError::EnvFormat(assignment.to_string())),
    }
}

/// Append `{name, value}` records for each assignment to the `env` sequence.
///
/// Existing entries are kept in front. With no assignments the mapping is not touched.
pub fn append_env(values: &mut Mapping, env_assignments: &[String]) -> Result<(), PackError> {
    if env_assignments.is_empty() {
        return Ok(());
    }
    let mut records = Vec::with_capacity(env_assignments.len());
    for assignment in env_assignments {
        let (name, value) = parse_env_assignment(assignment)?;
        let mut record = Mapping::new();
        record.insert(Value::from("name"), Value::from(name));
        record.insert(Value::from("value"), Value::from(value));
        records.push(Value::Mapping(record));
    }

    match values.get_mut(ENV_KEY) {
        Some(Value::Sequence(existing)) if !existing.is_empty() => existing.extend(records),
        None | Some(Value::Null) | Some(Value::Sequence(_)) => {
            values.insert(Value::from(ENV_KEY), Value::Sequence(records));
        }
        Some(other) => {
            return Err(PackError::EnvNotSequence {
                key: ENV_KEY,
                found: yaml_kind(other),
            })
        }
    }
    Ok(())
}

/// `podCount` as an integer, or `None` when it is missing, null or an empty string.
///
/// An explicit `0` is a real count and comes back as `Some(0)`, not as unset.
pub fn read_pod_count(values: &Mapping) -> Result<Option<i64>, PackError> {
    match values.get(POD_COUNT_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => count_as_i64(POD_COUNT_KEY, v).map(Some),
    }
}

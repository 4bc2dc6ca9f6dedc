use thiserror::Error;

use super::literal::LiteralError;

/// Failure of a single renderer step.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("template could not be rendered: {0}")]
    Template(#[from] minijinja::Error),

    #[error("values document is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("values document must be a mapping at the top level, found {0}")]
    NotAMapping(&'static str),

    #[error("can't parse value '{value}': {source}")]
    OverrideValue {
        value: String,
        #[source]
        source: LiteralError,
    },

    #[error("can't set '{key}': {reason}")]
    OverridePath { key: String, reason: String },

    #[error("environment variable '{0}' must have the form NAME=VALUE")]
    EnvFormat(String),

    #[error("existing '{key}' entry is a {found}, expected a sequence")]
    EnvNotSequence { key: &'static str, found: &'static str },

    #[error("'{key}' must be an integer, got {value}")]
    InvalidCount { key: &'static str, value: String },

    #[error(transparent)]
    Fs(#[from] packctl_fs::FsError),
}

/// The single error surfaced by file-level pack operations.
///
/// Whatever step failed is kept as the source so callers can show one message
/// and still inspect the cause.
#[derive(Debug, Error)]
#[error("configuration of the pack could not be updated")]
pub struct ConfigUpdateError {
    #[source]
    cause: PackError,
}

impl ConfigUpdateError {
    pub fn cause(&self) -> &PackError {
        &self.cause
    }

    pub fn into_cause(self) -> PackError {
        self.cause
    }
}

impl From<PackError> for ConfigUpdateError {
    fn from(cause: PackError) -> Self {
        Self { cause }
    }
}

impl From<packctl_fs::FsError> for ConfigUpdateError {
    fn from(e: packctl_fs::FsError) -> Self {
        PackError::from(e).into()
    }
}

/// YAML type name for error messages.
pub(crate) fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

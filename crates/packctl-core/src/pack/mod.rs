//! Pack configuration rendering.
//!
//! A pack is a job template: a Dockerfile plus a chart whose `values.yaml`
//! holds the tunable parameters. For every run the values template is
//! rendered with run-specific placeholders, merged with the user's overrides
//! and env assignments, and written back in place.

mod error;
mod literal;
mod overrides;
mod template;
mod values;

pub mod dockerfile;
pub mod update;

#[cfg(test)]
mod tests;

pub use error::{ConfigUpdateError, PackError};
pub use literal::{parse_literal, LiteralError, MAX_LITERAL_DEPTH};
pub use overrides::{
    apply_overrides, coerce_override, derive_pod_count, set_dotted, ReplicaOverrides,
    POD_COUNT_KEY, PSERVERS_COUNT_KEY, WORKERS_COUNT_KEY,
};
pub use template::{
    render, CommandLine, ImageReference, TemplateContext, IMAGE_WORKDIR, TEMPLATE_NAMESPACE,
};
pub use values::{append_env, parse, parse_env_assignment, read_pod_count, serialize, ENV_KEY};

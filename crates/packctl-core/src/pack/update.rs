//! File-level pack updates for a run folder.
//!
//! Layout of a run folder:
//!
//! ```text
//! <run_folder>/Dockerfile
//! <run_folder>/charts/<pack_type>/values.yaml
//! ```
//!
//! Every rewrite goes through `packctl_fs::atomic_write`, and every failure
//! is reported as one [`ConfigUpdateError`].

use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use super::dockerfile::{rewrite_dockerfile, DockerfileOptions};
use super::error::{ConfigUpdateError, PackError};
use super::overrides::apply_overrides;
use super::template::{render, TemplateContext};
use super::values::{append_env, parse, read_pod_count, serialize};

pub const VALUES_FILE: &str = "values.yaml";
pub const DOCKERFILE: &str = "Dockerfile";

/// Everything the values renderer needs for one run.
#[derive(Debug, Clone)]
pub struct ValuesRequest {
    pub context: TemplateContext,
    /// `(dotted.key, raw value)` pairs, applied in order.
    pub pack_params: Vec<(String, String)>,
    /// `NAME=value` strings.
    pub env_variables: Vec<String>,
}

pub fn values_path(run_folder: &Path, pack_type: &str) -> PathBuf {
    run_folder.join("charts").join(pack_type).join(VALUES_FILE)
}

pub fn dockerfile_path(run_folder: &Path) -> PathBuf {
    run_folder.join(DOCKERFILE)
}

/// Render, parse and apply overrides and env to a values template, in memory.
pub fn render_values(template_text: &str, request: &ValuesRequest) -> Result<Mapping, PackError> {
    let rendered = render(template_text, &request.context)?;
    let mut values = parse(&rendered)?;
    apply_overrides(&mut values, &request.pack_params)?;
    append_env(&mut values, &request.env_variables)?;
    Ok(values)
}

/// The document `update_values_file` would write, without writing it.
pub fn preview_values(
    run_folder: &Path,
    pack_type: &str,
    request: &ValuesRequest,
) -> Result<String, ConfigUpdateError> {
    let template = packctl_fs::read_to_string(&values_path(run_folder, pack_type))?;
    let values = render_values(&template, request)?;
    Ok(serialize(&values)?)
}

/// Rewrite `charts/<pack_type>/values.yaml` in place for this run.
pub fn update_values_file(
    run_folder: &Path,
    pack_type: &str,
    request: &ValuesRequest,
) -> Result<Mapping, ConfigUpdateError> {
    update_values_file_with(run_folder, pack_type, request, |tmp, dst| {
        std::fs::rename(tmp, dst)
    })
}

/// [`update_values_file`] with the final replace step supplied by the caller.
pub fn update_values_file_with<F>(
    run_folder: &Path,
    pack_type: &str,
    request: &ValuesRequest,
    replace: F,
) -> Result<Mapping, ConfigUpdateError>
where
    F: FnOnce(&Path, &Path) -> std::io::Result<()>,
{
    tracing::debug!("Modify values.yaml - start");
    let path = values_path(run_folder, pack_type);
    let template = packctl_fs::read_to_string(&path)?;
    let values = render_values(&template, request)?;
    let document = serialize(&values)?;
    packctl_fs::atomic_write_with(&path, &document, replace)?;
    tracing::debug!("Modify values.yaml - end");
    Ok(values)
}

/// Rewrite the run's Dockerfile in place.
pub fn update_dockerfile(
    run_folder: &Path,
    opts: &DockerfileOptions,
) -> Result<(), ConfigUpdateError> {
    tracing::debug!("Modify Dockerfile - start");
    let path = dockerfile_path(run_folder);
    let text = packctl_fs::read_to_string(&path)?;
    packctl_fs::atomic_write(&path, &rewrite_dockerfile(&text, opts))?;
    tracing::debug!("Modify Dockerfile - end");
    Ok(())
}

/// Update both the values file and the Dockerfile of a run folder.
pub fn update_configuration(
    run_folder: &Path,
    pack_type: &str,
    request: &ValuesRequest,
    dockerfile: &DockerfileOptions,
) -> Result<Mapping, ConfigUpdateError> {
    tracing::debug!("Update configuration - start");
    let result = update_values_file(run_folder, pack_type, request).and_then(|values| {
        update_dockerfile(run_folder, dockerfile)?;
        Ok(values)
    });
    match &result {
        Ok(_) => tracing::debug!("Update configuration - end"),
        Err(e) => tracing::error!(
            run_folder = %run_folder.display(),
            cause = %e.cause(),
            "Update configuration failed"
        ),
    }
    result
}

/// Read the derived pod count from a run's values file.
pub fn get_pod_count(run_folder: &Path, pack_type: &str) -> Result<Option<i64>, ConfigUpdateError> {
    let text = packctl_fs::read_to_string(&values_path(run_folder, pack_type))?;
    let pod_count = read_pod_count(&parse(&text)?)?;
    tracing::debug!(
        "Pod count for run {}: {:?}",
        run_folder.display(),
        pod_count
    );
    Ok(pod_count)
}

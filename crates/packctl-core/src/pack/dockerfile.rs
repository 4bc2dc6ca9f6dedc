//! Dockerfile rewriting for a run folder.

use crate::config::BaseImageConfig;

/// Folder, relative to the build context, holding the user's experiment files.
pub const EXPERIMENT_FOLDER_NAME: &str = "folder_to_be_copied";

const ADD_TRAINING_SCRIPT: &str = "ADD training.py";
const FROM_TENSORFLOW: &str = "FROM nauta/tensorflow-py";
const FROM_HOROVOD: &str = "FROM nauta/horovod";

#[derive(Debug, Clone)]
pub struct DockerfileOptions {
    pub experiment_name: String,
    pub username: String,
    /// A script or script folder was given, so the experiment folder is copied in.
    pub copy_experiment_folder: bool,
    /// `host:port` of the registry that serves the base images.
    pub internal_registry: String,
    pub base_images: BaseImageConfig,
}

/// Rewrite a pack Dockerfile for one run.
///
/// - the placeholder `ADD training.py` line becomes a `COPY` of the experiment
///   folder, or is dropped when there is nothing to copy
/// - `FROM nauta/tensorflow-py*` and `FROM nauta/horovod*` point at the
///   platform registry, picking the py2 image when the line mentions `-py2`
/// - experiment and user names are appended as `ENV` lines, which also keeps
///   every run's image digest unique
pub fn rewrite_dockerfile(text: &str, opts: &DockerfileOptions) -> String {
    let mut out = String::with_capacity(text.len() + 128);
    for line in text.split_inclusive('\n') {
        if line.starts_with(ADD_TRAINING_SCRIPT) {
            if opts.copy_experiment_folder {
                out.push_str(&format!("COPY {EXPERIMENT_FOLDER_NAME} .\n"));
            }
        } else if line.starts_with(FROM_TENSORFLOW) {
            let image = if line.contains("-py2") {
                &opts.base_images.tf_py2
            } else {
                &opts.base_images.tf_py3
            };
            out.push_str(&format!("FROM {}/{}\n", opts.internal_registry, image));
        } else if line.starts_with(FROM_HOROVOD) {
            let image = if line.contains("-py2") {
                &opts.base_images.horovod_py2
            } else {
                &opts.base_images.horovod_py3
            };
            out.push_str(&format!("FROM {}/{}\n", opts.internal_registry, image));
        } else {
            out.push_str(line);
        }
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("ENV NAUTA_EXPERIMENT_NAME {}\n", opts.experiment_name));
    out.push_str(&format!("ENV NAUTA_USERNAME {}\n", opts.username));
    out
}

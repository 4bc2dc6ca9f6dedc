//! Placeholder substitution for pack values templates.
//!
//! Templates reference run-specific values under the `NAUTA` namespace, e.g.
//! `image: {{ NAUTA.ExperimentImage }}`. Rendering is strict: a reference to
//! any name that is not defined fails instead of rendering as empty.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use super::error::PackError;

/// Root object under which template variables are exposed.
pub const TEMPLATE_NAMESPACE: &str = "NAUTA";

/// Directory in the experiment image that the run folder is copied into.
pub const IMAGE_WORKDIR: &str = "/app";

/// `host:port/user/name:tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub name: String,
    pub tag: String,
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}/{}:{}",
            self.host, self.port, self.user, self.name, self.tag
        )
    }
}

/// Container command line rendered as a YAML flow sequence, so that
/// `args: {{ NAUTA.CommandLine }}` yields a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    /// The script is addressed by its file name inside [`IMAGE_WORKDIR`],
    /// followed by the user's positional parameters.
    pub fn from_script(script_location: Option<&Path>, script_parameters: &[String]) -> Self {
        let mut args: Vec<String> = Vec::with_capacity(script_parameters.len() + 1);
        if let Some(name) = script_location.and_then(|p| p.file_name()) {
            args.push(format!("{}/{}", IMAGE_WORKDIR, name.to_string_lossy()));
        }
        args.extend(script_parameters.iter().cloned());
        let quoted: Vec<String> = args
            .iter()
            .map(|a| serde_json::Value::String(a.clone()).to_string())
            .collect();
        Self(format!("[{}]", quoted.join(", ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Values substituted into a pack template, built once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub experiment_name: String,
    pub command_line: CommandLine,
    pub registry_port: u16,
    pub image: ImageReference,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateVars<'a> {
    experiment_name: &'a str,
    command_line: &'a str,
    registry_port: String,
    experiment_image: String,
    image_repository: String,
}

impl TemplateContext {
    fn vars(&self) -> TemplateVars<'_> {
        let image = self.image.to_string();
        TemplateVars {
            experiment_name: &self.experiment_name,
            command_line: self.command_line.as_str(),
            registry_port: self.registry_port.to_string(),
            experiment_image: image.clone(),
            image_repository: image,
        }
    }
}

/// Substitute every placeholder in `template_text` from `context`.
pub fn render(template_text: &str, context: &TemplateContext) -> Result<String, PackError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    let root = BTreeMap::from([(TEMPLATE_NAMESPACE, context.vars())]);
    let rendered = env.render_str(template_text, root)?;
    Ok(rendered)
}

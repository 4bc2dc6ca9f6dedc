//! `packctl render`: prepare a run folder's pack for submission.

use std::path::PathBuf;

use anyhow::{Context, Result};
use packctl_core::config::{BaseImageConfig, RegistryConfig};
use packctl_core::pack::dockerfile::DockerfileOptions;
use packctl_core::pack::update::{preview_values, update_configuration, ValuesRequest};
use packctl_core::pack::{read_pod_count, CommandLine, ImageReference, TemplateContext};

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub run_folder: PathBuf,
    pub pack_type: String,
    pub experiment_name: String,
    pub username: String,
    pub registry_port: u16,
    pub script: Option<PathBuf>,
    pub script_folder: Option<PathBuf>,
    pub script_parameters: Vec<String>,
    pub pack_params: Vec<(String, String)>,
    pub env_variables: Vec<String>,
    /// Print the rendered values instead of rewriting the run folder.
    pub dry_run: bool,
}

fn values_request(args: &RenderArgs, registry: &RegistryConfig) -> ValuesRequest {
    let image = ImageReference {
        host: registry.host.clone(),
        port: args.registry_port,
        user: args.username.clone(),
        name: args.experiment_name.clone(),
        tag: registry.image_tag.clone(),
    };
    ValuesRequest {
        context: TemplateContext {
            experiment_name: args.experiment_name.clone(),
            command_line: CommandLine::from_script(
                args.script.as_deref(),
                &args.script_parameters,
            ),
            registry_port: args.registry_port,
            image,
        },
        pack_params: args.pack_params.clone(),
        env_variables: args.env_variables.clone(),
    }
}

pub fn cmd_render(args: &RenderArgs) -> Result<()> {
    let registry = RegistryConfig::from_env();
    let request = values_request(args, &registry);

    if args.dry_run {
        let text = preview_values(&args.run_folder, &args.pack_type, &request)
            .with_context(|| format!("rendering pack in {}", args.run_folder.display()))?;
        print!("{}", text);
        return Ok(());
    }

    let dockerfile = DockerfileOptions {
        experiment_name: args.experiment_name.clone(),
        username: args.username.clone(),
        copy_experiment_folder: args.script.is_some() || args.script_folder.is_some(),
        internal_registry: registry.internal_registry.clone(),
        base_images: BaseImageConfig::from_env(),
    };
    let values = update_configuration(&args.run_folder, &args.pack_type, &request, &dockerfile)
        .with_context(|| format!("updating pack in {}", args.run_folder.display()))?;

    tracing::info!(
        run_folder = %args.run_folder.display(),
        pack_type = %args.pack_type,
        "Pack configuration updated"
    );
    match read_pod_count(&values)? {
        Some(pods) => eprintln!("✅ {} updated ({} pods)", args.run_folder.display(), pods),
        None => eprintln!("✅ {} updated", args.run_folder.display()),
    }
    Ok(())
}

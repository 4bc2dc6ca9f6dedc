//! packctl CLI library — argument parsing and dispatch to command handlers.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{pack_param_pairs, Cli, Commands};
use packctl_commands::render::RenderArgs;

/// Run the CLI — parses args and dispatches to command handlers.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    packctl_core::observability::init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            run_folder,
            pack_type,
            name,
            user,
            registry_port,
            script,
            script_folder,
            pack_param,
            env,
            dry_run,
            script_args,
        } => {
            tracing::debug!(pack_type = %pack_type, experiment = %name, "render");
            packctl_commands::render::cmd_render(&RenderArgs {
                run_folder,
                pack_type,
                experiment_name: name,
                username: user,
                registry_port,
                script,
                script_folder,
                script_parameters: script_args,
                pack_params: pack_param_pairs(pack_param),
                env_variables: env,
                dry_run,
            })?;
        }
        Commands::PodCount {
            run_folder,
            pack_type,
        } => {
            packctl_commands::pod_count::cmd_pod_count(&run_folder, &pack_type)?;
        }
        Commands::RunInfo { file, json } => {
            packctl_commands::run_info::cmd_run_info(&file, json)?;
        }
    }
    Ok(())
}

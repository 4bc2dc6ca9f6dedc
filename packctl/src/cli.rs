use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// packctl - prepare experiment packs for submission
#[derive(Parser, Debug)]
#[command(name = "packctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug-level logging (overridden by PACKCTL_QUIET and RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render charts/<PACK_TYPE>/values.yaml and the Dockerfile of a run folder
    Render {
        /// Run folder holding the Dockerfile and charts/
        #[arg(value_name = "RUN_FOLDER")]
        run_folder: PathBuf,

        /// Pack (chart) name under charts/
        #[arg(long, short = 't')]
        pack_type: String,

        /// Experiment (run) name
        #[arg(long, short = 'n')]
        name: String,

        /// Submitting user; also the image repository namespace
        #[arg(long, short = 'u', env = "PACKCTL_USER")]
        user: String,

        /// Port of the local registry proxy
        #[arg(long, default_value = "5000")]
        registry_port: u16,

        /// Training script; rendered as /app/<file name>
        #[arg(long, value_name = "SCRIPT")]
        script: Option<PathBuf>,

        /// Folder with additional experiment files
        #[arg(long, value_name = "DIR")]
        script_folder: Option<PathBuf>,

        /// Pack parameter override: -p KEY VALUE (repeatable, dotted keys allowed)
        #[arg(short = 'p', long = "pack-param", num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
        pack_param: Vec<String>,

        /// Environment variable for the run: -e NAME=VALUE (repeatable)
        #[arg(short = 'e', long = "env", value_name = "NAME=VALUE")]
        env: Vec<String>,

        /// Print the rendered values.yaml instead of writing the run folder
        #[arg(long)]
        dry_run: bool,

        /// Arguments passed to the training script
        #[arg(last = true, value_name = "SCRIPT_ARGS")]
        script_args: Vec<String>,
    },

    /// Print podCount from a run folder's values.yaml
    PodCount {
        #[arg(value_name = "RUN_FOLDER")]
        run_folder: PathBuf,

        #[arg(long, short = 't')]
        pack_type: String,
    },

    /// Show a Run resource (JSON from the cluster); use - for stdin
    RunInfo {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Group the flat `-p KEY VALUE` list into pairs.
pub fn pack_param_pairs(flat: Vec<String>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(flat.len() / 2);
    let mut it = flat.into_iter();
    while let (Some(k), Some(v)) = (it.next(), it.next()) {
        pairs.push((k, v));
    }
    pairs
}

//! packctl commands. Each command takes already-parsed arguments and returns
//! `anyhow::Result`; argument parsing lives in the `packctl` binary.

pub mod pod_count;
pub mod render;
pub mod run_info;

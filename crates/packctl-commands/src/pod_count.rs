//! `packctl pod-count`: how many pods a rendered multi-node pack will start.

use std::path::Path;

use anyhow::{Context, Result};
use packctl_core::pack::update::get_pod_count;

/// Print `podCount` from the run's values file; prints nothing when it is not set.
pub fn cmd_pod_count(run_folder: &Path, pack_type: &str) -> Result<Option<i64>> {
    let pod_count = get_pod_count(run_folder, pack_type)
        .with_context(|| format!("reading pod count in {}", run_folder.display()))?;
    match pod_count {
        Some(n) => println!("{}", n),
        None => tracing::info!("No podCount set for pack {}", pack_type),
    }
    Ok(pod_count)
}

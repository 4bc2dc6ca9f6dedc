//! `packctl run-info`: show a Run resource the way `packctl` lists runs.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use packctl_core::run::{Run, RunRow};

/// Read a Run resource (JSON, as printed by `kubectl get run -o json`) from
/// `path`, or from stdin when `path` is `-`.
pub fn load_run(path: &Path) -> Result<Run> {
    let text = if path == Path::new("-") {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        s
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    Run::from_k8s_str(&text).with_context(|| format!("parsing Run resource {}", path.display()))
}

pub fn format_row(row: &RunRow) -> String {
    let fields = [
        ("Name", &row.name),
        ("Parameters", &row.parameters),
        ("Metrics", &row.metrics),
        ("Submission date", &row.submission_date),
        ("Owner", &row.submitter),
        ("Status", &row.status),
        ("Template name", &row.template_name),
    ];
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(k, v)| format!("{:<width$}  {}\n", k, v, width = width))
        .collect()
}

pub fn cmd_run_info(path: &Path, json: bool) -> Result<()> {
    let run = load_run(path)?;
    let row = run.cli_row();
    if json {
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        print!("{}", format_row(&row));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_JSON: &str = r#"{
        "metadata": {"name": "r1", "namespace": "carol", "creationTimestamp": "2019-01-01T00:00:00Z"},
        "spec": {
            "experiment-name": "e1",
            "parameters": ["--batch", "32"],
            "metrics": {"acc": "0.9"},
            "pod-count": 2,
            "pod-selector": {"matchLabels": {"app": "tf-training"}},
            "state": "COMPLETE"
        }
    }"#;

    #[test]
    fn test_load_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, RUN_JSON).unwrap();

        let run = load_run(&path).unwrap();
        let text = format_row(&run.cli_row());
        assert!(text.starts_with("Name             r1\n"));
        assert!(text.contains("Parameters       --batch 32\n"));
        assert!(text.contains("Status           COMPLETE\n"));
        assert!(text.contains("Template name    tf-training\n"));
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, "{}").unwrap();
        let err = load_run(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing Run resource"));
        assert!(load_run(&dir.path().join("missing.json")).is_err());
    }
}

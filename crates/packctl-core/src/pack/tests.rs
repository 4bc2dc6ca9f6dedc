use std::fs;
use std::io;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::dockerfile::DockerfileOptions;
use super::update::{
    dockerfile_path, get_pod_count, preview_values, update_configuration, update_values_file,
    update_values_file_with, values_path, ValuesRequest,
};
use super::*;
use crate::config::BaseImageConfig;

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn yaml_map(text: &str) -> Mapping {
    parse(text).unwrap()
}

fn context() -> TemplateContext {
    TemplateContext {
        experiment_name: "mnist-1".to_string(),
        command_line: CommandLine::from_script(Some(Path::new("train.py")), &[]),
        registry_port: 31500,
        image: ImageReference {
            host: "127.0.0.1".to_string(),
            port: 31500,
            user: "alice".to_string(),
            name: "mnist-1".to_string(),
            tag: "latest".to_string(),
        },
    }
}

const TF_TEMPLATE: &str = "\
experimentName: {{ NAUTA.ExperimentName }}
commandline:
  args: {{ NAUTA.CommandLine }}
registryPort: \"{{ NAUTA.RegistryPort }}\"
image: {{ NAUTA.ExperimentImage }}
workersCount: 3
pServersCount: 1
resources:
  requests:
    cpu: 2
env:
  - name: PYTHONUNBUFFERED
    value: \"1\"
";

// ─── coercion ────────────────────────────────────────────────────────────────

#[test]
fn test_lowercase_booleans_only() {
    assert_eq!(coerce_override("true").unwrap(), Value::Bool(true));
    assert_eq!(coerce_override("false").unwrap(), Value::Bool(false));
    for raw in ["True", "TRUE", "False", "yes", "on"] {
        assert_eq!(coerce_override(raw).unwrap(), Value::from(raw));
    }
}

#[test]
fn test_numbers_stay_strings() {
    assert_eq!(coerce_override("42").unwrap(), Value::from("42"));
    assert_eq!(coerce_override("0.5").unwrap(), Value::from("0.5"));
    assert_eq!(coerce_override(" [1]").unwrap(), Value::from(" [1]"));
}

#[test]
fn test_collection_literals() {
    let mut values = Mapping::new();
    apply_overrides(&mut values, &params(&[("items", "[1,2,3]")])).unwrap();
    assert_eq!(values, yaml_map("items: [1, 2, 3]"));

    let err = apply_overrides(&mut values, &params(&[("items", "[1,2")])).unwrap_err();
    match err {
        PackError::OverrideValue { value, source } => {
            assert_eq!(value, "[1,2");
            assert!(!source.message.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_deepest_accepted_literal_reads_back() {
    let literal = format!(
        "{}1{}",
        "[".repeat(MAX_LITERAL_DEPTH),
        "]".repeat(MAX_LITERAL_DEPTH)
    );
    let mut values = Mapping::new();
    apply_overrides(&mut values, &params(&[("model.layers.deep", literal.as_str())])).unwrap();

    let text = serialize(&values).unwrap();
    assert_eq!(parse(&text).unwrap(), values);
}

#[test]
fn test_overly_nested_literal_is_an_override_error() {
    let literal = format!(
        "{}1{}",
        "[".repeat(MAX_LITERAL_DEPTH + 1),
        "]".repeat(MAX_LITERAL_DEPTH + 1)
    );
    let mut values = yaml_map("keep: 1\n");
    let err = apply_overrides(&mut values, &params(&[("deep", literal.as_str())])).unwrap_err();
    assert!(matches!(err, PackError::OverrideValue { .. }));
    assert_eq!(values, yaml_map("keep: 1\n"));
}

#[test]
fn test_unbalanced_deep_literal_fails_cleanly() {
    let raw = "[".repeat(100_000);
    match coerce_override(&raw) {
        Err(PackError::OverrideValue { value, source }) => {
            assert_eq!(value.len(), 100_000);
            assert_eq!(source.offset, MAX_LITERAL_DEPTH);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_flag_case_sensitivity() {
    let mut values = Mapping::new();
    apply_overrides(&mut values, &params(&[("flag", "true"), ("other", "True")])).unwrap();
    assert_eq!(values.get("flag"), Some(&Value::Bool(true)));
    assert_eq!(values.get("other"), Some(&Value::from("True")));
}

// ─── dotted paths ────────────────────────────────────────────────────────────

#[test]
fn test_dotted_path_creates_intermediate_mappings() {
    let mut values = yaml_map("resources:\n  requests:\n    cpu: 2\n");
    apply_overrides(
        &mut values,
        &params(&[("resources.requests.memory", "4Gi"), ("a.b.c", "x")]),
    )
    .unwrap();
    assert_eq!(
        values,
        yaml_map("resources:\n  requests:\n    cpu: 2\n    memory: 4Gi\na:\n  b:\n    c: x\n")
    );
}

#[test]
fn test_dotted_path_overwrites_exact_path_only() {
    let mut values = yaml_map("resources:\n  requests:\n    cpu: 2\n    memory: 1Gi\nkeep: 7\n");
    apply_overrides(&mut values, &params(&[("resources.requests.cpu", "4")])).unwrap();
    assert_eq!(
        values,
        yaml_map("resources:\n  requests:\n    cpu: '4'\n    memory: 1Gi\nkeep: 7\n")
    );
}

#[test]
fn test_dotted_path_indexes_sequences() {
    let mut values = yaml_map("env:\n  - name: A\n    value: '1'\n");
    set_dotted(&mut values, "env.0.value", Value::from("2")).unwrap();
    assert_eq!(values, yaml_map("env:\n  - name: A\n    value: '2'\n"));
    assert!(matches!(
        set_dotted(&mut values, "env.3.value", Value::from("x")),
        Err(PackError::OverridePath { .. })
    ));
    assert!(matches!(
        set_dotted(&mut values, "env.first", Value::from("x")),
        Err(PackError::OverridePath { .. })
    ));
}

#[test]
fn test_dotted_path_errors() {
    let mut values = yaml_map("scalar: 5\n");
    for key in ["", "a..b", ".a", "a.", "scalar.below"] {
        let err = set_dotted(&mut values, key, Value::from("x")).unwrap_err();
        assert!(matches!(err, PackError::OverridePath { .. }), "{key}");
    }
    assert_eq!(values, yaml_map("scalar: 5\n"));
}

#[test]
fn test_null_intermediate_becomes_mapping() {
    let mut values = yaml_map("node:\n");
    set_dotted(&mut values, "node.selector", Value::from("gpu")).unwrap();
    assert_eq!(values, yaml_map("node:\n  selector: gpu\n"));
}

#[test]
fn test_non_reserved_overrides_are_order_independent() {
    let base = yaml_map("a:\n  x: 1\nb: 2\n");
    let forward = params(&[("a.y", "1"), ("c", "[1, {'k': None}]"), ("b", "false")]);
    let mut reversed = forward.clone();
    reversed.reverse();

    let mut one = base.clone();
    apply_overrides(&mut one, &forward).unwrap();
    let mut two = base;
    apply_overrides(&mut two, &reversed).unwrap();
    // Same contents; only new top-level keys may land in a different order.
    for (k, v) in &one {
        assert_eq!(two.get(k), Some(v));
    }
    assert_eq!(one.len(), two.len());
}

#[test]
fn test_reserved_keys_last_write_wins() {
    let mut values = Mapping::new();
    apply_overrides(
        &mut values,
        &params(&[
            ("workersCount", "1"),
            ("pServersCount", "1"),
            ("workersCount", "4"),
        ]),
    )
    .unwrap();
    assert_eq!(values.get("workersCount"), Some(&Value::from("4")));
    assert_eq!(read_pod_count(&values).unwrap(), Some(5));
}

// ─── pod count ───────────────────────────────────────────────────────────────

#[test]
fn test_pod_count_from_overrides() {
    let mut values = Mapping::new();
    apply_overrides(
        &mut values,
        &params(&[("workersCount", "2"), ("pServersCount", "3")]),
    )
    .unwrap();
    assert_eq!(values.get(POD_COUNT_KEY), Some(&Value::from(5)));
}

#[test]
fn test_pod_count_mixes_override_and_template() {
    let mut values = yaml_map("workersCount: 3\npServersCount: 1\n");
    apply_overrides(&mut values, &params(&[("workersCount", "6")])).unwrap();
    assert_eq!(read_pod_count(&values).unwrap(), Some(7));

    let mut values = yaml_map("workersCount: 3\npServersCount: 1\n");
    apply_overrides(&mut values, &[]).unwrap();
    assert_eq!(read_pod_count(&values).unwrap(), Some(4));
}

#[test]
fn test_remembered_override_beats_mapping() {
    let mut values = yaml_map("workersCount: 3\npServersCount: 1\n");
    let replicas = ReplicaOverrides {
        workers: Some(Value::from("10")),
        pservers: None,
    };
    derive_pod_count(&mut values, &replicas).unwrap();
    assert_eq!(read_pod_count(&values).unwrap(), Some(11));
}

#[test]
fn test_pod_count_untouched_when_unresolvable() {
    let mut values = yaml_map("workersCount: 3\npodCount: 9\n");
    apply_overrides(&mut values, &params(&[("batch", "64")])).unwrap();
    assert_eq!(read_pod_count(&values).unwrap(), Some(9));

    let mut values = yaml_map("workersCount: 3\npServersCount:\n");
    apply_overrides(&mut values, &[]).unwrap();
    assert_eq!(values.get(POD_COUNT_KEY), None);
}

#[test]
fn test_pod_count_rejects_non_integer() {
    let mut values = Mapping::new();
    let err = apply_overrides(
        &mut values,
        &params(&[("workersCount", "two"), ("pServersCount", "1")]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PackError::InvalidCount {
            key: WORKERS_COUNT_KEY,
            ..
        }
    ));
}

#[test]
fn test_read_pod_count() {
    assert_eq!(read_pod_count(&yaml_map("a: 1\n")).unwrap(), None);
    assert_eq!(read_pod_count(&yaml_map("podCount:\n")).unwrap(), None);
    assert_eq!(read_pod_count(&yaml_map("podCount: ''\n")).unwrap(), None);
    assert_eq!(read_pod_count(&yaml_map("podCount: 4\n")).unwrap(), Some(4));
    assert_eq!(read_pod_count(&yaml_map("podCount: '4'\n")).unwrap(), Some(4));
    assert_eq!(read_pod_count(&yaml_map("podCount: 0\n")).unwrap(), Some(0));
    assert!(read_pod_count(&yaml_map("podCount: [1]\n")).is_err());
}

// ─── env ─────────────────────────────────────────────────────────────────────

#[test]
fn test_append_env_keeps_existing_entries() {
    let mut values = yaml_map("env:\n  - name: A\n    value: '1'\n");
    append_env(&mut values, &["B=2".to_string()]).unwrap();
    assert_eq!(
        values,
        yaml_map("env:\n  - name: A\n    value: '1'\n  - name: B\n    value: '2'\n")
    );
}

#[test]
fn test_append_env_creates_sequence() {
    for doc in ["a: 1\n", "env:\n", "env: []\n"] {
        let mut values = yaml_map(doc);
        append_env(&mut values, &["X=1".to_string(), "Y=a=b".to_string(), "Z=".to_string()])
            .unwrap();
        let env = values.get(ENV_KEY).unwrap();
        assert_eq!(
            env,
            &serde_yaml::from_str::<Value>(
                "[{name: X, value: '1'}, {name: Y, value: a=b}, {name: Z, value: ''}]"
            )
            .unwrap()
        );
    }
}

#[test]
fn test_append_env_without_assignments_is_noop() {
    let mut values = yaml_map("a: 1\n");
    append_env(&mut values, &[]).unwrap();
    assert_eq!(values, yaml_map("a: 1\n"));
}

#[test]
fn test_append_env_errors() {
    let mut values = Mapping::new();
    for bad in ["NOVALUE", "=value"] {
        assert!(matches!(
            append_env(&mut values, &[bad.to_string()]),
            Err(PackError::EnvFormat(_))
        ));
    }
    assert!(values.is_empty());

    let mut values = yaml_map("env:\n  A: 1\n");
    assert!(matches!(
        append_env(&mut values, &["B=2".to_string()]),
        Err(PackError::EnvNotSequence { .. })
    ));
}

// ─── parse / serialize ───────────────────────────────────────────────────────

#[test]
fn test_parse_errors() {
    assert!(matches!(parse("a: [1, 2\n"), Err(PackError::Parse(_))));
    assert!(matches!(parse("- 1\n- 2\n"), Err(PackError::NotAMapping("sequence"))));
    assert!(parse("").unwrap().is_empty());
}

#[test]
fn test_serialize_round_trip() {
    let mut values = yaml_map(
        "name: x\nratio: 0.25\ncount: 3\nenabled: false\nnothing: null\nnested:\n  list: [1, two, {k: v}]\n",
    );
    apply_overrides(
        &mut values,
        &params(&[
            ("flag", "True"),
            ("numeric", "10"),
            ("literal", "{'a': [1.5, None, True]}"),
            ("workersCount", "2"),
            ("pServersCount", "1"),
        ]),
    )
    .unwrap();
    append_env(&mut values, &["A=1".to_string()]).unwrap();

    let text = serialize(&values).unwrap();
    assert_eq!(parse(&text).unwrap(), values);
}

#[test]
fn test_serialize_keeps_insertion_order() {
    let values = yaml_map("zeta: 1\nalpha: 2\nmid: 3\n");
    let text = serialize(&values).unwrap();
    assert_eq!(text, "zeta: 1\nalpha: 2\nmid: 3\n");
}

// ─── run folder ──────────────────────────────────────────────────────────────

fn run_folder(template: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let values = values_path(dir.path(), "tf-training-tfjob");
    fs::create_dir_all(values.parent().unwrap()).unwrap();
    fs::write(&values, template).unwrap();
    fs::write(
        dockerfile_path(dir.path()),
        "FROM nauta/tensorflow-py3\nADD training.py .\n",
    )
    .unwrap();
    dir
}

fn request(pack_params: &[(&str, &str)], env: &[&str]) -> ValuesRequest {
    ValuesRequest {
        context: context(),
        pack_params: params(pack_params),
        env_variables: env.iter().map(|s| s.to_string()).collect(),
    }
}

fn dockerfile_options() -> DockerfileOptions {
    DockerfileOptions {
        experiment_name: "mnist-1".to_string(),
        username: "alice".to_string(),
        copy_experiment_folder: true,
        internal_registry: "registry:5000".to_string(),
        base_images: BaseImageConfig::default(),
    }
}

#[test]
fn test_update_values_file() {
    let dir = run_folder(TF_TEMPLATE);
    let req = request(&[("workersCount", "4"), ("resources.requests.cpu", "8")], &["LR=0.1"]);

    let values = update_values_file(dir.path(), "tf-training-tfjob", &req).unwrap();
    let on_disk = parse(&fs::read_to_string(values_path(dir.path(), "tf-training-tfjob")).unwrap())
        .unwrap();
    assert_eq!(on_disk, values);

    assert_eq!(values.get("experimentName"), Some(&Value::from("mnist-1")));
    assert_eq!(
        values.get("image"),
        Some(&Value::from("127.0.0.1:31500/alice/mnist-1:latest"))
    );
    assert_eq!(values.get("registryPort"), Some(&Value::from("31500")));
    let doc = Value::Mapping(on_disk);
    assert_eq!(
        doc["commandline"]["args"],
        serde_yaml::from_str::<Value>("['/app/train.py']").unwrap()
    );
    assert_eq!(read_pod_count(&values).unwrap(), Some(5));
    assert_eq!(doc["resources"]["requests"]["cpu"], Value::from("8"));
    assert_eq!(doc["env"].as_sequence().unwrap().len(), 2);
    assert_eq!(get_pod_count(dir.path(), "tf-training-tfjob").unwrap(), Some(5));
}

#[test]
fn test_preview_does_not_write() {
    let dir = run_folder(TF_TEMPLATE);
    let text = preview_values(dir.path(), "tf-training-tfjob", &request(&[], &[])).unwrap();
    assert!(text.contains("podCount: 4"));
    assert_eq!(
        fs::read_to_string(values_path(dir.path(), "tf-training-tfjob")).unwrap(),
        TF_TEMPLATE
    );
}

#[test]
fn test_failed_replace_leaves_values_untouched() {
    let dir = run_folder(TF_TEMPLATE);
    let err = update_values_file_with(
        dir.path(),
        "tf-training-tfjob",
        &request(&[("workersCount", "8")], &[]),
        |_, _| Err(io::Error::new(io::ErrorKind::Other, "simulated crash")),
    )
    .unwrap_err();
    assert!(matches!(err.cause(), PackError::Fs(_)));
    assert_eq!(
        fs::read(values_path(dir.path(), "tf-training-tfjob")).unwrap(),
        TF_TEMPLATE.as_bytes()
    );
}

#[test]
fn test_errors_are_wrapped_with_cause() {
    let dir = run_folder("x: {{ NAUTA.Missing }}\n");
    let err = update_values_file(dir.path(), "tf-training-tfjob", &request(&[], &[])).unwrap_err();
    assert!(matches!(err.cause(), PackError::Template(_)));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("template"));

    let dir = run_folder("a: 1\n");
    let err = update_values_file(dir.path(), "tf-training-tfjob", &request(&[("a", "{1:")], &[]))
        .unwrap_err();
    assert!(matches!(err.into_cause(), PackError::OverrideValue { .. }));

    let dir = tempfile::tempdir().unwrap();
    let err = get_pod_count(dir.path(), "missing").unwrap_err();
    assert!(matches!(err.cause(), PackError::Fs(_)));
}

#[test]
fn test_update_configuration_rewrites_both_files() {
    let dir = run_folder(TF_TEMPLATE);
    update_configuration(
        dir.path(),
        "tf-training-tfjob",
        &request(&[], &[]),
        &dockerfile_options(),
    )
    .unwrap();
    let dockerfile = fs::read_to_string(dockerfile_path(dir.path())).unwrap();
    assert_eq!(
        dockerfile,
        "FROM registry:5000/nauta/tensorflow-py3:latest\n\
         COPY folder_to_be_copied .\n\
         ENV NAUTA_EXPERIMENT_NAME mnist-1\n\
         ENV NAUTA_USERNAME alice\n"
    );
}

#[test]
fn test_update_configuration_missing_dockerfile() {
    let dir = run_folder(TF_TEMPLATE);
    fs::remove_file(dockerfile_path(dir.path())).unwrap();
    let err = update_configuration(
        dir.path(),
        "tf-training-tfjob",
        &request(&[], &[]),
        &dockerfile_options(),
    )
    .unwrap_err();
    assert!(matches!(err.cause(), PackError::Fs(_)));
}

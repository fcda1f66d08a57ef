use std::fs;

use robemax_core::RobustError;
use robemax_emax::{load_config, EmaxEstimator, ExecutionMode, ShockComposition};

#[test]
fn yaml_config_builds_a_parallel_estimator() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("emax.yaml");
    fs::write(
        &path,
        "execution:\n  mode: parallel\n  threads: 2\nshock_composition: multiplicative-wages\n",
    )
    .expect("write config");

    let config = load_config(&path).expect("load config");
    assert_eq!(config.execution.mode, ExecutionMode::Parallel);
    assert_eq!(config.shock_composition, ShockComposition::MultiplicativeWages);

    let estimator = EmaxEstimator::new(&config.execution).expect("estimator");
    assert_eq!(estimator.execution().threads, 2);
}

#[test]
fn json_extension_selects_the_json_decoder() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("emax.json");
    fs::write(&path, r#"{"interpolation": {"points": 50, "seed": 9}}"#).expect("write config");

    let config = load_config(&path).expect("load config");
    let interpolation = config.interpolation.expect("interpolation");
    assert_eq!(interpolation.points, 50);
    assert_eq!(interpolation.seed, 9);
    assert_eq!(config.execution.mode, ExecutionMode::Sequential);
}

#[test]
fn missing_file_is_a_serde_error_naming_the_path() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.yaml");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, RobustError::Serde(_)));
    assert!(err.info().context["path"].ends_with("absent.yaml"));
}

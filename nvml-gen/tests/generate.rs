use std::fs;
use std::path::PathBuf;

fn workspace() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..")
}

#[test]
fn checked_in_raw_api_is_current() {
    let generated = nvml_gen::generate(&workspace().join("nvml/idl")).unwrap();
    let checked_in = fs::read_to_string(workspace().join("nvml/src/raw_api/mod.rs")).unwrap();

    assert!(
        generated == checked_in,
        "nvml/src/raw_api/mod.rs is stale; rerun nvml-gen --sources nvml/idl --output nvml/src/raw_api/mod.rs"
    );
}

#[test]
fn generation_is_deterministic() {
    let sources = workspace().join("nvml/idl");

    assert_eq!(
        nvml_gen::generate(&sources).unwrap(),
        nvml_gen::generate(&sources).unwrap()
    );
}

#[test]
fn missing_sources() {
    let err = nvml_gen::generate(&workspace().join("no/such/dir")).unwrap_err();
    assert!(matches!(err, nvml_gen::GenError::Io { .. }));
}

use cirrus_kernel::config::load_config;
use cirrus_kernel::wire::WireSettings;
use serde::Deserialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct ProbeConfig {
    name: String,
    wire: WireSettings,
}

fn config_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_toml_sections() {
    let file = config_file(
        ".toml",
        r#"
name = "probe"

[wire]
pretty = true
max_payload_bytes = 512
"#,
    );

    let config: ProbeConfig = load_config(Some(file.path())).expect("load toml");
    assert_eq!(config.name, "probe");
    assert_eq!(config.wire, WireSettings { pretty: true, max_payload_bytes: 512 });
}

#[test]
fn missing_sections_take_defaults() {
    let file = config_file(".json", r#"{ "name": "json-probe" }"#);

    let config: ProbeConfig = load_config(Some(file.path())).expect("load json");
    assert_eq!(config.name, "json-probe");
    assert_eq!(config.wire, WireSettings::default());
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    let err = load_config::<ProbeConfig>(Some(&missing)).expect_err("missing file must fail");
    assert_eq!(err.kind(), "Config");
    assert!(err.to_string().starts_with("Config error (Failed to build config): "));
}

#[test]
fn type_mismatch_is_reported() {
    let file = config_file(".toml", "[wire]\nmax_payload_bytes = \"lots\"\n");

    let err = load_config::<ProbeConfig>(Some(file.path())).expect_err("bad type must fail");
    assert!(err.to_string().contains("Failed to deserialize config"));
}

#[test]
fn no_path_falls_back_to_defaults() {
    let config: ProbeConfig = load_config(None::<&Path>).expect("defaults");
    assert_eq!(config.wire, WireSettings::default());
}

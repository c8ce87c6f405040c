//! Integration tests for Settings loading from an explicit config file.
//!
//! These tests point `--config` at temp files, the global config is whatever
//! the host has (usually none), so assertions only touch keys set here.

use std::fs;

use autodoc::config::Settings;
use autodoc::infrastructure::InfraError;
use autodoc::logging::{Level, LogRecord};
use tempfile::TempDir;

#[test]
fn given_config_file_when_load_then_log_and_scan_sections_apply() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autodoc.toml");
    fs::write(
        &path,
        r#"
[log]
color = false
utc = true
format = "{levelname}: {message}"

[scan]
extensions = [".py", ".pyi"]
exclude_files = ["conftest.py"]
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert!(!settings.log.color);
    assert!(settings.log.utc);
    assert_eq!(settings.scan.extensions, vec![".py", ".pyi"]);
    assert_eq!(settings.scan.exclude_files, vec!["conftest.py"]);

    let line = settings
        .log
        .formatter()
        .unwrap()
        .format(&LogRecord::new("autodoc", Level::Error, "broken"))
        .unwrap();
    assert_eq!(line, "ERROR: broken");
}

#[test]
fn given_missing_explicit_config_when_load_then_errors() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(InfraError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autodoc.toml");
    fs::write(&path, "[log\ncolor = ").unwrap();
    assert!(Settings::load(Some(&path)).is_err());
}

#[test]
fn given_bad_log_format_in_config_when_building_formatter_then_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autodoc.toml");
    fs::write(&path, "[log]\nformat = \"{thread} {message}\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");
    assert!(matches!(
        settings.log.formatter(),
        Err(InfraError::Format(_))
    ));
}

//! Integration tests for TOML configuration loading.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use kairos::config::parse_config;
use kairos::load_config;
use kairos_core::{CycleKind, KairosError, OrchestratorConfig};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_no_file_yields_defaults() {
    let config = load_config(None).unwrap();
    assert_eq!(config, OrchestratorConfig::default());
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
event_capacity = 250

[schedule]
evolution_secs = 30
harmonization_secs = 60
innovation_secs = 90
monitoring_secs = 12

[tuning]
evolution_delta = 0.25
harmonization_bonus = 1.5
creativity_step = 1.0
evolution_speed_step = 0.75
"#,
    );

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.event_capacity, 250);
    assert_eq!(
        config.schedule.period(CycleKind::Monitoring),
        Duration::from_secs(12)
    );
    assert_eq!(config.tuning.evolution_delta, 0.25);
    assert_eq!(config.tuning.evolution_speed_step, 0.75);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("[schedule]\nmonitoring_secs = 5\n");

    let config = load_config(Some(file.path())).unwrap();
    let defaults = OrchestratorConfig::default();
    assert_eq!(config.schedule.monitoring_secs, 5);
    assert_eq!(config.schedule.evolution_secs, defaults.schedule.evolution_secs);
    assert_eq!(config.tuning, defaults.tuning);
    assert_eq!(config.event_capacity, defaults.event_capacity);
}

#[test]
fn test_empty_file_is_default() {
    let file = write_config("");
    assert_eq!(
        load_config(Some(file.path())).unwrap(),
        OrchestratorConfig::default()
    );
}

#[test]
fn test_zero_period_rejected() {
    let file = write_config("[schedule]\nevolution_secs = 0\n");
    let err = load_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, KairosError::ConfigError(_)));
    assert!(err.to_string().contains("evolution"));
}

#[test]
fn test_negative_tuning_rejected() {
    let file = write_config("[tuning]\nharmonization_bonus = -2.0\n");
    assert!(matches!(
        load_config(Some(file.path())),
        Err(KairosError::ConfigError(_))
    ));
}

#[test]
fn test_oversized_event_capacity_rejected() {
    let file = write_config("event_capacity = 4611686018427387903\n");
    let err = load_config(Some(file.path())).unwrap_err();
    assert!(matches!(err, KairosError::ConfigError(_)));
    assert!(err.to_string().contains("event_capacity"));
}

#[test]
fn test_malformed_toml_rejected() {
    let file = write_config("[schedule\nevolution_secs = ");
    assert!(matches!(
        load_config(Some(file.path())),
        Err(KairosError::ConfigError(_))
    ));
}

#[test]
fn test_wrong_type_rejected() {
    assert!(matches!(
        parse_config("event_capacity = \"lots\""),
        Err(KairosError::ConfigError(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        load_config(Some(&missing)),
        Err(KairosError::IoError(_))
    ));
}

#[test]
fn test_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_config(Some(dir.path())),
        Err(KairosError::IoError(_))
    ));
}

//! # Configuration Loading
//!
//! Reads an [`OrchestratorConfig`] from a TOML file.
//!
//! ```toml
//! event_capacity = 1000
//!
//! [schedule]
//! evolution_secs = 300
//! harmonization_secs = 600
//! innovation_secs = 900
//! monitoring_secs = 120
//!
//! [tuning]
//! evolution_delta = 0.1
//! harmonization_bonus = 2.0
//! creativity_step = 0.5
//! evolution_speed_step = 0.5
//! ```
//!
//! Every key is optional. Without a file the defaults apply.

use kairos_core::{KairosError, OrchestratorConfig};
use std::path::{Path, PathBuf};

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Load and validate the configuration.
///
/// `None` yields the validated defaults.
pub fn load_config(path: Option<&Path>) -> Result<OrchestratorConfig, KairosError> {
    let config = match path {
        Some(path) => {
            let canonical = validate_file_path(path)?;
            validate_file_size(&canonical)?;
            let raw = std::fs::read_to_string(&canonical).map_err(|e| {
                KairosError::IoError(format!("Cannot read '{}': {}", path.display(), e))
            })?;
            let config = parse_config(&raw)?;
            tracing::debug!(path = %canonical.display(), "configuration loaded");
            config
        }
        None => OrchestratorConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Parse a TOML document without validating it.
pub fn parse_config(raw: &str) -> Result<OrchestratorConfig, KairosError> {
    toml::from_str(raw).map_err(|e| KairosError::ConfigError(format!("Invalid TOML: {}", e)))
}

/// Canonicalize the path and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, KairosError> {
    let canonical = path.canonicalize().map_err(|e| {
        KairosError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(KairosError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn validate_file_size(path: &Path) -> Result<(), KairosError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| KairosError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(KairosError::ConfigError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }
    Ok(())
}

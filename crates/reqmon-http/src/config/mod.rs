//! YAML config for the demo server and the monitor it builds.
//!
//! Parsing is strict: unknown keys at any level are errors, and a parsed
//! config is always validated before it is handed back.

pub mod schema;

use std::io::ErrorKind;
use std::path::Path;

use reqmon_core::{MonitorError, Result};

pub use schema::{MonitorConfig, RequestDurationConfig, ServerConfig, SlowRequestConfig};

/// Parse and validate a YAML document.
pub fn load_from_str(yaml: &str) -> Result<ServerConfig> {
    let cfg = serde_yaml::from_str::<ServerConfig>(yaml)
        .map_err(|e| MonitorError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    tracing::debug!(
        listen = %cfg.listen,
        metrics_path = %cfg.metrics_path,
        skip_paths = cfg.monitor.skip_paths.len(),
        "config parsed"
    );
    Ok(cfg)
}

/// Read `path` and parse it. A missing file is an error.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ServerConfig> {
    let path = path.as_ref();
    match read(path)? {
        Some(yaml) => load_from_str(&yaml),
        None => Err(MonitorError::InvalidConfig(format!(
            "config file not found: {}",
            path.display()
        ))),
    }
}

/// Like [`load_from_file`], but a missing file yields [`ServerConfig::default`].
/// Unreadable or invalid files are still errors.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ServerConfig> {
    let path = path.as_ref();
    match read(path)? {
        Some(yaml) => load_from_str(&yaml),
        None => {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Ok(ServerConfig::default())
        }
    }
}

fn read(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MonitorError::Internal(format!(
            "read {} failed: {e}",
            path.display()
        ))),
    }
}

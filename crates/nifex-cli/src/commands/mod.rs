//! CLI subcommands.

pub mod batch;
pub mod compare;
pub mod config;
pub mod process;
pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};

use tracing::debug;

use nifex_core::models::config::NifexConfig;

/// File extensions accepted for scanning.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nifex")
        .join("config.json")
}

/// Load configuration from the given path, the default path, or defaults.
///
/// Credentials from the environment override the file.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NifexConfig> {
    let config = if let Some(path) = config_path {
        NifexConfig::from_file(Path::new(path))?
    } else {
        let path = default_config_path();
        if path.exists() {
            debug!("Using configuration from {}", path.display());
            NifexConfig::from_file(&path)?
        } else {
            NifexConfig::default()
        }
    };

    Ok(config.with_env_overrides())
}

/// Lower-cased extension of a path, or "".
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Check if a path has a scannable extension.
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

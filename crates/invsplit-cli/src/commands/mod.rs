pub mod config;
pub mod run;

use std::path::PathBuf;

use invsplit_core::SplitterConfig;

/// Platform config location, e.g. `~/.config/invsplit/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invsplit")
        .join("config.json")
}

/// The `--config` path when given, the default location otherwise.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration file, falling back to defaults when only the
/// default location was consulted and nothing is there.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<SplitterConfig> {
    let path = config_path(explicit);

    if explicit.is_none() && !path.exists() {
        return Ok(SplitterConfig::default());
    }

    SplitterConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}

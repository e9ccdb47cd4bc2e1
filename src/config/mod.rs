mod schema;

pub use schema::{Config, DEFAULT_LOG_LEVEL};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::ScoringTables;

/// Get the config directory path (~/.config/aft-scorer/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("aft-scorer"))
}

/// Get the default config file path (~/.config/aft-scorer/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/aft-scorer/config.yaml) and falls back to defaults when it
///   does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => match get_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    read_config(&config_path)
}

fn read_config(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Load the scoring tables selected by `override_path`, then the config's
/// `tables` entry, falling back to the bundled tables.
pub fn load_tables(config: &Config, override_path: Option<&Path>) -> Result<ScoringTables> {
    match override_path.or(config.tables.as_deref()) {
        Some(path) => ScoringTables::load(path),
        None => ScoringTables::bundled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_category: Moderate\nlog_level: info\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.default_category(), "Moderate");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("missing.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_category: [unclosed\n").unwrap();

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_load_tables_defaults_to_bundled() {
        let tables = load_tables(&Config::default(), None).unwrap();
        assert!(tables.missing_tables().is_empty());
    }

    #[test]
    fn test_load_tables_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let from_config = dir.path().join("config-tables.yaml");
        let from_flag = dir.path().join("flag-tables.yaml");
        fs::write(
            &from_config,
            "mos_categories:\n  Config: { minimum_total: 1, minimum_per_event: 1 }\n",
        )
        .unwrap();
        fs::write(
            &from_flag,
            "mos_categories:\n  Flag: { minimum_total: 1, minimum_per_event: 1 }\n",
        )
        .unwrap();

        let config = Config {
            tables: Some(from_config),
            ..Config::default()
        };

        let tables = load_tables(&config, None).unwrap();
        assert!(tables.category("Config").is_some());

        let tables = load_tables(&config, Some(&from_flag)).unwrap();
        assert!(tables.category("Flag").is_some());
        assert!(tables.category("Config").is_none());
    }
}

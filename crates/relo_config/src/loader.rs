//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ReloConfig;
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "relo.toml";

/// Loads `<project_dir>/relo.toml`, falling back to defaults if it is absent.
pub fn load_config(project_dir: &Path) -> Result<ReloConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ReloConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<ReloConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ReloConfig, ConfigError> {
    let config: ReloConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates configuration values that serde cannot check on its own.
fn validate_config(config: &ReloConfig) -> Result<(), ConfigError> {
    if config.device.name.as_deref() == Some("") {
        return Err(ConfigError::EmptyDeviceName);
    }
    for rule in config.relocation.tile_fallbacks.rules() {
        if rule.from.is_empty() || rule.to.is_empty() {
            return Err(ConfigError::EmptyFallbackPrefix {
                from: rule.from.clone(),
                to: rule.to.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relo_device::{FallbackRule, TileFamilyFallbacks};
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.device.name.is_none());
        assert!(config.device.tilegrid.is_none());
        assert!(config.device.series7_compatibility);
        assert!(!config.relocation.parallel);
        assert_eq!(
            config.relocation.tile_fallbacks,
            TileFamilyFallbacks::default()
        );
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[device]
name = "xc7a35t"
tilegrid = "db/xc7a35t/tilegrid.json"

[relocation]
parallel = true
tile_fallbacks = [
  { from = "CLBLL_", to = "CLBLM_" },
  { from = "BRAM_L", to = "BRAM_R" },
]

[compatibility]
RAMB36E1 = ["RAMB18E1"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.device.name.as_deref(), Some("xc7a35t"));
        assert_eq!(
            config.device.tilegrid.as_deref(),
            Some(Path::new("db/xc7a35t/tilegrid.json"))
        );
        assert!(config.relocation.parallel);
        assert_eq!(
            config.relocation.tile_fallbacks.rules()[1],
            FallbackRule::new("BRAM_L", "BRAM_R")
        );
        let compat = config.site_compatibility();
        assert!(compat.accepts(&"RAMB36E1".into(), &"RAMB18E1".into()));
        assert!(compat.accepts(&"SLICEM".into(), &"SLICEL".into()));
    }

    #[test]
    fn empty_fallback_list_disables_fallbacks() {
        let config = load_config_from_str("[relocation]\ntile_fallbacks = []\n").unwrap();
        assert!(config.relocation.tile_fallbacks.rules().is_empty());
    }

    #[test]
    fn series7_relations_can_be_disabled() {
        let config = load_config_from_str("[device]\nseries7_compatibility = false\n").unwrap();
        let compat = config.site_compatibility();
        assert!(!compat.accepts(&"SLICEM".into(), &"SLICEL".into()));
    }

    #[test]
    fn empty_prefix_rejected() {
        let toml = r#"
[relocation]
tile_fallbacks = [{ from = "", to = "CLBLM_" }]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        match err {
            ConfigError::EmptyFallbackPrefix { from, to } => {
                assert_eq!(from, "");
                assert_eq!(to, "CLBLM_");
            }
            other => panic!("expected EmptyFallbackPrefix, got {other:?}"),
        }
    }

    #[test]
    fn empty_device_name_rejected() {
        let err = load_config_from_str("[device]\nname = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDeviceName));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_in_dir_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.device.tilegrid.is_none());
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "[relocation]\nparallel = true").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.relocation.parallel);
    }

    #[test]
    fn io_error_from_nonexistent_file() {
        let err = load_config_file(Path::new("/nonexistent/relo.toml")).unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/relo.toml"));
            }
            other => panic!("expected Read, got {other:?}"),
        }
    }
}

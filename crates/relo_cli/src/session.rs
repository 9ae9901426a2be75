//! Shared setup for CLI commands: project root, configuration, device and
//! module loading.

use std::path::{Path, PathBuf};

use relo_config::{ReloConfig, CONFIG_FILE_NAME};
use relo_design::Module;
use relo_device::{Device, DeviceGrid, SiteId};
use relo_place::{RelocationOptions, Relocator};

use crate::module_file;
use crate::GlobalArgs;

/// Everything a command needs: the effective configuration and the device.
pub struct Session {
    /// Parsed `relo.toml`, or defaults.
    pub config: ReloConfig,
    /// The loaded device grid.
    pub device: Device,
}

impl Session {
    /// Builds a relocator over the session device using the configured
    /// fallback table.
    pub fn relocator(&self) -> Relocator<'_, Device> {
        Relocator::with_fallbacks(&self.device, self.config.relocation.tile_fallbacks.clone())
    }

    /// Returns the enumeration options from the configuration.
    pub fn options(&self) -> RelocationOptions {
        RelocationOptions {
            parallel: self.config.relocation.parallel,
        }
    }

    /// Resolves a site name on the session device.
    pub fn site_id(&self, name: &str) -> Result<SiteId, Box<dyn std::error::Error>> {
        self.device
            .site_by_name(name)
            .ok_or_else(|| format!("unknown site '{name}' on {}", self.device.name()).into())
    }

    /// Loads a module description against the session device.
    pub fn load_module(&self, path: &Path) -> Result<Module, Box<dyn std::error::Error>> {
        Ok(module_file::load_module(path, &self.device)?)
    }
}

/// Walks up from `start` looking for the nearest directory containing
/// `relo.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the configuration and returns it with the directory relative
/// paths in it are resolved against.
///
/// `--config` wins; otherwise the nearest `relo.toml` above the current
/// directory is used, and without one the defaults apply.
pub fn load_config(global: &GlobalArgs) -> Result<(ReloConfig, PathBuf), Box<dyn std::error::Error>> {
    if let Some(ref path) = global.config {
        let path = PathBuf::from(path);
        let config = relo_config::load_config_file(&path)?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok((config, base));
    }
    let cwd = std::env::current_dir()?;
    match find_project_root(&cwd) {
        Some(root) => Ok((relo_config::load_config(&root)?, root)),
        None => Ok((ReloConfig::default(), cwd)),
    }
}

/// Picks the tilegrid path: `--tilegrid` as given, else `device.tilegrid`
/// from the configuration resolved against `base`.
pub fn resolve_tilegrid(
    global: &GlobalArgs,
    config: &ReloConfig,
    base: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref path) = global.tilegrid {
        return Ok(PathBuf::from(path));
    }
    match config.device.tilegrid {
        Some(ref path) if path.is_absolute() => Ok(path.clone()),
        Some(ref path) => Ok(base.join(path)),
        None => Err(format!(
            "no tilegrid given; pass --tilegrid or set device.tilegrid in {CONFIG_FILE_NAME}"
        )
        .into()),
    }
}

/// Returns the device part name: `device.name` if configured, else the
/// name of the directory holding the tilegrid (`db/<part>/tilegrid.json`).
pub fn part_name(config: &ReloConfig, tilegrid: &Path) -> String {
    if let Some(ref name) = config.device.name {
        return name.clone();
    }
    tilegrid
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Loads configuration and device for a command.
pub fn load_session(global: &GlobalArgs) -> Result<Session, Box<dyn std::error::Error>> {
    let (config, base) = load_config(global)?;
    let tilegrid = resolve_tilegrid(global, &config, &base)?;
    let part = part_name(&config, &tilegrid);
    let device = relo_device::tilegrid::load_tilegrid(&part, &tilegrid, config.site_compatibility())?;
    tracing::info!(
        part = %part,
        tiles = device.tile_count(),
        sites = device.site_count(),
        "device loaded"
    );
    Ok(Session { config, device })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use tempfile::TempDir;

    fn global(config: Option<&Path>, tilegrid: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            format: ReportFormat::Text,
            config: config.map(|p| p.display().to_string()),
            tilegrid: tilegrid.map(|p| p.display().to_string()),
        }
    }

    #[test]
    fn find_project_root_in_parent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = dir.path().join("macros").join("adders");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn tilegrid_flag_wins() {
        let config = ReloConfig::default();
        let g = global(None, Some(Path::new("/db/xc7a35t/tilegrid.json")));
        let path = resolve_tilegrid(&g, &config, Path::new("/project")).unwrap();
        assert_eq!(path, PathBuf::from("/db/xc7a35t/tilegrid.json"));
    }

    #[test]
    fn config_tilegrid_is_relative_to_config() {
        let config =
            relo_config::load_config_from_str("[device]\ntilegrid = \"db/tilegrid.json\"\n")
                .unwrap();
        let path = resolve_tilegrid(&global(None, None), &config, Path::new("/project")).unwrap();
        assert_eq!(path, PathBuf::from("/project/db/tilegrid.json"));
    }

    #[test]
    fn missing_tilegrid_is_an_error() {
        let err = resolve_tilegrid(&global(None, None), &ReloConfig::default(), Path::new("."))
            .unwrap_err();
        assert!(err.to_string().contains("--tilegrid"));
    }

    #[test]
    fn part_name_from_directory() {
        let config = ReloConfig::default();
        assert_eq!(
            part_name(&config, Path::new("db/xc7a35t/tilegrid.json")),
            "xc7a35t"
        );
        let named = relo_config::load_config_from_str("[device]\nname = \"xc7z020\"\n").unwrap();
        assert_eq!(
            part_name(&named, Path::new("db/xc7a35t/tilegrid.json")),
            "xc7z020"
        );
    }

    #[test]
    fn session_from_explicit_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tilegrid.json"),
            crate::test_fixtures::TOY_TILEGRID,
        )
        .unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            "[device]\nname = \"toy\"\ntilegrid = \"tilegrid.json\"\n\n[relocation]\nparallel = true\n",
        )
        .unwrap();

        let session = load_session(&global(Some(&config_path), None)).unwrap();
        assert_eq!(session.device.name(), "toy");
        assert!(session.options().parallel);
        assert!(session.site_id("SLICE_X0Y0").is_ok());
        assert!(session.site_id("SLICE_X9Y9").is_err());
    }
}

//! Configuration types deserialized from `relo.toml`.

use relo_device::{SiteCompatibility, TileFamilyFallbacks};
use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `relo.toml`.
///
/// Every section is optional; an empty file is a valid configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ReloConfig {
    /// Device database settings.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Relocation engine settings.
    #[serde(default)]
    pub relocation: RelocationConfig,
    /// Extra site compatibility relations, `SITE_TYPE = ["HOSTED", ...]`.
    #[serde(default)]
    pub compatibility: SiteCompatibility,
}

impl ReloConfig {
    /// Returns the effective site compatibility table.
    ///
    /// Starts from the 7-series relations when
    /// [`DeviceConfig::series7_compatibility`] is set and merges the
    /// `[compatibility]` section on top.
    pub fn site_compatibility(&self) -> SiteCompatibility {
        let mut table = if self.device.series7_compatibility {
            SiteCompatibility::series7()
        } else {
            SiteCompatibility::new()
        };
        table.extend(&self.compatibility);
        table
    }
}

/// Location and naming of the device database.
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    /// Device part name (e.g. "xc7a35t").
    #[serde(default)]
    pub name: Option<String>,
    /// Path to a Project X-Ray style `tilegrid.json`.
    #[serde(default)]
    pub tilegrid: Option<PathBuf>,
    /// Whether to start from the built-in 7-series compatibility relations.
    #[serde(default = "default_true")]
    pub series7_compatibility: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: None,
            tilegrid: None,
            series7_compatibility: true,
        }
    }
}

/// Relocation engine settings.
#[derive(Debug, Default, Deserialize)]
pub struct RelocationConfig {
    /// Scan candidate anchor sites on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
    /// Tile-family fallback rules; defaults to the CLBLL/CLBLM pair.
    #[serde(default)]
    pub tile_fallbacks: TileFamilyFallbacks,
}

fn default_true() -> bool {
    true
}

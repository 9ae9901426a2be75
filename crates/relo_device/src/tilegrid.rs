//! Loader for Project X-Ray `tilegrid.json` files.
//!
//! The tilegrid lists every tile on the die with its raw grid position, type
//! and the sites it contains. Only the fields relocation needs are read;
//! frame addressing (`bits`) is ignored.
//!
//! JSON objects are unordered, so tiles are sorted row-major by raw grid
//! position and the sites of each tile by family prefix and coordinates.
//! This keeps site indices (and therefore [`DeviceGrid::corresponding_site`])
//! consistent between tiles of the same family.

use crate::device::{Device, SiteCompatibility};
use crate::error::DeviceError;
use crate::grid::DeviceGrid;
use crate::names;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Raw JSON structure for a tile entry.
#[derive(Deserialize)]
struct RawTileEntry {
    grid_x: u32,
    grid_y: u32,
    #[serde(rename = "type")]
    tile_type: String,
    #[serde(default)]
    sites: HashMap<String, String>,
}

/// Parses a tilegrid JSON string into a [`Device`].
///
/// # Errors
///
/// Returns [`DeviceError::Json`] if the JSON is malformed.
pub fn parse_tilegrid(
    part: &str,
    json: &str,
    compatibility: SiteCompatibility,
) -> Result<Device, DeviceError> {
    let raw: HashMap<String, RawTileEntry> = serde_json::from_str(json)?;

    let mut entries: Vec<(String, RawTileEntry)> = raw.into_iter().collect();
    entries.sort_by(|(a_name, a), (b_name, b)| {
        (a.grid_y, a.grid_x, a_name).cmp(&(b.grid_y, b.grid_x, b_name))
    });

    let mut device = Device::new(part).with_compatibility(compatibility);
    for (tile_name, entry) in entries {
        let tile = device.add_tile(&tile_name, entry.tile_type.as_str())?;
        let mut sites: Vec<(String, String)> = entry.sites.into_iter().collect();
        sites.sort_by_cached_key(|(name, _)| site_sort_key(name));
        for (site_name, site_type) in sites {
            device.add_site(tile, &site_name, site_type.as_str())?;
        }
    }

    tracing::debug!(
        part = device.name(),
        tiles = device.tile_count(),
        sites = device.site_count(),
        "loaded tilegrid"
    );
    Ok(device)
}

/// Reads and parses a `tilegrid.json` file.
pub fn load_tilegrid(
    part: &str,
    path: &Path,
    compatibility: SiteCompatibility,
) -> Result<Device, DeviceError> {
    tracing::debug!("reading tilegrid: {:?}", path);
    let json = std::fs::read_to_string(path)?;
    parse_tilegrid(part, &json, compatibility)
}

fn site_sort_key(name: &str) -> (String, i32, i32, String) {
    let prefix = names::tile_name_prefix(name).unwrap_or(name).to_string();
    let coord = names::parse_xy_suffix(name).unwrap_or(names::GridCoord::UNPLACED);
    (prefix, coord.x, coord.y, name.to_string())
}

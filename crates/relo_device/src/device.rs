//! In-memory device grid.

use crate::error::DeviceError;
use crate::grid::DeviceGrid;
use crate::ids::{SiteId, TileId};
use crate::names;
use crate::types::{PrimitiveType, Site, Tile, TileType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Extra primitive types a site type can host beyond its own.
///
/// A site always accepts its native type. Some site types are supersets of
/// others (a `SLICEM` can implement anything a `SLICEL` can); those
/// relations are listed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteCompatibility {
    extra: BTreeMap<PrimitiveType, BTreeSet<PrimitiveType>>,
}

impl SiteCompatibility {
    /// Creates an empty table: every site accepts only its native type.
    pub fn new() -> Self {
        Self::default()
    }

    /// The 7-series relations: `SLICEM` hosts `SLICEL`, and both IOB33
    /// variants host the generic `IOB33`.
    pub fn series7() -> Self {
        let mut table = Self::new();
        table.allow("SLICEM", "SLICEL");
        table.allow("IOB33M", "IOB33");
        table.allow("IOB33S", "IOB33");
        table
    }

    /// Records that sites of `site_type` can host `hosted`.
    pub fn allow(&mut self, site_type: impl Into<PrimitiveType>, hosted: impl Into<PrimitiveType>) {
        self.extra
            .entry(site_type.into())
            .or_default()
            .insert(hosted.into());
    }

    /// Merges another table into this one.
    pub fn extend(&mut self, other: &SiteCompatibility) {
        for (site_type, hosted) in &other.extra {
            self.extra
                .entry(site_type.clone())
                .or_default()
                .extend(hosted.iter().cloned());
        }
    }

    /// Returns `true` if a site of `site_type` can host `ty`.
    pub fn accepts(&self, site_type: &PrimitiveType, ty: &PrimitiveType) -> bool {
        site_type == ty
            || self
                .extra
                .get(site_type)
                .is_some_and(|hosted| hosted.contains(ty))
    }
}

/// An in-memory [`DeviceGrid`].
///
/// Tiles and sites get dense IDs in insertion order, which is also the
/// iteration order reported by [`DeviceGrid::compatible_sites`].
#[derive(Debug, Clone)]
pub struct Device {
    name: String,
    tiles: Vec<Tile>,
    sites: Vec<Site>,
    tiles_by_name: HashMap<String, TileId>,
    sites_by_name: HashMap<String, SiteId>,
    compatibility: SiteCompatibility,
}

impl Device {
    /// Creates an empty device with no compatibility relations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiles: Vec::new(),
            sites: Vec::new(),
            tiles_by_name: HashMap::new(),
            sites_by_name: HashMap::new(),
            compatibility: SiteCompatibility::new(),
        }
    }

    /// Replaces the site compatibility table.
    pub fn with_compatibility(mut self, compatibility: SiteCompatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Returns the site compatibility table.
    pub fn compatibility(&self) -> &SiteCompatibility {
        &self.compatibility
    }

    /// Returns a mutable reference to the site compatibility table.
    pub fn compatibility_mut(&mut self) -> &mut SiteCompatibility {
        &mut self.compatibility
    }

    /// Adds a tile and returns its ID.
    ///
    /// The tile's coordinates are parsed from its name.
    pub fn add_tile(
        &mut self,
        name: &str,
        tile_type: impl Into<TileType>,
    ) -> Result<TileId, DeviceError> {
        if self.tiles_by_name.contains_key(name) {
            return Err(DeviceError::DuplicateTile(name.to_string()));
        }
        let id = TileId::from_raw(self.tiles.len() as u32);
        self.tiles.push(Tile {
            id,
            name: name.to_string(),
            coord: names::parse_xy_suffix(name),
            tile_type: tile_type.into(),
            sites: Vec::new(),
        });
        self.tiles_by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Appends a site to `tile` and returns its ID.
    pub fn add_site(
        &mut self,
        tile: TileId,
        name: &str,
        site_type: impl Into<PrimitiveType>,
    ) -> Result<SiteId, DeviceError> {
        if self.sites_by_name.contains_key(name) {
            return Err(DeviceError::DuplicateSite(name.to_string()));
        }
        let id = SiteId::from_raw(self.sites.len() as u32);
        let owner = self
            .tiles
            .get_mut(tile.as_raw() as usize)
            .ok_or(DeviceError::UnknownTile(tile))?;
        let index = owner.sites.len() as u32;
        owner.sites.push(id);
        self.sites.push(Site {
            id,
            name: name.to_string(),
            tile,
            index,
            site_type: site_type.into(),
        });
        self.sites_by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Returns the number of tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Returns the number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Iterates over all tiles in ID order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterates over all sites in ID order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }
}

impl DeviceGrid for Device {
    fn name(&self) -> &str {
        &self.name
    }

    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.as_raw() as usize)
    }

    fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id.as_raw() as usize)
    }

    fn tile_by_name(&self, name: &str) -> Option<TileId> {
        self.tiles_by_name.get(name).copied()
    }

    fn site_by_name(&self, name: &str) -> Option<SiteId> {
        self.sites_by_name.get(name).copied()
    }

    fn site_accepts(&self, site: SiteId, ty: &PrimitiveType) -> bool {
        self.site(site)
            .is_some_and(|s| self.compatibility.accepts(&s.site_type, ty))
    }

    fn compatible_sites(&self, ty: &PrimitiveType) -> Vec<SiteId> {
        self.sites
            .iter()
            .filter(|s| self.compatibility.accepts(&s.site_type, ty))
            .map(|s| s.id)
            .collect()
    }
}

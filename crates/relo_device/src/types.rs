//! Data types for the device grid: tiles, sites, and their type tags.

use crate::ids::{SiteId, TileId};
use crate::names::GridCoord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The primitive type of an instance or a site (e.g. `SLICEL`, `RAMB36E1`).
///
/// Device families define hundreds of these, so they are carried by name
/// rather than as a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveType(String);

impl PrimitiveType {
    /// Creates a primitive type from its database name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the database name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrimitiveType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The family tag of a tile (e.g. `CLBLL_L`, `INT_R`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileType(String);

impl TileType {
    /// Creates a tile type from its database name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the database name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A tile in the device grid.
///
/// Tiles are the unit of relocation arithmetic: their coordinates come from
/// the `X<int>Y<int>` suffix of their name, not from the raw grid position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// The unique ID of this tile.
    pub id: TileId,
    /// The database name (e.g. `CLBLL_L_X16Y149`).
    pub name: String,
    /// Name coordinates, `None` for tiles without an `X..Y..` suffix.
    pub coord: Option<GridCoord>,
    /// The family tag.
    pub tile_type: TileType,
    /// Sites in this tile, in database order.
    pub sites: Vec<SiteId>,
}

/// A primitive site (placement location) within a tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// The unique ID of this site.
    pub id: SiteId,
    /// The database name (e.g. `SLICE_X24Y149`).
    pub name: String,
    /// The tile that contains this site.
    pub tile: TileId,
    /// Position of this site within its tile's site list.
    pub index: u32,
    /// The native primitive type of the site.
    pub site_type: PrimitiveType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_type_display_and_eq() {
        let a = PrimitiveType::new("SLICEL");
        let b: PrimitiveType = "SLICEL".into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "SLICEL");
        assert_eq!(a.as_str(), "SLICEL");
    }

    #[test]
    fn primitive_type_serializes_as_string() {
        let json = serde_json::to_string(&PrimitiveType::new("SLICEM")).unwrap();
        assert_eq!(json, "\"SLICEM\"");
    }

    #[test]
    fn tile_type_roundtrip() {
        let ty = TileType::new("CLBLM_R");
        let json = serde_json::to_string(&ty).unwrap();
        let back: TileType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
    }
}

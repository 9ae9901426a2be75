//! Read-only FPGA device grid model for hard-macro relocation.
//!
//! This crate provides the [`DeviceGrid`] trait, the query surface the
//! relocation engine needs from a device database, and [`Device`], an
//! in-memory implementation that can be built programmatically or loaded
//! from a Project X-Ray style `tilegrid.json`.
//!
//! # Usage
//!
//! ```
//! use relo_device::{Device, DeviceGrid, PrimitiveType};
//!
//! let mut device = Device::new("toy");
//! let tile = device.add_tile("CLBLL_X5Y10", "CLBLL").unwrap();
//! device.add_site(tile, "SLICE_X5Y10", "SLICEL").unwrap();
//!
//! let sites = device.compatible_sites(&PrimitiveType::new("SLICEL"));
//! assert_eq!(sites.len(), 1);
//! ```
//!
//! Tile and site names carry their grid position as an `X<int>Y<int>`
//! suffix. All parsing and formatting of that convention lives in [`names`].

#![warn(missing_docs)]

pub mod device;
pub mod error;
pub mod fallback;
pub mod grid;
pub mod ids;
pub mod names;
pub mod tilegrid;
pub mod types;

pub use device::{Device, SiteCompatibility};
pub use error::DeviceError;
pub use fallback::{FallbackRule, TileFamilyFallbacks};
pub use grid::DeviceGrid;
pub use ids::{SiteId, TileId};
pub use names::GridCoord;
pub use types::{PrimitiveType, Site, Tile, TileType};

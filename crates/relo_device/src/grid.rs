//! The query surface the relocation engine needs from a device database.

use crate::ids::{SiteId, TileId};
use crate::types::{PrimitiveType, Site, Tile};

/// Read-only device grid queries.
///
/// Every lookup that can miss returns `Option`; a miss is a normal answer
/// (relocation arithmetic routinely walks off the edge of the die), never an
/// error. Implementations used with parallel enumeration must also be `Sync`.
pub trait DeviceGrid {
    /// Returns the device part name.
    fn name(&self) -> &str;

    /// Returns the tile with the given ID, if it exists.
    fn tile(&self, id: TileId) -> Option<&Tile>;

    /// Returns the site with the given ID, if it exists.
    fn site(&self, id: SiteId) -> Option<&Site>;

    /// Looks a tile up by its exact name.
    fn tile_by_name(&self, name: &str) -> Option<TileId>;

    /// Looks a site up by its exact name.
    fn site_by_name(&self, name: &str) -> Option<SiteId>;

    /// Returns `true` if `site` can host a primitive of type `ty`.
    fn site_accepts(&self, site: SiteId, ty: &PrimitiveType) -> bool;

    /// Returns every site that can host a primitive of type `ty`, in device
    /// order.
    fn compatible_sites(&self, ty: &PrimitiveType) -> Vec<SiteId>;

    /// Returns the site on `target` that is structurally equivalent to
    /// `template`, provided it can host `ty`.
    ///
    /// Equivalence is positional: the site at the same index in the target
    /// tile's site list as `template` has in its own tile.
    fn corresponding_site(
        &self,
        template: SiteId,
        ty: &PrimitiveType,
        target: TileId,
    ) -> Option<SiteId> {
        let index = self.site(template)?.index as usize;
        let candidate = *self.tile(target)?.sites.get(index)?;
        self.site_accepts(candidate, ty).then_some(candidate)
    }

    /// Returns the tile containing `site`.
    fn tile_of_site(&self, site: SiteId) -> Option<TileId> {
        self.site(site).map(|s| s.tile)
    }
}

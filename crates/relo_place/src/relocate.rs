//! Tile-offset relocation arithmetic.

use relo_device::{names, DeviceGrid, TileFamilyFallbacks, TileId};

/// Maps template tiles to their counterparts under an anchor move.
///
/// Relocation preserves the grid offset between each tile and the anchor
/// tile. The target tile keeps the template tile's family prefix; when no
/// tile of that exact name exists, the fallback table proposes
/// substitutes.
pub struct Relocator<'a, D: DeviceGrid + ?Sized> {
    device: &'a D,
    fallbacks: TileFamilyFallbacks,
}

impl<'a, D: DeviceGrid + ?Sized> Relocator<'a, D> {
    /// Creates a relocator with the default CLB family fallbacks.
    pub fn new(device: &'a D) -> Self {
        Self::with_fallbacks(device, TileFamilyFallbacks::default())
    }

    /// Creates a relocator with an explicit fallback table.
    pub fn with_fallbacks(device: &'a D, fallbacks: TileFamilyFallbacks) -> Self {
        Self { device, fallbacks }
    }

    /// Returns the device being queried.
    pub fn device(&self) -> &'a D {
        self.device
    }

    /// Returns the fallback table.
    pub fn fallbacks(&self) -> &TileFamilyFallbacks {
        &self.fallbacks
    }

    /// Returns the tile that stands to `new_anchor` as `template` stands to
    /// `old_anchor`.
    ///
    /// `None` means the relocated tile falls off the grid or has no
    /// counterpart in any fallback family. A move onto the same anchor
    /// maps every known tile to itself; otherwise tiles without parseable
    /// coordinates never relocate.
    pub fn corresponding_tile(
        &self,
        template: TileId,
        old_anchor: TileId,
        new_anchor: TileId,
    ) -> Option<TileId> {
        let template_id = template;
        let template = self.device.tile(template)?;
        if old_anchor == new_anchor {
            return self.device.tile(old_anchor).map(|_| template_id);
        }
        let old_anchor = self.device.tile(old_anchor)?.coord?;
        let new_anchor = self.device.tile(new_anchor)?.coord?;
        let offset = template.coord?.offset_from(old_anchor)?;
        let target = new_anchor.shifted(offset)?;

        let exact = names::retarget_name(&template.name, target)?;
        self.device.tile_by_name(&exact).or_else(|| {
            self.fallbacks
                .candidates(&template.name, target)
                .find_map(|name| self.device.tile_by_name(&name))
        })
    }
}

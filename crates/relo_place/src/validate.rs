//! Placement validation for relocated modules.

use crate::relocate::Relocator;
use relo_design::{InstanceId, Module, NetId};
use relo_device::{DeviceGrid, SiteId, TileId};
use serde::Serialize;

/// Why a candidate anchor site cannot host a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum PlacementRejection {
    /// The module has no anchor instance.
    #[error("module has no anchor")]
    NoAnchor,

    /// The anchor instance is not placed, so there is nothing to relocate
    /// from.
    #[error("anchor instance '{anchor}' is not placed")]
    AnchorUnplaced {
        /// Anchor instance name.
        anchor: String,
    },

    /// The candidate site ID is not part of the device.
    #[error("site id {0} is not on the device")]
    UnknownSite(SiteId),

    /// The candidate is not the site structurally equivalent to the
    /// anchor's current site on its tile.
    #[error("site '{site}' does not correspond to the anchor site")]
    AnchorMismatch {
        /// Candidate site name.
        site: String,
    },

    /// A template instance is not placed.
    #[error("instance '{instance}' is not placed")]
    UnplacedInstance {
        /// Instance name.
        instance: String,
    },

    /// A template instance's tile has no counterpart after the move.
    #[error("no corresponding tile for instance '{instance}'")]
    NoCorrespondingTile {
        /// Instance name.
        instance: String,
    },

    /// The counterpart tile has no site that can host the instance.
    #[error("no compatible site for instance '{instance}' on tile '{tile}'")]
    NoCompatibleSite {
        /// Instance name.
        instance: String,
        /// Name of the relocated tile.
        tile: String,
    },

    /// A PIP's tile has no counterpart after the move.
    #[error("net '{net}' has a PIP in tile '{tile}' with no corresponding tile")]
    UnroutablePip {
        /// Net name.
        net: String,
        /// Name of the template tile holding the PIP.
        tile: String,
    },
}

/// Walks every instance and PIP of `module` under a move of its anchor to
/// `candidate`, reporting each target site and PIP tile to the callbacks.
///
/// Stops at the first element that cannot be relocated.
pub(crate) fn relocate_module<D: DeviceGrid + ?Sized>(
    relocator: &Relocator<'_, D>,
    module: &Module,
    candidate: SiteId,
    mut on_instance: impl FnMut(InstanceId, SiteId),
    mut on_pip: impl FnMut(NetId, TileId),
) -> Result<(), PlacementRejection> {
    let device = relocator.device();
    let anchor = module
        .anchor_instance()
        .ok_or(PlacementRejection::NoAnchor)?;
    let (anchor_site, anchor_tile) = match anchor.placement() {
        Some(p) => (p.site, p.tile),
        None => {
            return Err(PlacementRejection::AnchorUnplaced {
                anchor: anchor.name().to_string(),
            })
        }
    };
    let target = device
        .site(candidate)
        .ok_or(PlacementRejection::UnknownSite(candidate))?;

    if device.corresponding_site(anchor_site, anchor.primitive_type(), target.tile)
        != Some(candidate)
    {
        return Err(PlacementRejection::AnchorMismatch {
            site: target.name.clone(),
        });
    }

    for (id, inst) in module.instances() {
        let placement = inst
            .placement()
            .ok_or_else(|| PlacementRejection::UnplacedInstance {
                instance: inst.name().to_string(),
            })?;
        let tile = relocator
            .corresponding_tile(placement.tile, anchor_tile, target.tile)
            .ok_or_else(|| PlacementRejection::NoCorrespondingTile {
                instance: inst.name().to_string(),
            })?;
        let site = device
            .corresponding_site(placement.site, inst.primitive_type(), tile)
            .ok_or_else(|| PlacementRejection::NoCompatibleSite {
                instance: inst.name().to_string(),
                tile: tile_name(device, tile),
            })?;
        on_instance(id, site);
    }

    for (id, net) in module.nets() {
        for pip in net.pips() {
            let tile = relocator
                .corresponding_tile(pip.tile, anchor_tile, target.tile)
                .ok_or_else(|| PlacementRejection::UnroutablePip {
                    net: net.name().to_string(),
                    tile: tile_name(device, pip.tile),
                })?;
            on_pip(id, tile);
        }
    }
    Ok(())
}

fn tile_name<D: DeviceGrid + ?Sized>(device: &D, tile: TileId) -> String {
    device
        .tile(tile)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| tile.to_string())
}

/// Explains whether `module` can be relocated so its anchor sits on
/// `candidate`.
///
/// The anchor's own correspondence is checked first, then every instance,
/// then every PIP; the first failure is returned.
pub fn check_placement<D: DeviceGrid + ?Sized>(
    relocator: &Relocator<'_, D>,
    module: &Module,
    candidate: SiteId,
) -> Result<(), PlacementRejection> {
    relocate_module(relocator, module, candidate, |_, _| {}, |_, _| {})
}

/// Returns `true` if `module` can be relocated so its anchor sits on
/// `candidate`.
pub fn is_valid_placement<D: DeviceGrid + ?Sized>(
    relocator: &Relocator<'_, D>,
    module: &Module,
    candidate: SiteId,
) -> bool {
    match check_placement(relocator, module, candidate) {
        Ok(()) => true,
        Err(rejection) => {
            tracing::trace!(module = module.name(), site = %candidate, %rejection, "placement rejected");
            false
        }
    }
}

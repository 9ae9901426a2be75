//! Stamping relocated module copies into a design.

use crate::relocate::Relocator;
use crate::validate::{relocate_module, PlacementRejection};
use relo_design::{Design, LifecycleError, Module, ModuleId, ModuleInstanceId, ModuleInstancePlan};
use relo_device::{DeviceGrid, SiteId};

/// Errors from [`instantiate_module`].
#[derive(Debug, thiserror::Error)]
pub enum InstantiateError {
    /// The module cannot be relocated to the requested anchor site.
    #[error("cannot place module '{module}' at site {site}: {rejection}")]
    InvalidPlacement {
        /// Module name.
        module: String,
        /// Requested anchor site.
        site: SiteId,
        /// First element that failed to relocate.
        #[source]
        rejection: PlacementRejection,
    },

    /// The design refused the stamped copy.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Computes where every element of `module` lands when its anchor moves to
/// `anchor_site`.
pub fn plan_module_instance<D: DeviceGrid + ?Sized>(
    relocator: &Relocator<'_, D>,
    module: &Module,
    anchor_site: SiteId,
) -> Result<ModuleInstancePlan, PlacementRejection> {
    let device = relocator.device();
    let mut plan = ModuleInstancePlan::default();
    let mut missing = None;
    relocate_module(
        relocator,
        module,
        anchor_site,
        |inst, site| match device.site(site) {
            Some(site) => {
                plan.sites.insert(inst, site.clone());
            }
            None => missing = Some(site),
        },
        |net, tile| plan.pip_tiles.entry(net).or_default().push(tile),
    )?;
    match missing {
        Some(site) => Err(PlacementRejection::UnknownSite(site)),
        None => Ok(plan),
    }
}

/// Validates `anchor_site` for the design's module `module_id` and stamps a
/// relocated copy named `name` into the design.
///
/// The design is unchanged on error.
pub fn instantiate_module<D: DeviceGrid + ?Sized>(
    relocator: &Relocator<'_, D>,
    design: &mut Design,
    module_id: ModuleId,
    name: &str,
    anchor_site: SiteId,
) -> Result<ModuleInstanceId, InstantiateError> {
    let module = design
        .module(module_id)
        .ok_or(LifecycleError::UnknownModule(module_id))?;
    let plan = plan_module_instance(relocator, module, anchor_site).map_err(|rejection| {
        InstantiateError::InvalidPlacement {
            module: module.name().to_string(),
            site: anchor_site,
            rejection,
        }
    })?;
    Ok(design.instantiate(name, module_id, &plan)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relo_design::{Instance, Net, PinDirection, Pip};
    use relo_device::{Device, SiteCompatibility};

    fn row() -> Device {
        let mut dev = Device::new("row").with_compatibility(SiteCompatibility::series7());
        for x in 0..4 {
            let t = dev.add_tile(&format!("CLBLL_L_X{x}Y0"), "CLBLL").unwrap();
            dev.add_site(t, &format!("SLICE_X{x}Y0"), "SLICEL").unwrap();
            dev.add_tile(&format!("INT_L_X{x}Y0"), "INT").unwrap();
        }
        dev
    }

    fn routed_pair(dev: &Device) -> Module {
        let site = |n: &str| dev.site(dev.site_by_name(n).unwrap()).unwrap();
        let mut m = Module::new("pair");
        let a = m
            .add_instance(Instance::new("a", "SLICEL").placed_at(site("SLICE_X0Y0")))
            .unwrap();
        let b = m
            .add_instance(Instance::new("b", "SLICEL").placed_at(site("SLICE_X1Y0")))
            .unwrap();
        m.set_anchor(a).unwrap();
        let net = m.add_net(Net::new("q")).unwrap();
        m.connect(net, a, "AQ", PinDirection::Output).unwrap();
        m.connect(net, b, "A1", PinDirection::Input).unwrap();
        m.add_pip(
            net,
            Pip::new(dev.tile_by_name("INT_L_X0Y0").unwrap(), "LOGIC_OUTS0", "EE2BEG0"),
        )
        .unwrap();
        m
    }

    #[test]
    fn plan_maps_every_element() {
        let dev = row();
        let reloc = Relocator::new(&dev);
        let m = routed_pair(&dev);
        let plan = plan_module_instance(&reloc, &m, dev.site_by_name("SLICE_X2Y0").unwrap())
            .unwrap();
        let b = m.instance_by_name("b").unwrap();
        assert_eq!(plan.sites[&b].name, "SLICE_X3Y0");
        let q = m.net_by_name("q").unwrap();
        assert_eq!(plan.pip_tiles[&q], vec![dev.tile_by_name("INT_L_X2Y0").unwrap()]);
    }

    #[test]
    fn instantiate_places_relocated_copy() {
        let dev = row();
        let reloc = Relocator::new(&dev);
        let (mut design, module_id) = Design::from_module("row", routed_pair(&dev));
        let anchor = dev.site_by_name("SLICE_X2Y0").unwrap();
        let mi = instantiate_module(&reloc, &mut design, module_id, "u1", anchor).unwrap();

        let record = design.module_instance(mi).unwrap();
        let stamped_anchor = record.anchor.unwrap();
        assert_eq!(design.site_user(anchor), Some(stamped_anchor));
        let b = design.netlist().instance_by_name("u1/b").unwrap();
        assert_eq!(
            design.netlist().instance(b).unwrap().site_name(),
            Some("SLICE_X3Y0")
        );
        design.check_integrity().unwrap();
    }

    #[test]
    fn invalid_anchor_leaves_design_untouched() {
        let dev = row();
        let reloc = Relocator::new(&dev);
        let (mut design, module_id) = Design::from_module("row", routed_pair(&dev));
        let anchor = dev.site_by_name("SLICE_X3Y0").unwrap();
        let err = instantiate_module(&reloc, &mut design, module_id, "u1", anchor).unwrap_err();
        assert!(matches!(
            err,
            InstantiateError::InvalidPlacement {
                rejection: PlacementRejection::NoCorrespondingTile { .. },
                ..
            }
        ));
        assert_eq!(design.netlist().instance_count(), 0);
    }

    #[test]
    fn overlapping_copies_conflict() {
        let dev = row();
        let reloc = Relocator::new(&dev);
        let (mut design, module_id) = Design::from_module("row", routed_pair(&dev));
        let x0 = dev.site_by_name("SLICE_X0Y0").unwrap();
        let x1 = dev.site_by_name("SLICE_X1Y0").unwrap();
        instantiate_module(&reloc, &mut design, module_id, "u0", x0).unwrap();
        let err = instantiate_module(&reloc, &mut design, module_id, "u1", x1).unwrap_err();
        assert!(matches!(
            err,
            InstantiateError::Lifecycle(LifecycleError::SiteOccupied { .. })
        ));
        assert_eq!(design.module_instances().count(), 1);
    }

    #[test]
    fn unknown_module_is_lifecycle_error() {
        let dev = row();
        let reloc = Relocator::new(&dev);
        let mut design = Design::new("top", "row");
        let bogus = ModuleId::from_raw(3);
        let err = instantiate_module(&reloc, &mut design, bogus, "u0", SiteId::from_raw(0))
            .unwrap_err();
        assert!(matches!(
            err,
            InstantiateError::Lifecycle(LifecycleError::UnknownModule(_))
        ));
    }
}

//! The top-level design: a placed netlist, its module templates, and the
//! module instances stamped from them.

use crate::error::LifecycleError;
use crate::ids::{InstanceId, ModuleId, ModuleInstanceId, NetId, PinId};
use crate::instance::Instance;
use crate::module::Module;
use crate::net::Net;
use crate::netlist::Netlist;
use crate::types::{Owner, PinDirection, Pip, TemplateRef};
use relo_common::{Arena, InternalError, ReloResult};
use relo_device::{Site, SiteId, TileId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Design name used for hard-macro designs built from a single module.
pub const HARD_MACRO_DESIGN_NAME: &str = "__XILINX_NMC_MACRO";

/// A placed occurrence of a module template in a design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInstance {
    /// Module instance name; also the prefix of every stamped name.
    pub name: String,
    /// The template this was stamped from.
    pub module: ModuleId,
    /// The stamped copy of the template's anchor.
    pub anchor: Option<InstanceId>,
    /// Stamped instances, in template order.
    pub instances: Vec<InstanceId>,
    /// Stamped nets, in template order.
    pub nets: Vec<NetId>,
}

/// Where each template element lands for one module instance.
///
/// Produced by relocation; applying it is purely mechanical.
#[derive(Debug, Clone, Default)]
pub struct ModuleInstancePlan {
    /// Target site for every template instance.
    pub sites: BTreeMap<InstanceId, Site>,
    /// Target tile for every template PIP, per net and in PIP order.
    pub pip_tiles: BTreeMap<NetId, Vec<TileId>>,
}

/// A design: device part, placed netlist and module templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    name: String,
    part_name: String,
    is_hard_macro: bool,
    netlist: Netlist,
    modules: Arena<ModuleId, Module>,
    module_names: BTreeMap<String, ModuleId>,
    module_instances: Arena<ModuleInstanceId, ModuleInstance>,
    module_instance_names: BTreeMap<String, ModuleInstanceId>,
}

impl Design {
    /// Creates an empty design for a device part.
    pub fn new(name: impl Into<String>, part_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            part_name: part_name.into(),
            is_hard_macro: false,
            netlist: Netlist::new(Owner::Design),
            modules: Arena::new(),
            module_names: BTreeMap::new(),
            module_instances: Arena::new(),
            module_instance_names: BTreeMap::new(),
        }
    }

    /// Wraps a single module template as a hard-macro design.
    pub fn from_module(part_name: impl Into<String>, module: Module) -> (Self, ModuleId) {
        let mut design = Self::new(HARD_MACRO_DESIGN_NAME, part_name);
        design.is_hard_macro = true;
        let name = module.name().to_string();
        let id = design.modules.alloc(module);
        design.module_names.insert(name, id);
        (design, id)
    }

    /// Returns the design name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device part name.
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    /// Returns `true` if this design only carries a hard-macro template.
    pub fn is_hard_macro(&self) -> bool {
        self.is_hard_macro
    }

    /// Returns the placed netlist.
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    /// Registers a module template.
    pub fn add_module(&mut self, module: Module) -> Result<ModuleId, LifecycleError> {
        if self.module_names.contains_key(module.name()) {
            return Err(LifecycleError::DuplicateModule(module.name().to_string()));
        }
        let name = module.name().to_string();
        let id = self.modules.alloc(module);
        self.module_names.insert(name, id);
        Ok(id)
    }

    /// Returns a module template.
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Returns mutable access to a module template.
    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    /// Looks a module up by name.
    pub fn module_by_name(&self, name: &str) -> Option<ModuleId> {
        self.module_names.get(name).copied()
    }

    /// Iterates over module templates.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter()
    }

    /// Adds an instance to the design, claiming its site if placed.
    pub fn add_instance(&mut self, instance: Instance) -> Result<InstanceId, LifecycleError> {
        self.netlist.add_instance(instance)
    }

    /// Adds a net to the design.
    pub fn add_net(&mut self, net: Net) -> Result<NetId, LifecycleError> {
        self.netlist.add_net(net)
    }

    /// Connects an instance pin to a net.
    pub fn connect(
        &mut self,
        net: NetId,
        instance: InstanceId,
        pin_name: impl Into<String>,
        direction: PinDirection,
    ) -> Result<PinId, LifecycleError> {
        self.netlist.connect(net, instance, pin_name, direction)
    }

    /// Adds a routing resource to a net.
    pub fn add_pip(&mut self, net: NetId, pip: Pip) -> Result<(), LifecycleError> {
        self.netlist.add_pip(net, pip)
    }

    /// Returns mutable access to an instance's attributes and bonded flag.
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.netlist.instance_mut(id)
    }

    /// Places an instance, keeping site occupancy consistent.
    pub fn place(&mut self, id: InstanceId, site: &Site) -> Result<(), LifecycleError> {
        self.netlist.place(id, site)
    }

    /// Unplaces an instance and releases its site.
    pub fn unplace(&mut self, id: InstanceId) -> Result<(), LifecycleError> {
        self.netlist.unplace(id)
    }

    /// Removes an instance that is not part of a module instance.
    ///
    /// Nets that go away with the instance are also dropped from the module
    /// instance that stamped them.
    pub fn remove_instance(&mut self, id: InstanceId) -> Result<Instance, LifecycleError> {
        let (instance, removed_nets) = self.netlist.remove_instance_with_nets(id)?;
        self.forget_nets(&removed_nets);
        Ok(instance)
    }

    /// Removes a net, including from the module instance that stamped it.
    pub fn remove_net(&mut self, id: NetId) -> Option<Net> {
        let net = self.netlist.remove_net(id)?;
        self.forget_nets(&[id]);
        Some(net)
    }

    fn forget_nets(&mut self, removed: &[NetId]) {
        if removed.is_empty() {
            return;
        }
        for (_, mi) in self.module_instances.iter_mut() {
            mi.nets.retain(|n| !removed.contains(n));
        }
    }

    /// Returns the instance occupying `site`, if any.
    pub fn site_user(&self, site: SiteId) -> Option<InstanceId> {
        self.netlist.site_user(site)
    }

    /// Returns a module instance.
    pub fn module_instance(&self, id: ModuleInstanceId) -> Option<&ModuleInstance> {
        self.module_instances.get(id)
    }

    /// Looks a module instance up by name.
    pub fn module_instance_by_name(&self, name: &str) -> Option<ModuleInstanceId> {
        self.module_instance_names.get(name).copied()
    }

    /// Iterates over module instances.
    pub fn module_instances(&self) -> impl Iterator<Item = (ModuleInstanceId, &ModuleInstance)> {
        self.module_instances.iter()
    }

    /// Stamps a copy of `module` into the design as module instance `name`.
    ///
    /// Every template instance becomes `<name>/<instance>` placed on its
    /// planned site; every template net becomes `<name>/<net>` with its pins
    /// reconnected and its PIPs moved to the planned tiles. All conflicts
    /// are detected before anything is mutated.
    pub fn instantiate(
        &mut self,
        name: impl Into<String>,
        module_id: ModuleId,
        plan: &ModuleInstancePlan,
    ) -> Result<ModuleInstanceId, LifecycleError> {
        let name = name.into();
        let module = self
            .modules
            .get(module_id)
            .ok_or(LifecycleError::UnknownModule(module_id))?;
        if self.module_instance_names.contains_key(&name) {
            return Err(LifecycleError::DuplicateModuleInstance(name));
        }

        let mut claimed: BTreeMap<SiteId, String> = BTreeMap::new();
        for (template_id, inst) in module.instances() {
            let stamped = format!("{name}/{}", inst.name());
            let site = plan
                .sites
                .get(&template_id)
                .ok_or_else(|| LifecycleError::IncompletePlan(inst.name().to_string()))?;
            if self.netlist.instance_by_name(&stamped).is_some() {
                return Err(LifecycleError::DuplicateInstance(stamped));
            }
            let occupant = self
                .netlist
                .site_user(site.id)
                .and_then(|id| self.netlist.instance(id))
                .map(|i| i.name().to_string())
                .or_else(|| claimed.get(&site.id).cloned());
            if let Some(occupant) = occupant {
                return Err(LifecycleError::SiteOccupied {
                    site: site.name.clone(),
                    occupant,
                });
            }
            claimed.insert(site.id, stamped);
        }
        for (net_id, net) in module.nets() {
            let stamped = format!("{name}/{}", net.name());
            if self.netlist.net_by_name(&stamped).is_some() {
                return Err(LifecycleError::DuplicateNet(stamped));
            }
            let tiles = plan.pip_tiles.get(&net_id).map_or(0, Vec::len);
            if tiles != net.pips().len() {
                return Err(LifecycleError::IncompletePlan(net.name().to_string()));
            }
        }

        let mi_id = self.module_instances.alloc(ModuleInstance {
            name: name.clone(),
            module: module_id,
            anchor: None,
            instances: Vec::new(),
            nets: Vec::new(),
        });
        let mut stamped_ids: BTreeMap<InstanceId, InstanceId> = BTreeMap::new();
        let mut instances = Vec::new();
        for (template_id, template) in module.instances() {
            let mut copy = Instance::new(
                format!("{name}/{}", template.name()),
                template.primitive_type().clone(),
            );
            for attribute in template.attributes() {
                copy.add_attribute(attribute.clone());
            }
            copy.set_bonded(template.bonded());
            if let Some(site) = plan.sites.get(&template_id) {
                copy = copy.placed_at(site);
            }
            let id = self.netlist.add_instance(copy)?;
            if let Some(inst) = self.netlist.instance_mut(id) {
                inst.set_module_instance(Some(mi_id));
                inst.set_template(Some(TemplateRef {
                    module: module_id,
                    instance: template_id,
                }));
            }
            stamped_ids.insert(template_id, id);
            instances.push(id);
        }

        let mut nets = Vec::new();
        for (template_id, template) in module.nets() {
            let mut copy = Net::new(format!("{name}/{}", template.name()));
            for attribute in template.attributes() {
                copy.add_attribute(attribute.clone());
            }
            let id = self.netlist.add_net(copy)?;
            for &pin_id in template.pins() {
                let Some(pin) = module.netlist().pin(pin_id) else {
                    continue;
                };
                if let Some(&inst) = stamped_ids.get(&pin.instance) {
                    self.netlist
                        .connect(id, inst, pin.name.clone(), pin.direction)?;
                }
            }
            if let Some(tiles) = plan.pip_tiles.get(&template_id) {
                for (pip, &tile) in template.pips().iter().zip(tiles) {
                    self.netlist.add_pip(id, pip.relocated(tile))?;
                }
            }
            nets.push(id);
        }

        let anchor = module.anchor().and_then(|a| stamped_ids.get(&a).copied());
        if let Some(mi) = self.module_instances.get_mut(mi_id) {
            mi.anchor = anchor;
            mi.instances = instances;
            mi.nets = nets;
        }
        self.module_instance_names.insert(name.clone(), mi_id);
        tracing::debug!(module_instance = %name, module = %module_id, "instantiated module");
        Ok(mi_id)
    }

    /// Removes a module instance together with every stamped instance and
    /// net, releasing their sites.
    pub fn remove_module_instance(
        &mut self,
        id: ModuleInstanceId,
    ) -> Result<ModuleInstance, LifecycleError> {
        let mi = self
            .module_instances
            .remove(id)
            .ok_or(LifecycleError::UnknownModuleInstance(id))?;
        for &net in &mi.nets {
            self.netlist.remove_net(net);
        }
        let mut removed_nets = Vec::new();
        for &inst in &mi.instances {
            if self.netlist.instance(inst).is_some() {
                let (_, nets) = self.netlist.remove_instance_unchecked(inst)?;
                removed_nets.extend(nets);
            }
        }
        self.forget_nets(&removed_nets);
        self.module_instance_names.remove(&mi.name);
        tracing::debug!(module_instance = %mi.name, "removed module instance");
        Ok(mi)
    }

    /// Verifies the netlist and every module-instance membership.
    pub fn check_integrity(&self) -> ReloResult<()> {
        self.netlist.check_integrity()?;
        for (mi_id, mi) in self.module_instances.iter() {
            if !self.modules.contains(mi.module) {
                return Err(InternalError::new(format!(
                    "module instance '{}' refers to unknown module {}",
                    mi.name, mi.module
                )));
            }
            let members: BTreeSet<InstanceId> = mi.instances.iter().copied().collect();
            for &inst_id in &mi.instances {
                let inst = self.netlist.instance(inst_id).ok_or_else(|| {
                    InternalError::new(format!(
                        "module instance '{}' lists removed instance {inst_id}",
                        mi.name
                    ))
                })?;
                if inst.module_instance() != Some(mi_id) {
                    return Err(InternalError::new(format!(
                        "instance '{}' does not point back at module instance '{}'",
                        inst.name(),
                        mi.name
                    )));
                }
            }
            for &net_id in &mi.nets {
                if self.netlist.net(net_id).is_none() {
                    return Err(InternalError::new(format!(
                        "module instance '{}' lists removed net {net_id}",
                        mi.name
                    )));
                }
            }
            for (inst_id, inst) in self.netlist.instances() {
                if inst.module_instance() == Some(mi_id) && !members.contains(&inst_id) {
                    return Err(InternalError::new(format!(
                        "instance '{}' claims module instance '{}' but is not a member",
                        inst.name(),
                        mi.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bonded;
    use relo_device::PrimitiveType;

    fn site(raw: u32, name: &str) -> Site {
        Site {
            id: SiteId::from_raw(raw),
            name: name.to_string(),
            tile: TileId::from_raw(raw),
            index: 0,
            site_type: PrimitiveType::new("SLICEL"),
        }
    }

    /// Template with anchor `a` at X5Y10, `b` at X6Y10 and a routed net.
    fn template() -> (Module, InstanceId, InstanceId, NetId) {
        let mut module = Module::new("adder");
        let a = module
            .add_instance(Instance::new("a", "SLICEL").placed_at(&site(0, "SLICE_X5Y10")))
            .unwrap();
        let b = module
            .add_instance(Instance::new("b", "SLICEL").placed_at(&site(1, "SLICE_X6Y10")))
            .unwrap();
        module.set_anchor(a).unwrap();
        let net = module.add_net(Net::new("carry")).unwrap();
        module.connect(net, a, "COUT", PinDirection::Output).unwrap();
        module.connect(net, b, "CIN", PinDirection::Input).unwrap();
        module
            .add_pip(net, Pip::new(TileId::from_raw(0), "COUT", "EE2BEG0"))
            .unwrap();
        (module, a, b, net)
    }

    fn plan(a: InstanceId, b: InstanceId, net: NetId) -> ModuleInstancePlan {
        let mut plan = ModuleInstancePlan::default();
        plan.sites.insert(a, site(20, "SLICE_X20Y30"));
        plan.sites.insert(b, site(21, "SLICE_X21Y30"));
        plan.pip_tiles.insert(net, vec![TileId::from_raw(20)]);
        plan
    }

    #[test]
    fn from_module_is_hard_macro() {
        let (module, ..) = template();
        let (design, id) = Design::from_module("xc7a35t", module);
        assert!(design.is_hard_macro());
        assert_eq!(design.name(), HARD_MACRO_DESIGN_NAME);
        assert_eq!(design.part_name(), "xc7a35t");
        assert_eq!(design.module_by_name("adder"), Some(id));
    }

    #[test]
    fn duplicate_module_rejected() {
        let mut design = Design::new("top", "xc7a35t");
        design.add_module(Module::new("m")).unwrap();
        assert_eq!(
            design.add_module(Module::new("m")).unwrap_err(),
            LifecycleError::DuplicateModule("m".to_string())
        );
    }

    #[test]
    fn instantiate_stamps_instances_and_nets() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        let mi = design
            .instantiate("u0", module_id, &plan(a, b, net))
            .unwrap();

        let stamped_a = design.netlist().instance_by_name("u0/a").unwrap();
        let stamped_b = design.netlist().instance_by_name("u0/b").unwrap();
        let inst_b = design.netlist().instance(stamped_b).unwrap();
        assert_eq!(inst_b.site_name(), Some("SLICE_X21Y30"));
        assert_eq!(inst_b.module_instance(), Some(mi));
        assert_eq!(
            inst_b.template(),
            Some(TemplateRef {
                module: module_id,
                instance: b
            })
        );
        assert_eq!(design.site_user(SiteId::from_raw(20)), Some(stamped_a));

        let stamped_net = design.netlist().net_by_name("u0/carry").unwrap();
        let carry = design.netlist().net(stamped_net).unwrap();
        assert_eq!(carry.pin_count(), 2);
        assert_eq!(carry.pips()[0].tile, TileId::from_raw(20));
        assert_eq!(carry.pips()[0].end_wire, "EE2BEG0");

        let record = design.module_instance(mi).unwrap();
        assert_eq!(record.anchor, Some(stamped_a));
        assert_eq!(record.instances.len(), 2);
        design.check_integrity().unwrap();
    }

    #[test]
    fn stamped_members_only_leave_with_module_instance() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        let mi = design
            .instantiate("u0", module_id, &plan(a, b, net))
            .unwrap();
        let stamped_a = design.netlist().instance_by_name("u0/a").unwrap();

        assert!(matches!(
            design.remove_instance(stamped_a),
            Err(LifecycleError::InModuleInstance { .. })
        ));
        assert!(design.netlist().instance(stamped_a).is_some());

        let removed = design.remove_module_instance(mi).unwrap();
        assert_eq!(removed.name, "u0");
        assert_eq!(design.netlist().instance_count(), 0);
        assert_eq!(design.netlist().net_count(), 0);
        assert_eq!(design.site_user(SiteId::from_raw(20)), None);
        assert!(design.module_instance_by_name("u0").is_none());
        design.check_integrity().unwrap();
    }

    #[test]
    fn instantiate_refuses_occupied_site_without_mutation() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        design
            .add_instance(Instance::new("blocker", "SLICEL").placed_at(&site(21, "SLICE_X21Y30")))
            .unwrap();

        let err = design
            .instantiate("u0", module_id, &plan(a, b, net))
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::SiteOccupied {
                site: "SLICE_X21Y30".to_string(),
                occupant: "blocker".to_string(),
            }
        );
        assert_eq!(design.netlist().instance_count(), 1);
        assert_eq!(design.module_instances().count(), 0);
    }

    #[test]
    fn instantiate_requires_complete_plan() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        let mut partial = plan(a, b, net);
        partial.sites.remove(&b);
        assert_eq!(
            design.instantiate("u0", module_id, &partial).unwrap_err(),
            LifecycleError::IncompletePlan("b".to_string())
        );
    }

    #[test]
    fn duplicate_module_instance_name_rejected() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        design.instantiate("u0", module_id, &plan(a, b, net)).unwrap();
        assert_eq!(
            design
                .instantiate("u0", module_id, &ModuleInstancePlan::default())
                .unwrap_err(),
            LifecycleError::DuplicateModuleInstance("u0".to_string())
        );
    }

    #[test]
    fn stamped_instances_copy_template_state() {
        let (mut module, a, b, net) = template();
        module.instance_mut(b).unwrap().set_bonded(Bonded::Bonded);
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        design.instantiate("u0", module_id, &plan(a, b, net)).unwrap();
        let stamped_b = design.netlist().instance_by_name("u0/b").unwrap();
        // Placement resets the bonded requirement.
        assert_eq!(
            design.netlist().instance(stamped_b).unwrap().bonded(),
            Bonded::Unknown
        );
    }

    #[test]
    fn removing_outside_instance_prunes_stamped_net() {
        let mut module = Module::new("m");
        let a = module
            .add_instance(Instance::new("a", "SLICEL").placed_at(&site(0, "SLICE_X5Y10")))
            .unwrap();
        module.set_anchor(a).unwrap();
        let n = module.add_net(Net::new("n")).unwrap();
        module
            .add_pip(n, Pip::new(TileId::from_raw(0), "LOGIC_OUTS0", "EE2BEG0"))
            .unwrap();

        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        let mut plan = ModuleInstancePlan::default();
        plan.sites.insert(a, site(20, "SLICE_X20Y30"));
        plan.pip_tiles.insert(n, vec![TileId::from_raw(20)]);
        let mi = design.instantiate("u1", module_id, &plan).unwrap();

        let stamped_net = design.netlist().net_by_name("u1/n").unwrap();
        let c = design.add_instance(Instance::new("c", "SLICEL")).unwrap();
        design
            .connect(stamped_net, c, "A1", PinDirection::Input)
            .unwrap();

        design.remove_instance(c).unwrap();
        assert!(design.netlist().net(stamped_net).is_none());
        assert!(design.module_instance(mi).unwrap().nets.is_empty());
        design.check_integrity().unwrap();
    }

    #[test]
    fn integrity_detects_removed_module_instance_net() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        let mi = design.instantiate("u0", module_id, &plan(a, b, net)).unwrap();
        design.module_instances[mi].nets.push(NetId::from_raw(99));
        let err = design.check_integrity().unwrap_err();
        assert!(err.message.contains("lists removed net 99"));
    }

    #[test]
    fn design_remove_net_updates_module_instance() {
        let (module, a, b, net) = template();
        let mut design = Design::new("top", "xc7a35t");
        let module_id = design.add_module(module).unwrap();
        let mi = design.instantiate("u0", module_id, &plan(a, b, net)).unwrap();
        let stamped_net = design.netlist().net_by_name("u0/carry").unwrap();
        design.remove_net(stamped_net).unwrap();
        assert!(design.module_instance(mi).unwrap().nets.is_empty());
        design.check_integrity().unwrap();
    }
}

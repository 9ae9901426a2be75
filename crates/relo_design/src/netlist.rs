//! The instance/net/pin graph of a design or module template.
//!
//! A [`Netlist`] owns its instances, nets and pins in tombstoning arenas and
//! keeps every cross-reference between them consistent. Design-owned
//! netlists additionally track which instance occupies each device site.

use crate::error::LifecycleError;
use crate::ids::{InstanceId, NetId, PinId};
use crate::instance::{Instance, Placement};
use crate::net::Net;
use crate::types::{Bonded, Owner, Pin, PinDirection, Pip};
use relo_common::{Arena, InternalError, ReloResult};
use relo_device::{Site, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Instances, nets and pins belonging to one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netlist {
    owner: Owner,
    instances: Arena<InstanceId, Instance>,
    nets: Arena<NetId, Net>,
    pins: Arena<PinId, Pin>,
    instance_names: BTreeMap<String, InstanceId>,
    net_names: BTreeMap<String, NetId>,
    occupancy: BTreeMap<SiteId, InstanceId>,
}

impl Netlist {
    /// Creates an empty netlist for the given owner kind.
    pub fn new(owner: Owner) -> Self {
        Self {
            owner,
            instances: Arena::new(),
            nets: Arena::new(),
            pins: Arena::new(),
            instance_names: BTreeMap::new(),
            net_names: BTreeMap::new(),
            occupancy: BTreeMap::new(),
        }
    }

    /// Returns the owner kind.
    pub fn owner(&self) -> Owner {
        self.owner
    }

    fn tracks_occupancy(&self) -> bool {
        self.owner == Owner::Design
    }

    /// Attaches an instance and returns its new ID.
    ///
    /// A placed instance added to a design claims its site.
    pub fn add_instance(&mut self, mut instance: Instance) -> Result<InstanceId, LifecycleError> {
        if self.instance_names.contains_key(instance.name()) {
            return Err(LifecycleError::DuplicateInstance(instance.name().to_string()));
        }
        if let Some(placement) = instance.placement() {
            self.check_site_free(placement, None)?;
        }
        instance.set_owner(self.owner);
        instance.nets_mut().clear();
        instance.pins_mut().clear();
        let name = instance.name().to_string();
        let site = instance.site();
        let id = self.instances.alloc(instance);
        self.instance_names.insert(name, id);
        if let (Some(site), true) = (site, self.tracks_occupancy()) {
            self.occupancy.insert(site, id);
        }
        Ok(id)
    }

    /// Attaches an empty net and returns its new ID.
    pub fn add_net(&mut self, mut net: Net) -> Result<NetId, LifecycleError> {
        if self.net_names.contains_key(net.name()) {
            return Err(LifecycleError::DuplicateNet(net.name().to_string()));
        }
        net.pins_mut().clear();
        let name = net.name().to_string();
        let id = self.nets.alloc(net);
        self.net_names.insert(name, id);
        Ok(id)
    }

    /// Creates a pin on `instance` and attaches it to `net`.
    pub fn connect(
        &mut self,
        net: NetId,
        instance: InstanceId,
        pin_name: impl Into<String>,
        direction: PinDirection,
    ) -> Result<PinId, LifecycleError> {
        if !self.nets.contains(net) {
            return Err(LifecycleError::UnknownNet(net));
        }
        if !self.instances.contains(instance) {
            return Err(LifecycleError::UnknownInstance(instance));
        }
        let pin = self.pins.alloc(Pin {
            name: pin_name.into(),
            direction,
            instance,
            net: Some(net),
        });
        self.nets[net].pins_mut().push(pin);
        let inst = &mut self.instances[instance];
        inst.pins_mut().push(pin);
        inst.nets_mut().insert(net);
        Ok(pin)
    }

    /// Appends a routing resource to a net.
    pub fn add_pip(&mut self, net: NetId, pip: Pip) -> Result<(), LifecycleError> {
        let net = self.nets.get_mut(net).ok_or(LifecycleError::UnknownNet(net))?;
        net.add_pip(pip);
        Ok(())
    }

    /// Removes all routing from a net.
    pub fn unroute(&mut self, net: NetId) -> Result<(), LifecycleError> {
        let net = self.nets.get_mut(net).ok_or(LifecycleError::UnknownNet(net))?;
        net.unroute();
        Ok(())
    }

    /// Places an instance on `site`.
    ///
    /// In a design the previous site is released and the new one claimed;
    /// a site held by another instance is refused and nothing changes. The
    /// bonded requirement is reset and coordinates are recomputed from the
    /// site name.
    pub fn place(&mut self, id: InstanceId, site: &Site) -> Result<(), LifecycleError> {
        let placement = Placement::of(site);
        if !self.instances.contains(id) {
            return Err(LifecycleError::UnknownInstance(id));
        }
        self.check_site_free(&placement, Some(id))?;
        self.release_site(id);
        let tracks = self.tracks_occupancy();
        let inst = &mut self.instances[id];
        inst.set_placement(Some(placement));
        inst.set_bonded(Bonded::Unknown);
        if tracks {
            self.occupancy.insert(site.id, id);
        }
        tracing::debug!(instance = %self.instances[id].name(), site = %site.name, "placed instance");
        Ok(())
    }

    /// Clears an instance's placement, releasing its site in a design.
    pub fn unplace(&mut self, id: InstanceId) -> Result<(), LifecycleError> {
        if !self.instances.contains(id) {
            return Err(LifecycleError::UnknownInstance(id));
        }
        self.release_site(id);
        self.instances[id].set_placement(None);
        Ok(())
    }

    /// Detaches an instance from this netlist and returns it.
    ///
    /// Members of a module instance are refused; they go away only with
    /// their module instance. Every pin of the instance is dropped: a net
    /// left with no other pin is removed entirely, other nets just lose the
    /// pin. Touched nets are unrouted.
    pub fn remove_instance(&mut self, id: InstanceId) -> Result<Instance, LifecycleError> {
        self.remove_instance_with_nets(id).map(|(inst, _)| inst)
    }

    /// Like [`Netlist::remove_instance`], also returning the nets that were
    /// removed because the instance held their last pin.
    pub fn remove_instance_with_nets(
        &mut self,
        id: InstanceId,
    ) -> Result<(Instance, Vec<NetId>), LifecycleError> {
        let inst = self
            .instances
            .get(id)
            .ok_or(LifecycleError::UnknownInstance(id))?;
        if let Some(module_instance) = inst.module_instance() {
            return Err(LifecycleError::InModuleInstance {
                instance: inst.name().to_string(),
                module_instance,
            });
        }
        self.remove_instance_unchecked(id)
    }

    /// Removes an instance without the module-instance guard.
    pub(crate) fn remove_instance_unchecked(
        &mut self,
        id: InstanceId,
    ) -> Result<(Instance, Vec<NetId>), LifecycleError> {
        let pins = match self.instances.get(id) {
            Some(inst) => inst.pins().to_vec(),
            None => return Err(LifecycleError::UnknownInstance(id)),
        };
        let mut removed_nets = Vec::new();
        for pin in pins {
            if let Some(net) = self.pins.get(pin).and_then(|p| p.net) {
                let last_pin = match self.nets.get_mut(net) {
                    Some(n) => {
                        n.unroute();
                        n.pin_count() <= 1
                    }
                    None => false,
                };
                if last_pin {
                    self.remove_net(net);
                    removed_nets.push(net);
                } else if let Some(n) = self.nets.get_mut(net) {
                    n.pins_mut().retain(|&p| p != pin);
                }
            }
            self.pins.remove(pin);
        }
        self.release_site(id);
        let mut inst = self
            .instances
            .remove(id)
            .ok_or(LifecycleError::UnknownInstance(id))?;
        self.instance_names.remove(inst.name());
        inst.detach();
        tracing::debug!(instance = %inst.name(), nets = removed_nets.len(), "removed instance");
        Ok((inst, removed_nets))
    }

    /// Removes a net, clearing it from every pin and instance that
    /// referenced it. Returns `None` for an unknown net.
    pub fn remove_net(&mut self, id: NetId) -> Option<Net> {
        let net = self.nets.remove(id)?;
        for &pin in net.pins() {
            if let Some(p) = self.pins.get_mut(pin) {
                if p.net == Some(id) {
                    p.net = None;
                }
                if let Some(inst) = self.instances.get_mut(p.instance) {
                    inst.nets_mut().remove(&id);
                }
            }
        }
        self.net_names.remove(net.name());
        tracing::debug!(net = %net.name(), pins = net.pin_count(), "removed net");
        Some(net)
    }

    /// Returns the instance occupying `site`, if any. Always `None` outside
    /// a design.
    pub fn site_user(&self, site: SiteId) -> Option<InstanceId> {
        self.occupancy.get(&site).copied()
    }

    /// Returns the instance with the given ID.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// Returns mutable access to an instance's attributes and bonded flag.
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(id)
    }

    /// Looks an instance up by name.
    pub fn instance_by_name(&self, name: &str) -> Option<InstanceId> {
        self.instance_names.get(name).copied()
    }

    /// Iterates over live instances in creation order.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.instances.iter()
    }

    /// Returns the number of live instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id)
    }

    /// Returns mutable access to a net's attributes and routing.
    pub fn net_mut(&mut self, id: NetId) -> Option<&mut Net> {
        self.nets.get_mut(id)
    }

    /// Looks a net up by name.
    pub fn net_by_name(&self, name: &str) -> Option<NetId> {
        self.net_names.get(name).copied()
    }

    /// Iterates over live nets in creation order.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> {
        self.nets.iter()
    }

    /// Returns the number of live nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    /// Iterates over live pins in creation order.
    pub fn pins(&self) -> impl Iterator<Item = (PinId, &Pin)> {
        self.pins.iter()
    }

    /// Verifies every bidirectional reference in the graph.
    ///
    /// Returns an [`InternalError`] naming the first violation found.
    pub fn check_integrity(&self) -> ReloResult<()> {
        for (pin_id, pin) in self.pins.iter() {
            let inst = self.instances.get(pin.instance).ok_or_else(|| {
                InternalError::new(format!(
                    "pin {pin_id} '{}' belongs to removed instance {}",
                    pin.name, pin.instance
                ))
            })?;
            if !inst.pins().contains(&pin_id) {
                return Err(InternalError::new(format!(
                    "instance '{}' does not list its pin {pin_id}",
                    inst.name()
                )));
            }
            if let Some(net_id) = pin.net {
                let net = self.nets.get(net_id).ok_or_else(|| {
                    InternalError::new(format!(
                        "pin {pin_id} '{}' points at removed net {net_id}",
                        pin.name
                    ))
                })?;
                if !net.pins().contains(&pin_id) {
                    return Err(InternalError::new(format!(
                        "net '{}' does not list pin {pin_id}",
                        net.name()
                    )));
                }
            }
        }

        for (net_id, net) in self.nets.iter() {
            for &pin_id in net.pins() {
                match self.pins.get(pin_id) {
                    Some(pin) if pin.net == Some(net_id) => {}
                    _ => {
                        return Err(InternalError::new(format!(
                            "net '{}' lists pin {pin_id} that is not attached to it",
                            net.name()
                        )))
                    }
                }
            }
            if self.net_names.get(net.name()) != Some(&net_id) {
                return Err(InternalError::new(format!(
                    "net '{}' missing from the name index",
                    net.name()
                )));
            }
        }

        for (inst_id, inst) in self.instances.iter() {
            if inst.owner() != self.owner {
                return Err(InternalError::new(format!(
                    "instance '{}' has owner {:?}, expected {:?}",
                    inst.name(),
                    inst.owner(),
                    self.owner
                )));
            }
            let mut pin_nets = BTreeSet::new();
            for &pin_id in inst.pins() {
                let pin = self
                    .pins
                    .get(pin_id)
                    .filter(|p| p.instance == inst_id)
                    .ok_or_else(|| {
                        InternalError::new(format!(
                            "instance '{}' lists foreign or removed pin {pin_id}",
                            inst.name()
                        ))
                    })?;
                pin_nets.extend(pin.net);
            }
            if &pin_nets != inst.nets() {
                return Err(InternalError::new(format!(
                    "instance '{}' net set does not match its pins",
                    inst.name()
                )));
            }
            if self.instance_names.get(inst.name()) != Some(&inst_id) {
                return Err(InternalError::new(format!(
                    "instance '{}' missing from the name index",
                    inst.name()
                )));
            }
            if self.tracks_occupancy() {
                if let Some(site) = inst.site() {
                    if self.occupancy.get(&site) != Some(&inst_id) {
                        return Err(InternalError::new(format!(
                            "instance '{}' is placed on site {site} but does not occupy it",
                            inst.name()
                        )));
                    }
                }
            }
        }

        for (&site, &inst_id) in &self.occupancy {
            let placed_here = self
                .instances
                .get(inst_id)
                .is_some_and(|inst| inst.site() == Some(site));
            if !placed_here {
                return Err(InternalError::new(format!(
                    "site {site} is held by instance {inst_id}, which is not placed there"
                )));
            }
        }

        if self.instance_names.len() != self.instances.len() {
            return Err(InternalError::new("instance name index is out of sync"));
        }
        if self.net_names.len() != self.nets.len() {
            return Err(InternalError::new("net name index is out of sync"));
        }
        Ok(())
    }

    fn check_site_free(
        &self,
        placement: &Placement,
        claimant: Option<InstanceId>,
    ) -> Result<(), LifecycleError> {
        if !self.tracks_occupancy() {
            return Ok(());
        }
        match self.occupancy.get(&placement.site) {
            Some(&occupant) if Some(occupant) != claimant => Err(LifecycleError::SiteOccupied {
                site: placement.site_name.clone(),
                occupant: self
                    .instances
                    .get(occupant)
                    .map(|i| i.name().to_string())
                    .unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }

    fn release_site(&mut self, id: InstanceId) {
        if let Some(site) = self.instances.get(id).and_then(Instance::site) {
            if self.occupancy.get(&site) == Some(&id) {
                self.occupancy.remove(&site);
            }
        }
    }
}

//! Hard-macro module templates.
//!
//! A [`Module`] is a rigid, pre-placed and pre-routed group of instances and
//! nets with one designated anchor instance. Relocating the anchor moves the
//! whole template by the same tile offset.

use crate::error::LifecycleError;
use crate::ids::{InstanceId, NetId, PinId};
use crate::instance::Instance;
use crate::net::Net;
use crate::netlist::Netlist;
use crate::types::{has_attribute, Attribute, Owner, PinDirection, Pip, Port};
use relo_device::{Site, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last computed list of valid anchor sites.
///
/// Derived data: any structural change to the module marks it stale, and a
/// stale list is still returned until it is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCache {
    sites: Vec<SiteId>,
    stale: bool,
}

impl Default for PlacementCache {
    fn default() -> Self {
        Self {
            sites: Vec::new(),
            stale: true,
        }
    }
}

/// A reusable relocatable template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    name: String,
    attributes: Vec<Attribute>,
    anchor: Option<InstanceId>,
    ports: BTreeMap<String, Port>,
    netlist: Netlist,
    min_clk_period: Option<f32>,
    metadata: BTreeMap<String, Vec<String>>,
    placements: PlacementCache,
}

impl Module {
    /// Creates an empty module with no anchor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            anchor: None,
            ports: BTreeMap::new(),
            netlist: Netlist::new(Owner::Module),
            min_clk_period: None,
            metadata: BTreeMap::new(),
            placements: PlacementCache::default(),
        }
    }

    /// Returns the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Appends an attribute.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Returns `true` if an attribute with the given physical name exists.
    pub fn has_attribute(&self, physical_name: &str) -> bool {
        has_attribute(&self.attributes, physical_name)
    }

    /// Returns the anchor instance ID, if set.
    pub fn anchor(&self) -> Option<InstanceId> {
        self.anchor
    }

    /// Returns the anchor instance, if set.
    pub fn anchor_instance(&self) -> Option<&Instance> {
        self.netlist.instance(self.anchor?)
    }

    /// Designates the anchor instance.
    pub fn set_anchor(&mut self, id: InstanceId) -> Result<(), LifecycleError> {
        if self.netlist.instance(id).is_none() {
            return Err(LifecycleError::UnknownInstance(id));
        }
        self.anchor = Some(id);
        self.invalidate_placements();
        Ok(())
    }

    /// Returns the template's instance/net graph.
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    /// Returns the instance with the given ID.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.netlist.instance(id)
    }

    /// Returns mutable access to an instance's attributes and bonded flag.
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.invalidate_placements();
        self.netlist.instance_mut(id)
    }

    /// Looks an instance up by name.
    pub fn instance_by_name(&self, name: &str) -> Option<InstanceId> {
        self.netlist.instance_by_name(name)
    }

    /// Iterates over the template instances.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.netlist.instances()
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.netlist.net(id)
    }

    /// Looks a net up by name.
    pub fn net_by_name(&self, name: &str) -> Option<NetId> {
        self.netlist.net_by_name(name)
    }

    /// Iterates over the template nets.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &Net)> {
        self.netlist.nets()
    }

    /// Adds an instance to the template.
    pub fn add_instance(&mut self, instance: Instance) -> Result<InstanceId, LifecycleError> {
        self.invalidate_placements();
        self.netlist.add_instance(instance)
    }

    /// Adds a net to the template.
    pub fn add_net(&mut self, net: Net) -> Result<NetId, LifecycleError> {
        self.invalidate_placements();
        self.netlist.add_net(net)
    }

    /// Connects an instance pin to a template net.
    pub fn connect(
        &mut self,
        net: NetId,
        instance: InstanceId,
        pin_name: impl Into<String>,
        direction: PinDirection,
    ) -> Result<PinId, LifecycleError> {
        self.invalidate_placements();
        self.netlist.connect(net, instance, pin_name, direction)
    }

    /// Adds a routing resource to a template net.
    pub fn add_pip(&mut self, net: NetId, pip: Pip) -> Result<(), LifecycleError> {
        self.invalidate_placements();
        self.netlist.add_pip(net, pip)
    }

    /// Places a template instance.
    pub fn place(&mut self, id: InstanceId, site: &Site) -> Result<(), LifecycleError> {
        self.invalidate_placements();
        self.netlist.place(id, site)
    }

    /// Unplaces a template instance.
    pub fn unplace(&mut self, id: InstanceId) -> Result<(), LifecycleError> {
        self.invalidate_placements();
        self.netlist.unplace(id)
    }

    /// Removes an instance from the template.
    ///
    /// Ports exposing the instance are dropped and, if it was the anchor,
    /// the module is left without one.
    pub fn remove_instance(&mut self, id: InstanceId) -> Result<Instance, LifecycleError> {
        let instance = self.netlist.remove_instance(id)?;
        if self.anchor == Some(id) {
            self.anchor = None;
        }
        self.ports.retain(|_, port| port.instance != id);
        self.invalidate_placements();
        Ok(instance)
    }

    /// Removes a net from the template.
    pub fn remove_net(&mut self, id: NetId) -> Option<Net> {
        let net = self.netlist.remove_net(id)?;
        self.invalidate_placements();
        Some(net)
    }

    /// Adds a port bound to a template instance pin.
    pub fn add_port(&mut self, port: Port) -> Result<(), LifecycleError> {
        if self.ports.contains_key(&port.name) {
            return Err(LifecycleError::DuplicatePort(port.name));
        }
        if self.netlist.instance(port.instance).is_none() {
            return Err(LifecycleError::UnknownInstance(port.instance));
        }
        self.ports.insert(port.name.clone(), port);
        Ok(())
    }

    /// Returns a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// Iterates over ports in name order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Returns the minimum clock period in nanoseconds, if known.
    pub fn min_clk_period(&self) -> Option<f32> {
        self.min_clk_period
    }

    /// Records the minimum clock period in nanoseconds.
    pub fn set_min_clk_period(&mut self, period: Option<f32>) {
        self.min_clk_period = period;
    }

    /// Returns the metadata map.
    pub fn metadata(&self) -> &BTreeMap<String, Vec<String>> {
        &self.metadata
    }

    /// Appends a value under a metadata key.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// Returns the last computed valid anchor sites without recomputing.
    pub fn all_valid_placements(&self) -> &[SiteId] {
        &self.placements.sites
    }

    /// Returns `true` if the template changed since the placements were
    /// last computed, or they never were.
    pub fn placements_are_stale(&self) -> bool {
        self.placements.stale
    }

    /// Stores a freshly computed list of valid anchor sites.
    pub fn set_valid_placements(&mut self, sites: Vec<SiteId>) {
        self.placements = PlacementCache {
            sites,
            stale: false,
        };
    }

    /// Marks the cached placements stale.
    pub fn invalidate_placements(&mut self) {
        self.placements.stale = true;
    }
}

//! Primitive instances.
//!
//! An [`Instance`] is one occurrence of a device primitive (a slice, a block
//! RAM, an I/O buffer). Placement state, net membership and ownership
//! back-references are maintained by the owning
//! [`Netlist`](crate::Netlist); from outside the crate they are read-only.

use crate::ids::{ModuleInstanceId, NetId, PinId};
use crate::types::{has_attribute, Attribute, Bonded, Owner, TemplateRef};
use relo_device::{names, GridCoord, PrimitiveType, Site, SiteId, TileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The physical location of a placed instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// The site the instance occupies.
    pub site: SiteId,
    /// The tile containing `site`.
    pub tile: TileId,
    /// The site name, kept for coordinate derivation and reporting.
    pub site_name: String,
}

impl Placement {
    /// Captures the placement-relevant parts of a device site.
    pub fn of(site: &Site) -> Self {
        Self {
            site: site.id,
            tile: site.tile,
            site_name: site.name.clone(),
        }
    }
}

/// A placed-or-unplaced primitive occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    name: String,
    primitive_type: PrimitiveType,
    attributes: Vec<Attribute>,
    bonded: Bonded,
    placement: Option<Placement>,
    coord: GridCoord,
    nets: BTreeSet<NetId>,
    pins: Vec<PinId>,
    owner: Owner,
    module_instance: Option<ModuleInstanceId>,
    template: Option<TemplateRef>,
}

impl Instance {
    /// Creates a detached, unplaced instance.
    pub fn new(name: impl Into<String>, primitive_type: impl Into<PrimitiveType>) -> Self {
        Self {
            name: name.into(),
            primitive_type: primitive_type.into(),
            attributes: Vec::new(),
            bonded: Bonded::Unknown,
            placement: None,
            coord: GridCoord::UNPLACED,
            nets: BTreeSet::new(),
            pins: Vec::new(),
            owner: Owner::Detached,
            module_instance: None,
            template: None,
        }
    }

    /// Places a detached instance before it is attached to a netlist.
    ///
    /// Site occupancy is claimed when the instance is added to a design.
    pub fn placed_at(mut self, site: &Site) -> Self {
        self.set_placement(Some(Placement::of(site)));
        self.bonded = Bonded::Unknown;
        self
    }

    /// Returns the instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primitive type.
    pub fn primitive_type(&self) -> &PrimitiveType {
        &self.primitive_type
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

    /// Returns the bonded requirement.
    pub fn bonded(&self) -> Bonded {
        self.bonded
    }

    /// Sets the bonded requirement. Placing the instance resets it.
    pub fn set_bonded(&mut self, bonded: Bonded) {
        self.bonded = bonded;
    }

    /// Returns `true` if the instance occupies a site.
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Returns the placement, if any.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Returns the occupied site, if any.
    pub fn site(&self) -> Option<SiteId> {
        self.placement.as_ref().map(|p| p.site)
    }

    /// Returns the tile of the occupied site, if any.
    pub fn tile(&self) -> Option<TileId> {
        self.placement.as_ref().map(|p| p.tile)
    }

    /// Returns the occupied site's name, if any.
    pub fn site_name(&self) -> Option<&str> {
        self.placement.as_ref().map(|p| p.site_name.as_str())
    }

    /// Returns the coordinates parsed from the site name, or
    /// [`GridCoord::UNPLACED`].
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Returns the nets this instance participates in.
    pub fn nets(&self) -> &BTreeSet<NetId> {
        &self.nets
    }

    /// Returns this instance's pins.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Returns who owns the instance.
    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Returns the module instance this instance was stamped into, if any.
    pub fn module_instance(&self) -> Option<ModuleInstanceId> {
        self.module_instance
    }

    /// Returns the template this instance was stamped from, if any.
    pub fn template(&self) -> Option<TemplateRef> {
        self.template
    }

    /// Returns `true` if both instances belong to the same module instance.
    pub fn is_member_of_same_module_instance(&self, other: &Instance) -> bool {
        self.module_instance.is_some() && self.module_instance == other.module_instance
    }

    pub(crate) fn set_placement(&mut self, placement: Option<Placement>) {
        self.coord = match &placement {
            Some(p) => names::parse_xy_suffix(&p.site_name).unwrap_or(GridCoord::UNPLACED),
            None => GridCoord::UNPLACED,
        };
        self.placement = placement;
    }

    pub(crate) fn set_owner(&mut self, owner: Owner) {
        self.owner = owner;
    }

    pub(crate) fn set_module_instance(&mut self, module_instance: Option<ModuleInstanceId>) {
        self.module_instance = module_instance;
    }

    pub(crate) fn set_template(&mut self, template: Option<TemplateRef>) {
        self.template = template;
    }

    pub(crate) fn nets_mut(&mut self) -> &mut BTreeSet<NetId> {
        &mut self.nets
    }

    pub(crate) fn pins_mut(&mut self) -> &mut Vec<PinId> {
        &mut self.pins
    }

    /// Clears every back-reference into the netlist the instance left.
    pub(crate) fn detach(&mut self) {
        self.owner = Owner::Detached;
        self.nets.clear();
        self.pins.clear();
        self.template = None;
        self.module_instance = None;
    }
}

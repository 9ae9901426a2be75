//! Small value types shared by instances, nets and modules.

use crate::ids::{InstanceId, ModuleId, NetId};
use relo_device::TileId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration attribute as written in XDL `cfg` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Physical (device) name of the attribute, e.g. `A6LUT`.
    pub physical_name: String,
    /// Logical (user) name, often empty.
    pub logical_name: String,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(
        physical_name: impl Into<String>,
        logical_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            physical_name: physical_name.into(),
            logical_name: logical_name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.physical_name, self.logical_name, self.value
        )
    }
}

/// Returns `true` if `attributes` contains one with the given physical name.
pub fn has_attribute(attributes: &[Attribute], physical_name: &str) -> bool {
    attributes.iter().any(|a| a.physical_name == physical_name)
}

/// Package-pin availability of an unplaced I/O instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bonded {
    /// The instance must use a bonded pad.
    Bonded,
    /// The instance must use an unbonded pad.
    Unbonded,
    /// No requirement, or the instance is placed.
    #[default]
    Unknown,
}

/// Who owns an instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    /// Not attached to any netlist.
    #[default]
    Detached,
    /// Attached to a design netlist; placement is tracked for site occupancy.
    Design,
    /// Attached to a module template netlist.
    Module,
}

/// Link from a stamped design instance back to the template it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    /// The module template.
    pub module: ModuleId,
    /// The instance inside the template's netlist.
    pub instance: InstanceId,
}

/// Direction of a pin relative to its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinDirection {
    /// The pin drives its net (XDL `outpin`).
    Output,
    /// The pin is driven by its net (XDL `inpin`).
    Input,
}

/// A connection point between an instance and a net.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// Pin name on the primitive (e.g. `A1`, `CLK`).
    pub name: String,
    /// Direction of the pin.
    pub direction: PinDirection,
    /// The instance this pin belongs to.
    pub instance: InstanceId,
    /// The net currently attached to the pin.
    pub net: Option<NetId>,
}

/// A programmable interconnect point used by a routed net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pip {
    /// The tile the PIP lives in.
    pub tile: TileId,
    /// Source wire name within the tile.
    pub start_wire: String,
    /// Sink wire name within the tile.
    pub end_wire: String,
}

impl Pip {
    /// Creates a PIP.
    pub fn new(tile: TileId, start_wire: impl Into<String>, end_wire: impl Into<String>) -> Self {
        Self {
            tile,
            start_wire: start_wire.into(),
            end_wire: end_wire.into(),
        }
    }

    /// Returns the same PIP moved to another tile.
    pub fn relocated(&self, tile: TileId) -> Self {
        Self {
            tile,
            start_wire: self.start_wire.clone(),
            end_wire: self.end_wire.clone(),
        }
    }
}

/// A named module boundary point bound to an instance pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name, unique within the module.
    pub name: String,
    /// The instance the port exposes.
    pub instance: InstanceId,
    /// Pin name on that instance.
    pub pin: String,
}

impl Port {
    /// Creates a port.
    pub fn new(name: impl Into<String>, instance: InstanceId, pin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance,
            pin: pin.into(),
        }
    }
}

//! Nets: named pin sets plus their routing.

use crate::ids::PinId;
use crate::types::{Attribute, Pip};
use serde::{Deserialize, Serialize};

/// A named set of pins and the PIPs that route them.
///
/// Pin membership is maintained by the owning [`Netlist`](crate::Netlist).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    name: String,
    attributes: Vec<Attribute>,
    pins: Vec<PinId>,
    pips: Vec<Pip>,
}

impl Net {
    /// Creates an empty, unrouted net.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            pins: Vec::new(),
            pips: Vec::new(),
        }
    }

    /// Returns the net name.
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

    /// Returns the pins on this net.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Returns the number of pins on this net.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Returns the PIPs routing this net.
    pub fn pips(&self) -> &[Pip] {
        &self.pips
    }

    /// Returns `true` if the net has any routing.
    pub fn is_routed(&self) -> bool {
        !self.pips.is_empty()
    }

    /// Appends a routing resource.
    pub fn add_pip(&mut self, pip: Pip) {
        self.pips.push(pip);
    }

    /// Removes all routing resources.
    pub fn unroute(&mut self) {
        self.pips.clear();
    }

    pub(crate) fn pins_mut(&mut self) -> &mut Vec<PinId> {
        &mut self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relo_device::TileId;

    #[test]
    fn new_net_is_empty() {
        let net = Net::new("clk");
        assert_eq!(net.name(), "clk");
        assert_eq!(net.pin_count(), 0);
        assert!(!net.is_routed());
    }

    #[test]
    fn unroute_clears_pips() {
        let mut net = Net::new("d");
        net.add_pip(Pip::new(TileId::from_raw(0), "A", "B"));
        net.add_pip(Pip::new(TileId::from_raw(1), "B", "C"));
        assert!(net.is_routed());
        net.unroute();
        assert!(net.pips().is_empty());
    }
}

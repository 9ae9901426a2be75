//! JSON description of a hard-macro module template.
//!
//! Instances name their sites and PIPs name their tiles; both are resolved
//! against the loaded device. Example:
//!
//! ```json
//! {
//!   "name": "adder",
//!   "anchor": "a",
//!   "instances": [
//!     { "name": "a", "type": "SLICEL", "site": "SLICE_X0Y0" },
//!     { "name": "b", "type": "SLICEL", "site": "SLICE_X0Y1" }
//!   ],
//!   "nets": [
//!     {
//!       "name": "carry",
//!       "pins": [
//!         { "instance": "a", "pin": "COUT", "direction": "Output" },
//!         { "instance": "b", "pin": "CIN", "direction": "Input" }
//!       ],
//!       "pips": [{ "tile": "INT_L_X0Y0", "start": "LOGIC_OUTS3", "end": "NL1BEG0" }]
//!     }
//!   ]
//! }
//! ```

use relo_design::{Attribute, Bonded, Instance, LifecycleError, Module, Net, PinDirection, Pip, Port};
use relo_device::DeviceGrid;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Errors from loading a module description.
#[derive(Debug, thiserror::Error)]
pub enum ModuleFileError {
    /// The file could not be read.
    #[error("failed to read module file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid module description.
    #[error("module JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An instance names a site the device does not have.
    #[error("instance '{instance}' is placed on unknown site '{site}'")]
    UnknownSite {
        /// Instance name.
        instance: String,
        /// Site name from the file.
        site: String,
    },

    /// A PIP names a tile the device does not have.
    #[error("net '{net}' has a PIP in unknown tile '{tile}'")]
    UnknownTile {
        /// Net name.
        net: String,
        /// Tile name from the file.
        tile: String,
    },

    /// A reference to an instance not declared in the file.
    #[error("'{context}' refers to undeclared instance '{instance}'")]
    UnknownInstance {
        /// The net, port or anchor making the reference.
        context: String,
        /// The missing instance name.
        instance: String,
    },

    /// The module graph refused an element.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[derive(Deserialize)]
struct ModuleFile {
    name: String,
    #[serde(default)]
    anchor: Option<String>,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default)]
    min_clk_period: Option<f32>,
    #[serde(default)]
    metadata: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    instances: Vec<InstanceEntry>,
    #[serde(default)]
    nets: Vec<NetEntry>,
    #[serde(default)]
    ports: Vec<PortEntry>,
}

#[derive(Deserialize)]
struct InstanceEntry {
    name: String,
    #[serde(rename = "type")]
    primitive_type: String,
    #[serde(default)]
    site: Option<String>,
    #[serde(default)]
    bonded: Bonded,
    #[serde(default)]
    attributes: Vec<Attribute>,
}

#[derive(Deserialize)]
struct NetEntry {
    name: String,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default)]
    pins: Vec<PinEntry>,
    #[serde(default)]
    pips: Vec<PipEntry>,
}

#[derive(Deserialize)]
struct PinEntry {
    instance: String,
    pin: String,
    direction: PinDirection,
}

#[derive(Deserialize)]
struct PipEntry {
    tile: String,
    start: String,
    end: String,
}

#[derive(Deserialize)]
struct PortEntry {
    name: String,
    instance: String,
    pin: String,
}

/// Reads a module description and builds the template against `device`.
pub fn load_module<D: DeviceGrid + ?Sized>(
    path: &Path,
    device: &D,
) -> Result<Module, ModuleFileError> {
    let json = std::fs::read_to_string(path)?;
    parse_module(&json, device)
}

/// Parses a module description from a JSON string.
pub fn parse_module<D: DeviceGrid + ?Sized>(
    json: &str,
    device: &D,
) -> Result<Module, ModuleFileError> {
    let file: ModuleFile = serde_json::from_str(json)?;
    let mut module = Module::new(file.name);
    for attribute in file.attributes {
        module.add_attribute(attribute);
    }
    module.set_min_clk_period(file.min_clk_period);
    for (key, values) in file.metadata {
        for value in values {
            module.add_metadata(key.clone(), value);
        }
    }

    for entry in file.instances {
        let mut instance = Instance::new(entry.name.as_str(), entry.primitive_type.as_str());
        for attribute in entry.attributes {
            instance.add_attribute(attribute);
        }
        instance.set_bonded(entry.bonded);
        if let Some(site_name) = entry.site {
            let site = device
                .site_by_name(&site_name)
                .and_then(|id| device.site(id))
                .ok_or_else(|| ModuleFileError::UnknownSite {
                    instance: entry.name.clone(),
                    site: site_name,
                })?;
            instance = instance.placed_at(site);
        }
        module.add_instance(instance)?;
    }

    for entry in file.nets {
        let mut net = Net::new(entry.name.as_str());
        for attribute in entry.attributes {
            net.add_attribute(attribute);
        }
        let net_id = module.add_net(net)?;
        for pin in entry.pins {
            let instance = module.instance_by_name(&pin.instance).ok_or_else(|| {
                ModuleFileError::UnknownInstance {
                    context: entry.name.clone(),
                    instance: pin.instance.clone(),
                }
            })?;
            module.connect(net_id, instance, pin.pin, pin.direction)?;
        }
        for pip in entry.pips {
            let tile = device
                .tile_by_name(&pip.tile)
                .ok_or_else(|| ModuleFileError::UnknownTile {
                    net: entry.name.clone(),
                    tile: pip.tile.clone(),
                })?;
            module.add_pip(net_id, Pip::new(tile, pip.start, pip.end))?;
        }
    }

    for port in file.ports {
        let instance = module.instance_by_name(&port.instance).ok_or_else(|| {
            ModuleFileError::UnknownInstance {
                context: port.name.clone(),
                instance: port.instance.clone(),
            }
        })?;
        module.add_port(Port::new(port.name, instance, port.pin))?;
    }

    if let Some(anchor) = file.anchor {
        let id = module
            .instance_by_name(&anchor)
            .ok_or_else(|| ModuleFileError::UnknownInstance {
                context: "anchor".to_string(),
                instance: anchor.clone(),
            })?;
        module.set_anchor(id)?;
    }

    tracing::debug!(
        module = module.name(),
        instances = module.netlist().instance_count(),
        nets = module.netlist().net_count(),
        "loaded module"
    );
    Ok(module)
}

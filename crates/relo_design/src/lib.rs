//! Entity graph for placed designs and relocatable module templates.
//!
//! Instances, nets and pins live in tombstoning arenas inside a
//! [`Netlist`]; every cross-reference between them is an ID, and every
//! mutation goes through an API that keeps both directions of each
//! reference in step. A [`Design`] adds site occupancy and module instances
//! on top; a [`Module`] adds an anchor, ports and a cache of valid anchor
//! sites.

#![warn(missing_docs)]

pub mod design;
pub mod error;
pub mod ids;
pub mod instance;
pub mod module;
pub mod net;
pub mod netlist;
pub mod types;

pub use design::{Design, ModuleInstance, ModuleInstancePlan, HARD_MACRO_DESIGN_NAME};
pub use error::LifecycleError;
pub use ids::{InstanceId, ModuleId, ModuleInstanceId, NetId, PinId};
pub use instance::{Instance, Placement};
pub use module::{Module, PlacementCache};
pub use net::Net;
pub use netlist::Netlist;
pub use types::{Attribute, Bonded, Owner, Pin, PinDirection, Pip, Port, TemplateRef};

//! Opaque ID newtypes for entity-graph objects.
//!
//! [`InstanceId`], [`NetId`] and [`PinId`] index the arenas of a
//! [`Netlist`](crate::Netlist); [`ModuleId`] and [`ModuleInstanceId`] index
//! the module tables of a [`Design`](crate::Design). IDs are never reused
//! after removal.

relo_common::define_id!(
    /// Opaque, copyable ID for an instance in a netlist.
    InstanceId
);

relo_common::define_id!(
    /// Opaque, copyable ID for a net in a netlist.
    NetId
);

relo_common::define_id!(
    /// Opaque, copyable ID for a pin in a netlist.
    PinId
);

relo_common::define_id!(
    /// Opaque, copyable ID for a module template in a design.
    ModuleId
);

relo_common::define_id!(
    /// Opaque, copyable ID for a placed occurrence of a module in a design.
    ModuleInstanceId
);

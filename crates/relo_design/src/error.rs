//! Error types for entity-graph mutations.

use crate::ids::{InstanceId, ModuleId, ModuleInstanceId, NetId};

/// A mutation the entity graph refused. The graph is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The instance is part of a placed module instance and can only be
    /// removed together with it.
    #[error("instance '{instance}' belongs to module instance {module_instance}; remove the module instance instead")]
    InModuleInstance {
        /// Name of the instance.
        instance: String,
        /// The module instance holding it.
        module_instance: ModuleInstanceId,
    },

    /// No live instance has this ID.
    #[error("unknown instance id {0}")]
    UnknownInstance(InstanceId),

    /// No live net has this ID.
    #[error("unknown net id {0}")]
    UnknownNet(NetId),

    /// No module has this ID.
    #[error("unknown module id {0}")]
    UnknownModule(ModuleId),

    /// No live module instance has this ID.
    #[error("unknown module instance id {0}")]
    UnknownModuleInstance(ModuleInstanceId),

    /// An instance with this name already exists in the owner.
    #[error("duplicate instance '{0}'")]
    DuplicateInstance(String),

    /// A net with this name already exists in the owner.
    #[error("duplicate net '{0}'")]
    DuplicateNet(String),

    /// A port with this name already exists in the module.
    #[error("duplicate port '{0}'")]
    DuplicatePort(String),

    /// A module with this name already exists in the design.
    #[error("duplicate module '{0}'")]
    DuplicateModule(String),

    /// A module instance with this name already exists in the design.
    #[error("duplicate module instance '{0}'")]
    DuplicateModuleInstance(String),

    /// Another design instance already occupies the site.
    #[error("site '{site}' is already used by instance '{occupant}'")]
    SiteOccupied {
        /// Name of the contested site.
        site: String,
        /// Name of the instance holding it.
        occupant: String,
    },

    /// A module instance plan does not cover a template instance or net.
    #[error("module instance plan does not cover '{0}'")]
    IncompletePlan(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_in_module_instance() {
        let err = LifecycleError::InModuleInstance {
            instance: "mi0/lut".to_string(),
            module_instance: ModuleInstanceId::from_raw(0),
        };
        assert_eq!(
            format!("{err}"),
            "instance 'mi0/lut' belongs to module instance 0; remove the module instance instead"
        );
    }

    #[test]
    fn display_site_occupied() {
        let err = LifecycleError::SiteOccupied {
            site: "SLICE_X0Y0".to_string(),
            occupant: "a".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "site 'SLICE_X0Y0' is already used by instance 'a'"
        );
    }
}

//! Enumeration of every valid anchor site for a module.

use crate::relocate::Relocator;
use crate::validate::is_valid_placement;
use rayon::prelude::*;
use relo_design::Module;
use relo_device::{DeviceGrid, SiteId};
use serde::{Deserialize, Serialize};

/// Knobs for placement enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationOptions {
    /// Validate candidate sites on the rayon thread pool.
    pub parallel: bool,
}

/// Computes every site the module's anchor can be relocated to and stores
/// the result in the module's placement cache.
///
/// Candidates are the device sites compatible with the anchor's primitive
/// type, in device order; the parallel scan yields the same order. A module
/// without an anchor has no valid placements.
pub fn calculate_all_valid_placements<D>(
    relocator: &Relocator<'_, D>,
    module: &mut Module,
    options: RelocationOptions,
) -> Vec<SiteId>
where
    D: DeviceGrid + Sync + ?Sized,
{
    let valid = scan(relocator, module, options);
    module.set_valid_placements(valid.clone());
    valid
}

fn scan<D>(relocator: &Relocator<'_, D>, module: &Module, options: RelocationOptions) -> Vec<SiteId>
where
    D: DeviceGrid + Sync + ?Sized,
{
    let Some(anchor) = module.anchor_instance() else {
        tracing::debug!(module = module.name(), "no anchor, no placements");
        return Vec::new();
    };
    let candidates = relocator
        .device()
        .compatible_sites(anchor.primitive_type());

    let valid: Vec<SiteId> = if options.parallel {
        candidates
            .par_iter()
            .copied()
            .filter(|&site| is_valid_placement(relocator, module, site))
            .collect()
    } else {
        candidates
            .iter()
            .copied()
            .filter(|&site| is_valid_placement(relocator, module, site))
            .collect()
    };

    tracing::debug!(
        module = module.name(),
        candidates = candidates.len(),
        valid = valid.len(),
        parallel = options.parallel,
        "enumerated placements"
    );
    valid
}

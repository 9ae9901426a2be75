//! Hard-macro relocation: tile correspondence, placement validation,
//! valid-placement enumeration and module instantiation.
//!
//! Everything here is read-only over the device. [`Relocator`] holds the
//! device reference and the tile-family fallback table; the free functions
//! take it alongside the module being relocated.

#![warn(missing_docs)]

pub mod enumerate;
pub mod instantiate;
pub mod relocate;
pub mod validate;

pub use enumerate::{calculate_all_valid_placements, RelocationOptions};
pub use instantiate::{instantiate_module, plan_module_instance, InstantiateError};
pub use relocate::Relocator;
pub use validate::{check_placement, is_valid_placement, PlacementRejection};

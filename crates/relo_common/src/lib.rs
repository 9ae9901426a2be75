//! Shared foundational types used across the Relo hard-macro toolkit.
//!
//! This crate provides the opaque ID macro used by every entity table, a
//! tombstoning [`Arena`] that keeps IDs stable across removals, and the
//! internal error type reserved for broken invariants.

#![warn(missing_docs)]

pub mod arena;
pub mod ids;
pub mod result;

pub use arena::Arena;
pub use ids::ArenaId;
pub use result::{InternalError, ReloResult};

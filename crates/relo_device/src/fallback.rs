//! Tile-family substitution rules for relocation.
//!
//! On Xilinx parts the two CLB tile families (`CLBLL`, two SLICEL sites, and
//! `CLBLM`, one SLICEM and one SLICEL) interleave across the die. A macro
//! built from SLICEL-only logic can therefore land on either family at the
//! same coordinates even though the tile names differ. When the exact
//! relocated tile name does not exist, each rule whose `from` prefix matches
//! the template tile name is tried in order.

use crate::names::{self, GridCoord};
use serde::{Deserialize, Serialize};

/// Rewrites a tile name whose family prefix starts with `from` so that it
/// starts with `to` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRule {
    /// Leading part of the template tile name this rule applies to.
    pub from: String,
    /// Replacement for `from` in the candidate name.
    pub to: String,
}

impl FallbackRule {
    /// Creates a rule.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Builds the substituted tile name at `coord`, if the rule applies.
    pub fn apply(&self, template_name: &str, coord: GridCoord) -> Option<String> {
        let prefix = names::tile_name_prefix(template_name)?;
        let rest = prefix.strip_prefix(self.from.as_str())?;
        Some(names::format_with_coord(&format!("{}{rest}", self.to), coord))
    }
}

/// An ordered, extensible list of [`FallbackRule`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileFamilyFallbacks {
    rules: Vec<FallbackRule>,
}

impl TileFamilyFallbacks {
    /// Creates a table with no rules: only exact tile names match.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a table from explicit rules.
    pub fn from_rules(rules: Vec<FallbackRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule after the existing ones.
    pub fn push(&mut self, rule: FallbackRule) {
        self.rules.push(rule);
    }

    /// Returns the rules in lookup order.
    pub fn rules(&self) -> &[FallbackRule] {
        &self.rules
    }

    /// Yields every substituted name for `template_name` at `coord`.
    pub fn candidates<'a>(
        &'a self,
        template_name: &'a str,
        coord: GridCoord,
    ) -> impl Iterator<Item = String> + 'a {
        self.rules
            .iter()
            .filter_map(move |rule| rule.apply(template_name, coord))
    }
}

impl Default for TileFamilyFallbacks {
    /// The `CLBLL_` / `CLBLM_` pair in both directions.
    fn default() -> Self {
        Self::from_rules(vec![
            FallbackRule::new("CLBLL_", "CLBLM_"),
            FallbackRule::new("CLBLM_", "CLBLL_"),
        ])
    }
}

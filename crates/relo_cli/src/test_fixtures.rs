//! A 2x2 CLB device and a two-slice module for command tests.

use std::path::PathBuf;

use relo_device::{tilegrid::parse_tilegrid, Device, SiteCompatibility};
use tempfile::TempDir;

use crate::{GlobalArgs, ReportFormat};

/// CLBLL tiles at X0..1, Y0..1 with one SLICEL site each, and an INT tile
/// beside each CLB.
pub const TOY_TILEGRID: &str = r#"{
    "CLBLL_L_X0Y0": { "grid_x": 0, "grid_y": 0, "type": "CLBLL_L", "sites": { "SLICE_X0Y0": "SLICEL" } },
    "INT_L_X0Y0":   { "grid_x": 1, "grid_y": 0, "type": "INT_L" },
    "CLBLL_L_X1Y0": { "grid_x": 2, "grid_y": 0, "type": "CLBLL_L", "sites": { "SLICE_X1Y0": "SLICEL" } },
    "INT_L_X1Y0":   { "grid_x": 3, "grid_y": 0, "type": "INT_L" },
    "CLBLL_L_X0Y1": { "grid_x": 0, "grid_y": 1, "type": "CLBLL_L", "sites": { "SLICE_X0Y1": "SLICEL" } },
    "INT_L_X0Y1":   { "grid_x": 1, "grid_y": 1, "type": "INT_L" },
    "CLBLL_L_X1Y1": { "grid_x": 2, "grid_y": 1, "type": "CLBLL_L", "sites": { "SLICE_X1Y1": "SLICEL" } },
    "INT_L_X1Y1":   { "grid_x": 3, "grid_y": 1, "type": "INT_L" }
}"#;

/// Vertical pair anchored at SLICE_X0Y0 with one routed net.
pub const PAIR_MODULE: &str = r#"{
    "name": "pair",
    "anchor": "lo",
    "instances": [
        { "name": "lo", "type": "SLICEL", "site": "SLICE_X0Y0" },
        { "name": "hi", "type": "SLICEL", "site": "SLICE_X0Y1" }
    ],
    "nets": [{
        "name": "carry",
        "pins": [
            { "instance": "lo", "pin": "COUT", "direction": "Output" },
            { "instance": "hi", "pin": "CIN", "direction": "Input" }
        ],
        "pips": [{ "tile": "INT_L_X0Y0", "start": "LOGIC_OUTS3", "end": "NL1BEG0" }]
    }]
}"#;

/// Parses [`TOY_TILEGRID`] with the 7-series compatibility relations.
pub fn toy_device() -> Device {
    parse_tilegrid("toy", TOY_TILEGRID, SiteCompatibility::series7()).unwrap()
}

/// A temporary project with `relo.toml`, `tilegrid.json` and `pair.json`.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tilegrid.json"), TOY_TILEGRID).unwrap();
        std::fs::write(dir.path().join("pair.json"), PAIR_MODULE).unwrap();
        std::fs::write(
            dir.path().join("relo.toml"),
            "[device]\nname = \"toy\"\ntilegrid = \"tilegrid.json\"\n",
        )
        .unwrap();
        Self { dir }
    }

    pub fn module_path(&self) -> PathBuf {
        self.dir.path().join("pair.json")
    }

    pub fn global(&self) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            format: ReportFormat::Text,
            config: Some(self.dir.path().join("relo.toml").display().to_string()),
            tilegrid: None,
        }
    }
}

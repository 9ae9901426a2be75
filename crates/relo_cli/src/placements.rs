//! `relo placements`: enumerate every valid anchor site for a module.

use relo_device::DeviceGrid;
use relo_place::calculate_all_valid_placements;
use serde::Serialize;

use crate::session::load_session;
use crate::{GlobalArgs, PlacementsArgs, ReportFormat};

#[derive(Debug, Serialize)]
struct PlacementsReport<'a> {
    module: &'a str,
    anchor: Option<&'a str>,
    count: usize,
    sites: Vec<&'a str>,
}

/// Runs the `relo placements` command.
///
/// Returns exit code 0 if at least one placement exists, 1 otherwise.
pub fn run(args: &PlacementsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = load_session(global)?;
    let mut module = session.load_module(&args.module)?;
    let relocator = session.relocator();
    let sites = calculate_all_valid_placements(&relocator, &mut module, session.options());

    let names: Vec<&str> = sites
        .iter()
        .filter_map(|&s| session.device.site(s).map(|site| site.name.as_str()))
        .collect();
    let report = PlacementsReport {
        module: module.name(),
        anchor: module.anchor_instance().map(|a| a.name()),
        count: names.len(),
        sites: names,
    };
    render(&report, global)?;
    Ok(if report.count == 0 { 1 } else { 0 })
}

fn render(report: &PlacementsReport<'_>, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    match global.format {
        ReportFormat::Text => {
            for site in &report.sites {
                println!("{site}");
            }
            if !global.quiet {
                match report.anchor {
                    Some(anchor) => eprintln!(
                        "   {} valid placement(s) for module '{}' (anchor '{anchor}')",
                        report.count, report.module
                    ),
                    None => eprintln!(
                        "warning: module '{}' has no anchor; nothing to relocate",
                        report.module
                    ),
                }
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

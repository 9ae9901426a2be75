//! `relo check`: explain whether a module fits at one anchor site.

use relo_place::{check_placement, PlacementRejection};
use serde::Serialize;

use crate::session::load_session;
use crate::{CheckArgs, GlobalArgs, ReportFormat};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    module: &'a str,
    site: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<PlacementRejection>,
}

/// Runs the `relo check` command.
///
/// Returns exit code 0 if the placement is valid, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = load_session(global)?;
    let module = session.load_module(&args.module)?;
    let site = session.site_id(&args.site)?;
    let result = check_placement(&session.relocator(), &module, site);

    let report = CheckReport {
        module: module.name(),
        site: &args.site,
        valid: result.is_ok(),
        reason: result.as_ref().err().map(ToString::to_string),
        rejection: result.err(),
    };
    match global.format {
        ReportFormat::Text => match report.reason {
            None => {
                if !global.quiet {
                    println!("{}: valid placement for '{}'", report.site, report.module);
                }
            }
            Some(ref reason) => println!("{}: invalid: {reason}", report.site),
        },
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(if report.valid { 0 } else { 1 })
}

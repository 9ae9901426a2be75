//! `relo instantiate`: stamp a relocated copy of a module into a
//! hard-macro design and print where everything landed.

use relo_design::Design;
use relo_device::DeviceGrid;
use relo_place::instantiate_module;
use serde::Serialize;

use crate::session::load_session;
use crate::{GlobalArgs, InstantiateArgs, ReportFormat};

#[derive(Debug, Serialize)]
struct StampedInstance {
    name: String,
    site: Option<String>,
}

#[derive(Debug, Serialize)]
struct InstantiateReport {
    module_instance: String,
    anchor_site: String,
    instances: Vec<StampedInstance>,
    nets: Vec<String>,
}

/// Runs the `relo instantiate` command.
pub fn run(args: &InstantiateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = load_session(global)?;
    let module = session.load_module(&args.module)?;
    let anchor = session.site_id(&args.site)?;
    let (mut design, module_id) = Design::from_module(session.device.name(), module);

    let mi = instantiate_module(&session.relocator(), &mut design, module_id, &args.name, anchor)?;
    design.check_integrity()?;

    let record = design
        .module_instance(mi)
        .ok_or("module instance vanished after instantiation")?;
    let netlist = design.netlist();
    let report = InstantiateReport {
        module_instance: record.name.clone(),
        anchor_site: args.site.clone(),
        instances: record
            .instances
            .iter()
            .filter_map(|&id| netlist.instance(id))
            .map(|inst| StampedInstance {
                name: inst.name().to_string(),
                site: inst.site_name().map(str::to_string),
            })
            .collect(),
        nets: record
            .nets
            .iter()
            .filter_map(|&id| netlist.net(id))
            .map(|net| net.name().to_string())
            .collect(),
    };

    match global.format {
        ReportFormat::Text => {
            for inst in &report.instances {
                println!(
                    "{} {}",
                    inst.name,
                    inst.site.as_deref().unwrap_or("<unplaced>")
                );
            }
            if !global.quiet {
                eprintln!(
                    "   Instantiated '{}' at {}: {} instance(s), {} net(s)",
                    report.module_instance,
                    report.anchor_site,
                    report.instances.len(),
                    report.nets.len()
                );
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}

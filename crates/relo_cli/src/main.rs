//! Relo CLI: relocate pre-placed, pre-routed hard macros on FPGA devices.
//!
//! Provides `relo placements` to enumerate every valid anchor site of a
//! module, `relo check` to explain why one site does or does not work, and
//! `relo instantiate` to stamp a relocated copy and report where it landed.

#![warn(missing_docs)]

mod check;
mod instantiate;
mod module_file;
mod placements;
mod session;
#[cfg(test)]
mod test_fixtures;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Relo: hard-macro relocation for FPGA device grids.
#[derive(Parser, Debug)]
#[command(name = "relo", version, about = "Hard-macro relocation engine")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (info-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for reports.
    #[arg(short, long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Path to a custom `relo.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to a Project X-Ray `tilegrid.json`, overriding the configuration.
    #[arg(long, global = true)]
    pub tilegrid: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every site the module's anchor can be relocated to.
    Placements(PlacementsArgs),
    /// Check one candidate anchor site and explain a rejection.
    Check(CheckArgs),
    /// Stamp a relocated copy of the module at an anchor site.
    Instantiate(InstantiateArgs),
}

/// Arguments for the `relo placements` subcommand.
#[derive(Parser, Debug)]
pub struct PlacementsArgs {
    /// Module description (JSON).
    pub module: PathBuf,
}

/// Arguments for the `relo check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Module description (JSON).
    pub module: PathBuf,

    /// Candidate anchor site name (e.g. `SLICE_X20Y30`).
    pub site: String,
}

/// Arguments for the `relo instantiate` subcommand.
#[derive(Parser, Debug)]
pub struct InstantiateArgs {
    /// Module description (JSON).
    pub module: PathBuf,

    /// Anchor site name for the copy.
    pub site: String,

    /// Module instance name; prefixes every stamped instance and net.
    #[arg(short, long)]
    pub name: String,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Report output format.
    pub format: ReportFormat,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// Optional tilegrid path overriding the config.
    pub tilegrid: Option<String>,
}

/// Default log filter when `RUST_LOG` is unset.
fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "info"
    } else {
        "warn"
    }
}

fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        format: cli.format,
        config: cli.config,
        tilegrid: cli.tilegrid,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Placements(ref args) => placements::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Instantiate(ref args) => instantiate::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_placements() {
        let cli = Cli::parse_from(["relo", "placements", "adder.json"]);
        match cli.command {
            Command::Placements(ref args) => {
                assert_eq!(args.module, PathBuf::from("adder.json"));
            }
            _ => panic!("expected Placements command"),
        }
        assert_eq!(cli.format, ReportFormat::Text);
    }

    #[test]
    fn parse_check_with_site() {
        let cli = Cli::parse_from(["relo", "check", "adder.json", "SLICE_X20Y30"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.site, "SLICE_X20Y30"),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_instantiate_requires_name() {
        assert!(Cli::try_parse_from(["relo", "instantiate", "adder.json", "SLICE_X0Y0"]).is_err());
        let cli = Cli::parse_from([
            "relo",
            "instantiate",
            "adder.json",
            "SLICE_X0Y0",
            "--name",
            "u0",
        ]);
        match cli.command {
            Command::Instantiate(ref args) => assert_eq!(args.name, "u0"),
            _ => panic!("expected Instantiate command"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "relo",
            "placements",
            "adder.json",
            "--format",
            "json",
            "--tilegrid",
            "db/xc7a35t/tilegrid.json",
            "--quiet",
        ]);
        assert_eq!(cli.format, ReportFormat::Json);
        assert_eq!(cli.tilegrid.as_deref(), Some("db/xc7a35t/tilegrid.json"));
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["relo", "--config", "/path/to/relo.toml", "check", "m.json", "S"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/relo.toml"));
    }

    #[test]
    fn log_filter_follows_flags() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            format: ReportFormat::Text,
            config: None,
            tilegrid: None,
        };
        assert_eq!(default_filter(&global), "warn");
        global.verbose = true;
        assert_eq!(default_filter(&global), "info");
        global.quiet = true;
        assert_eq!(default_filter(&global), "error");
    }
}

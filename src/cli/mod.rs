use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use demvironment::extract::PsdOrder;
use demvironment::metadata::{Cohesivity, ConsolidationLevel, FlowState};
use demvironment::registry::{EntityKind, Warehouse};

mod assign;
mod browse;
mod calibrate;
mod config;
mod extract;
mod register;
mod validate;

pub use config::Config;

/// DEMvironment - metadata management for DEM particle calibration
#[derive(Parser)]
#[command(name = "demvironment")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Warehouse directory (overrides the config file)
    #[arg(short = 'w', long, value_name = "DIR", global = true)]
    warehouse: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Entity kind of a warehouse record.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    /// Experimental measurement
    Exp,
    /// Relational (correlation) data
    Rel,
    /// Calibration run
    Calib,
}

impl From<KindArg> for EntityKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Exp => EntityKind::Exp,
            KindArg::Rel => EntityKind::Rel,
            KindArg::Calib => EntityKind::Calib,
        }
    }
}

/// Order of the PSD lists in extracted records.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PsdOrderArg {
    /// Order of declaration in the log
    FileOrder,
    /// Last declaration first
    ReverseScan,
}

impl From<PsdOrderArg> for PsdOrder {
    fn from(arg: PsdOrderArg) -> Self {
        match arg {
            PsdOrderArg::FileOrder => PsdOrder::FileOrder,
            PsdOrderArg::ReverseScan => PsdOrder::ReverseScan,
        }
    }
}

/// Run directory file overrides shared by `extract` and `calibrate`.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Calibration run directory
    #[arg(value_name = "RUN_DIR")]
    run_dir: PathBuf,

    /// Log file name inside the run directory
    #[arg(long, value_name = "NAME")]
    log_file: Option<String>,

    /// Calibrated parameters file name inside the run directory
    #[arg(long, value_name = "NAME")]
    params_file: Option<String>,

    /// Order of the PSD radius and mass fraction lists
    #[arg(long, value_enum)]
    psd_order: Option<PsdOrderArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata from an Aspherix calibration run directory
    Extract {
        #[command(flatten)]
        run: RunArgs,

        /// Write the JSON here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Assign a DOI to a metadata payload and register it as version 0
    Assign {
        /// JSON payload without meta_info
        #[arg(value_name = "PAYLOAD")]
        payload: PathBuf,

        /// Entity kind (detected from the payload sections when omitted)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Also save a copy next to the data the payload describes
        #[arg(long)]
        copy_to_source: bool,
    },

    /// Assemble and register the metadata of a calibration run
    Calibrate {
        #[command(flatten)]
        run: RunArgs,

        /// JSON file with First Name, Last Name, Email and Affiliation
        #[arg(long, value_name = "FILE")]
        user: PathBuf,

        /// Calibration case name
        #[arg(long)]
        case_name: String,

        /// cohesionless or cohesive
        #[arg(long, default_value = "cohesionless")]
        cohesivity: Cohesivity,

        /// Quasi-static, Intermediate or Rapid
        #[arg(long, default_value = "Quasi-static")]
        flow_state: FlowState,

        /// low or high
        #[arg(long, default_value = "low")]
        consolidation: ConsolidationLevel,

        /// Consolidation pressure
        #[arg(long, default_value_t = 0.0)]
        pressure: f64,

        /// Template binding to an exp/rel record file (repeatable)
        #[arg(short = 't', long = "template", value_name = "NAME=FILE", value_parser = parse_binding)]
        templates: Vec<(String, PathBuf)>,
    },

    /// Register a complete record (with meta_info) into the warehouse
    Register {
        /// Record JSON file
        #[arg(value_name = "RECORD")]
        record: PathBuf,

        /// Overwrite even when the stored version is equal or newer
        #[arg(long)]
        force: bool,
    },

    /// Store an edited record as the next version of its DOI
    NewVersion {
        /// Edited record JSON file; its meta_info names the DOI
        #[arg(value_name = "RECORD")]
        record: PathBuf,
    },

    /// List the active records of one kind
    List {
        /// Entity kind
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Find records holding KEY = VALUE at any depth
    Find {
        /// Entity kind
        #[arg(value_enum)]
        kind: KindArg,

        /// Key to look for
        #[arg(required_unless_present = "keys")]
        key: Option<String>,

        /// Value, compared by its string form
        #[arg(required_unless_present = "keys")]
        value: Option<String>,

        /// List the keys used by this kind instead of searching
        #[arg(long, conflicts_with_all = ["key", "value"])]
        keys: bool,
    },

    /// Count records and backups per kind
    Stats,

    /// Print the active record for a DOI
    Show {
        /// Record DOI, e.g. calib-0a1b2c3d
        doi: String,

        /// List the backups of the record as well
        #[arg(long)]
        backups: bool,
    },

    /// Validate warehouse integrity
    Validate,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Settings resolved from flags and the optional config file
pub struct Settings {
    config: Config,
    warehouse: Option<PathBuf>,
}

impl Settings {
    fn new(config_path: Option<&Path>, warehouse: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        Ok(Self { config, warehouse })
    }

    /// Open the warehouse named by `--warehouse` or the config file
    pub fn warehouse(&self) -> Result<Warehouse> {
        let dir = self
            .warehouse
            .clone()
            .or_else(|| self.config.warehouse.directory.clone())
            .context("No warehouse directory: pass --warehouse or set [warehouse] directory")?;
        Warehouse::open(&dir).with_context(|| format!("Failed to open warehouse {}", dir.display()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn parse_binding(raw: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FILE, got '{}'", raw))?;
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=FILE, got '{}'", raw));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = Settings::new(cli.config.as_deref(), cli.warehouse)?;

    match cli.command {
        Commands::Extract { run, output } => extract::run(&ctx, run, output),
        Commands::Assign {
            payload,
            kind,
            copy_to_source,
        } => assign::run(&ctx, payload, kind.map(EntityKind::from), copy_to_source),
        Commands::Calibrate {
            run,
            user,
            case_name,
            cohesivity,
            flow_state,
            consolidation,
            pressure,
            templates,
        } => calibrate::run(
            &ctx,
            calibrate::CalibrateArgs {
                run,
                user,
                case_name,
                cohesivity,
                flow_state,
                consolidation,
                pressure,
                templates,
            },
        ),
        Commands::Register { record, force } => register::register(&ctx, record, force),
        Commands::NewVersion { record } => register::new_version(&ctx, record),
        Commands::List { kind } => browse::list(&ctx, kind.into()),
        Commands::Find {
            kind,
            key,
            value,
            keys,
        } => match (key, value) {
            (Some(key), Some(value)) if !keys => browse::find(&ctx, kind.into(), &key, &value),
            _ => browse::keys(&ctx, kind.into()),
        },
        Commands::Stats => browse::stats(&ctx),
        Commands::Show { doi, backups } => browse::show(&ctx, &doi, backups),
        Commands::Validate => validate::run(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("shearCell=/w/exp-1.json").unwrap(),
            ("shearCell".to_string(), PathBuf::from("/w/exp-1.json"))
        );
        assert!(parse_binding("shearCell").is_err());
        assert!(parse_binding("=x").is_err());
    }

    #[test]
    fn test_cli_parses_calibrate() {
        let cli = Cli::try_parse_from([
            "demvironment",
            "-vv",
            "--warehouse",
            "/w",
            "calibrate",
            "/runs/a",
            "--user",
            "user.json",
            "--case-name",
            "sand",
            "--cohesivity",
            "cohesive",
            "-t",
            "drum=/w/exp-1.json",
            "-t",
            "shear=/w/rel-2.json",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 2);
        match cli.command {
            Commands::Calibrate {
                templates,
                cohesivity,
                flow_state,
                ..
            } => {
                assert_eq!(templates.len(), 2);
                assert_eq!(cohesivity, Cohesivity::Cohesive);
                assert_eq!(flow_state, FlowState::QuasiStatic);
            }
            _ => panic!("expected calibrate"),
        }
    }

    #[test]
    fn test_find_keys_flag() {
        assert!(Cli::try_parse_from(["demvironment", "find", "exp", "--keys"]).is_ok());
        assert!(Cli::try_parse_from(["demvironment", "find", "exp", "Material", "sand"]).is_ok());
        assert!(Cli::try_parse_from(["demvironment", "find", "exp", "Material"]).is_err());
        assert!(Cli::try_parse_from(["demvironment", "find", "exp", "Material", "sand", "--keys"]).is_err());
    }
}

//! # DEMvironment
//!
//! A command-line tool for managing the metadata of DEM particle-calibration
//! runs.
//!
//! ## Usage
//!
//! ```bash
//! # Show what a calibration run directory contains
//! demvironment extract runs/sand_01
//!
//! # Register an experiment description under a fresh DOI
//! demvironment -w /data/warehouse assign shear_cell.json
//!
//! # Assemble and register the metadata of a calibration run
//! demvironment -w /data/warehouse calibrate runs/sand_01 \
//!     --user user.json --case-name sand -t shearCell=/data/warehouse/exp-0a1b2c3d.json
//!
//! # Search the warehouse
//! demvironment -w /data/warehouse find calib cohesion_model sjkr
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}

//! # Warehouse Validation Module
//!
//! Integrity checks over a metadata warehouse directory.
//!
//! ## Validation Checklist
//!
//! 1. **Layout**: the directory is readable; every file is an active record,
//!    a backup of one, or flagged as foreign
//! 2. **Records**: each active record parses as JSON, carries a valid
//!    `meta_info` block, has a known kind prefix and a file name that matches
//!    its DOI
//! 3. **Backups**: legacy unversioned backups and backups whose active record
//!    is gone are reported as warnings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use demvironment::validator::validate_warehouse;
//! use std::path::Path;
//!
//! let report = validate_warehouse(Path::new("/data/warehouse"))?;
//! println!("{}", report);
//! if report.has_failures() {
//!     std::process::exit(1);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::registry::Warehouse;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod records;
mod report;
mod structure;

/// Run every check against a warehouse directory
pub fn validate_warehouse(dir: &Path) -> Result<ValidationReport> {
    let warehouse = Warehouse::open(dir)
        .with_context(|| format!("Cannot validate {}", dir.display()))?;
    let mut report = ValidationReport::new(dir.display().to_string());

    // 1. Layout
    let layout = structure::check_layout(&warehouse, &mut report)?;

    // 2. Records
    for name in &layout.records {
        records::check_record(&warehouse, name, &mut report);
    }

    // 3. Backups
    structure::check_backups(&layout, &mut report);

    info!(
        "Validated {}: {} passed, {} warnings, {} failed",
        dir.display(),
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests;

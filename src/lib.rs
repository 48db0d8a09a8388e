//! # DEMvironment - Metadata for DEM Particle Calibration
//!
//! `demvironment` records where the parameters of a Discrete Element Method
//! simulation came from. It reads the output of an Aspherix calibration run,
//! combines it with information about the operator and the calibration case,
//! and files the result in a warehouse of versioned JSON records next to the
//! experimental data and correlations the calibration was made against.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demvironment::extract::{extract, RunFiles};
//! use demvironment::metadata::{CalibrationCase, CalibrationDocument, TemplateReferences, UserInfo};
//! use demvironment::registry::{EntityKind, OverwritePolicy, Warehouse};
//!
//! let run = RunFiles::in_directory("runs/sand_01");
//! let (log, calibrated) = extract(&run.log_path, &run.params_path)?;
//!
//! let user = UserInfo::new("Ada", "Lovelace", "ada@example.org", "Analytical Engines");
//! let case = CalibrationCase::new("sand", &run.directory);
//! let references = TemplateReferences::new()
//!     .with("shearCell", "/data/warehouse/exp-0a1b2c3d.json");
//!
//! let document = CalibrationDocument::assemble(user, case, log, calibrated, &references)?;
//!
//! let warehouse = Warehouse::open("/data/warehouse")?;
//! let doi = warehouse.generate_identifier(EntityKind::Calib)?;
//! let record = document.into_record(doi)?;
//! warehouse.register(&record, OverwritePolicy::Refuse)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Warehouse Layout
//!
//! A warehouse is a flat directory of records:
//!
//! ```text
//! warehouse/
//! ├── exp-0a1b2c3d.json          # experiment, active version
//! ├── exp-0a1b2c3d.json.v0.bak   # superseded version 0
//! ├── rel-5e6f7a8b.json          # correlation
//! └── calib-9c0d1e2f.json        # calibration run
//! ```
//!
//! Every record starts with a `meta_info` object holding exactly `version`,
//! `doi` and `Archived time`.
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`extract`]: Aspherix calibration log and calibrated parameter parsing
//! - [`metadata`]: User, calibration case and calibration document structures
//! - [`registry`]: The versioned JSON record warehouse
//! - [`validator`]: Warehouse integrity checks

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod extract;
pub mod metadata;
pub mod registry;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::extract::{
        extract, extract_with_options, CalibratedParameters, CalibrationLogRecord, ExtractError,
        ExtractOptions, PsdOrder, RunFiles,
    };
    pub use crate::metadata::{
        CalibrationCase, CalibrationDocument, MetadataError, TemplateReferences, UserInfo,
    };
    pub use crate::registry::{
        Doi, EntityKind, MetaInfo, MetadataRecord, OverwritePolicy, RegistrationResult,
        RegistryError, Warehouse,
    };
    pub use crate::validator::{validate_warehouse, ValidationReport};
}

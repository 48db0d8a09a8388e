//! # Calibration Log Extraction
//!
//! Parses the text output of an Aspherix(R) calibration run into structured
//! metadata:
//!
//! - **Software info**: version banner, git commit, run/restart, run mode
//! - **Templates**: calibration templates and their target parameters
//! - **Models**: contact, cohesion and rolling friction models plus the
//!   coarse-graining factor
//! - **Input parameters**: material parameters relevant to those models
//! - **PSD**: particle size distribution (radii, mass fractions, dispersity)
//! - **Calibrated parameter properties**: type and bounds of every parameter
//!   under calibration
//! - **Convergence**: whether the final log line reports success
//!
//! The final calibrated values live in a separate whitespace-delimited
//! results file, read by [`read_calibrated_params`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use demvironment::extract::extract;
//!
//! let (record, calibrated) = extract(
//!     "run/log_aspherix-calibration.txt",
//!     "run/calibrated_params.txt",
//! )?;
//! println!("converged: {}", record.converged);
//! println!("{} calibrated values", calibrated.len());
//! # Ok::<(), demvironment::extract::ExtractError>(())
//! ```

use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

mod error;
mod log_parser;
mod params;
mod patterns;
mod record;
mod run_dir;
mod value;
mod whitelist;


pub use log_parser::{is_converged, LogParser, SUCCESS_PHRASE};
pub use error::ExtractError;
pub use params::{parse_calibrated_params, read_calibrated_params};
pub use record::{
    CalibratedParamProperty, CalibratedParameters, CalibrationLogRecord, ModelConfig, Psd,
    SoftwareInfo,
};
pub use run_dir::{RunFiles, DEFAULT_LOG_FILE, DEFAULT_PARAMS_FILE};
pub use value::ParamValue;
pub use whitelist::{allowed_input_parameters, filter_input_parameters};

/// Order of the PSD radius and mass fraction lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PsdOrder {
    /// Chronological order of the `rp*`/`mf*` declarations
    #[default]
    FileOrder,
    /// Last declaration first, as produced by earlier DEMvironment releases
    ReverseScan,
}

/// Options controlling log extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Order of the PSD lists
    pub psd_order: PsdOrder,
}

impl ExtractOptions {
    /// Set the PSD list order
    pub fn with_psd_order(mut self, order: PsdOrder) -> Self {
        self.psd_order = order;
        self
    }
}

/// Extract a calibration run with default options.
///
/// Returns the log record and the calibrated parameter values.
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    log_path: P,
    params_path: Q,
) -> Result<(CalibrationLogRecord, CalibratedParameters), ExtractError> {
    extract_with_options(log_path, params_path, &ExtractOptions::default())
}

/// Extract a calibration run with explicit options
pub fn extract_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    log_path: P,
    params_path: Q,
    options: &ExtractOptions,
) -> Result<(CalibrationLogRecord, CalibratedParameters), ExtractError> {
    let log_path = log_path.as_ref();
    let params_path = params_path.as_ref();

    // Both inputs are required before any parsing starts
    for path in [log_path, params_path] {
        if !path.is_file() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
    }

    info!("Extracting calibration log {}", log_path.display());
    let record = extract_log(log_path, options)?;

    info!("Reading calibrated parameters {}", params_path.display());
    let calibrated = read_calibrated_params(params_path)?;

    Ok((record, calibrated))
}

/// Extract only the log record
pub fn extract_log<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<CalibrationLogRecord, ExtractError> {
    LogParser::new(options.clone())?.parse_file(path)
}

/// Parse log text held in memory
pub fn parse_log(text: &str, options: &ExtractOptions) -> Result<CalibrationLogRecord, ExtractError> {
    LogParser::new(options.clone())?
        .parse_str(text)
        .ok_or_else(|| ExtractError::EmptyLog("<memory>".into()))
}

/// Read a text file, mapping a missing file to [`ExtractError::NotFound`]
pub(crate) fn read_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExtractError::NotFound(path.to_path_buf()),
        _ => ExtractError::IoError(e),
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!("{} is not valid UTF-8, decoding lossily", path.display());
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

//! TOML configuration file support.
//!
//! Settings that rarely change between invocations can live in a config file
//! instead of being repeated on every command line:
//!
//! ```toml
//! # demvironment.toml
//! [warehouse]
//! directory = "/data/warehouse"
//!
//! [extraction]
//! log_file = "log_aspherix-calibration.txt"
//! params_file = "calibrated_params.txt"
//! psd_order = "file-order"
//! ```
//!
//! Command line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use demvironment::extract::{
    ExtractOptions, PsdOrder, RunFiles, DEFAULT_LOG_FILE, DEFAULT_PARAMS_FILE,
};

/// Root configuration structure for demvironment.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Warehouse location.
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Calibration run extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Configuration for commands that touch the warehouse.
#[derive(Debug, Default, Deserialize)]
pub struct WarehouseConfig {
    /// Warehouse directory.
    pub directory: Option<PathBuf>,
}

/// Configuration for the extract and calibrate commands.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionConfig {
    /// Log file name inside a run directory.
    pub log_file: Option<String>,

    /// Calibrated parameters file name inside a run directory.
    pub params_file: Option<String>,

    /// Order of the PSD lists.
    pub psd_order: Option<PsdOrder>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Locate the run files, preferring explicit names over configured ones
    pub fn run_files(
        &self,
        run_dir: &Path,
        log_file: Option<&str>,
        params_file: Option<&str>,
    ) -> RunFiles {
        RunFiles::with_names(
            run_dir,
            log_file
                .or(self.extraction.log_file.as_deref())
                .unwrap_or(DEFAULT_LOG_FILE),
            params_file
                .or(self.extraction.params_file.as_deref())
                .unwrap_or(DEFAULT_PARAMS_FILE),
        )
    }

    /// Extraction options, preferring an explicit PSD order
    pub fn extract_options(&self, psd_order: Option<PsdOrder>) -> ExtractOptions {
        let order = psd_order.or(self.extraction.psd_order).unwrap_or_default();
        ExtractOptions::default().with_psd_order(order)
    }
}

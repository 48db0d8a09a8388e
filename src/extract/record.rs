use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::value::ParamValue;

/// Final calibrated values read from `calibrated_params.txt`
pub type CalibratedParameters = BTreeMap<String, f64>;

/// Aspherix calibration software provenance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwareInfo {
    /// Version string announced in the log banner
    pub version: String,

    /// Git commit of the calibration build
    #[serde(rename = "git commit")]
    pub git_commit: String,

    /// Whether the run was a fresh start (`run`) or a `restart`
    #[serde(rename = "attempting to")]
    pub attempting_to: String,

    /// `single` or `sequential`
    #[serde(rename = "run mode")]
    pub run_mode: String,
}

/// Contact model configuration declared by `variable <name> string <value>` lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Normal contact model, e.g. `hertz` or `hooke`
    pub normal_contact_model: String,

    /// Tangential contact model
    pub tangential_contact_model: String,

    /// Cohesion model, e.g. `sjkr`, `sjkr2`, `adaptive`
    pub cohesion_model: String,

    /// Rolling friction model, e.g. `cdt`, `epsd`
    pub rolling_friction_model: String,

    /// Surface model
    pub surface_model: String,

    /// Coarse-graining factor (0 when not declared)
    pub coarsegraining_val: ParamValue,
}

impl ModelConfig {
    /// Names of the categorical model variables
    pub const CATEGORICAL_KEYS: [&'static str; 5] = [
        "normal_contact_model",
        "tangential_contact_model",
        "cohesion_model",
        "rolling_friction_model",
        "surface_model",
    ];

    /// Name of the numeric coarse-graining variable
    pub const COARSEGRAINING_KEY: &'static str = "coarsegraining_val";

    /// Set a categorical model by variable name; returns false for unknown names
    pub(crate) fn set_categorical(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "normal_contact_model" => &mut self.normal_contact_model,
            "tangential_contact_model" => &mut self.tangential_contact_model,
            "cohesion_model" => &mut self.cohesion_model,
            "rolling_friction_model" => &mut self.rolling_friction_model,
            "surface_model" => &mut self.surface_model,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

/// Particle size distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Psd {
    /// Radii declared by `rp*` variables
    pub radii_list: Vec<ParamValue>,

    /// Mass fractions declared by `mf*` variables
    pub mass_fractions_list: Vec<ParamValue>,

    /// Number of radii
    pub dispersity: usize,
}

/// Bounds of a parameter under calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedParamProperty {
    /// Parameter type, e.g. `scalar`
    #[serde(rename = "type")]
    pub param_type: String,

    /// Initial guess
    pub init: ParamValue,

    /// Lower bound
    pub min: ParamValue,

    /// Upper bound
    pub max: ParamValue,
}

/// Everything extracted from one calibration log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationLogRecord {
    /// Software provenance
    pub software: SoftwareInfo,

    /// Template name to target calibration parameters, in file order
    pub templates: BTreeMap<String, Vec<String>>,

    /// Contact model configuration
    pub models: ModelConfig,

    /// Physically meaningful input parameters for the detected models
    pub input_parameters: BTreeMap<String, ParamValue>,

    /// Particle size distribution
    #[serde(rename = "PSD")]
    pub psd: Psd,

    /// Parameters under calibration and their bounds
    pub calibrated_parameter_properties: BTreeMap<String, CalibratedParamProperty>,

    /// Whether the run finished successfully
    pub converged: bool,
}

impl CalibrationLogRecord {
    /// Names of all templates referenced by the run
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Convergence flag in the `Yes`/`No` wording used by metadata documents
    pub fn convergence_label(&self) -> &'static str {
        if self.converged {
            "Yes"
        } else {
            "No"
        }
    }
}

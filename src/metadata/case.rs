use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::MetadataError;

/// Whether the calibrated material is cohesive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cohesivity {
    /// Free-flowing material
    #[default]
    #[serde(rename = "cohesionless")]
    Cohesionless,
    /// Cohesive material
    #[serde(rename = "cohesive")]
    Cohesive,
}

/// Flow regime the calibration targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    /// Slow, friction dominated flow
    #[default]
    #[serde(rename = "Quasi-static")]
    QuasiStatic,
    /// Between quasi-static and rapid
    #[serde(rename = "Intermediate")]
    Intermediate,
    /// Collisional flow
    #[serde(rename = "Rapid")]
    Rapid,
}

/// Consolidation of the bulk before testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsolidationLevel {
    /// Loosely packed
    #[default]
    #[serde(rename = "low")]
    Low,
    /// Pre-consolidated
    #[serde(rename = "high")]
    High,
}

macro_rules! labelled_enum {
    ($ty:ty, $($variant:path => $label:literal),+ $(,)?) => {
        impl $ty {
            /// Label used in metadata documents
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($variant => $label,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($label) {
                        return Ok($variant);
                    }
                )+
                Err(format!(
                    "'{}' is not one of: {}",
                    s,
                    [$($label),+].join(", ")
                ))
            }
        }
    };
}

labelled_enum!(Cohesivity,
    Cohesivity::Cohesionless => "cohesionless",
    Cohesivity::Cohesive => "cohesive",
);

labelled_enum!(FlowState,
    FlowState::QuasiStatic => "Quasi-static",
    FlowState::Intermediate => "Intermediate",
    FlowState::Rapid => "Rapid",
);

labelled_enum!(ConsolidationLevel,
    ConsolidationLevel::Low => "low",
    ConsolidationLevel::High => "high",
);

/// Description of what a calibration run calibrates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCase {
    /// Free-form case name
    #[serde(rename = "Case Name")]
    pub case_name: String,

    /// Material cohesivity
    #[serde(rename = "Cohesivity")]
    pub cohesivity: Cohesivity,

    /// Targeted flow regime
    #[serde(rename = "Target Flow State")]
    pub target_flow_state: FlowState,

    /// Consolidation level
    #[serde(rename = "Consolidation level")]
    pub consolidation_level: ConsolidationLevel,

    /// Consolidation pressure
    #[serde(rename = "Consolidation Pressure")]
    pub consolidation_pressure: f64,

    /// Run directory holding the log and results files
    #[serde(rename = "Local Directory")]
    pub local_directory: PathBuf,
}

impl CalibrationCase {
    /// Create a case with default classification
    pub fn new(case_name: impl Into<String>, local_directory: impl Into<PathBuf>) -> Self {
        Self {
            case_name: case_name.into(),
            local_directory: local_directory.into(),
            ..Self::default()
        }
    }

    /// Check the name is set and the pressure is a non-negative number
    pub fn validate(&self) -> Result<(), MetadataError> {
        let mut problems = Vec::new();
        if self.case_name.trim().is_empty() {
            problems.push("Case Name cannot be empty.".to_string());
        }
        if !self.consolidation_pressure.is_finite() || self.consolidation_pressure < 0.0 {
            problems.push(format!(
                "Consolidation Pressure must be a non-negative number, got {}",
                self.consolidation_pressure
            ));
        }
        if self.local_directory.as_os_str().is_empty() {
            problems.push("Local Directory cannot be empty.".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(MetadataError::Validation(problems))
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::extract::{
    CalibratedParamProperty, CalibratedParameters, CalibrationLogRecord, ModelConfig, ParamValue,
    Psd, SoftwareInfo,
};
use crate::registry::{Doi, MetaInfo, MetadataRecord};

use super::case::CalibrationCase;
use super::templates::TemplateReferences;
use super::user::UserInfo;
use super::MetadataError;

/// Convergence section of a calibration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convergence {
    /// `Yes` or `No`
    #[serde(rename = "isconverged")]
    pub is_converged: String,
}

/// Body of a `calib` warehouse record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationDocument {
    /// Operator
    #[serde(rename = "User Data")]
    pub user: UserInfo,

    /// What was calibrated
    #[serde(rename = "Calibration Case")]
    pub case: CalibrationCase,

    /// Software provenance
    #[serde(rename = "Aspherix Info")]
    pub software: SoftwareInfo,

    /// Templates and their target parameters
    #[serde(rename = "Templates Info")]
    pub templates: BTreeMap<String, Vec<String>>,

    /// Contact models
    #[serde(rename = "Models Info")]
    pub models: ModelConfig,

    /// Material input parameters
    #[serde(rename = "Input Parameters")]
    pub input_parameters: BTreeMap<String, ParamValue>,

    /// Particle size distribution
    #[serde(rename = "PSD")]
    pub psd: Psd,

    /// Calibrated parameter bounds
    #[serde(rename = "Calibrated Parameter Properties")]
    pub calibrated_parameter_properties: BTreeMap<String, CalibratedParamProperty>,

    /// Whether the run converged
    #[serde(rename = "Convergence")]
    pub convergence: Convergence,

    /// Final calibrated values
    #[serde(rename = "Calibrated Parameters")]
    pub calibrated_parameters: CalibratedParameters,

    /// Identification of the record each template was calibrated against
    #[serde(rename = "Template Meta Info")]
    pub template_meta_info: BTreeMap<String, MetaInfo>,
}

impl CalibrationDocument {
    /// Validate the inputs and combine them into one document.
    ///
    /// User, case and template problems are collected and reported together.
    pub fn assemble(
        user: UserInfo,
        case: CalibrationCase,
        log: CalibrationLogRecord,
        calibrated_parameters: CalibratedParameters,
        references: &TemplateReferences,
    ) -> Result<Self, MetadataError> {
        let mut problems = Vec::new();
        collect_problems(&mut problems, user.validate());
        collect_problems(&mut problems, case.validate());
        let template_meta_info = match references.resolve(log.template_names()) {
            Ok(resolved) => resolved,
            Err(e) => {
                collect_problems(&mut problems, Err(e));
                BTreeMap::new()
            }
        };
        if !problems.is_empty() {
            return Err(MetadataError::Validation(problems));
        }

        let convergence = Convergence {
            is_converged: log.convergence_label().to_string(),
        };
        Ok(Self {
            user,
            case,
            software: log.software,
            templates: log.templates,
            models: log.models,
            input_parameters: log.input_parameters,
            psd: log.psd,
            calibrated_parameter_properties: log.calibrated_parameter_properties,
            convergence,
            calibrated_parameters,
            template_meta_info,
        })
    }

    /// Serialize to a JSON object body
    pub fn to_body(&self) -> Result<Map<String, Value>, MetadataError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(MetadataError::Validation(vec![
                "calibration document did not serialize to an object".to_string(),
            ])),
        }
    }

    /// Wrap the document into a version 0 warehouse record
    pub fn into_record(self, doi: Doi) -> Result<MetadataRecord, MetadataError> {
        Ok(MetadataRecord::new(doi, self.to_body()?))
    }

    /// Read a document back from a record body
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, MetadataError> {
        Ok(serde_json::from_value(Value::Object(body.clone()))?)
    }
}

fn collect_problems(problems: &mut Vec<String>, result: Result<(), MetadataError>) {
    match result {
        Ok(()) => {}
        Err(MetadataError::Validation(found)) => problems.extend(found),
        Err(other) => problems.push(other.to_string()),
    }
}

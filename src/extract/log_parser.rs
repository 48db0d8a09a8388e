use log::debug;
use std::collections::BTreeMap;
use std::path::Path;

use super::patterns::LogPatterns;
use super::record::{CalibratedParamProperty, CalibrationLogRecord, ModelConfig, Psd, SoftwareInfo};
use super::value::ParamValue;
use super::whitelist::filter_input_parameters;
use super::{read_text, ExtractError, ExtractOptions, PsdOrder};

/// Phrase the final log line carries when a calibration converged
pub const SUCCESS_PHRASE: &str = "calibration ended successfully";

/// Classify the final line of a log
pub fn is_converged(final_line: &str) -> bool {
    let line = final_line.trim();
    line.contains(SUCCESS_PHRASE) && !line.contains("ERROR")
}

/// Parser for Aspherix calibration logs.
///
/// Lines are scanned once, in file order. Single-valued fields keep the
/// value from their last occurrence in the file; list-valued fields
/// accumulate every occurrence.
#[derive(Debug, Clone)]
pub struct LogParser {
    patterns: LogPatterns,
    options: ExtractOptions,
}

/// Mutable state shared by the line extractors
#[derive(Default)]
struct Accumulator {
    software: SoftwareInfo,
    templates: BTreeMap<String, Vec<String>>,
    models: ModelConfig,
    input_parameters: BTreeMap<String, ParamValue>,
    radii: Vec<ParamValue>,
    mass_fractions: Vec<ParamValue>,
    calibrated: BTreeMap<String, CalibratedParamProperty>,
}

impl LogParser {
    /// Create a parser with the given options
    pub fn new(options: ExtractOptions) -> Result<Self, ExtractError> {
        Ok(Self {
            patterns: LogPatterns::new()?,
            options,
        })
    }

    /// Options this parser was built with
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Parse a log file from disk
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<CalibrationLogRecord, ExtractError> {
        let path = path.as_ref();
        let text = read_text(path)?;
        self.parse_str(&text)
            .ok_or_else(|| ExtractError::EmptyLog(path.to_path_buf()))
    }

    /// Parse log text; `None` when the text has no lines
    pub fn parse_str(&self, text: &str) -> Option<CalibrationLogRecord> {
        let final_line = text.lines().last()?;
        let converged = is_converged(final_line);

        let mut acc = Accumulator::default();
        for line in text.lines() {
            self.scan_line(line, &mut acc);
        }

        if self.options.psd_order == PsdOrder::ReverseScan {
            acc.radii.reverse();
            acc.mass_fractions.reverse();
        }

        let dispersity = acc.radii.len();
        let input_parameters = filter_input_parameters(acc.input_parameters, &acc.models);
        debug!(
            "Parsed calibration log: {} templates, {} input parameters, dispersity {}, converged {}",
            acc.templates.len(),
            input_parameters.len(),
            dispersity,
            converged
        );

        Some(CalibrationLogRecord {
            software: acc.software,
            templates: acc.templates,
            models: acc.models,
            input_parameters,
            psd: Psd {
                radii_list: acc.radii,
                mass_fractions_list: acc.mass_fractions,
                dispersity,
            },
            calibrated_parameter_properties: acc.calibrated,
            converged,
        })
    }

    fn scan_line(&self, line: &str, acc: &mut Accumulator) {
        let p = &self.patterns;

        if let Some(caps) = p.run_mode.captures(line) {
            acc.software.run_mode = caps[1].to_string();
            return;
        }

        if line.contains("calibration_case") {
            self.scan_calibration_case(line, acc);
        }

        if let Some(caps) = p.model_variable.captures(line) {
            let (name, value) = (&caps[1], &caps[2]);
            if name == ModelConfig::COARSEGRAINING_KEY {
                acc.models.coarsegraining_val = ParamValue::parse(value);
            } else if acc.models.set_categorical(name, value) {
                return;
            }
        }

        if let Some(caps) = p.scalar_variable.captures(line) {
            let name = &caps[1];
            let value = ParamValue::parse(&caps[2]);
            if name.starts_with("rp") {
                acc.radii.push(value.clone());
            } else if name.starts_with("mf") {
                acc.mass_fractions.push(value.clone());
            }
            acc.input_parameters.insert(name.to_string(), value);
            return;
        }

        if let Some(caps) = p.param_calibration.captures(line) {
            acc.calibrated.insert(
                caps[1].to_string(),
                CalibratedParamProperty {
                    param_type: caps[2].to_string(),
                    init: ParamValue::parse(&caps[3]),
                    min: ParamValue::parse(&caps[4]),
                    max: ParamValue::parse(&caps[5]),
                },
            );
            return;
        }

        if let Some(caps) = p.attempting.captures(line) {
            acc.software.attempting_to = caps[1].to_string();
        }
        if let Some(caps) = p.git_commit.captures(line) {
            acc.software.git_commit = caps[1].to_string();
        }
        if let Some(caps) = p.version.captures(line) {
            acc.software.version = caps[1].to_string();
        }
    }

    fn scan_calibration_case(&self, line: &str, acc: &mut Accumulator) {
        let p = &self.patterns;
        let Some(template) = p.template.captures(line) else {
            return;
        };

        let targets = acc.templates.entry(template[1].to_string()).or_default();
        if let Some(section) = p.target_params.captures(line) {
            let section = section.get(1).map_or("", |m| m.as_str());
            targets.extend(p.word.find_iter(section).map(|m| m.as_str().to_string()));
        }
    }
}

//! # Calibration Metadata Documents
//!
//! Builds the body of a `calib` warehouse record from the pieces a
//! calibration operator supplies:
//!
//! 1. **User data**: who ran the calibration ([`UserInfo`])
//! 2. **Calibration case**: what was calibrated, under which flow regime and
//!    consolidation ([`CalibrationCase`])
//! 3. **Extracted run data**: the log record and calibrated values produced by
//!    [`crate::extract`]
//! 4. **Template references**: the experiment or correlation record each
//!    calibration template was fitted against ([`TemplateReferences`])
//!
//! [`CalibrationDocument::assemble`] validates everything at once and reports
//! all problems together.

mod case;
mod document;
mod error;
mod templates;
mod user;

#[cfg(test)]
mod tests;

pub use case::{CalibrationCase, Cohesivity, ConsolidationLevel, FlowState};
pub use document::{CalibrationDocument, Convergence};
pub use error::MetadataError;
pub use templates::TemplateReferences;
pub use user::{is_valid_email, UserInfo};

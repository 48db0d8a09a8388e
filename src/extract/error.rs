use std::path::PathBuf;

/// Errors that can occur while extracting data from a calibration run
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Log or results file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error reading an input file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The log has no lines, so convergence cannot be classified
    #[error("Calibration log is empty: {}", .0.display())]
    EmptyLog(PathBuf),

    /// A calibrated parameter value is not a floating point number
    #[error("Invalid calibrated parameter value '{value}' on line {line}")]
    InvalidValue {
        /// 1-based line number in the results file
        line: usize,
        /// The offending token
        value: String,
    },

    /// A built-in log pattern failed to compile
    #[error("Invalid log pattern: {0}")]
    Pattern(#[from] regex::Error),
}

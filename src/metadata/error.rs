use crate::registry::RegistryError;

/// Errors that can occur while assembling calibration metadata
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// One or more fields failed validation
    #[error("Invalid metadata: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A referenced warehouse record could not be read
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A validation pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

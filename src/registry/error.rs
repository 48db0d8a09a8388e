use std::path::PathBuf;

use super::doi::EntityKind;

/// Errors that can occur while managing the metadata warehouse
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Warehouse directory is missing or not a directory
    #[error("Warehouse directory does not exist: {}", .0.display())]
    Configuration(PathBuf),

    /// No active record exists for an identifier
    #[error("No active metadata record at {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error reading or writing the warehouse
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A warehouse file holds malformed JSON
    #[error("Malformed JSON in {}: {source}", .file.display())]
    Parse {
        /// The offending file
        file: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A record failed structural validation
    #[error("Invalid metadata record: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Registration of a version not newer than the stored one was refused
    #[error(
        "Version conflict for {doi}: warehouse holds version {existing}, refusing to write version {proposed}"
    )]
    VersionConflict {
        /// Identifier of the record
        doi: String,
        /// Version currently stored
        existing: u64,
        /// Version that was offered
        proposed: u64,
    },

    /// Every generated identifier collided with an existing file
    #[error("No free identifier for kind '{kind}' after {attempts} attempts")]
    IdentifierExhausted {
        /// Entity kind requested
        kind: EntityKind,
        /// Number of candidates tried
        attempts: usize,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A staged temporary file could not be moved into place
    #[error("Failed to persist record: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl RegistryError {
    /// Validation failure with a single message
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RegistryError::Validation(vec![message.into()])
    }
}

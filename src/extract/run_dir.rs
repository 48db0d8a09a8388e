use std::path::{Path, PathBuf};

/// Default name of the Aspherix calibration log inside a run directory
pub const DEFAULT_LOG_FILE: &str = "log_aspherix-calibration.txt";

/// Default name of the calibrated parameters results file
pub const DEFAULT_PARAMS_FILE: &str = "calibrated_params.txt";

/// Input files of one calibration run directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    /// Run directory
    pub directory: PathBuf,
    /// Path of the calibration log
    pub log_path: PathBuf,
    /// Path of the calibrated parameters file
    pub params_path: PathBuf,
}

impl RunFiles {
    /// Resolve the default file names inside `directory`
    pub fn in_directory<P: AsRef<Path>>(directory: P) -> Self {
        Self::with_names(directory, DEFAULT_LOG_FILE, DEFAULT_PARAMS_FILE)
    }

    /// Resolve custom file names inside `directory`
    pub fn with_names<P: AsRef<Path>>(directory: P, log_file: &str, params_file: &str) -> Self {
        let directory = directory.as_ref().to_path_buf();
        Self {
            log_path: directory.join(log_file),
            params_path: directory.join(params_file),
            directory,
        }
    }

    /// Paths that do not exist on disk
    pub fn missing(&self) -> Vec<&Path> {
        [self.log_path.as_path(), self.params_path.as_path()]
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Whether both files exist
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_files_reported() {
        let dir = tempdir().unwrap();
        let files = RunFiles::in_directory(dir.path());
        assert_eq!(files.missing().len(), 2);

        std::fs::write(&files.log_path, "x\n").unwrap();
        assert_eq!(files.missing(), vec![files.params_path.as_path()]);

        std::fs::write(&files.params_path, "h\n").unwrap();
        assert!(files.is_complete());
    }

    #[test]
    fn test_custom_names() {
        let files = RunFiles::with_names("/runs/a", "run.log", "out.txt");
        assert_eq!(files.log_path, PathBuf::from("/runs/a/run.log"));
        assert_eq!(files.params_path, PathBuf::from("/runs/a/out.txt"));
    }
}

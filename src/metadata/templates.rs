use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::registry::{load_record_file, MetaInfo};

use super::MetadataError;

/// Binding of calibration templates to the warehouse records of the
/// experiments or correlations they were calibrated against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateReferences {
    bindings: BTreeMap<String, PathBuf>,
}

impl TemplateReferences {
    /// Create an empty set of bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a template to a metadata file, replacing any previous binding
    pub fn bind(&mut self, template: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.bindings.insert(template.into(), path.into());
        self
    }

    /// Builder form of [`bind`](Self::bind)
    pub fn with(mut self, template: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.bind(template, path);
        self
    }

    /// File bound to a template
    pub fn get(&self, template: &str) -> Option<&Path> {
        self.bindings.get(template).map(PathBuf::as_path)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Read the `meta_info` of the record bound to every template.
    ///
    /// Every template must be bound to an existing file holding a valid
    /// record; all problems are reported together.
    pub fn resolve<'a, I>(&self, templates: I) -> Result<BTreeMap<String, MetaInfo>, MetadataError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let requested: BTreeSet<&str> = templates.into_iter().collect();
        let mut resolved = BTreeMap::new();
        let mut problems = Vec::new();

        for &template in &requested {
            let Some(path) = self.bindings.get(template) else {
                problems.push(format!("No metadata file bound to template '{}'", template));
                continue;
            };
            if !path.is_file() {
                problems.push(format!(
                    "The JSON file path for '{}' is not filled correctly: {}",
                    template,
                    path.display()
                ));
                continue;
            }
            match load_record_file(path) {
                Ok(record) => {
                    debug!("Template {} references {}", template, record.doi());
                    resolved.insert(template.to_string(), record.meta_info);
                }
                Err(e) => problems.push(format!("Template '{}': {}", template, e)),
            }
        }

        for template in self.bindings.keys() {
            if !requested.contains(template.as_str()) {
                warn!("Template '{}' is bound but not used by the run", template);
            }
        }

        if problems.is_empty() {
            Ok(resolved)
        } else {
            Err(MetadataError::Validation(problems))
        }
    }
}

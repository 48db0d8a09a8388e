use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// Number of UUID characters kept in identifiers and file names
pub const SUFFIX_LEN: usize = 8;

/// Kind of entity a metadata record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Experimental measurement
    Exp,
    /// Relational (literature correlation) data
    Rel,
    /// Calibration run
    Calib,
}

impl EntityKind {
    /// All kinds, in warehouse display order
    pub const ALL: [EntityKind; 3] = [EntityKind::Exp, EntityKind::Rel, EntityKind::Calib];

    /// File name and identifier prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Exp => "exp",
            EntityKind::Rel => "rel",
            EntityKind::Calib => "calib",
        }
    }

    /// Top-level payload section that identifies this kind
    pub fn section(&self) -> &'static str {
        match self {
            EntityKind::Exp => "Data Info",
            EntityKind::Rel => "Correlation Info",
            EntityKind::Calib => "Calibration Case",
        }
    }

    /// Infer the kind from the sections of a metadata payload
    pub fn detect(payload: &Map<String, Value>) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| payload.contains_key(kind.section()))
    }

    /// Directory holding the data the payload describes.
    ///
    /// Experiments and correlations point at a file, whose parent directory
    /// is returned; calibration cases name their run directory directly.
    pub fn source_directory(&self, payload: &Map<String, Value>) -> Option<PathBuf> {
        let section = payload.get(self.section())?.as_object()?;
        match self {
            EntityKind::Exp => parent_of(section.get("File location/Links")?.as_str()?),
            EntityKind::Rel => parent_of(section.get("Python file path")?.as_str()?),
            EntityKind::Calib => Some(PathBuf::from(section.get("Local Directory")?.as_str()?)),
        }
    }
}

fn parent_of(file: &str) -> Option<PathBuf> {
    Path::new(file).parent().map(Path::to_path_buf)
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = InvalidDoi;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exp" => Ok(EntityKind::Exp),
            "rel" => Ok(EntityKind::Rel),
            "calib" => Ok(EntityKind::Calib),
            other => Err(InvalidDoi(format!("unknown entity kind '{}'", other))),
        }
    }
}

/// Error parsing an identifier or entity kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid DOI: {0}")]
pub struct InvalidDoi(pub String);

/// Locally generated record identifier of the form `<kind>-<suffix>`.
///
/// Fresh identifiers carry an 8 character suffix. Older records may carry a
/// full UUID; their file name still uses only the first 8 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Doi {
    kind: EntityKind,
    suffix: String,
}

impl Doi {
    /// Build an identifier from its parts
    pub fn new(kind: EntityKind, suffix: impl Into<String>) -> Result<Self, InvalidDoi> {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return Err(InvalidDoi(format!("empty suffix for kind '{}'", kind)));
        }
        // The suffix becomes part of a file name
        if !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(InvalidDoi(format!(
                "suffix '{}' may only hold letters, digits and '-'",
                suffix
            )));
        }
        Ok(Self { kind, suffix })
    }

    /// Generate a random identifier without checking any warehouse
    pub fn generate(kind: EntityKind) -> Self {
        let uuid = Uuid::new_v4().to_string();
        Self {
            kind,
            suffix: uuid[..SUFFIX_LEN].to_string(),
        }
    }

    /// Entity kind prefix
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Suffix as stored in the record
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Warehouse file name: `<kind>-<first 8 suffix chars>.json`
    pub fn file_name(&self) -> String {
        let short: String = self.suffix.chars().take(SUFFIX_LEN).collect();
        format!("{}-{}.json", self.kind, short)
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.suffix)
    }
}

impl FromStr for Doi {
    type Err = InvalidDoi;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, suffix) = s
            .split_once('-')
            .ok_or_else(|| InvalidDoi(format!("'{}' has no '-' separator", s)))?;
        Doi::new(kind.parse()?, suffix)
    }
}

impl TryFrom<String> for Doi {
    type Error = InvalidDoi;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Doi> for String {
    fn from(doi: Doi) -> Self {
        doi.to_string()
    }
}

//! # Metadata Warehouse
//!
//! A warehouse is a flat directory of JSON metadata records, one active file
//! per identifier:
//!
//! ```text
//! warehouse/
//! ├── exp-0a1b2c3d.json          # active record
//! ├── exp-0a1b2c3d.json.v0.bak   # superseded version 0
//! ├── rel-5e6f7a8b.json
//! └── calib-9c0d1e2f.json
//! ```
//!
//! Every record starts with a `meta_info` block holding exactly `version`,
//! `doi` and `Archived time`. Versions only move forward: registering a
//! version that is not newer than the stored one is refused unless the
//! caller passes [`OverwritePolicy::Force`]. Replaced files are renamed to
//! `<name>.json.v<N>.bak` and never deleted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use demvironment::registry::{EntityKind, MetadataRecord, OverwritePolicy, Warehouse};
//! use serde_json::json;
//!
//! let warehouse = Warehouse::open("/data/warehouse")?;
//! let doi = warehouse.generate_identifier(EntityKind::Calib)?;
//!
//! let body = json!({"Calibration Case": {"Case Name": "sand"}});
//! let record = MetadataRecord::new(doi, body.as_object().cloned().unwrap_or_default());
//! warehouse.register(&record, OverwritePolicy::Refuse)?;
//!
//! let hits = warehouse.find(EntityKind::Calib, "Case Name", "sand")?;
//! # Ok::<(), demvironment::registry::RegistryError>(())
//! ```

use log::{debug, info, warn};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

mod backup;
mod doi;
mod error;
mod record;
mod search;


pub use backup::{
    active_name_of, backup_path, free_backup_path, parse_backup_name, Backup, BACKUP_EXTENSION,
};
pub use doi::{Doi, EntityKind, InvalidDoi, SUFFIX_LEN};
pub use error::RegistryError;
pub use record::{MetaInfo, MetadataRecord, ARCHIVED_TIME_FORMAT, META_INFO_KEY, META_INFO_KEYS};
pub use search::{collect_keys_into, contains_key_value, stringify};

/// Candidates tried by [`Warehouse::generate_identifier`] before giving up
pub const MAX_IDENTIFIER_ATTEMPTS: usize = 16;

/// What to do when a record is not newer than the stored one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Refuse with [`RegistryError::VersionConflict`]
    #[default]
    Refuse,
    /// Back up the stored record and write anyway
    Force,
}

/// Outcome of [`Warehouse::register`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationResult {
    /// No record existed for the identifier
    Created {
        /// Active file written
        path: PathBuf,
    },
    /// A lower version was backed up and replaced
    Upgraded {
        /// Active file written
        path: PathBuf,
        /// Where the previous version went
        backup: PathBuf,
        /// Version that was replaced
        previous_version: u64,
    },
    /// An equal or higher version was replaced on request
    Overwritten {
        /// Active file written
        path: PathBuf,
        /// Where the previous version went
        backup: PathBuf,
        /// Version that was replaced
        previous_version: u64,
    },
}

impl RegistrationResult {
    /// Active file written by the registration
    pub fn path(&self) -> &Path {
        match self {
            RegistrationResult::Created { path }
            | RegistrationResult::Upgraded { path, .. }
            | RegistrationResult::Overwritten { path, .. } => path,
        }
    }

    /// Backup created by the registration, if any
    pub fn backup(&self) -> Option<&Path> {
        match self {
            RegistrationResult::Created { .. } => None,
            RegistrationResult::Upgraded { backup, .. }
            | RegistrationResult::Overwritten { backup, .. } => Some(backup),
        }
    }
}

/// File counts of a warehouse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarehouseStats {
    /// Active records per kind
    pub per_kind: BTreeMap<EntityKind, usize>,
    /// Backup files of any scheme
    pub backups: usize,
    /// JSON files without a known kind prefix
    pub unrecognized: usize,
}

impl WarehouseStats {
    /// Active records of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Active records of all kinds
    pub fn total(&self) -> usize {
        self.per_kind.values().sum()
    }
}

impl fmt::Display for WarehouseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in EntityKind::ALL {
            writeln!(f, "{:<6} {}", kind, self.count(kind))?;
        }
        writeln!(f, "{:<6} {}", "total", self.total())?;
        write!(f, "backups: {}", self.backups)?;
        if self.unrecognized > 0 {
            write!(f, ", unrecognized: {}", self.unrecognized)?;
        }
        Ok(())
    }
}

/// Handle on a warehouse directory
#[derive(Debug, Clone)]
pub struct Warehouse {
    root: PathBuf,
}

impl Warehouse {
    /// Open an existing warehouse directory. The directory is never created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, RegistryError> {
        let root = dir.as_ref();
        if !root.is_dir() {
            return Err(RegistryError::Configuration(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Warehouse directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active file path for an identifier
    pub fn path_for(&self, doi: &Doi) -> PathBuf {
        self.root.join(doi.file_name())
    }

    /// Generate an identifier whose file name is not used by any active or
    /// backup file
    pub fn generate_identifier(&self, kind: EntityKind) -> Result<Doi, RegistryError> {
        self.generate_identifier_with(kind, Doi::generate)
    }

    /// Like [`Warehouse::generate_identifier`], drawing candidates from `next`.
    ///
    /// Gives up with [`RegistryError::IdentifierExhausted`] after
    /// [`MAX_IDENTIFIER_ATTEMPTS`] taken candidates.
    pub fn generate_identifier_with<F>(&self, kind: EntityKind, mut next: F) -> Result<Doi, RegistryError>
    where
        F: FnMut(EntityKind) -> Doi,
    {
        for attempt in 1..=MAX_IDENTIFIER_ATTEMPTS {
            let candidate = next(kind);
            if !self.is_taken(&candidate)? {
                debug!("Generated identifier {} after {} attempt(s)", candidate, attempt);
                return Ok(candidate);
            }
            debug!("Identifier {} already in use, retrying", candidate);
        }
        Err(RegistryError::IdentifierExhausted {
            kind,
            attempts: MAX_IDENTIFIER_ATTEMPTS,
        })
    }

    /// Whether an active or backup file exists for the identifier
    pub fn is_taken(&self, doi: &Doi) -> Result<bool, RegistryError> {
        let active = doi.file_name();
        let backup_prefix = format!("{}.", active);
        Ok(self
            .file_names()?
            .iter()
            .any(|name| *name == active || name.starts_with(&backup_prefix)))
    }

    /// Store a record.
    ///
    /// A newer version replaces the active file after backing it up. An
    /// equal or older version is refused under [`OverwritePolicy::Refuse`]
    /// and leaves the warehouse untouched.
    pub fn register(
        &self,
        record: &MetadataRecord,
        policy: OverwritePolicy,
    ) -> Result<RegistrationResult, RegistryError> {
        let path = self.path_for(record.doi());
        let proposed = record.version();

        if !path.exists() {
            self.stage(record)?.persist(&path)?;
            info!("Registered {} version {} at {}", record.doi(), proposed, path.display());
            return Ok(RegistrationResult::Created { path });
        }

        let stored = self.read_record(&path)?;
        check_same_doi(&stored, record)?;
        let existing = stored.version();
        if proposed <= existing && policy == OverwritePolicy::Refuse {
            warn!(
                "{} already holds version {} of {}; not writing version {}",
                path.display(),
                existing,
                record.doi(),
                proposed
            );
            return Err(RegistryError::VersionConflict {
                doi: record.doi().to_string(),
                existing,
                proposed,
            });
        }

        let staged = self.stage(record)?;
        let backup = self.archive(&path, existing)?;
        staged.persist(&path)?;

        if proposed > existing {
            info!("Upgraded {} from version {} to {}", record.doi(), existing, proposed);
            Ok(RegistrationResult::Upgraded {
                path,
                backup,
                previous_version: existing,
            })
        } else {
            warn!(
                "Overwrote version {} of {} with version {}",
                existing,
                record.doi(),
                proposed
            );
            Ok(RegistrationResult::Overwritten {
                path,
                backup,
                previous_version: existing,
            })
        }
    }

    /// Validate a raw JSON document and register it
    pub fn register_value(
        &self,
        value: Value,
        policy: OverwritePolicy,
    ) -> Result<RegistrationResult, RegistryError> {
        let record = MetadataRecord::from_value(value)?;
        self.register(&record, policy)
    }

    /// Replace the active record for `record`'s identifier with `record`'s
    /// body as the next version. Returns the record as written.
    pub fn new_version(&self, record: &MetadataRecord) -> Result<MetadataRecord, RegistryError> {
        let path = self.path_for(record.doi());
        if !path.is_file() {
            return Err(RegistryError::NotFound(path));
        }

        let existing = self.read_record(&path)?;
        check_same_doi(&existing, record)?;
        let next = existing.next_version(record.body.clone());

        let staged = self.stage(&next)?;
        self.archive(&path, existing.version())?;
        staged.persist(&path)?;

        info!(
            "Stored version {} of {} at {}",
            next.version(),
            next.doi(),
            path.display()
        );
        Ok(next)
    }

    /// Load and validate the active record for an identifier
    pub fn load(&self, doi: &Doi) -> Result<MetadataRecord, RegistryError> {
        self.read_record(&self.path_for(doi))
    }

    /// Sorted active file names of one kind
    pub fn list_entries(&self, kind: EntityKind) -> Result<Vec<String>, RegistryError> {
        let prefix = format!("{}-", kind);
        let mut entries: Vec<String> = self
            .file_names()?
            .into_iter()
            .filter(|name| name.starts_with(&prefix) && name.ends_with(".json"))
            .collect();
        entries.sort();
        Ok(entries)
    }

    /// Parse a warehouse file by name without validating it
    pub fn read_entry(&self, file_name: &str) -> Result<Value, RegistryError> {
        if Path::new(file_name).file_name().and_then(|n| n.to_str()) != Some(file_name) {
            return Err(RegistryError::invalid(format!(
                "'{}' is not a plain file name",
                file_name
            )));
        }
        read_json(&self.root.join(file_name))
    }

    /// Active files of `kind` holding `key` = `value` at any depth.
    ///
    /// Values compare by their [`stringify`] form: strings by content, other
    /// values by JSON text. Booleans, null and exponents are therefore
    /// spelled `true`, `null` and `1e-5`; `True`, `None` or `1e-05` match
    /// nothing.
    pub fn find(
        &self,
        kind: EntityKind,
        key: &str,
        value: &str,
    ) -> Result<Vec<String>, RegistryError> {
        let mut matches = Vec::new();
        for name in self.list_entries(kind)? {
            let document = self.read_entry(&name)?;
            if contains_key_value(&document, key, value) {
                matches.push(name);
            }
        }
        debug!("{} {} record(s) match {}={}", matches.len(), kind, key, value);
        Ok(matches)
    }

    /// Every key used by the active records of one kind
    pub fn collect_keys(&self, kind: EntityKind) -> Result<BTreeSet<String>, RegistryError> {
        let mut keys = BTreeSet::new();
        for name in self.list_entries(kind)? {
            collect_keys_into(&self.read_entry(&name)?, &mut keys);
        }
        Ok(keys)
    }

    /// Backups of an identifier, legacy ones first, then by version
    pub fn backups(&self, doi: &Doi) -> Result<Vec<Backup>, RegistryError> {
        let active = doi.file_name();
        let mut backups: Vec<Backup> = self
            .file_names()?
            .into_iter()
            .filter_map(|name| {
                parse_backup_name(&active, &name).map(|version| Backup {
                    path: self.root.join(&name),
                    version,
                })
            })
            .collect();
        // Plain `.v<N>.bak` before its numbered copies, copies in numeric order
        backups.sort_by_key(|b| (b.version, b.path.as_os_str().len(), b.path.clone()));
        Ok(backups)
    }

    /// Count active records per kind and backups
    pub fn stats(&self) -> Result<WarehouseStats, RegistryError> {
        let mut stats = WarehouseStats::default();
        for kind in EntityKind::ALL {
            stats.per_kind.insert(kind, 0);
        }

        for name in self.file_names()? {
            if active_name_of(&name).is_some() {
                stats.backups += 1;
            } else if name.ends_with(".json") {
                let kind = name.split_once('-').and_then(|(prefix, _)| prefix.parse::<EntityKind>().ok());
                match kind {
                    Some(kind) => *stats.per_kind.entry(kind).or_insert(0) += 1,
                    None => stats.unrecognized += 1,
                }
            }
        }
        Ok(stats)
    }

    /// Names of the regular files in the warehouse
    pub fn file_names(&self) -> Result<Vec<String>, RegistryError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => debug!("Skipping non UTF-8 file name {:?}", name),
            }
        }
        Ok(names)
    }

    fn read_record(&self, path: &Path) -> Result<MetadataRecord, RegistryError> {
        MetadataRecord::from_value(read_json(path)?)
    }

    /// Rename the active file to a free versioned backup name
    fn archive(&self, path: &Path, version: u64) -> Result<PathBuf, RegistryError> {
        let backup = free_backup_path(path, version);
        if backup != backup_path(path, version) {
            info!(
                "Version {} of {} already has a backup, keeping both",
                version,
                path.display()
            );
        }
        fs::rename(path, &backup)?;
        debug!("Moved {} to {}", path.display(), backup.display());
        Ok(backup)
    }

    /// Write a record to a temporary file inside the warehouse
    fn stage(&self, record: &MetadataRecord) -> Result<NamedTempFile, RegistryError> {
        let mut temp_file = NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file_mut());
            record.write_pretty(&mut writer)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        Ok(temp_file)
    }
}

/// Refuse to replace a stored record that carries another identifier.
///
/// Legacy identifiers sharing their first 8 suffix characters map to the
/// same file name.
fn check_same_doi(stored: &MetadataRecord, incoming: &MetadataRecord) -> Result<(), RegistryError> {
    if stored.doi() == incoming.doi() {
        return Ok(());
    }
    Err(RegistryError::Validation(vec![format!(
        "{} is stored under {}, not {}",
        incoming.doi().file_name(),
        stored.doi(),
        incoming.doi()
    )]))
}

/// Load and validate a record stored anywhere on disk
pub fn load_record_file<P: AsRef<Path>>(path: P) -> Result<MetadataRecord, RegistryError> {
    MetadataRecord::from_value(read_json(path.as_ref())?)
}

/// Read and parse a JSON file
fn read_json(path: &Path) -> Result<Value, RegistryError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RegistryError::NotFound(path.to_path_buf()),
        _ => RegistryError::IoError(e),
    })?;
    serde_json::from_str(&text).map_err(|source| RegistryError::Parse {
        file: path.to_path_buf(),
        source,
    })
}

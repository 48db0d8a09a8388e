//! Backup file naming.
//!
//! Superseded versions are kept next to the active file as
//! `<name>.json.v<N>.bak`, where `N` is the version being replaced. When that
//! name is already taken (a forced registration can bring a version number
//! back) the backup becomes `<name>.json.v<N>.<k>.bak` with the first free
//! `k` from 1. Plain `<name>.json.bak` files left by earlier tooling are still
//! recognised.

use std::path::{Path, PathBuf};

/// Suffix shared by every backup file
pub const BACKUP_EXTENSION: &str = ".bak";

/// A backup of a warehouse record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    /// Full path of the backup file
    pub path: PathBuf,
    /// Version held by the backup, `None` for legacy unversioned backups
    pub version: Option<u64>,
}

impl Backup {
    /// Whether this backup uses the legacy unversioned name
    pub fn is_legacy(&self) -> bool {
        self.version.is_none()
    }
}

/// Backup path for `active` holding `version`
pub fn backup_path(active: &Path, version: u64) -> PathBuf {
    let mut name = active.as_os_str().to_owned();
    name.push(format!(".v{}{}", version, BACKUP_EXTENSION));
    PathBuf::from(name)
}

/// First backup path for `active` holding `version` that no file occupies
pub fn free_backup_path(active: &Path, version: u64) -> PathBuf {
    let plain = backup_path(active, version);
    if !plain.exists() {
        return plain;
    }
    (1u32..)
        .map(|copy| {
            let mut name = active.as_os_str().to_owned();
            name.push(format!(".v{}.{}{}", version, copy, BACKUP_EXTENSION));
            PathBuf::from(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(plain)
}

/// Interpret `file_name` as a backup of `active_name`.
///
/// Returns `Some(None)` for a legacy backup, `Some(Some(n))` for a versioned
/// one (numbered copies included) and `None` when the name is not a backup
/// of that record.
pub fn parse_backup_name(active_name: &str, file_name: &str) -> Option<Option<u64>> {
    let rest = file_name.strip_prefix(active_name)?;
    let rest = rest.strip_suffix(BACKUP_EXTENSION)?;
    if rest.is_empty() {
        return Some(None);
    }
    let numbers = rest.strip_prefix(".v")?;
    let (version, copy) = match numbers.split_once('.') {
        Some((version, copy)) => (version, Some(copy)),
        None => (numbers, None),
    };
    if let Some(copy) = copy {
        copy.parse::<u32>().ok()?;
    }
    version.parse::<u64>().ok().map(Some)
}

/// Name of the active record a backup file belongs to
pub fn active_name_of(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(BACKUP_EXTENSION)?;
    let end = stem.find(".json")? + ".json".len();
    let active = &stem[..end];
    parse_backup_name(active, file_name).map(|_| active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path() {
        let active = Path::new("/warehouse/calib-0a1b2c3d.json");
        assert_eq!(
            backup_path(active, 3),
            PathBuf::from("/warehouse/calib-0a1b2c3d.json.v3.bak")
        );
    }

    #[test]
    fn test_parse_backup_name() {
        let active = "exp-12345678.json";
        assert_eq!(parse_backup_name(active, "exp-12345678.json.v0.bak"), Some(Some(0)));
        assert_eq!(parse_backup_name(active, "exp-12345678.json.v12.bak"), Some(Some(12)));
        assert_eq!(parse_backup_name(active, "exp-12345678.json.bak"), Some(None));
        assert_eq!(parse_backup_name(active, "exp-12345678.json"), None);
        assert_eq!(parse_backup_name(active, "exp-12345678.json.vx.bak"), None);
        assert_eq!(parse_backup_name(active, "exp-87654321.json.v1.bak"), None);
        assert_eq!(parse_backup_name(active, "exp-12345678.json.v0.1.bak"), Some(Some(0)));
        assert_eq!(parse_backup_name(active, "exp-12345678.json.v4.12.bak"), Some(Some(4)));
        assert_eq!(parse_backup_name(active, "exp-12345678.json.v0.x.bak"), None);
        assert_eq!(parse_backup_name(active, "exp-12345678.json.v0..bak"), None);
    }

    #[test]
    fn test_free_backup_path_skips_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        let active = dir.path().join("calib-0a1b2c3d.json");

        assert_eq!(free_backup_path(&active, 0), backup_path(&active, 0));

        std::fs::write(backup_path(&active, 0), "{}").unwrap();
        let first_copy = dir.path().join("calib-0a1b2c3d.json.v0.1.bak");
        assert_eq!(free_backup_path(&active, 0), first_copy);

        std::fs::write(&first_copy, "{}").unwrap();
        assert_eq!(
            free_backup_path(&active, 0),
            dir.path().join("calib-0a1b2c3d.json.v0.2.bak")
        );
        assert_eq!(free_backup_path(&active, 1), backup_path(&active, 1));
    }

    #[test]
    fn test_active_name_of() {
        assert_eq!(active_name_of("rel-0badc0de.json.v2.bak"), Some("rel-0badc0de.json"));
        assert_eq!(active_name_of("rel-0badc0de.json.bak"), Some("rel-0badc0de.json"));
        assert_eq!(active_name_of("rel-0badc0de.json.v2.3.bak"), Some("rel-0badc0de.json"));
        assert_eq!(active_name_of("rel-0badc0de.json"), None);
        assert_eq!(active_name_of("notes.bak"), None);
    }
}

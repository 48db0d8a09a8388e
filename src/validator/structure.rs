use std::collections::BTreeSet;

use anyhow::Result;

use crate::registry::{active_name_of, parse_backup_name, Warehouse};

use super::{ValidationCheck, ValidationReport};

const WAREHOUSE: &str = "(warehouse)";

/// Files of a warehouse sorted into roles
#[derive(Debug, Default)]
pub(crate) struct Layout {
    /// Active `*.json` records, sorted
    pub records: Vec<String>,
    /// Backup file names, sorted
    pub backups: Vec<String>,
}

/// Step 1: read the directory and classify every file
pub(crate) fn check_layout(warehouse: &Warehouse, report: &mut ValidationReport) -> Result<Layout> {
    let mut names = match warehouse.file_names() {
        Ok(names) => names,
        Err(e) => {
            report.add_check(ValidationCheck::failed(WAREHOUSE, "Directory readable", e.to_string()));
            return Err(e.into());
        }
    };
    names.sort();
    report.add_check(ValidationCheck::ok(WAREHOUSE, "Directory readable"));

    let mut layout = Layout::default();
    for name in names {
        if active_name_of(&name).is_some() {
            layout.backups.push(name);
        } else if name.ends_with(".json") {
            layout.records.push(name);
        } else if name.starts_with(".tmp") {
            report.add_check(ValidationCheck::warning(
                name,
                "Foreign file",
                "leftover temporary file from an interrupted write",
            ));
        } else {
            report.add_check(ValidationCheck::warning(
                name,
                "Foreign file",
                "not a record or backup",
            ));
        }
    }

    report.add_check(ValidationCheck::ok(
        WAREHOUSE,
        format!("{} record(s), {} backup(s)", layout.records.len(), layout.backups.len()),
    ));
    Ok(layout)
}

/// Step 3: backups must belong to an active record and use the versioned scheme
pub(crate) fn check_backups(layout: &Layout, report: &mut ValidationReport) {
    let active: BTreeSet<&str> = layout.records.iter().map(String::as_str).collect();

    for name in &layout.backups {
        let Some(owner) = active_name_of(name) else {
            continue;
        };

        if !active.contains(owner) {
            report.add_check(ValidationCheck::warning(
                name.as_str(),
                "Backup owner",
                format!("no active record {}", owner),
            ));
        }

        match parse_backup_name(owner, name) {
            Some(Some(_)) => report.add_check(ValidationCheck::ok(name.as_str(), "Backup naming")),
            Some(None) => report.add_check(ValidationCheck::warning(
                name.as_str(),
                "Backup naming",
                "legacy unversioned backup",
            )),
            None => {}
        }
    }
}

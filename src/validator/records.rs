use log::debug;

use crate::registry::{EntityKind, MetadataRecord, Warehouse};

use super::{ValidationCheck, ValidationReport};

/// Step 2: checks for one active record.
///
/// Later checks are skipped once the file cannot be interpreted.
pub(crate) fn check_record(warehouse: &Warehouse, name: &str, report: &mut ValidationReport) {
    debug!("Checking {}", name);

    let prefix_kind = name
        .split_once('-')
        .and_then(|(prefix, _)| prefix.parse::<EntityKind>().ok());
    match prefix_kind {
        Some(_) => report.add_check(ValidationCheck::ok(name, "Kind prefix")),
        None => report.add_check(ValidationCheck::failed(
            name,
            "Kind prefix",
            "file name does not start with exp-, rel- or calib-",
        )),
    }

    let document = match warehouse.read_entry(name) {
        Ok(document) => {
            report.add_check(ValidationCheck::ok(name, "JSON parses"));
            document
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed(name, "JSON parses", e.to_string()));
            return;
        }
    };

    let record = match MetadataRecord::from_value(document) {
        Ok(record) => {
            report.add_check(ValidationCheck::ok(name, "meta_info"));
            record
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed(name, "meta_info", e.to_string()));
            return;
        }
    };

    let expected = record.doi().file_name();
    if expected == name {
        report.add_check(ValidationCheck::ok(name, "File name matches DOI"));
    } else {
        report.add_check(ValidationCheck::failed(
            name,
            "File name matches DOI",
            format!("DOI {} belongs in {}", record.doi(), expected),
        ));
    }

    // Section mismatches only warn
    match EntityKind::detect(&record.body) {
        Some(kind) if kind == record.doi().kind() => {
            report.add_check(ValidationCheck::ok(name, "Sections match kind"))
        }
        Some(kind) => report.add_check(ValidationCheck::warning(
            name,
            "Sections match kind",
            format!("body looks like a {} record", kind),
        )),
        None => report.add_check(ValidationCheck::warning(
            name,
            "Sections match kind",
            format!("no '{}' section", record.doi().kind().section()),
        )),
    }
}

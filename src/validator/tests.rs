use super::*;
use crate::registry::{Doi, EntityKind, MetadataRecord, OverwritePolicy};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn status_of<'a>(report: &'a ValidationReport, subject: &str, check: &str) -> Option<&'a CheckStatus> {
    report
        .checks
        .iter()
        .find(|c| c.subject == subject && c.name == check)
        .map(|c| &c.status)
}

#[test]
fn test_report_display() {
    let mut report = ValidationReport::new("/data/warehouse");
    report.add_check(ValidationCheck::ok("exp-1.json", "JSON parses"));
    report.add_check(ValidationCheck::warning("exp-1.json.bak", "Backup naming", "legacy"));
    report.add_check(ValidationCheck::failed("rel-2.json", "meta_info", "missing doi"));

    let output = format!("{}", report);
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("3 files, 1 passed, 1 warnings, 1 failed"));
    assert!(output.contains("Validation FAILED"));
    assert_eq!(report.subjects(), vec!["exp-1.json", "exp-1.json.bak", "rel-2.json"]);
}

#[test]
fn test_clean_warehouse_passes() {
    let dir = tempdir().unwrap();
    let warehouse = Warehouse::open(dir.path()).unwrap();
    let record = MetadataRecord::new(
        Doi::generate(EntityKind::Exp),
        json!({"Data Info": {"File location/Links": "/data/a.csv"}})
            .as_object()
            .unwrap()
            .clone(),
    );
    warehouse.register(&record, OverwritePolicy::Refuse).unwrap();
    warehouse.new_version(&record).unwrap();

    let report = validate_warehouse(dir.path()).unwrap();
    assert!(!report.has_failures(), "{report}");
    assert!(!report.has_warnings(), "{report}");
    assert!(report.to_string().contains("Validation PASSED"));
}

#[test]
fn test_problem_files_are_flagged() {
    let dir = tempdir().unwrap();
    let write = |name: &str, text: &str| fs::write(dir.path().join(name), text).unwrap();

    write("exp-11111111.json", "{ broken");
    write("rel-22222222.json", r#"{"Correlation Info": {}}"#);
    write(
        "calib-33333333.json",
        &json!({"meta_info": {"version": 0, "doi": "calib-44444444", "Archived time": "2024-01-01 00:00:00"},
                "Calibration Case": {}})
        .to_string(),
    );
    write("sim-55555555.json", "{}");
    write("rel-22222222.json.bak", "{}");
    write("exp-99999999.json.v0.bak", "{}");
    write("notes.txt", "hello");

    let report = validate_warehouse(dir.path()).unwrap();
    assert!(report.has_failures());

    assert!(matches!(
        status_of(&report, "exp-11111111.json", "JSON parses"),
        Some(CheckStatus::Failed(_))
    ));
    assert!(matches!(
        status_of(&report, "rel-22222222.json", "meta_info"),
        Some(CheckStatus::Failed(_))
    ));
    assert!(matches!(
        status_of(&report, "calib-33333333.json", "File name matches DOI"),
        Some(CheckStatus::Failed(_))
    ));
    assert!(matches!(
        status_of(&report, "sim-55555555.json", "Kind prefix"),
        Some(CheckStatus::Failed(_))
    ));
    assert!(matches!(
        status_of(&report, "rel-22222222.json.bak", "Backup naming"),
        Some(CheckStatus::Warning(_))
    ));
    assert!(matches!(
        status_of(&report, "exp-99999999.json.v0.bak", "Backup owner"),
        Some(CheckStatus::Warning(_))
    ));
    assert!(matches!(
        status_of(&report, "notes.txt", "Foreign file"),
        Some(CheckStatus::Warning(_))
    ));
}

#[test]
fn test_missing_warehouse_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(validate_warehouse(&dir.path().join("absent")).is_err());
}
